//! 歌词规范化模块
//!
//! 将候选歌词的同步文本解析为按时间排序的 [`SyncedLyricLine`] 序列，
//! 并导出不含时间戳的纯文本。

pub mod generators;
pub mod parsers;
pub mod types;

pub use types::{ResolvedLyrics, SyncedLyricLine};

use tracing::{debug, warn};

use crate::{converter::parsers::lrc_parser, model::track::LyricCandidate};

/// 将一条候选歌词规范化为 `ResolvedLyrics`。
///
/// * 没有同步文本时，`synced_lines` 为空，纯文本直接取自候选。
/// * 有同步文本但没有纯文本时，纯文本由各行文本按顺序逐行拼接而成。
/// * 同步文本中一个有效时间戳都没有时，视为没有时间轴，其文本作为纯文本的后备。
pub fn normalize(candidate: &LyricCandidate) -> ResolvedLyrics {
    let parsed = candidate
        .synced_text
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(lrc_parser::parse_lrc);

    let (synced_lines, untimed_lines) = match parsed {
        Some(parsed) => {
            for warning in &parsed.warnings {
                warn!("[Normalize] 候选 {}: {warning}", candidate.id);
            }
            (parsed.lines, parsed.untimed_lines)
        }
        None => (Vec::new(), Vec::new()),
    };

    let plain_text = match candidate
        .plain_text
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        Some(plain) => normalize_plain_text(plain),
        None if !synced_lines.is_empty() => join_lines(synced_lines.iter().map(|l| l.text.as_str())),
        None => join_lines(untimed_lines.iter().map(String::as_str)),
    };

    debug!(
        "[Normalize] 候选 {}: {} 行同步歌词, 纯文本 {} 字节。",
        candidate.id,
        synced_lines.len(),
        plain_text.len()
    );

    ResolvedLyrics {
        plain_text,
        synced_lines,
    }
}

/// 统一换行符并去掉首尾空行。
fn normalize_plain_text(text: &str) -> String {
    join_lines(text.lines())
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let joined = lines.map(str::trim_end).collect::<Vec<_>>().join("\n");
    joined.trim_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(plain: Option<&str>, synced: Option<&str>) -> LyricCandidate {
        LyricCandidate {
            id: 1,
            plain_text: plain.map(String::from),
            synced_text: synced.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_only() {
        let resolved = normalize(&candidate(Some("Line one\r\nLine two\n"), None));
        assert_eq!(resolved.plain_text, "Line one\nLine two");
        assert!(resolved.synced_lines.is_empty());
    }

    #[test]
    fn test_synced_only_derives_plain_text() {
        let resolved = normalize(&candidate(None, Some("[00:02.00]Two\n[00:01.00]One")));
        assert_eq!(resolved.plain_text, "One\nTwo");
        assert_eq!(resolved.synced_lines.len(), 2);
        assert!(!resolved.plain_text.contains('['));
    }

    #[test]
    fn test_both_prefers_candidate_plain_text() {
        let resolved = normalize(&candidate(
            Some("Official plain"),
            Some("[00:01.00]Timed"),
        ));
        assert_eq!(resolved.plain_text, "Official plain");
        assert_eq!(resolved.synced_lines, vec![SyncedLyricLine::new(1000, "Timed")]);
    }

    #[test]
    fn test_synced_text_without_timestamps_has_no_synced_lines() {
        let resolved = normalize(&candidate(None, Some("no\ntimes")));
        assert!(resolved.synced_lines.is_empty());
        assert_eq!(resolved.plain_text, "no\ntimes");
    }

    #[test]
    fn test_instrumental_without_text_is_empty() {
        let mut c = candidate(None, None);
        c.instrumental = true;
        assert!(normalize(&c).is_empty());
    }

    #[test]
    fn test_blank_plain_text_falls_back_to_synced() {
        let resolved = normalize(&candidate(Some("  "), Some("[00:01.00]Only")));
        assert_eq!(resolved.plain_text, "Only");
    }

    #[test]
    fn test_derived_plain_text_has_no_timestamp_markup() {
        let resolved = normalize(&candidate(
            None,
            Some("[00:01.00]Ok\n[00:75.00]Bad\n[00:02.00]Hello [00:02.50]world"),
        ));
        assert_eq!(resolved.plain_text, "Ok\nBad\nHello world");

        let markup = regex::Regex::new(r"[\[<]\d+:\d{2}").unwrap();
        assert!(!markup.is_match(&resolved.plain_text));
        for line in &resolved.synced_lines {
            assert!(!markup.is_match(&line.text), "行文本残留时间标记: {:?}", line.text);
        }
    }

    #[test]
    fn test_section_marker_survives_into_plain_text() {
        let resolved = normalize(&candidate(
            None,
            Some("[00:01.00]Hi\n[Chorus: Both]\n[00:02.00]Bye"),
        ));
        assert_eq!(resolved.plain_text, "Hi\n[Chorus: Both]\nBye");
        assert_eq!(resolved.synced_lines.len(), 2);
    }
}
