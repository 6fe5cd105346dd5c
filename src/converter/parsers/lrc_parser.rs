//! # LRC 格式解析器

use regex::Regex;
use std::{borrow::Cow, ops::Range, sync::LazyLock};

use crate::converter::types::SyncedLyricLine;

/// 用于匹配一个完整的 LRC 歌词行，捕获时间戳部分和文本部分
static LRC_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\[\d+:\d{2}(?:[.:]\d{1,3})?\])+)(.*)$").expect("未能编译 LRC_LINE_REGEX")
});

/// 用于从一个时间戳组中提取出单个时间戳
static LRC_TIMESTAMP_EXTRACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+):(\d{2})(?:[.:](\d{1,3}))?\]")
        .expect("未能编译 LRC_TIMESTAMP_EXTRACT_REGEX")
});

/// 用于匹配标准的 LRC ID 标签，例如 `[ar:...]`、`[offset:...]`
static LRC_METADATA_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[(ar|ti|al|au|by|re|ve|length|offset|#):(.*)\]$")
        .expect("未能编译 LRC_METADATA_TAG_REGEX")
});

/// 用于匹配文本中任意位置的 `[mm:ss.xx]` 或 `<mm:ss.xx>` 时间标记
static LRC_INLINE_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[<]\d+:\d{2}(?:[.:]\d{1,3})?[\]>]")
        .expect("未能编译 LRC_INLINE_TIMESTAMP_REGEX")
});

/// LRC 文本的解析结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLrc {
    /// 按时间戳稳定排序后的歌词行。
    pub lines: Vec<SyncedLyricLine>,
    /// 整个文本中都没有出现有效时间戳时，收集到的未计时文本行。
    pub untimed_lines: Vec<String>,
    /// 解析过程中遇到的问题。
    pub warnings: Vec<String>,
}

/// 解析 LRC 格式内容。
///
/// 只有标准的 ID 标签会被跳过。其他无法解析出行首时间戳的行（包括 `[Chorus: Both]`
/// 这类段落标记）会作为续行追加到上一行歌词的文本后（以 `\n` 分隔），不会被丢弃。
/// 出现在第一行计时歌词之前的未计时行会被并入第一行计时歌词。
///
/// 行文本中残留的时间标记（无效的行首时间戳、逐字时间戳）会被去掉，只保留文字。
pub fn parse_lrc(content: &str) -> ParsedLrc {
    let mut warnings: Vec<String> = Vec::new();
    let mut lines: Vec<SyncedLyricLine> = Vec::new();
    let mut leading_untimed: Vec<String> = Vec::new();
    // 上一个计时行展开出的条目下标
    let mut last_group: Range<usize> = 0..0;

    for (line_num_zero_based, line_str_raw) in content.lines().enumerate() {
        let line_num_one_based = line_num_zero_based + 1;
        let line_str_trimmed = line_str_raw.trim();

        if line_str_trimmed.is_empty() {
            continue;
        }

        if let Some(meta_caps) = LRC_METADATA_TAG_REGEX.captures(line_str_trimmed) {
            tracing::debug!(
                "跳过 LRC 元数据标签 (行 {line_num_one_based}): '{}'",
                meta_caps.get(1).map_or("", |m| m.as_str())
            );
            continue;
        }

        match parse_timed_line(line_str_trimmed, line_num_one_based, &mut warnings) {
            Some((timestamps, text)) => {
                let text = if lines.is_empty() && !leading_untimed.is_empty() {
                    join_text(&leading_untimed.join("\n"), &text)
                } else {
                    text
                };
                leading_untimed.clear();

                let start = lines.len();
                lines.extend(
                    timestamps
                        .into_iter()
                        .map(|ts| SyncedLyricLine::new(ts, text.clone())),
                );
                last_group = start..lines.len();
            }
            None => {
                warnings.push(format!(
                    "LRC解析警告 (行 {line_num_one_based}): 行首没有有效时间戳，作为续行处理 '{line_str_trimmed}'。"
                ));
                let text = strip_inline_timestamps(line_str_trimmed);
                if text.is_empty() {
                    continue;
                }
                if last_group.is_empty() {
                    leading_untimed.push(text);
                } else {
                    for entry in &mut lines[last_group.clone()] {
                        entry.text = join_text(&entry.text, &text);
                    }
                }
            }
        }
    }

    // 稳定排序，相同时间戳保持原有顺序
    lines.sort_by_key(|line| line.timestamp_ms);

    ParsedLrc {
        lines,
        untimed_lines: leading_untimed,
        warnings,
    }
}

/// 解析一行计时歌词，返回其全部时间戳和文本。
///
/// 行首时间戳组中单个无效的时间戳会被忽略并记录警告；
/// 一个有效时间戳都没有时返回 `None`。
fn parse_timed_line(
    line: &str,
    line_num: usize,
    warnings: &mut Vec<String>,
) -> Option<(Vec<u64>, String)> {
    let line_caps = LRC_LINE_REGEX.captures(line)?;
    let all_timestamps_str = line_caps.get(1).map_or("", |m| m.as_str());
    let text_part = line_caps.get(2).map_or("", |m| m.as_str()).trim();

    let mut timestamps = Vec::new();
    for ts_cap in LRC_TIMESTAMP_EXTRACT_REGEX.captures_iter(all_timestamps_str) {
        let minutes = ts_cap.get(1).map_or("0", |m| m.as_str());
        let seconds = ts_cap.get(2).map_or("0", |m| m.as_str());
        let fraction = ts_cap.get(3).map_or("", |m| m.as_str());

        match timestamp_to_ms(minutes, seconds, fraction) {
            Some(ms) => timestamps.push(ms),
            None => warnings.push(format!(
                "LRC解析警告 (行 {line_num}): 无效的时间戳 '{}'。",
                ts_cap.get(0).map_or("", |m| m.as_str())
            )),
        }
    }

    if timestamps.is_empty() {
        None
    } else {
        Some((timestamps, strip_inline_timestamps(text_part)))
    }
}

/// 去掉文本中的时间标记。发生替换时会合并多余的空白。
fn strip_inline_timestamps(text: &str) -> String {
    match LRC_INLINE_TIMESTAMP_REGEX.replace_all(text, " ") {
        Cow::Borrowed(untouched) => untouched.to_string(),
        Cow::Owned(stripped) => stripped.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// 将时间戳的各个部分换算为毫秒。秒数必须小于 60。
fn timestamp_to_ms(minutes: &str, seconds: &str, fraction: &str) -> Option<u64> {
    let minutes = minutes.parse::<u64>().ok()?;
    let seconds = seconds.parse::<u64>().ok()?;
    if seconds >= 60 {
        return None;
    }
    let milliseconds = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 100,
        2 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse::<u64>().ok()?,
    };
    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(milliseconds)
}

fn join_text(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{head}\n{tail}"),
    }
}
