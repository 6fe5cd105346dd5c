//! 定义了与歌词查询相关的核心数据结构，包括宿主音轨、查询参数和候选歌词。

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LyricsFetchError, Result};

/// 宿主标签程序提供的音轨信息。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTrack {
    /// 音频文件路径。
    pub path: PathBuf,
    /// 歌曲标题。
    pub title: String,
    /// 艺术家。
    pub artist: String,
    /// 专辑名。
    pub album: Option<String>,
    /// 歌曲时长。
    pub duration: Option<Duration>,
}

/// 一次歌词查询的参数。构造完成后不再修改。
///
/// 时长只作为匹配候选时的容差参考，不是精确的查询键。
#[derive(Debug, Clone, PartialEq)]
pub struct TrackQuery {
    title: String,
    artist: String,
    album: Option<String>,
    duration_secs: Option<f64>,
}

impl TrackQuery {
    /// 用标题和艺术家创建查询。
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            artist: artist.into().trim().to_string(),
            album: None,
            duration_secs: None,
        }
    }

    /// 附加专辑名。空白的专辑名会被忽略。
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = non_blank(album.into());
        self
    }

    /// 附加时长（秒）。
    pub fn with_duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = (secs.is_finite() && secs > 0.0).then_some(secs);
        self
    }

    /// 从宿主音轨信息构建查询。时长取整到秒。
    pub fn from_host(track: &HostTrack) -> Self {
        let mut query = Self::new(track.title.as_str(), track.artist.as_str());
        if let Some(album) = &track.album {
            query = query.with_album(album.as_str());
        }
        if let Some(duration) = track.duration {
            query = query.with_duration_secs(duration.as_secs_f64().round());
        }
        query
    }

    /// 歌曲标题。
    pub fn title(&self) -> &str {
        &self.title
    }

    /// 艺术家。
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// 专辑名。
    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    /// 时长（秒）。
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// 检查查询是否足以发起请求：标题和艺术家都不能为空。
    pub fn validate(&self) -> Result<()> {
        match (self.title.is_empty(), self.artist.is_empty()) {
            (false, false) => Ok(()),
            (true, true) => Err(LyricsFetchError::InvalidQuery("缺少标题和艺术家".into())),
            (true, false) => Err(LyricsFetchError::InvalidQuery("缺少标题".into())),
            (false, true) => Err(LyricsFetchError::InvalidQuery("缺少艺术家".into())),
        }
    }
}

/// 歌词服务为一次查询返回的单条候选歌词。
///
/// 由查询客户端创建，之后只读。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricCandidate {
    /// 在服务中的记录 ID。
    pub id: i64,
    /// 服务记录的歌曲标题。
    pub track_name: String,
    /// 服务记录的艺术家。
    pub artist_name: String,
    /// 服务记录的专辑名。
    pub album_name: Option<String>,
    /// 服务记录的时长（秒）。
    pub duration_secs: Option<f64>,
    /// 是否为纯音乐。
    pub instrumental: bool,
    /// 纯文本歌词。
    pub plain_text: Option<String>,
    /// 原始的同步歌词文本（LRC 格式）。
    pub synced_text: Option<String>,
    /// 提供该候选的服务名称。
    pub provider_name: String,
}

impl LyricCandidate {
    /// 是否带有同步歌词。
    pub fn has_synced_text(&self) -> bool {
        self.synced_text
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// 是否带有任何歌词文本。
    pub fn has_any_text(&self) -> bool {
        self.has_synced_text()
            || self
                .plain_text
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
    }
}

/// 将宿主显示的时长字符串（`m:ss` 或 `h:mm:ss`）解析为 `Duration`。
///
/// 无法解析时返回 `None`，此时查询不带时长参考。
pub fn parse_track_length(length: &str) -> Option<Duration> {
    let parts: Vec<&str> = length.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut total_secs: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u64 = part.trim().parse().ok()?;
        // 除最高位外，每一段都必须小于 60
        if i > 0 && value >= 60 {
            return None;
        }
        total_secs = total_secs.checked_mul(60)?.checked_add(value)?;
    }
    Some(Duration::from_secs(total_secs))
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_title_and_artist() {
        assert!(TrackQuery::new("Yesterday", "The Beatles").validate().is_ok());
        assert!(matches!(
            TrackQuery::new("", "The Beatles").validate(),
            Err(LyricsFetchError::InvalidQuery(_))
        ));
        assert!(matches!(
            TrackQuery::new("Yesterday", "   ").validate(),
            Err(LyricsFetchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_from_host_rounds_duration_and_drops_blank_album() {
        let host = HostTrack {
            path: PathBuf::from("/music/yesterday.flac"),
            title: " Yesterday ".into(),
            artist: "The Beatles".into(),
            album: Some("  ".into()),
            duration: Some(Duration::from_millis(125_400)),
        };
        let query = TrackQuery::from_host(&host);
        assert_eq!(query.title(), "Yesterday");
        assert_eq!(query.album(), None);
        assert_eq!(query.duration_secs(), Some(125.0));
    }

    #[test]
    fn test_parse_track_length() {
        assert_eq!(parse_track_length("2:05"), Some(Duration::from_secs(125)));
        assert_eq!(parse_track_length("1:02:03"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_track_length("12:61"), None);
        assert_eq!(parse_track_length("?:??"), None);
        assert_eq!(parse_track_length("125"), None);
    }

    #[test]
    fn test_candidate_text_flags() {
        let candidate = LyricCandidate {
            plain_text: Some("la la".into()),
            synced_text: Some("  ".into()),
            ..Default::default()
        };
        assert!(!candidate.has_synced_text());
        assert!(candidate.has_any_text());
        assert!(!LyricCandidate::default().has_any_text());
    }
}
