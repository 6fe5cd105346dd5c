//! 此模块定义了与 LRCLIB API 相关的所有数据结构。

use serde::Deserialize;

use crate::model::track::{LyricCandidate, non_blank};

/// LRCLIB 返回的单条歌词记录。
///
/// `/api/get` 返回单个对象，`/api/search` 返回对象数组。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrclibRecord {
    /// 记录 ID。缺失时视为未找到。
    #[serde(default)]
    pub id: Option<i64>,
    /// 歌曲标题。
    #[serde(default)]
    pub track_name: Option<String>,
    /// 艺术家。
    #[serde(default)]
    pub artist_name: Option<String>,
    /// 专辑名。
    #[serde(default)]
    pub album_name: Option<String>,
    /// 时长（秒，可能带小数）。
    #[serde(default)]
    pub duration: Option<f64>,
    /// 是否为纯音乐。
    #[serde(default)]
    pub instrumental: bool,
    /// 纯文本歌词。
    #[serde(default)]
    pub plain_lyrics: Option<String>,
    /// LRC 格式的同步歌词。
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

impl LrclibRecord {
    /// 转换为通用的候选歌词。没有有效 ID 的记录返回 `None`。
    pub fn into_candidate(self, provider_name: &str) -> Option<LyricCandidate> {
        let id = self.id.filter(|id| *id > 0)?;
        Some(LyricCandidate {
            id,
            track_name: self.track_name.unwrap_or_default(),
            artist_name: self.artist_name.unwrap_or_default(),
            album_name: self.album_name.and_then(non_blank),
            duration_secs: self.duration.filter(|d| d.is_finite() && *d > 0.0),
            instrumental: self.instrumental,
            plain_text: self.plain_lyrics.and_then(non_blank),
            synced_text: self.synced_lyrics.and_then(non_blank),
            provider_name: provider_name.to_string(),
        })
    }
}

/// LRCLIB 的错误响应，例如
/// `{"code":404,"name":"TrackNotFound","message":"Failed to find specified track"}`。
#[derive(Debug, Deserialize)]
pub struct LrclibErrorResponse {
    /// 错误类型，例如 `TrackNotFound`。
    #[serde(default)]
    pub name: Option<String>,
    /// 可读的错误信息。
    #[serde(default)]
    pub message: Option<String>,
}
