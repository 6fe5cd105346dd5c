//! 定义了歌词规范化过程中使用的核心数据结构。

use serde::{Deserialize, Serialize};

use crate::converter::generators::lrc_generator;

/// 一行带时间戳的歌词。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedLyricLine {
    /// 行开始时间（毫秒）。
    pub timestamp_ms: u64,
    /// 行文本。可能包含 `\n`，表示后续未带时间戳的续行。
    pub text: String,
}

impl SyncedLyricLine {
    /// 创建一行歌词。
    pub fn new(timestamp_ms: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }
}

/// 规范化后的歌词，是交给持久化步骤的基本单元。
///
/// `synced_lines` 按时间戳升序排列（稳定排序）；
/// 当且仅当没有任何时间轴数据时为空。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLyrics {
    /// 不含时间戳标记的纯文本歌词。
    pub plain_text: String,
    /// 同步歌词行。
    pub synced_lines: Vec<SyncedLyricLine>,
}

impl ResolvedLyrics {
    /// 是否完全没有歌词内容。
    pub fn is_empty(&self) -> bool {
        self.plain_text.is_empty() && self.synced_lines.is_empty()
    }

    /// 是否带有时间轴。
    pub fn has_synced_lines(&self) -> bool {
        !self.synced_lines.is_empty()
    }

    /// 渲染为 LRC 文本，每行 `[mm:ss.xx]text`，以换行结尾。
    pub fn to_lrc(&self) -> String {
        lrc_generator::generate_lrc(&self.synced_lines)
    }
}
