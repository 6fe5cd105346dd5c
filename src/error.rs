//! 定义了整个 `lrclib-lyrics` 库的错误类型 `LyricsFetchError`。

use std::{io, path::PathBuf};
use thiserror::Error;

/// `lrclib-lyrics` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum LyricsFetchError {
    /// 音轨元数据不足以发起查询（缺少标题或艺术家）
    #[error("查询参数无效: {0}")]
    InvalidQuery(String),

    /// 请求未能完成（超时、DNS、连接被拒绝）
    #[error("网络错误: {0}")]
    Network(String),

    /// 服务返回了非成功状态码或无法解析的响应体
    #[error("歌词服务错误: {0}")]
    Service(String),

    /// 写入 .lrc 伴随文件失败
    #[error("写入伴随文件 '{}' 失败: {source}", path.display())]
    SidecarWrite {
        /// 伴随文件路径
        path: PathBuf,
        /// 底层 I/O 错误
        #[source]
        source: io::Error,
    },

    /// 读写音频文件标签失败 (源自 `lofty::error::LoftyError`)
    #[error("音频标签读写失败: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 配置无效或无法加载
    #[error("配置错误: {0}")]
    Config(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `LyricsFetchError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, LyricsFetchError>;

impl From<reqwest::Error> for LyricsFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::Network(err.to_string())
        } else {
            Self::Service(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LyricsFetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Service(format!("响应体格式错误: {err}"))
    }
}

impl LyricsFetchError {
    /// 该错误是否属于“无法向服务发起或完成查询”一类。
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Service(_))
    }
}
