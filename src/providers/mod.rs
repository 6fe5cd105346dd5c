//! 提供商模块
//!
//! 该模块定义了与远程歌词服务进行交互的核心抽象。

use async_trait::async_trait;

use crate::{
    error::Result,
    model::track::{LyricCandidate, TrackQuery},
};

pub mod lrclib;

/// 定义了所有歌词服务提供商需要实现的通用接口。
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    ///
    /// 返回提供商的唯一名称。
    ///
    /// 一个全小写的静态字符串，例如 `"lrclib"`。
    ///
    fn name(&self) -> &'static str;

    ///
    /// 根据音轨信息查询候选歌词。
    ///
    /// # 参数
    /// * `query` - 查询参数。标题或艺术家为空时，实现必须在发起请求前
    ///   返回 `LyricsFetchError::InvalidQuery`。
    ///
    /// # 返回
    /// * `Ok(vec![])` - 服务中没有这首歌的歌词，这是正常结果而不是错误。
    /// * `Ok(candidates)` - 按服务自身的相关度顺序排列的候选歌词。
    /// * `Err(Network | Service)` - 无法完成查询。实现不做任何重试。
    ///
    async fn lookup(&self, query: &TrackQuery) -> Result<Vec<LyricCandidate>>;
}
