//! 搜索模块
//!
//! 负责流水线的前半段：校验查询、向提供商查询候选、挑选最佳候选。

use tracing::{debug, info};

use crate::{
    error::Result,
    model::track::{LyricCandidate, TrackQuery},
    providers::LyricsProvider,
};

pub mod matcher;
pub use matcher::{DurationMatch, compare_duration, select_candidate};

/// 为一首歌曲查询并挑选歌词。
///
/// # 参数
/// * `provider` - 实现了 `LyricsProvider` trait 的远程歌词服务。
/// * `query` - 查询参数。标题或艺术家为空时直接返回错误，不会调用提供商。
/// * `tolerance_secs` - 时长匹配容差（秒）。
///
/// # 返回
/// * `Ok(Some(candidate))` - 选出的候选歌词。
/// * `Ok(None)` - 服务没有任何候选。
/// * `Err(..)` - 查询无效或查询失败。
pub async fn search_lyrics(
    provider: &dyn LyricsProvider,
    query: &TrackQuery,
    tolerance_secs: f64,
) -> Result<Option<LyricCandidate>> {
    query.validate()?;

    debug!(
        "开始查询歌曲 '{}' by {} (专辑: {:?}, 时长: {:?}, 提供商: {})",
        query.title(),
        query.artist(),
        query.album(),
        query.duration_secs(),
        provider.name()
    );

    let candidates = provider.lookup(query).await?;
    if candidates.is_empty() {
        info!(
            "提供商 '{}' 中没有 '{}' by {} 的歌词。",
            provider.name(),
            query.title(),
            query.artist()
        );
        return Ok(None);
    }

    let selected = select_candidate(query, &candidates, tolerance_secs).cloned();
    if let Some(candidate) = &selected {
        info!(
            "在 {} 条候选中选择了 '{}' (ID: {}, 时长: {:?}, 同步歌词: {})",
            candidates.len(),
            candidate.track_name,
            candidate.id,
            candidate.duration_secs,
            candidate.has_synced_text()
        );
    }
    Ok(selected)
}
