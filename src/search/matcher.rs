//! 匹配算法模块，按时长容差挑选候选歌词

use crate::model::track::{LyricCandidate, TrackQuery};

/// 候选歌词时长与音轨时长的匹配情况。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationMatch {
    /// 两者都已知，且差值在容差内。
    Within,
    /// 两者都已知，但差值超出容差。
    Outside,
    /// 候选没有时长，无法比较。
    CandidateUnknown,
    /// 音轨没有时长，不做时长筛选。
    TrackUnknown,
}

impl DurationMatch {
    /// 该候选是否通过时长筛选。
    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Within | Self::TrackUnknown)
    }
}

/// 比较音轨时长和候选时长。差值等于容差时视为匹配。
pub fn compare_duration(
    track_secs: Option<f64>,
    candidate_secs: Option<f64>,
    tolerance_secs: f64,
) -> DurationMatch {
    match (track_secs, candidate_secs) {
        (None, _) => DurationMatch::TrackUnknown,
        (Some(_), None) => DurationMatch::CandidateUnknown,
        (Some(track), Some(candidate)) if (track - candidate).abs() <= tolerance_secs => {
            DurationMatch::Within
        }
        (Some(_), Some(_)) => DurationMatch::Outside,
    }
}

/// 从候选列表中挑选最合适的一条。
///
/// 1. 只考虑通过时长筛选的候选；其中按 同步歌词 > 纯文本 > 无文本 排序，
///    同等条件下取服务返回顺序中靠前的。
/// 2. 没有候选通过时长筛选时，退回到服务返回的第一条带文本的候选；都没有文本时取第一条。
/// 3. 列表为空时返回 `None`。
///
/// 结果只取决于输入，相同输入总是得到相同结果。
pub fn select_candidate<'a>(
    query: &TrackQuery,
    candidates: &'a [LyricCandidate],
    tolerance_secs: f64,
) -> Option<&'a LyricCandidate> {
    let first = candidates.first()?;

    let eligible: Vec<&LyricCandidate> = candidates
        .iter()
        .filter(|c| {
            compare_duration(query.duration_secs(), c.duration_secs, tolerance_secs).is_eligible()
        })
        .collect();

    if eligible.is_empty() {
        let fallback = candidates.iter().find(|c| c.has_any_text()).unwrap_or(first);
        tracing::debug!(
            "[Matcher] 没有时长匹配的候选，退回到 ID: {}。",
            fallback.id
        );
        return Some(fallback);
    }

    eligible
        .iter()
        .find(|c| c.has_synced_text())
        .or_else(|| eligible.iter().find(|c| c.has_any_text()))
        .or_else(|| eligible.first())
        .copied()
}
