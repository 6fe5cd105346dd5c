//! 定义了持久化结果、单曲处理状态和批量处理汇总。

use std::{fmt, path::PathBuf};

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// .lrc 伴随文件的处理结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarStatus {
    /// 新建了伴随文件。
    Written(PathBuf),
    /// 目标路径已有文件，跳过写入。
    AlreadyExists(PathBuf),
    /// 歌词没有时间轴，无法生成伴随文件。
    NoTimedLines,
    /// 配置中关闭了伴随文件。
    Disabled,
    /// 写入失败。
    Failed {
        /// 伴随文件路径
        path: PathBuf,
        /// 失败原因
        reason: String,
    },
}

/// 一次持久化的结果。两条写入路径互相独立。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistResult {
    /// 是否向宿主暂存了 "lyrics" 标签。
    pub metadata_written: bool,
    /// 是否新建了伴随文件。
    pub sidecar_written: bool,
    /// 伴随文件的详细处理结果。
    pub sidecar: SidecarStatus,
}

/// 单曲处理状态的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum StatusKind {
    /// 已获取歌词
    #[strum(serialize = "已获取")]
    Fetched,
    /// 没有可用歌词
    #[strum(serialize = "无歌词")]
    NoLyrics,
    /// 元数据不足，已跳过
    #[strum(serialize = "已跳过")]
    Skipped,
    /// 查询失败
    #[strum(serialize = "获取失败")]
    FetchFailed,
}

/// 单曲流水线的最终状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackStatus {
    /// 选出了歌词并完成持久化（伴随文件可能被跳过或失败）。
    Fetched(PersistResult),
    /// 服务没有歌词，或选出的候选没有文本。
    NoLyrics,
    /// 音轨元数据不足以查询。
    Skipped(String),
    /// 查询未能完成或服务拒绝了请求。
    FetchFailed(String),
}

impl TrackStatus {
    /// 状态分类。
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Fetched(_) => StatusKind::Fetched,
            Self::NoLyrics => StatusKind::NoLyrics,
            Self::Skipped(_) => StatusKind::Skipped,
            Self::FetchFailed(_) => StatusKind::FetchFailed,
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched(result) => {
                write!(f, "{}", self.kind())?;
                if result.metadata_written {
                    write!(f, " [标签已暂存]")?;
                }
                match &result.sidecar {
                    SidecarStatus::Written(path) => write!(f, " [已写入 {}]", path.display()),
                    SidecarStatus::AlreadyExists(path) => {
                        write!(f, " [{} 已存在，未覆盖]", path.display())
                    }
                    SidecarStatus::Failed { path, reason } => {
                        write!(f, " [写入 {} 失败: {reason}]", path.display())
                    }
                    SidecarStatus::NoTimedLines | SidecarStatus::Disabled => Ok(()),
                }
            }
            Self::NoLyrics => write!(f, "{}", self.kind()),
            Self::Skipped(reason) | Self::FetchFailed(reason) => {
                write!(f, "{}: {reason}", self.kind())
            }
        }
    }
}

/// 单曲处理报告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    /// 音频文件路径。
    pub path: PathBuf,
    /// 歌曲标题。
    pub title: String,
    /// 艺术家。
    pub artist: String,
    /// 最终状态。
    pub status: TrackStatus,
}

/// 批量处理的汇总，报告顺序与输入顺序一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 每首歌曲的处理报告。
    pub reports: Vec<TrackReport>,
}

impl BatchSummary {
    /// 某一类状态的歌曲数量。
    pub fn count(&self, kind: StatusKind) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status.kind() == kind)
            .count()
    }

    /// 写入失败的伴随文件数量。
    pub fn sidecar_failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| {
                matches!(
                    &r.status,
                    TrackStatus::Fetched(PersistResult {
                        sidecar: SidecarStatus::Failed { .. },
                        ..
                    })
                )
            })
            .count()
    }

    /// 汇总行，例如 `共 4 首: 已获取 1, 无歌词 1, 已跳过 1, 获取失败 1`。
    pub fn totals(&self) -> String {
        let counts: Vec<String> = StatusKind::iter()
            .map(|kind| format!("{kind} {}", self.count(kind)))
            .collect();
        format!("共 {} 首: {}", self.reports.len(), counts.join(", "))
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(
                f,
                "{} - {}: {}",
                report.artist, report.title, report.status
            )?;
        }
        f.write_str(&self.totals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: TrackStatus) -> TrackReport {
        TrackReport {
            path: PathBuf::from("/music/a.flac"),
            title: "Song".into(),
            artist: "Artist".into(),
            status,
        }
    }

    #[test]
    fn test_empty_summary_totals() {
        let summary = BatchSummary { reports: Vec::new() };
        assert_eq!(summary.totals(), "共 0 首: 已获取 0, 无歌词 0, 已跳过 0, 获取失败 0");
        assert_eq!(summary.to_string(), summary.totals());
    }

    #[test]
    fn test_summary_counts_and_display() {
        let summary = BatchSummary {
            reports: vec![
                report(TrackStatus::Fetched(PersistResult {
                    metadata_written: true,
                    sidecar_written: false,
                    sidecar: SidecarStatus::Failed {
                        path: PathBuf::from("/music/a.lrc"),
                        reason: "disk full".into(),
                    },
                })),
                report(TrackStatus::NoLyrics),
                report(TrackStatus::Skipped("缺少标题".into())),
                report(TrackStatus::FetchFailed("timeout".into())),
            ],
        };

        assert_eq!(summary.count(StatusKind::Fetched), 1);
        assert_eq!(summary.count(StatusKind::NoLyrics), 1);
        assert_eq!(summary.sidecar_failures(), 1);

        let text = summary.to_string();
        assert!(text.contains("disk full"));
        assert_eq!(summary.totals(), "共 4 首: 已获取 1, 无歌词 1, 已跳过 1, 获取失败 1");
        assert!(text.ends_with(&summary.totals()));
    }
}
