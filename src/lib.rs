#![warn(missing_docs)]

//! # LRCLIB Lyrics RS
//!
//! 从 LRCLIB 获取歌词（纯文本与逐行同步歌词），并保存到本地音乐库中。
//!
//! ## 主要功能
//!
//! - **歌词获取**: 根据标题、艺术家、专辑和时长向 LRCLIB 查询候选歌词。
//! - **候选挑选**: 按时长容差和是否带同步歌词挑选最佳候选，结果确定。
//! - **歌词规范化**: 将 `[mm:ss.xx]` 格式的同步歌词解析为按时间排序的行，并导出纯文本。
//! - **持久化**:
//!   - 将歌词暂存到宿主的 "lyrics" 标签中，由宿主保存时写入文件。
//!   - 在音频文件旁创建 `.lrc` 伴随文件，已有的伴随文件从不覆盖。
//!
//! ## 获取歌词
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lrclib_lyrics_rs::config::FetcherConfig;
//! use lrclib_lyrics_rs::host::StagedTagStore;
//! use lrclib_lyrics_rs::model::track::HostTrack;
//! use lrclib_lyrics_rs::LyricsFetcher;
//!
//! async {
//!     let tags = Arc::new(StagedTagStore::new());
//!     let fetcher = LyricsFetcher::new(FetcherConfig::default(), tags.clone()).unwrap();
//!
//!     let track = HostTrack {
//!         path: "/music/The Beatles/Help!/Yesterday.flac".into(),
//!         title: "Yesterday".to_string(),
//!         artist: "The Beatles".to_string(),
//!         album: Some("Help!".to_string()),
//!         duration: Some(std::time::Duration::from_secs(125)),
//!     };
//!
//!     let report = fetcher.fetch_track(&track).await;
//!     println!("{}: {}", report.title, report.status);
//!
//!     // 相当于宿主的"保存"操作
//!     for (path, result) in tags.commit() {
//!         if let Err(e) = result {
//!             eprintln!("写入 {} 失败: {}", path.display(), e);
//!         }
//!     }
//! };
//! ```
pub mod config;
pub mod converter;
pub mod error;
pub mod host;
pub mod model;
pub mod persistence;
pub mod providers;
pub mod search;
pub mod trigger;

use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{error, info, warn};

pub use crate::{
    config::FetcherConfig,
    error::{LyricsFetchError, Result},
    model::{
        report::{BatchSummary, PersistResult, SidecarStatus, StatusKind, TrackReport, TrackStatus},
        track::{HostTrack, LyricCandidate, TrackQuery},
    },
    trigger::TriggerEvent,
};

use crate::{
    converter::ResolvedLyrics,
    host::TagStore,
    persistence::Persister,
    providers::{LyricsProvider, lrclib::LrclibClient},
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层歌词获取器，串起查询、挑选、规范化和持久化。
///
/// 这是与本库交互的主要入口点。
pub struct LyricsFetcher {
    provider: Arc<dyn LyricsProvider>,
    persister: Persister,
    config: FetcherConfig,
}

impl LyricsFetcher {
    /// 使用 LRCLIB 作为歌词来源创建获取器。
    ///
    /// # 参数
    /// * `config` - 获取器配置，会先经过校验。
    /// * `tags` - 宿主的标签存储，歌词会暂存到这里。
    pub fn new(config: FetcherConfig, tags: Arc<dyn TagStore>) -> Result<Self> {
        let provider = Arc::new(LrclibClient::from_config(&config)?);
        Self::with_provider(config, provider, tags)
    }

    /// 使用自定义的歌词来源创建获取器。
    pub fn with_provider(
        config: FetcherConfig,
        provider: Arc<dyn LyricsProvider>,
        tags: Arc<dyn TagStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            persister: Persister::new(tags, &config),
            config,
        })
    }

    /// 当前配置。
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// 为一首歌曲执行完整的流水线：查询 → 挑选 → 规范化 → 持久化。
    ///
    /// 任何失败都只影响这一首歌，并体现在返回的报告中。
    /// 在持久化开始之前丢弃返回的 future 不会留下任何写入。
    pub async fn fetch_track(&self, track: &HostTrack) -> TrackReport {
        let status = match self.resolve(track).await {
            Ok(Some(lyrics)) => self.persist(lyrics, track).await,
            Ok(None) => {
                info!("'{}' by {} 没有可用的歌词。", track.title, track.artist);
                TrackStatus::NoLyrics
            }
            Err(LyricsFetchError::InvalidQuery(reason)) => {
                warn!("跳过 '{}': {reason}", track.path.display());
                TrackStatus::Skipped(reason)
            }
            Err(e) => {
                if e.is_fetch_failure() {
                    warn!("获取 '{}' by {} 的歌词失败: {e}", track.title, track.artist);
                } else {
                    error!("处理 '{}' 时发生意外错误: {e}", track.path.display());
                }
                TrackStatus::FetchFailed(e.to_string())
            }
        };

        TrackReport {
            path: track.path.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            status,
        }
    }

    /// 并发处理多首歌曲，同时进行的流水线数量不超过 `max_concurrent_lookups`。
    ///
    /// 返回的汇总中报告顺序与输入顺序一致。
    pub async fn fetch_tracks(&self, tracks: &[HostTrack]) -> BatchSummary {
        let limit = self.config.max_concurrent_lookups.max(1);

        let mut indexed: Vec<(usize, TrackReport)> = stream::iter(tracks.iter().enumerate())
            .map(|(index, track)| async move { (index, self.fetch_track(track).await) })
            .buffer_unordered(limit)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let summary = BatchSummary {
            reports: indexed.into_iter().map(|(_, report)| report).collect(),
        };
        info!("批量获取完成，{}", summary.totals());
        summary
    }

    /// 流水线前半段。返回 `None` 表示没有候选，或选中的候选没有任何歌词文本。
    async fn resolve(&self, track: &HostTrack) -> Result<Option<ResolvedLyrics>> {
        let query = TrackQuery::from_host(track);
        let candidate = search::search_lyrics(
            self.provider.as_ref(),
            &query,
            self.config.duration_tolerance_secs,
        )
        .await?;

        Ok(candidate
            .map(|candidate| converter::normalize(&candidate))
            .filter(|lyrics| !lyrics.is_empty()))
    }

    async fn persist(&self, lyrics: ResolvedLyrics, track: &HostTrack) -> TrackStatus {
        let persister = self.persister.clone();
        let owned_track = track.clone();
        let task =
            tokio::task::spawn_blocking(move || persister.persist(&lyrics, &owned_track)).await;

        match task {
            Ok(result) => TrackStatus::Fetched(result),
            Err(e) => TrackStatus::FetchFailed(format!("持久化任务异常退出: {e}")),
        }
    }
}
