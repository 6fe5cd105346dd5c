//! 宿主事件到流水线调用的映射。
//!
//! 宿主的菜单操作和音轨载入事件在这里被转换为对 [`LyricsFetcher`] 的调用，
//! 本模块本身不包含任何流水线逻辑。

use tracing::debug;

use crate::{
    LyricsFetcher,
    model::{report::BatchSummary, track::HostTrack},
};

/// 宿主触发的事件。
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// 用户对单首歌曲执行了"获取歌词"操作。
    TrackAction(HostTrack),
    /// 用户对整张专辑执行了"获取歌词"操作。
    AlbumAction(Vec<HostTrack>),
    /// 音轨被载入宿主会话。只有开启 `search_on_load` 时才会获取歌词。
    TrackLoaded(HostTrack),
}

impl LyricsFetcher {
    /// 处理一个宿主事件。
    ///
    /// 事件被忽略时（载入事件且未开启自动获取）返回 `None`。
    pub async fn handle_trigger(&self, event: TriggerEvent) -> Option<BatchSummary> {
        match event {
            TriggerEvent::TrackAction(track) => {
                Some(self.fetch_tracks(std::slice::from_ref(&track)).await)
            }
            TriggerEvent::AlbumAction(tracks) => Some(self.fetch_tracks(&tracks).await),
            TriggerEvent::TrackLoaded(track) => {
                if !self.config().search_on_load {
                    debug!("未开启载入时自动获取，忽略 '{}'。", track.path.display());
                    return None;
                }
                Some(self.fetch_tracks(std::slice::from_ref(&track)).await)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::FetcherConfig,
        error::Result,
        host::StagedTagStore,
        model::{
            report::StatusKind,
            track::{LyricCandidate, TrackQuery},
        },
        providers::LyricsProvider,
    };
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LyricsProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn lookup(&self, _query: &TrackQuery) -> Result<Vec<LyricCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn make_fetcher(search_on_load: bool) -> (LyricsFetcher, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::default());
        let config = FetcherConfig {
            search_on_load,
            ..Default::default()
        };
        let fetcher =
            LyricsFetcher::with_provider(config, provider.clone(), Arc::new(StagedTagStore::new()))
                .unwrap();
        (fetcher, provider)
    }

    fn track(n: usize) -> HostTrack {
        HostTrack {
            path: format!("/music/{n}.flac").into(),
            title: format!("Song {n}"),
            artist: "Artist".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_track_loaded_is_gated() {
        let (fetcher, provider) = make_fetcher(false);
        assert!(fetcher.handle_trigger(TriggerEvent::TrackLoaded(track(1))).await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        let (fetcher, provider) = make_fetcher(true);
        let summary = fetcher
            .handle_trigger(TriggerEvent::TrackLoaded(track(1)))
            .await
            .unwrap();
        assert_eq!(summary.count(StatusKind::NoLyrics), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_manual_actions_always_run() {
        let (fetcher, provider) = make_fetcher(false);
        let summary = fetcher
            .handle_trigger(TriggerEvent::TrackAction(track(1)))
            .await
            .unwrap();
        assert_eq!(summary.reports.len(), 1);

        let summary = fetcher
            .handle_trigger(TriggerEvent::AlbumAction((2..6).map(track).collect()))
            .await
            .unwrap();
        assert_eq!(summary.reports.len(), 4);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }
}
