//! 持久化协调
//!
//! 把规范化后的歌词写到两个相互独立的地方：
//! - 宿主的 "lyrics" 标签（只暂存，由宿主决定何时落盘）；
//! - 音频文件旁的 `.lrc` 伴随文件（从不覆盖已有文件）。
//!
//! 任何一条路径失败都不会影响另一条。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::{FetcherConfig, TagContent},
    converter::ResolvedLyrics,
    host::TagStore,
    model::{
        report::{PersistResult, SidecarStatus},
        track::HostTrack,
    },
};

pub mod sidecar;
pub use sidecar::{sidecar_path, write_sidecar_if_absent};

/// 持久化协调器。
#[derive(Clone)]
pub struct Persister {
    tags: Arc<dyn TagStore>,
    save_lrc_file: bool,
    tag_content: TagContent,
}

impl Persister {
    /// 根据配置创建协调器。
    pub fn new(tags: Arc<dyn TagStore>, config: &FetcherConfig) -> Self {
        Self {
            tags,
            save_lrc_file: config.save_lrc_file,
            tag_content: config.tag_content,
        }
    }

    /// 持久化一首歌的歌词。
    ///
    /// 这是一个同步方法，会访问文件系统；在异步上下文中应放到阻塞线程池执行。
    pub fn persist(&self, lyrics: &ResolvedLyrics, track: &HostTrack) -> PersistResult {
        let metadata_written = self.stage_tag(lyrics, track);
        let sidecar = self.write_sidecar(lyrics, track);

        PersistResult {
            metadata_written,
            sidecar_written: matches!(sidecar, SidecarStatus::Written(_)),
            sidecar,
        }
    }

    fn tag_value(&self, lyrics: &ResolvedLyrics) -> String {
        match self.tag_content {
            TagContent::Synced if lyrics.has_synced_lines() => {
                lyrics.to_lrc().trim_end().to_string()
            }
            _ => lyrics.plain_text.clone(),
        }
    }

    fn stage_tag(&self, lyrics: &ResolvedLyrics, track: &HostTrack) -> bool {
        if lyrics.plain_text.is_empty() {
            debug!("'{}' 没有纯文本歌词，不写入标签。", track.path.display());
            return false;
        }

        match self.tags.stage_lyrics(track, &self.tag_value(lyrics)) {
            Ok(()) => true,
            Err(e) => {
                warn!("暂存 '{}' 的歌词标签失败: {e}", track.path.display());
                false
            }
        }
    }

    fn write_sidecar(&self, lyrics: &ResolvedLyrics, track: &HostTrack) -> SidecarStatus {
        if !self.save_lrc_file {
            return SidecarStatus::Disabled;
        }
        if !lyrics.has_synced_lines() {
            return SidecarStatus::NoTimedLines;
        }

        let path = sidecar_path(&track.path);
        match write_sidecar_if_absent(&path, &lyrics.to_lrc()) {
            Ok(SidecarStatus::AlreadyExists(path)) => {
                warn!("伴随文件 '{}' 已存在，跳过写入。", path.display());
                SidecarStatus::AlreadyExists(path)
            }
            Ok(status) => {
                info!("已写入伴随文件 '{}'。", path.display());
                status
            }
            Err(e) => {
                warn!("写入伴随文件 '{}' 失败: {e}", path.display());
                SidecarStatus::Failed {
                    path,
                    reason: e.to_string(),
                }
            }
        }
    }
}
