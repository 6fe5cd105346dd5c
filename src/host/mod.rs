//! 宿主标签程序的接口。
//!
//! 流水线只负责把 "lyrics" 标签的值暂存到宿主的内存表示中；
//! 真正写入音频文件发生在宿主执行保存（[`StagedTagStore::commit`]）时。

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::{info, warn};

use crate::{error::Result, model::track::HostTrack};

pub mod audio_file;

/// 宿主的标签存储。实现必须允许多个流水线并发暂存。
pub trait TagStore: Send + Sync {
    /// 为音轨暂存 "lyrics" 标签的值。
    fn stage_lyrics(&self, track: &HostTrack, lyrics: &str) -> Result<()>;
}

/// 基于内存的标签暂存区，在 `commit` 时才写入音频文件。
#[derive(Debug, Default)]
pub struct StagedTagStore {
    staged: DashMap<PathBuf, String>,
}

impl StagedTagStore {
    /// 创建一个空的暂存区。
    pub fn new() -> Self {
        Self::default()
    }

    /// 查看某个文件当前暂存的歌词。
    pub fn staged(&self, path: &Path) -> Option<String> {
        self.staged.get(path).map(|value| value.clone())
    }

    /// 暂存的文件数量。
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// 暂存区是否为空。
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// 将所有暂存的歌词写入对应音频文件的主标签。
    ///
    /// 写入成功的条目会从暂存区移除；失败的条目保留，可以稍后重试。
    pub fn commit(&self) -> Vec<(PathBuf, Result<()>)> {
        let pending: Vec<(PathBuf, String)> = self
            .staged
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        pending
            .into_iter()
            .map(|(path, lyrics)| {
                let result = audio_file::write_lyrics_tag(&path, &lyrics);
                match &result {
                    Ok(()) => {
                        self.staged.remove_if(&path, |_, current| *current == lyrics);
                        info!("已将歌词写入 '{}'。", path.display());
                    }
                    Err(e) => warn!("写入 '{}' 的歌词标签失败: {e}", path.display()),
                }
                (path, result)
            })
            .collect()
    }
}

impl TagStore for StagedTagStore {
    fn stage_lyrics(&self, track: &HostTrack, lyrics: &str) -> Result<()> {
        self.staged.insert(track.path.clone(), lyrics.to_string());
        Ok(())
    }
}
