//! 为一个目录下的所有音频文件获取歌词。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --example fetch_directory -- <音乐目录> [--commit]
//! ```
//!
//! 不带 `--commit` 时只会创建 `.lrc` 伴随文件，标签只暂存在内存中；
//! 带上 `--commit` 则相当于在宿主中执行"保存"，把歌词写入音频文件标签。

use std::{path::PathBuf, sync::Arc};

use lrclib_lyrics_rs::{
    FetcherConfig, LyricsFetcher, Result, TriggerEvent,
    host::{StagedTagStore, audio_file::read_host_track},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "ogg", "opus", "wav", "aiff", "ape"];

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lrclib_lyrics_rs=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let Some(root) = args.next().map(PathBuf::from) else {
        error!("用法: fetch_directory <音乐目录> [--commit]");
        return Ok(());
    };
    let commit = args.any(|arg| arg == "--commit");

    let config = FetcherConfig::load()?;
    let tags = Arc::new(StagedTagStore::new());
    let fetcher = LyricsFetcher::new(config, tags.clone())?;

    let tracks: Vec<_> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .filter_map(|entry| match read_host_track(entry.path()) {
            Ok(track) => Some(track),
            Err(e) => {
                warn!("无法读取 '{}' 的标签: {e}", entry.path().display());
                None
            }
        })
        .collect();

    info!("在 '{}' 中找到 {} 个音频文件。", root.display(), tracks.len());

    if let Some(summary) = fetcher.handle_trigger(TriggerEvent::AlbumAction(tracks)).await {
        println!("{summary}");
    }

    if commit {
        let results = tags.commit();
        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!("已写入 {} 个文件的标签，失败 {failed} 个。", results.len() - failed);
    } else if !tags.is_empty() {
        info!("{} 个文件的歌词标签仅暂存，未写入文件（使用 --commit 写入）。", tags.len());
    }

    Ok(())
}
