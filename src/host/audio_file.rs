//! 使用 `lofty` 读写音频文件标签。
//!
//! 这里的函数都是同步的，异步上下文中需要通过 `spawn_blocking` 调用。

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::{
    error::{LyricsFetchError, Result},
    model::track::{HostTrack, non_blank},
};

/// 从音频文件的标签中读取音轨信息。
///
/// 没有标题标签时使用文件名（不含扩展名）作为标题；没有艺术家时艺术家为空，
/// 这样的音轨在查询阶段会被跳过。
pub fn read_host_track(path: &Path) -> Result<HostTrack> {
    let tagged_file = Probe::open(path)?.read()?;
    let duration = tagged_file.properties().duration();

    let default_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut track = HostTrack {
        path: path.to_path_buf(),
        title: default_title,
        artist: String::new(),
        album: None,
        duration: (!duration.is_zero()).then_some(duration),
    };

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        if let Some(title) = tag.title().and_then(|t| non_blank(t.into_owned())) {
            track.title = title;
        }
        if let Some(artist) = tag.artist().and_then(|a| non_blank(a.into_owned())) {
            track.artist = artist;
        }
        track.album = tag.album().and_then(|a| non_blank(a.into_owned()));
    }

    Ok(track)
}

/// 将歌词写入音频文件的主标签。文件没有主标签时会新建一个。
pub fn write_lyrics_tag(path: &Path, lyrics: &str) -> Result<()> {
    let mut tagged_file = Probe::open(path)?.read()?;

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file.primary_tag_mut().ok_or_else(|| {
        LyricsFetchError::Internal(format!("'{}' 不支持写入标签", path.display()))
    })?;

    tag.insert_text(ItemKey::Lyrics, lyrics.to_string());
    tag.save_to_path(path, WriteOptions::default())?;
    Ok(())
}
