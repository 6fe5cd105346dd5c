//! .lrc 伴随文件的路径与写入。

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    error::{LyricsFetchError, Result},
    model::report::SidecarStatus,
};

/// 音频文件对应的伴随文件路径：同目录、同名、扩展名换成 `.lrc`。
pub fn sidecar_path(audio_path: &Path) -> PathBuf {
    audio_path.with_extension("lrc")
}

/// 在 `path` 不存在时写入伴随文件。
///
/// 内容先写到同目录的临时文件，再以不覆盖的方式重命名到目标路径，
/// 因此其他程序不会看到写了一半的文件，已有文件也不会被替换。
pub fn write_sidecar_if_absent(path: &Path, content: &str) -> Result<SidecarStatus> {
    if path.exists() {
        return Ok(SidecarStatus::AlreadyExists(path.to_path_buf()));
    }

    let wrap = |source: io::Error| LyricsFetchError::SidecarWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(parent).map_err(wrap)?;
    temp.write_all(content.as_bytes()).map_err(wrap)?;
    temp.flush().map_err(wrap)?;

    match temp.persist_noclobber(path) {
        Ok(_) => Ok(SidecarStatus::Written(path.to_path_buf())),
        // 检查之后被别人抢先创建
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Ok(SidecarStatus::AlreadyExists(path.to_path_buf()))
        }
        Err(e) => Err(wrap(e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/music/Beatles/Yesterday.flac")),
            PathBuf::from("/music/Beatles/Yesterday.lrc")
        );
        assert_eq!(sidecar_path(Path::new("no_ext")), PathBuf::from("no_ext.lrc"));
    }

    #[test]
    fn test_write_new_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.lrc");
        let status = write_sidecar_if_absent(&path, "[00:01.00]hi\n").unwrap();
        assert_eq!(status, SidecarStatus::Written(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[00:01.00]hi\n");

        // 目录里只剩目标文件，没有残留的临时文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_existing_sidecar_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.lrc");
        fs::write(&path, b"user edited\r\n").unwrap();

        let status = write_sidecar_if_absent(&path, "[00:01.00]new\n").unwrap();
        assert_eq!(status, SidecarStatus::AlreadyExists(path.clone()));
        assert_eq!(fs::read(&path).unwrap(), b"user edited\r\n");
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("song.lrc");
        let err = write_sidecar_if_absent(&path, "x").unwrap_err();
        assert!(matches!(err, LyricsFetchError::SidecarWrite { .. }));
    }
}
