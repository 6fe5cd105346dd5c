//! 负责处理应用的持久化配置。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::{LyricsFetchError, Result};

const CONFIG_DIR_NAME: &str = "lrclib-lyrics";
const CONFIG_FILE_NAME: &str = "config.json";

/// 默认的 LRCLIB 服务地址。
pub const DEFAULT_BASE_URL: &str = "https://lrclib.net";

/// 暂存到音频标签中的歌词内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagContent {
    /// 纯文本歌词（不含时间戳）。
    #[default]
    Plain,
    /// 带 `[mm:ss.xx]` 时间戳的同步歌词；没有同步歌词时退回纯文本。
    Synced,
}

/// 歌词获取器的全部配置项。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// 音轨载入时是否自动获取歌词。
    pub search_on_load: bool,
    /// 是否在音频文件旁保存 .lrc 伴随文件。
    pub save_lrc_file: bool,
    /// 暂存到 "lyrics" 标签中的内容。
    pub tag_content: TagContent,
    /// LRCLIB 服务地址，不含 `/api` 后缀。
    pub base_url: String,
    /// 请求时携带的 User-Agent。
    pub user_agent: String,
    /// 单次请求的超时时间（秒）。
    pub request_timeout_secs: u64,
    /// 批量处理时同时进行的查询数上限。
    pub max_concurrent_lookups: usize,
    /// 时长匹配的容差（秒）。
    pub duration_tolerance_secs: f64,
    /// 精确查询无结果时，是否退回到搜索接口。
    pub search_fallback: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            search_on_load: false,
            save_lrc_file: true,
            tag_content: TagContent::Plain,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("lrclib-lyrics-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 10,
            max_concurrent_lookups: 4,
            duration_tolerance_secs: 2.0,
            search_fallback: true,
        }
    }
}

impl FetcherConfig {
    /// 请求超时时间。
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 检查配置值是否可用。
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_lookups == 0 {
            return Err(LyricsFetchError::Config(
                "max_concurrent_lookups 必须大于 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(LyricsFetchError::Config(
                "request_timeout_secs 必须大于 0".into(),
            ));
        }
        if !self.duration_tolerance_secs.is_finite() || self.duration_tolerance_secs < 0.0 {
            return Err(LyricsFetchError::Config(format!(
                "无效的时长容差: {}",
                self.duration_tolerance_secs
            )));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            LyricsFetchError::Config(format!("无效的服务地址 '{}': {e}", self.base_url))
        })?;
        Ok(())
    }

    /// 从默认位置加载配置。文件不存在时返回默认配置。
    pub fn load() -> Result<Self> {
        Self::load_from_path(&get_config_file_path(CONFIG_FILE_NAME)?)
    }

    /// 将配置保存到默认位置。
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&get_config_file_path(CONFIG_FILE_NAME)?)
    }

    /// 从指定文件加载配置。文件不存在时返回默认配置。
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config = match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = serde_json::from_str(&content).map_err(|e| {
                    LyricsFetchError::Config(format!("无法解析 '{}': {e}", path.display()))
                })?;
                info!("已从 '{}' 加载配置。", path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("配置文件不存在，将使用默认配置。");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// 将配置序列化为 JSON 并保存到指定文件。
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LyricsFetchError::Internal(format!("无法序列化配置: {e}")))?;
        fs::write(path, content)?;
        info!("配置已保存到 '{}'。", path.display());
        Ok(())
    }
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "config.json"。
pub(crate) fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    let mut config_dir = dirs::config_dir()
        .ok_or_else(|| LyricsFetchError::Config("无法找到用户配置目录".into()))?;
    config_dir.push(CONFIG_DIR_NAME);
    fs::create_dir_all(&config_dir)?;
    config_dir.push(filename);
    Ok(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FetcherConfig::load_from_path(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, FetcherConfig::default());
        assert!(!config.search_on_load);
        assert!(config.save_lrc_file);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = FetcherConfig {
            search_on_load: true,
            tag_content: TagContent::Synced,
            max_concurrent_lookups: 2,
            ..Default::default()
        };
        config.save_to_path(&path).unwrap();
        assert_eq!(FetcherConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"save_lrc_file": false, "tag_content": "synced"}"#).unwrap();

        let config = FetcherConfig::load_from_path(&path).unwrap();
        assert!(!config.save_lrc_file);
        assert_eq!(config.tag_content, TagContent::Synced);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_limit = FetcherConfig {
            max_concurrent_lookups: 0,
            ..Default::default()
        };
        assert!(zero_limit.validate().is_err());

        let bad_tolerance = FetcherConfig {
            duration_tolerance_secs: -1.0,
            ..Default::default()
        };
        assert!(bad_tolerance.validate().is_err());

        let bad_url = FetcherConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            bad_url.validate(),
            Err(LyricsFetchError::Config(_))
        ));
    }
}
