//! 此模块实现了与 LRCLIB (<https://lrclib.net>) 进行交互的 `LyricsProvider`。
//!
//! 查询分两步：
//! 1. 专辑和时长都已知时，请求 `/api/get` 进行精确匹配（LRCLIB 要求四个参数齐全）。
//! 2. 精确匹配没有结果且开启了 `search_fallback` 时，请求 `/api/search`，
//!    保留服务返回的顺序，只过滤掉标题明显不相关的记录。

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use strsim::normalized_levenshtein;
use tracing::{debug, info};

use crate::{
    config::FetcherConfig,
    error::{LyricsFetchError, Result},
    model::track::{LyricCandidate, TrackQuery},
    providers::LyricsProvider,
};

mod models;
pub use models::{LrclibErrorResponse, LrclibRecord};

const PROVIDER_NAME: &str = "lrclib";

/// 搜索结果标题与查询标题的最低相似度
const SEARCH_TITLE_SIMILARITY_THRESHOLD: f64 = 0.5;

/// LRCLIB 提供商的实现。
#[derive(Debug, Clone)]
pub struct LrclibClient {
    http_client: Client,
    base_url: String,
    search_fallback: bool,
}

impl LrclibClient {
    /// 使用默认配置创建客户端。
    pub fn new() -> Result<Self> {
        Self::from_config(&FetcherConfig::default())
    }

    /// 根据配置创建客户端。所有请求都带有配置中的 User-Agent 和超时。
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LyricsFetchError::Internal(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_fallback: config.search_fallback,
        })
    }

    fn endpoint(&self, name: &str, params: &[(&'static str, String)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}/api/{name}", self.base_url), params)
            .map_err(|e| LyricsFetchError::Config(format!("无效的服务地址: {e}")))
    }

    /// 请求 `/api/get` 精确匹配。缺少专辑或时长时不发请求。
    async fn get_exact(&self, query: &TrackQuery) -> Result<Option<LyricCandidate>> {
        let Some(params) = exact_params(query) else {
            debug!("[LRCLIB] 缺少专辑或时长，跳过精确匹配。");
            return Ok(None);
        };
        let url = self.endpoint("get", &params)?;
        debug!("[LRCLIB] GET {url}");

        let Some(response) = check_status(self.http_client.get(url).send().await?).await? else {
            return Ok(None);
        };
        let body = response.text().await?;
        let record: LrclibRecord = serde_json::from_str(&body)?;
        Ok(record.into_candidate(PROVIDER_NAME))
    }

    /// 请求 `/api/search`，返回与查询标题相近的记录。
    async fn search(&self, query: &TrackQuery) -> Result<Vec<LyricCandidate>> {
        let url = self.endpoint("search", &search_params(query))?;
        debug!("[LRCLIB] GET {url}");

        let Some(response) = check_status(self.http_client.get(url).send().await?).await? else {
            return Ok(Vec::new());
        };
        let body = response.text().await?;
        let records: Vec<LrclibRecord> = serde_json::from_str(&body)?;
        Ok(filter_search_results(query, records))
    }
}

#[async_trait]
impl LyricsProvider for LrclibClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn lookup(&self, query: &TrackQuery) -> Result<Vec<LyricCandidate>> {
        query.validate()?;

        if let Some(candidate) = self.get_exact(query).await? {
            info!(
                "[LRCLIB] 精确匹配到 '{}' by {} (ID: {})",
                candidate.track_name, candidate.artist_name, candidate.id
            );
            return Ok(vec![candidate]);
        }

        if !self.search_fallback {
            return Ok(Vec::new());
        }

        let candidates = self.search(query).await?;
        info!(
            "[LRCLIB] 搜索 '{}' by {} 得到 {} 条候选。",
            query.title(),
            query.artist(),
            candidates.len()
        );
        Ok(candidates)
    }
}

/// 将非成功状态码映射为错误；404 表示未找到，返回 `Ok(None)`。
async fn check_status(response: Response) -> Result<Option<Response>> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        let detail = response
            .json::<LrclibErrorResponse>()
            .await
            .ok()
            .and_then(|e| e.message.or(e.name))
            .unwrap_or_default();
        return Err(LyricsFetchError::Service(format!(
            "LRCLIB 返回状态码 {status} {detail}"
        )));
    }
    Ok(Some(response))
}

/// `/api/get` 的查询参数。LRCLIB 要求四个参数齐全，否则返回 `None`。
fn exact_params(query: &TrackQuery) -> Option<Vec<(&'static str, String)>> {
    let album = query.album()?;
    let duration = query.duration_secs()?;
    Some(vec![
        ("track_name", query.title().to_string()),
        ("artist_name", query.artist().to_string()),
        ("album_name", album.to_string()),
        ("duration", format!("{}", duration.round() as u64)),
    ])
}

/// `/api/search` 的查询参数。
fn search_params(query: &TrackQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("track_name", query.title().to_string()),
        ("artist_name", query.artist().to_string()),
    ];
    if let Some(album) = query.album() {
        params.push(("album_name", album.to_string()));
    }
    params
}

/// 保留服务返回的顺序，丢弃无效记录和标题明显不相关的记录。
fn filter_search_results(query: &TrackQuery, records: Vec<LrclibRecord>) -> Vec<LyricCandidate> {
    let wanted_title = query.title().to_lowercase();
    records
        .into_iter()
        .filter_map(|record| record.into_candidate(PROVIDER_NAME))
        .filter(|candidate| {
            let found_title = candidate.track_name.to_lowercase();
            if found_title.contains(&wanted_title) || wanted_title.contains(&found_title) {
                return !found_title.is_empty();
            }
            let similarity = normalized_levenshtein(&wanted_title, &found_title);
            if similarity < SEARCH_TITLE_SIMILARITY_THRESHOLD {
                debug!(
                    "[LRCLIB] 忽略标题不相关的搜索结果 '{}' (相似度 {similarity:.2})",
                    candidate.track_name
                );
                false
            } else {
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str) -> LrclibRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "trackName": title })).unwrap()
    }

    #[test]
    fn test_exact_params_require_album_and_duration() {
        let query = TrackQuery::new("Yesterday", "The Beatles");
        assert!(exact_params(&query).is_none());

        let query = query.with_album("Help!").with_duration_secs(125.4);
        let params = exact_params(&query).unwrap();
        assert_eq!(params[3], ("duration", "125".to_string()));
        assert_eq!(params[2], ("album_name", "Help!".to_string()));
    }

    #[test]
    fn test_search_params_without_album() {
        let params = search_params(&TrackQuery::new("Yesterday", "The Beatles"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_filter_search_results_keeps_service_order() {
        let query = TrackQuery::new("Yesterday", "The Beatles");
        let results = filter_search_results(
            &query,
            vec![
                record(3, "Yesterday (Remastered 2009)"),
                record(1, "Completely Different Song Title"),
                record(2, "yesterday"),
                record(0, "Yesterday"),
            ],
        );
        let ids: Vec<i64> = results.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_endpoint_encodes_params() {
        let client = LrclibClient::new().unwrap();
        let url = client
            .endpoint("search", &search_params(&TrackQuery::new("A & B", "C/D")))
            .unwrap();
        assert_eq!(url.path(), "/api/search");
        assert!(url.as_str().contains("track_name=A+%26+B"));
    }

    #[tokio::test]
    async fn test_invalid_query_fails_before_request() {
        let config = FetcherConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        let client = LrclibClient::from_config(&config).unwrap();
        let err = client
            .lookup(&TrackQuery::new("", "Someone"))
            .await
            .unwrap_err();
        assert!(matches!(err, LyricsFetchError::InvalidQuery(_)));
    }
}
