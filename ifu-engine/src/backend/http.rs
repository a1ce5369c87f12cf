//! reqwest-based client for the IFU backend.
//!
//! Endpoints used:
//!   * GET  /api/get_ifu?model=:model
//!   * GET  /api/search_ifu?keyword=:kw&mode=:mode[&assistantid=:a][&containerid=:c]
//!   * GET  /api/vote
//!   * POST /api/vote
//!   * POST /api/gaia
//!   * GET  /api/health
//!
//! Every call carries a bounded wait: lookups, searches and chat use
//! `request_timeout`, votes use `vote_timeout`, the health probe uses
//! `health_timeout`. Non-2xx answers become [`IfuEngineError::Http`] with the
//! server's `detail`/`message` when one is present.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::backend::IfuBackend;
use crate::backend::types::*;
use crate::config::EngineConfig;
use crate::error_handler::{ConfigError, EngineResult, IfuEngineError};
use crate::telemetry::clip_for_log;

/// HTTP client wrapper for the IFU backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    cfg: EngineConfig,
    url_get_ifu: String,
    url_search: String,
    url_vote: String,
    url_chat: String,
    url_health: String,
}

impl HttpBackend {
    /// Creates a backend client from the given config.
    ///
    /// # Errors
    /// [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(cfg: EngineConfig) -> EngineResult<Self> {
        debug!("Creating HttpBackend with backend_url={}", cfg.backend_url);

        let http = Client::builder()
            .user_agent("ifu-engine/0.1")
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            url_get_ifu: cfg.endpoint("/api/get_ifu"),
            url_search: cfg.endpoint("/api/search_ifu"),
            url_vote: cfg.endpoint("/api/vote"),
            url_chat: cfg.endpoint("/api/gaia"),
            url_health: cfg.endpoint("/api/health"),
            http,
            cfg,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }
}

impl IfuBackend for HttpBackend {
    #[instrument(skip_all, fields(model = %model))]
    async fn get_ifu(&self, model: &str) -> EngineResult<LookupResponse> {
        debug!("GET {}", self.url_get_ifu);
        let resp = self
            .http
            .get(&self.url_get_ifu)
            .query(&[("model", model)])
            .timeout(self.cfg.request_timeout)
            .send()
            .await?;
        decode(resp, &self.url_get_ifu).await
    }

    #[instrument(skip_all, fields(mode = %query.mode))]
    async fn search_ifu(&self, query: &SearchQuery) -> EngineResult<Vec<SearchResultItem>> {
        debug!(
            assistantid = query.assistantid.as_deref().unwrap_or(""),
            containerid = query.containerid.as_deref().unwrap_or(""),
            "GET {}",
            self.url_search
        );
        let resp = self
            .http
            .get(&self.url_search)
            .query(&query.params())
            .timeout(self.cfg.request_timeout)
            .send()
            .await?;
        let body: SearchResponse = decode(resp, &self.url_search).await?;
        Ok(body.results)
    }

    #[instrument(skip_all)]
    async fn fetch_votes(&self) -> EngineResult<VoteTally> {
        debug!("GET {}", self.url_vote);
        let resp = self
            .http
            .get(&self.url_vote)
            .timeout(self.cfg.vote_timeout)
            .send()
            .await?;
        decode(resp, &self.url_vote).await
    }

    #[instrument(skip_all, fields(direction = ?direction))]
    async fn post_vote(&self, direction: VoteDirection) -> EngineResult<VoteTally> {
        debug!("POST {}", self.url_vote);
        let resp = self
            .http
            .post(&self.url_vote)
            .json(&VoteRequest { direction })
            .timeout(self.cfg.vote_timeout)
            .send()
            .await?;
        decode(resp, &self.url_vote).await
    }

    #[instrument(skip_all)]
    async fn chat(&self, request: &ChatRequest) -> EngineResult<ChatReply> {
        if self.cfg.log_payloads {
            debug!(
                text = %clip_for_log(&request.text, self.cfg.max_log_chars),
                "POST {}",
                self.url_chat
            );
        }
        let resp = self
            .http
            .post(&self.url_chat)
            .json(request)
            .timeout(self.cfg.request_timeout)
            .send()
            .await?;
        decode(resp, &self.url_chat).await
    }

    #[instrument(skip_all)]
    async fn health(&self) -> EngineResult<HealthReply> {
        debug!("GET {}", self.url_health);
        let resp = self
            .http
            .get(&self.url_health)
            .timeout(self.cfg.health_timeout)
            .send()
            .await?;
        decode(resp, &self.url_health).await
    }

    fn endpoint(&self) -> &str {
        &self.cfg.backend_url
    }
}

/// Checks the status, then decodes the JSON body.
async fn decode<T: DeserializeOwned>(resp: Response, url: &str) -> EngineResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let detail = error_detail(&text);
        warn!(
            %url,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "backend returned non-success status"
        );
        return Err(IfuEngineError::http(status.as_u16(), detail));
    }

    Ok(resp.json::<T>().await?)
}

/// Extracts the server message from an error body: `detail` first, then `message`.
///
/// A non-string `detail` (FastAPI validation errors are arrays) is rendered
/// as compact JSON.
fn error_detail(body: &str) -> Option<String> {
    let Value::Object(obj) = serde_json::from_str::<Value>(body).ok()? else {
        return None;
    };

    let pick = |key: &str| match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Null) | Some(Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    };

    pick("detail").or_else(|| pick("message"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_wins_over_message() {
        assert_eq!(
            error_detail(r#"{"detail":"model must not be empty","message":"x"}"#).as_deref(),
            Some("model must not be empty")
        );
        assert_eq!(
            error_detail(r#"{"detail":"","message":"upstream busy"}"#).as_deref(),
            Some("upstream busy")
        );
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["query","model"]}]}"#).as_deref(),
            Some(r#"[{"loc":["query","model"]}]"#)
        );
    }

    #[test]
    fn no_detail_for_plain_or_empty_bodies() {
        assert_eq!(error_detail(""), None);
        assert_eq!(error_detail("Bad Gateway"), None);
        assert_eq!(error_detail(r#"{"error":"x"}"#), None);
    }
}
