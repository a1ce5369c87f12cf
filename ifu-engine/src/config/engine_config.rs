use std::time::Duration;

use crate::error_handler::{EngineResult, validate_http_endpoint};

/// Default lookup/search/chat wait before the call is treated as a transport failure.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 35;
/// Default wait for vote fetch/submit.
pub const DEFAULT_VOTE_TIMEOUT_SECS: u64 = 20;
/// Default wait for the health probe.
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;
/// Default clip length for logged payloads.
pub const DEFAULT_MAX_LOG_CHARS: usize = 2000;

/// Runtime configuration for the engine and its HTTP backend.
///
/// # Fields
///
/// - `backend_url`: base URL of the IFU backend, without trailing `/`.
/// - `request_timeout`: bounded wait for lookups, searches and chat.
/// - `vote_timeout`: bounded wait for vote fetch/submit.
/// - `health_timeout`: bounded wait for the health probe.
/// - `help_ref`: help reference offered by blocking escalations.
/// - `log_payloads`: whether scanned payloads and answers are logged.
/// - `max_log_chars`: clip length for logged payloads.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub vote_timeout: Duration,
    pub health_timeout: Duration,
    pub help_ref: String,
    pub log_payloads: bool,
    pub max_log_chars: usize,
}

impl EngineConfig {
    /// Config with default timeouts for the given backend.
    ///
    /// The URL is normalized by stripping trailing slashes.
    ///
    /// # Errors
    /// Returns a config error if `backend_url` is not an http(s) URL.
    pub fn new(backend_url: impl Into<String>) -> EngineResult<Self> {
        let backend_url = normalize_base_url(&backend_url.into());
        validate_http_endpoint("IFU_BACKEND_URL", &backend_url)?;

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            vote_timeout: Duration::from_secs(DEFAULT_VOTE_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            help_ref: "/help".to_string(),
            log_payloads: true,
            max_log_chars: DEFAULT_MAX_LOG_CHARS,
        })
    }

    /// Overrides every timeout at once; handy for tests against a local server.
    pub fn with_timeouts(mut self, request: Duration, vote: Duration) -> Self {
        self.request_timeout = request;
        self.vote_timeout = vote;
        self.health_timeout = request;
        self
    }

    /// Absolute URL for an API path such as `/api/vote`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_removed() {
        let cfg = EngineConfig::new("http://127.0.0.1:9000//").unwrap();
        assert_eq!(cfg.backend_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.endpoint("/api/vote"), "http://127.0.0.1:9000/api/vote");
    }

    #[test]
    fn defaults_match_reference_timeouts() {
        let cfg = EngineConfig::new("https://eifu.art").unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_secs(35));
        assert_eq!(cfg.vote_timeout, Duration::from_secs(20));
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(EngineConfig::new("/").is_err());
    }
}
