//! Engine config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `IFU_BACKEND_URL`          = backend base URL (default `https://eifu.art`)
//! - `IFU_REQUEST_TIMEOUT_SECS` = lookup/search/chat timeout (default 35)
//! - `IFU_VOTE_TIMEOUT_SECS`    = vote timeout (default 20)
//! - `IFU_HEALTH_TIMEOUT_SECS`  = health probe timeout (default 10)
//! - `IFU_HELP_REF`             = help reference for blocking prompts (default `/help`)
//! - `IFU_LOG_PAYLOADS`         = log scanned payloads and answers (default `true`)
//! - `IFU_MAX_LOG_CHARS`        = clip length for logged payloads (default 2000)

use std::time::Duration;

use crate::{
    config::engine_config::EngineConfig,
    error_handler::{ConfigError, EngineResult, env_flag, env_opt_u64, env_or},
};

/// Backend used when `IFU_BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "https://eifu.art";

impl EngineConfig {
    /// Builds the config from environment, applying defaults for unset values.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidFormat`] if `IFU_BACKEND_URL` is not http(s)
    /// - [`ConfigError::InvalidNumber`] if a numeric variable does not parse
    pub fn from_env() -> EngineResult<Self> {
        let mut cfg = EngineConfig::new(env_or("IFU_BACKEND_URL", DEFAULT_BACKEND_URL))?;

        if let Some(secs) = env_opt_u64("IFU_REQUEST_TIMEOUT_SECS")? {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_opt_u64("IFU_VOTE_TIMEOUT_SECS")? {
            cfg.vote_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_opt_u64("IFU_HEALTH_TIMEOUT_SECS")? {
            cfg.health_timeout = Duration::from_secs(secs);
        }
        if let Some(chars) = env_opt_u64("IFU_MAX_LOG_CHARS")? {
            cfg.max_log_chars = usize::try_from(chars).map_err(|_| ConfigError::InvalidNumber {
                var: "IFU_MAX_LOG_CHARS",
                reason: "does not fit usize",
            })?;
        }

        cfg.help_ref = env_or("IFU_HELP_REF", &cfg.help_ref);
        cfg.log_payloads = env_flag("IFU_LOG_PAYLOADS", cfg.log_payloads);

        Ok(cfg)
    }
}
