//! Unified error handling for `ifu-engine`.
//!
//! This module exposes a single top-level error type [`IfuEngineError`] for the
//! whole library and a nested [`ConfigError`] for setup problems. Small helpers
//! for reading/validating environment variables return the unified
//! [`EngineResult<T>`] alias.
//!
//! The error is `Clone`: an identifier lookup that is shared by several
//! concurrent callers hands each of them its own copy of the outcome. For
//! that reason transport failures are captured as text rather than by
//! wrapping `reqwest::Error`.

use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type EngineResult<T> = std::result::Result<T, IfuEngineError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ifu-engine` crate.
///
/// None of these is fatal: each one is recoverable by a later user action
/// (rescan, resubmit, retry vote).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IfuEngineError {
    /// The scan produced no usable text.
    #[error("[IFU Engine] scanned code has no content")]
    EmptyPayload,

    /// A search was requested without a keyword.
    #[error("[IFU Engine] keyword must not be empty")]
    EmptyKeyword,

    /// A chat question was submitted without text.
    #[error("[IFU Engine] question text must not be empty")]
    EmptyPrompt,

    /// The backend knows no IFU document for this model.
    #[error("[IFU Engine] no IFU found for model `{model}`")]
    NotFound {
        /// Model name as scanned.
        model: String,
    },

    /// Network-level failure without an HTTP status (DNS/connect/reset/timeout).
    #[error("[IFU Engine] transport error: {message}")]
    Transport {
        /// Raw transport message (may be empty).
        message: String,
        /// True when the bounded wait expired.
        timed_out: bool,
    },

    /// Backend answered outside the 2xx range.
    #[error("[IFU Engine] HTTP {status}: {detail}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Server-provided `detail`/`message`, or `error <status>`.
        detail: String,
    },

    /// Response body did not have the expected shape.
    #[error("[IFU Engine] failed to decode response: {0}")]
    Decode(String),

    /// A vote submission is already in flight for this counter.
    #[error("[IFU Engine] a vote is already being submitted")]
    BusyRejected,

    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IfuEngineError {
    /// Builds the HTTP variant from a status and an optional server message.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("error {status}"));
        Self::Http { status, detail }
    }

    /// True for failures that happened on the wire (transport or non-2xx).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http { .. } | Self::Decode(_)
        )
    }
}

// ===== Mapping from reqwest::Error =====

impl From<reqwest::Error> for IfuEngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return IfuEngineError::Transport {
                message: "request timed out".into(),
                timed_out: true,
            };
        }

        if let Some(status) = e.status() {
            return IfuEngineError::http(status.as_u16(), None);
        }

        if e.is_decode() {
            return IfuEngineError::Decode(e.to_string());
        }

        IfuEngineError::Transport {
            message: e.to_string(),
            timed_out: false,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A number failed to parse (timeouts, limits).
    #[error("[IFU Engine] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `IFU_VOTE_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[IFU Engine] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `IFU_BACKEND_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// The HTTP client could not be constructed.
    #[error("[IFU Engine] failed to build HTTP client: {0}")]
    HttpClient(String),
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `EngineResult<T>`)                            */
/* ------------------------------------------------------------------------- */

/// Reads an environment variable, falling back to `default` when unset or blank.
pub fn env_or(name: &'static str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`IfuEngineError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> EngineResult<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            IfuEngineError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses a boolean flag from env; accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &'static str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        _ => default,
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`IfuEngineError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> EngineResult<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_detail_falls_back_to_status() {
        assert_eq!(
            IfuEngineError::http(502, None),
            IfuEngineError::Http {
                status: 502,
                detail: "error 502".into()
            }
        );
        assert_eq!(
            IfuEngineError::http(400, Some("  ".into())),
            IfuEngineError::Http {
                status: 400,
                detail: "error 400".into()
            }
        );
        assert_eq!(
            IfuEngineError::http(400, Some("keyword must not be empty".into())).to_string(),
            "[IFU Engine] HTTP 400: keyword must not be empty"
        );
    }

    #[test]
    fn endpoint_validation() {
        assert!(validate_http_endpoint("IFU_BACKEND_URL", "https://eifu.art").is_ok());
        assert!(matches!(
            validate_http_endpoint("IFU_BACKEND_URL", "eifu.art"),
            Err(IfuEngineError::Config(ConfigError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn remote_failures_are_flagged() {
        assert!(IfuEngineError::http(500, None).is_remote());
        assert!(!IfuEngineError::EmptyKeyword.is_remote());
        assert!(!IfuEngineError::BusyRejected.is_remote());
    }
}
