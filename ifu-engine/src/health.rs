//! Backend health probe.
//!
//! [`HealthService::check`] is resilient and never fails: transport, HTTP and
//! decoding problems are reported as `ok = false` with a short message.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::backend::IfuBackend;

/// A serializable health snapshot of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Backend base URL.
    pub endpoint: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured latency of the probe in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

pub struct HealthService<B> {
    backend: Arc<B>,
}

impl<B: IfuBackend> HealthService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    #[instrument(skip_all)]
    pub async fn check(&self) -> HealthStatus {
        let start = Instant::now();
        let result = self.backend.health().await;
        let latency_ms = start.elapsed().as_millis();
        let endpoint = self.backend.endpoint().to_string();

        let (ok, message) = match result {
            Ok(reply) if reply.status.eq_ignore_ascii_case("ok") => {
                (true, "backend is healthy".to_string())
            }
            Ok(reply) => (
                false,
                format!("backend reported status `{}`", reply.status),
            ),
            Err(e) => (false, e.to_string()),
        };

        let status = HealthStatus {
            endpoint,
            ok,
            latency_ms,
            message,
        };

        if status.ok {
            info!(
                endpoint = %status.endpoint,
                latency_ms = status.latency_ms,
                "health probe completed"
            );
        } else {
            warn!(
                endpoint = %status.endpoint,
                latency_ms = status.latency_ms,
                message = %status.message,
                "health probe failed"
            );
        }
        status
    }
}
