//! Provider implementations backed by the valux REST server.
//!
//! Each operation builds a path and query string, calls the gateway and
//! passes the payload through a pure transformer from [`transform`].

mod analytics;
mod dto;
mod portfolio;
mod rule;
pub(crate) mod transform;
mod vault;

use std::time::Instant;

use serde_json::Value;
use valux_core::{Result, ServiceHealth};

use crate::client::ApiClient;

pub use transform::truncate_address;

/// Tracing target for REST provider operations.
pub const TRACING_TARGET: &str = "valux_reqwest::rest";

/// Maps a `404` to `None`; every other outcome is unchanged.
pub(crate) fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.has_status(404) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Query pairs scoping a per-rule request to its owner.
pub(crate) fn owner(user: &str) -> [(&'static str, String); 1] {
    [("userAddress", user.to_owned())]
}

impl ApiClient {
    /// Probes `GET /health`.
    ///
    /// Never fails: an unreachable or failing server is reported as
    /// unhealthy, a `status` other than `ok` in the payload as degraded.
    pub async fn health(&self) -> ServiceHealth {
        let started_at = Instant::now();
        let result = self.get::<Value>("health", &[]).await;
        let elapsed = started_at.elapsed();

        let health = match result {
            Ok(body) => match body.get("status").and_then(Value::as_str) {
                None | Some("ok") => ServiceHealth::healthy(),
                Some(status) => {
                    tracing::warn!(target: TRACING_TARGET, %status, "Server reports degraded health");
                    ServiceHealth::degraded(status)
                }
            },
            Err(error) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Health check failed");
                ServiceHealth::unhealthy(error.message())
            }
        };

        health.with_backend("rest").with_response_time(elapsed)
    }
}
