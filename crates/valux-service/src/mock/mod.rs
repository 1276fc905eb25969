//! In-memory mock backend.
//!
//! [`MockProvider`] implements every provider trait over a small fixed data
//! set, sleeping for the configured latency before each call so that loading
//! states can be exercised without a server. Rules are mutable; everything
//! else is read-only.
//!
//! # Example
//!
//! ```rust,ignore
//! use valux_service::{MockConfig, Services};
//!
//! let services = MockConfig::default().with_latency_ms(0).into_services();
//! let vaults = services.vaults().active_vaults().await?;
//! ```

mod data;
mod provider;

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Services;
use crate::types::{AutomationRule, PortfolioPosition, Transaction, Vault};

/// Tracing target for the mock backend.
pub const TRACING_TARGET: &str = "valux_service::mock";

/// Configuration for the mock backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MockConfig {
    /// Simulated latency of every call, in milliseconds. Zero disables it.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "mock-latency-ms",
            env = "VALUX_MOCK_LATENCY_MS",
            default_value = "500"
        )
    )]
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    500
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

impl MockConfig {
    /// Sets the simulated latency.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Returns the simulated latency.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Builds the full set of services over a fresh mock backend.
    pub fn into_services(self) -> Services {
        MockProvider::new(self).into_services()
    }
}

#[derive(Debug)]
struct MockState {
    vaults: Vec<(String, Vault)>,
    positions: Vec<PortfolioPosition>,
    transactions: Vec<Transaction>,
    rules: RwLock<Vec<AutomationRule>>,
}

/// Mock backend over a fixed data set.
///
/// Clones share the same rule state.
#[derive(Debug, Clone)]
pub struct MockProvider {
    config: Arc<MockConfig>,
    state: Arc<MockState>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockProvider {
    /// Creates a mock backend seeded with the fixed data set.
    pub fn new(config: MockConfig) -> Self {
        let state = MockState {
            vaults: data::vaults(),
            positions: data::positions(),
            transactions: data::transactions(),
            rules: RwLock::new(data::rules()),
        };

        Self {
            config: Arc::new(config),
            state: Arc::new(state),
        }
    }

    /// Creates a mock backend that answers immediately.
    pub fn instant() -> Self {
        Self::new(MockConfig::default().with_latency_ms(0))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Builds the full set of services over this backend.
    pub fn into_services(self) -> Services {
        Services::from_provider(self)
    }

    async fn simulate_latency(&self) {
        let latency = self.config.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}
