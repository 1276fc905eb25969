//! Vault discovery and deposits.
//!
//! - [`VaultProvider`]: backend trait, implemented by the REST client and the
//!   mock backend
//! - [`VaultService`]: wrapper adding structured logging and the filtering
//!   helpers used by the dashboard

mod query;
mod service;

pub use query::{SortField, SortOrder, VaultFilters, VaultQuery};
pub use service::VaultService;

pub use crate::{Result, ServiceHealth};
use crate::types::{Page, Vault, VaultPerformance, VaultReceipt};

/// Tracing target for vault operations.
pub const TRACING_TARGET: &str = "valux_service::vault";

/// Backend operations on vaults.
#[async_trait::async_trait]
pub trait VaultProvider: Send + Sync {
    /// Lists vaults matching `query`.
    async fn list_vaults(&self, query: &VaultQuery) -> Result<Page<Vault>>;

    /// Looks a vault up by id. Returns `None` if it does not exist.
    async fn vault_by_id(&self, id: &str) -> Result<Option<Vault>>;

    /// Looks a vault up by contract address. Returns `None` if it does not exist.
    async fn vault_by_address(&self, address: &str) -> Result<Option<Vault>>;

    /// Returns the APY and TVL history of a vault.
    async fn vault_performance(&self, id: &str) -> Result<VaultPerformance>;

    /// Deposits `amount` into a vault on behalf of `user`.
    async fn deposit(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt>;

    /// Withdraws `amount` from a vault on behalf of `user`.
    async fn withdraw(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
