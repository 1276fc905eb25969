//! Vault service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    Result, ServiceHealth, SortField, SortOrder, TRACING_TARGET, VaultFilters, VaultProvider,
    VaultQuery,
};
use crate::types::{Page, RiskLevel, Vault, VaultCategory, VaultPerformance, VaultReceipt};

/// Vault service wrapper with observability.
///
/// Wraps any [`VaultProvider`] and adds structured logging plus the
/// convenience listings built on top of [`VaultProvider::list_vaults`].
#[derive(Clone)]
pub struct VaultService {
    provider: Arc<dyn VaultProvider>,
}

impl fmt::Debug for VaultService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultService").finish_non_exhaustive()
    }
}

impl VaultService {
    /// Creates a new vault service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: VaultProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a new vault service sharing an existing provider.
    pub fn from_shared(provider: Arc<dyn VaultProvider>) -> Self {
        Self { provider }
    }

    /// Lists vaults matching `query`.
    pub async fn list_vaults(&self, query: &VaultQuery) -> Result<Page<Vault>> {
        let started_at = Instant::now();
        tracing::debug!(target: TRACING_TARGET, ?query, "Listing vaults");

        let result = self.provider.list_vaults(query).await;
        match &result {
            Ok(page) => tracing::debug!(
                target: TRACING_TARGET,
                count = page.items.len(),
                total = page.total,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Vaults listed"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Vault listing failed"
            ),
        }

        result
    }

    /// Looks a vault up by id.
    pub async fn vault_by_id(&self, id: &str) -> Result<Option<Vault>> {
        tracing::debug!(target: TRACING_TARGET, vault_id = %id, "Fetching vault");
        let result = self.provider.vault_by_id(id).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, vault_id = %id, error = %error, "Vault lookup failed");
        }
        result
    }

    /// Looks a vault up by contract address.
    pub async fn vault_by_address(&self, address: &str) -> Result<Option<Vault>> {
        tracing::debug!(target: TRACING_TARGET, %address, "Fetching vault by address");
        let result = self.provider.vault_by_address(address).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, %address, error = %error, "Vault lookup failed");
        }
        result
    }

    /// Returns the APY and TVL history of a vault.
    pub async fn vault_performance(&self, id: &str) -> Result<VaultPerformance> {
        tracing::debug!(target: TRACING_TARGET, vault_id = %id, "Fetching vault performance");
        self.provider.vault_performance(id).await
    }

    /// Deposits into a vault.
    pub async fn deposit(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt> {
        tracing::info!(target: TRACING_TARGET, %vault_id, %amount, "Depositing into vault");
        let result = self.provider.deposit(vault_id, amount, user).await;
        match &result {
            Ok(receipt) => tracing::info!(
                target: TRACING_TARGET,
                %vault_id,
                tx_hash = %receipt.transaction_hash,
                "Deposit submitted"
            ),
            Err(error) => tracing::warn!(target: TRACING_TARGET, %vault_id, error = %error, "Deposit failed"),
        }
        result
    }

    /// Withdraws from a vault.
    pub async fn withdraw(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt> {
        tracing::info!(target: TRACING_TARGET, %vault_id, %amount, "Withdrawing from vault");
        let result = self.provider.withdraw(vault_id, amount, user).await;
        match &result {
            Ok(receipt) => tracing::info!(
                target: TRACING_TARGET,
                %vault_id,
                tx_hash = %receipt.transaction_hash,
                "Withdrawal submitted"
            ),
            Err(error) => tracing::warn!(target: TRACING_TARGET, %vault_id, error = %error, "Withdrawal failed"),
        }
        result
    }

    /// Lists vaults using the dashboard filter form.
    pub async fn vaults(&self, filters: &VaultFilters) -> Result<Page<Vault>> {
        let query = filters.to_query()?;
        self.list_vaults(&query).await
    }

    /// All active vaults.
    pub async fn active_vaults(&self) -> Result<Vec<Vault>> {
        self.items(VaultQuery::new().with_active(true).with_limit(100))
            .await
    }

    /// Vaults whose name, asset or protocol matches `search`.
    pub async fn search_vaults(&self, search: &str) -> Result<Vec<Vault>> {
        self.items(VaultQuery::new().with_search(search).with_limit(50))
            .await
    }

    pub async fn vaults_by_risk(&self, risk_level: RiskLevel) -> Result<Vec<Vault>> {
        self.items(VaultQuery::new().with_risk_level(risk_level).with_limit(50))
            .await
    }

    pub async fn vaults_by_category(&self, category: VaultCategory) -> Result<Vec<Vault>> {
        self.items(VaultQuery::new().with_category(category).with_limit(50))
            .await
    }

    pub async fn vaults_by_protocol(&self, protocol: &str) -> Result<Vec<Vault>> {
        self.items(VaultQuery::new().with_protocol(protocol).with_limit(50))
            .await
    }

    /// Highest APY first.
    pub async fn top_performing_vaults(&self, limit: u32) -> Result<Vec<Vault>> {
        let query = VaultQuery::new()
            .with_sort(SortField::Apy, SortOrder::Desc)
            .with_limit(limit);
        self.items(query).await
    }

    /// Highest TVL first.
    pub async fn vaults_by_tvl(&self, limit: u32) -> Result<Vec<Vault>> {
        let query = VaultQuery::new()
            .with_sort(SortField::Tvl, SortOrder::Desc)
            .with_limit(limit);
        self.items(query).await
    }

    /// Reports whether the backend is reachable.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }

    async fn items(&self, query: VaultQuery) -> Result<Vec<Vault>> {
        self.list_vaults(&query).await.map(Page::into_items)
    }
}
