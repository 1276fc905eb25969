//! Portfolio service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    ExportQuery, PortfolioProvider, Result, ServiceHealth, TRACING_TARGET, TransactionFilter,
    TransactionQuery,
};
use crate::types::{
    AllocationSlice, ExportFormat, Page, PortfolioExport, PortfolioOverview, PortfolioPosition,
    PortfolioStats, Transaction, TransactionStatus, parse_amount,
};

/// Portfolio service wrapper with observability.
#[derive(Clone)]
pub struct PortfolioService {
    provider: Arc<dyn PortfolioProvider>,
}

impl fmt::Debug for PortfolioService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortfolioService").finish_non_exhaustive()
    }
}

impl PortfolioService {
    /// Creates a new portfolio service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: PortfolioProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a new portfolio service sharing an existing provider.
    pub fn from_shared(provider: Arc<dyn PortfolioProvider>) -> Self {
        Self { provider }
    }

    /// Aggregate overview for `address`.
    pub async fn overview(&self, address: &str) -> Result<PortfolioOverview> {
        let started_at = Instant::now();
        tracing::debug!(target: TRACING_TARGET, %address, "Fetching portfolio overview");

        let result = self.provider.overview(address).await;
        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET,
                %address,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Portfolio overview failed"
            );
        }
        result
    }

    /// Every position held by `address`.
    pub async fn positions(&self, address: &str) -> Result<Vec<PortfolioPosition>> {
        let started_at = Instant::now();
        let result = self.provider.positions(address).await;
        match &result {
            Ok(positions) => tracing::debug!(
                target: TRACING_TARGET,
                %address,
                count = positions.len(),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Portfolio positions fetched"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET,
                %address,
                error = %error,
                "Portfolio positions failed"
            ),
        }
        result
    }

    /// Transaction history matching `query`.
    pub async fn transactions(&self, query: &TransactionQuery) -> Result<Page<Transaction>> {
        tracing::debug!(target: TRACING_TARGET, address = %query.address, "Fetching transactions");
        let result = self.provider.transactions(query).await;
        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET,
                address = %query.address,
                error = %error,
                "Transaction history failed"
            );
        }
        result
    }

    /// Generates an export of the portfolio.
    pub async fn export(&self, query: &ExportQuery) -> Result<PortfolioExport> {
        tracing::info!(
            target: TRACING_TARGET,
            address = %query.address,
            format = ?query.format,
            "Exporting portfolio"
        );
        self.provider.export(query).await
    }

    /// Overview, positions and the numbers derived from them.
    pub async fn stats(&self, address: &str) -> Result<PortfolioStats> {
        let overview = self.overview(address).await?;
        let positions = self.positions(address).await?;

        let total_value = parse_amount(&overview.total_value);
        let total_deposited = parse_amount(&overview.total_deposited);
        let total_pnl = parse_amount(&overview.total_pnl);
        let pnl_percentage = if total_deposited > 0.0 {
            total_pnl / total_deposited * 100.0
        } else {
            0.0
        };

        Ok(PortfolioStats {
            total_value,
            total_deposited,
            total_pnl,
            pnl_percentage,
            position_count: positions.len(),
            overview,
            positions,
        })
    }

    /// Share of the portfolio held in each position.
    pub async fn allocation(&self, address: &str) -> Result<Vec<AllocationSlice>> {
        let positions = self.positions(address).await?;
        let total: f64 = positions
            .iter()
            .map(|position| parse_amount(&position.current_value))
            .sum();

        let slices = positions
            .into_iter()
            .map(|position| {
                let value = parse_amount(&position.current_value);
                AllocationSlice {
                    percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
                    pnl: parse_amount(&position.gain_loss),
                    value,
                    vault_id: position.vault_id,
                    vault_name: position.vault_name,
                    asset: position.asset,
                }
            })
            .collect();

        Ok(slices)
    }

    pub async fn transactions_by_type(
        &self,
        address: &str,
        kind: TransactionFilter,
    ) -> Result<Page<Transaction>> {
        let query = TransactionQuery::new(address).with_kind(kind).with_limit(100);
        self.transactions(&query).await
    }

    pub async fn transactions_by_vault(
        &self,
        address: &str,
        vault_id: &str,
    ) -> Result<Page<Transaction>> {
        let query = TransactionQuery::new(address)
            .with_vault(vault_id)
            .with_limit(100);
        self.transactions(&query).await
    }

    pub async fn transactions_by_date_range(
        &self,
        address: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Page<Transaction>> {
        let query = TransactionQuery::new(address)
            .with_range(start_date, end_date)
            .with_limit(100);
        self.transactions(&query).await
    }

    pub async fn pending_transactions(&self, address: &str) -> Result<Page<Transaction>> {
        let query = TransactionQuery::new(address)
            .with_status(TransactionStatus::Pending)
            .with_limit(50);
        self.transactions(&query).await
    }

    /// The most recent `limit` transactions.
    pub async fn recent_transactions(&self, address: &str, limit: u32) -> Result<Page<Transaction>> {
        let query = TransactionQuery::new(address).with_page(1).with_limit(limit);
        self.transactions(&query).await
    }

    /// Taxable transactions of `year` as CSV.
    pub async fn tax_report(&self, address: &str, year: i32) -> Result<PortfolioExport> {
        let query = ExportQuery::new(address, ExportFormat::Csv)
            .with_year(year)
            .with_taxable_only(true);
        self.export(&query).await
    }

    /// Reports whether the backend is reachable.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}
