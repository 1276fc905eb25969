//! Portfolio positions, transactions and exports.

mod query;
mod service;

pub use query::{ExportQuery, TransactionFilter, TransactionQuery};
pub use service::PortfolioService;

pub use crate::{Result, ServiceHealth};
use crate::types::{Page, PortfolioExport, PortfolioOverview, PortfolioPosition, Transaction};

/// Tracing target for portfolio operations.
pub const TRACING_TARGET: &str = "valux_service::portfolio";

/// Backend operations on a user's portfolio.
#[async_trait::async_trait]
pub trait PortfolioProvider: Send + Sync {
    /// Aggregate overview for `address`.
    async fn overview(&self, address: &str) -> Result<PortfolioOverview>;

    /// Every position held by `address`.
    async fn positions(&self, address: &str) -> Result<Vec<PortfolioPosition>>;

    /// Transaction history matching `query`.
    async fn transactions(&self, query: &TransactionQuery) -> Result<Page<Transaction>>;

    /// Generates an export of the portfolio.
    async fn export(&self, query: &ExportQuery) -> Result<PortfolioExport>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
