use serde_json::Value;
use valux_core::{Result, ServiceHealth};
use valux_service::portfolio::{ExportQuery, PortfolioProvider, TransactionQuery};
use valux_service::types::{Page, PortfolioExport, PortfolioOverview, PortfolioPosition, Transaction};

use super::dto::{PortfolioOverviewDto, PositionDto};
use super::transform;
use crate::client::ApiClient;

#[async_trait::async_trait]
impl PortfolioProvider for ApiClient {
    async fn overview(&self, address: &str) -> Result<PortfolioOverview> {
        let value: Value = self.get(&format!("portfolio/user/{address}"), &[]).await?;
        let dto: PortfolioOverviewDto = transform::decode("portfolio overview", value)?;
        Ok(transform::overview(dto))
    }

    async fn positions(&self, address: &str) -> Result<Vec<PortfolioPosition>> {
        let value: Value = self
            .get(&format!("portfolio/user/{address}/positions"), &[])
            .await?;
        let dtos: Vec<PositionDto> = transform::decode("positions", value)?;
        Ok(dtos.into_iter().map(transform::position).collect())
    }

    async fn transactions(&self, query: &TransactionQuery) -> Result<Page<Transaction>> {
        let path = format!("portfolio/user/{}/transactions", query.address);
        let value: Value = self.get(&path, &query.to_params()).await?;
        transform::transaction_page(value)
    }

    async fn export(&self, query: &ExportQuery) -> Result<PortfolioExport> {
        let path = format!("portfolio/user/{}/export", query.address);
        let value: Value = self.get(&path, &query.to_params()).await?;
        transform::decode("portfolio export", value)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(self.health().await)
    }
}
