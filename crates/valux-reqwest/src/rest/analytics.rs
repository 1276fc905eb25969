use serde_json::Value;
use valux_core::{Result, ServiceHealth};
use valux_service::analytics::AnalyticsProvider;
use valux_service::types::{
    PlatformMetrics, ProtocolDistribution, Timeframe, TvlMetrics, UserAnalytics,
};

use super::dto::PlatformAnalyticsDto;
use super::transform;
use crate::client::ApiClient;

impl ApiClient {
    async fn platform_analytics(&self) -> Result<PlatformAnalyticsDto> {
        let value: Value = self.get("analytics/platform", &[]).await?;
        transform::decode("platform analytics", value)
    }
}

#[async_trait::async_trait]
impl AnalyticsProvider for ApiClient {
    async fn platform_metrics(&self) -> Result<PlatformMetrics> {
        let dto = self.platform_analytics().await?;
        Ok(transform::platform_metrics(&dto))
    }

    async fn tvl_metrics(&self, timeframe: Option<Timeframe>) -> Result<TvlMetrics> {
        let params: Vec<(&str, String)> = timeframe
            .map(|timeframe| ("timeframe", timeframe.as_ref().to_owned()))
            .into_iter()
            .collect();
        let value: Value = self.get("analytics/tvl", &params).await?;
        transform::decode("TVL metrics", value)
    }

    async fn user_analytics(&self, address: &str) -> Result<UserAnalytics> {
        let value: Value = self.get(&format!("analytics/user/{address}"), &[]).await?;
        transform::decode("user analytics", value)
    }

    async fn protocol_distribution(&self) -> Result<Vec<ProtocolDistribution>> {
        let dto = self.platform_analytics().await?;
        Ok(transform::protocol_distribution(&dto.top_protocols))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(self.health().await)
    }
}
