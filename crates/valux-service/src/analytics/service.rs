//! Analytics service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{AnalyticsProvider, Result, ServiceHealth, TRACING_TARGET};
use crate::types::{
    PlatformMetrics, PlatformStats, ProtocolDistribution, Timeframe, TvlMetrics, TvlPoint,
    UserAnalytics, parse_amount,
};

/// Analytics service wrapper with observability.
#[derive(Clone)]
pub struct AnalyticsService {
    provider: Arc<dyn AnalyticsProvider>,
}

impl fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsService").finish_non_exhaustive()
    }
}

impl AnalyticsService {
    /// Creates a new analytics service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: AnalyticsProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a new analytics service sharing an existing provider.
    pub fn from_shared(provider: Arc<dyn AnalyticsProvider>) -> Self {
        Self { provider }
    }

    /// Platform-wide headline figures.
    pub async fn platform_metrics(&self) -> Result<PlatformMetrics> {
        let started_at = Instant::now();
        let result = self.provider.platform_metrics().await;
        match &result {
            Ok(_) => tracing::debug!(
                target: TRACING_TARGET,
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "Platform metrics fetched"
            ),
            Err(error) => tracing::error!(target: TRACING_TARGET, error = %error, "Platform metrics failed"),
        }
        result
    }

    /// TVL history over `timeframe`.
    pub async fn tvl_metrics(&self, timeframe: Option<Timeframe>) -> Result<TvlMetrics> {
        tracing::debug!(target: TRACING_TARGET, ?timeframe, "Fetching TVL metrics");
        let result = self.provider.tvl_metrics(timeframe).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, error = %error, "TVL metrics failed");
        }
        result
    }

    /// Analytics for a single user.
    pub async fn user_analytics(&self, address: &str) -> Result<UserAnalytics> {
        tracing::debug!(target: TRACING_TARGET, %address, "Fetching user analytics");
        let result = self.provider.user_analytics(address).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, %address, error = %error, "User analytics failed");
        }
        result
    }

    /// TVL share per protocol, coloured for charts.
    pub async fn protocol_distribution(&self) -> Result<Vec<ProtocolDistribution>> {
        let result = self.provider.protocol_distribution().await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, error = %error, "Protocol distribution failed");
        }
        result
    }

    /// Numeric platform summary over the last 30 days.
    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        let metrics = self.platform_metrics().await?;
        let tvl = self.tvl_metrics(Some(Timeframe::Month)).await?;
        let protocol_distribution = self.protocol_distribution().await?;

        Ok(PlatformStats {
            total_users: parse_amount(&metrics.total_users) as u64,
            total_vaults: parse_amount(&metrics.total_vaults) as u64,
            total_transactions: parse_amount(&metrics.total_transactions) as u64,
            total_tvl: metrics.total_value_locked,
            avg_apy: metrics.average_apy,
            tvl_change: tvl.change,
            protocol_distribution,
        })
    }

    /// TVL samples for charts.
    pub async fn tvl_history(&self, timeframe: Timeframe) -> Result<Vec<TvlPoint>> {
        Ok(self.tvl_metrics(Some(timeframe)).await?.historical)
    }

    /// Protocols whose name contains `query`, ignoring case.
    pub async fn search_protocols(&self, query: &str) -> Result<Vec<ProtocolDistribution>> {
        let needle = query.to_lowercase();
        let protocols = self.protocol_distribution().await?;
        Ok(protocols
            .into_iter()
            .filter(|protocol| protocol.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Reports whether the backend is reachable.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}
