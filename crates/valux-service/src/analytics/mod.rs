//! Platform and user analytics.

mod service;

pub use service::AnalyticsService;

pub use crate::{Result, ServiceHealth};
use crate::types::{PlatformMetrics, ProtocolDistribution, Timeframe, TvlMetrics, UserAnalytics};

/// Tracing target for analytics operations.
pub const TRACING_TARGET: &str = "valux_service::analytics";

/// Fixed chart palette; slices beyond its length cycle back to the start.
pub const PROTOCOL_COLORS: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#84CC16",
];

/// Colour of the slice at `index`.
pub fn protocol_color(index: usize) -> &'static str {
    PROTOCOL_COLORS[index % PROTOCOL_COLORS.len()]
}

/// Backend operations for analytics.
#[async_trait::async_trait]
pub trait AnalyticsProvider: Send + Sync {
    /// Platform-wide headline figures.
    async fn platform_metrics(&self) -> Result<PlatformMetrics>;

    /// TVL history; the server picks its default window when `None`.
    async fn tvl_metrics(&self, timeframe: Option<Timeframe>) -> Result<TvlMetrics>;

    /// Analytics for a single user.
    async fn user_analytics(&self, address: &str) -> Result<UserAnalytics>;

    /// TVL share per protocol, coloured for charts.
    async fn protocol_distribution(&self) -> Result<Vec<ProtocolDistribution>>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_color_cycles() {
        assert_eq!(protocol_color(0), "#3B82F6");
        assert_eq!(protocol_color(9), "#84CC16");
        assert_eq!(protocol_color(10), "#3B82F6");
        assert_eq!(protocol_color(12), "#10B981");
    }
}
