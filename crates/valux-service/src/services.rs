//! The four resource services over a single backend.

use std::sync::Arc;
use std::time::Instant;

use crate::analytics::{AnalyticsProvider, AnalyticsService};
use crate::portfolio::{PortfolioProvider, PortfolioService};
use crate::rule::{RuleProvider, RuleService};
use crate::vault::{VaultProvider, VaultService};
use crate::{Result, ServiceHealth};

/// Tracing target for service-wide operations.
pub const TRACING_TARGET: &str = "valux_service::services";

/// A backend able to serve every resource.
pub trait Backend:
    VaultProvider + PortfolioProvider + RuleProvider + AnalyticsProvider + 'static
{
}

impl<T> Backend for T where
    T: VaultProvider + PortfolioProvider + RuleProvider + AnalyticsProvider + 'static
{
}

/// Vault, portfolio, rule and analytics services sharing one backend.
///
/// Cloning is cheap; clones share the backend.
#[derive(Debug, Clone)]
pub struct Services {
    vaults: VaultService,
    portfolio: PortfolioService,
    rules: RuleService,
    analytics: AnalyticsService,
}

impl Services {
    /// Builds every service over `backend`.
    pub fn from_provider<P: Backend>(backend: P) -> Self {
        let backend = Arc::new(backend);
        Self {
            vaults: VaultService::from_shared(backend.clone()),
            portfolio: PortfolioService::from_shared(backend.clone()),
            rules: RuleService::from_shared(backend.clone()),
            analytics: AnalyticsService::from_shared(backend),
        }
    }

    /// Returns the vault service.
    pub fn vaults(&self) -> &VaultService {
        &self.vaults
    }

    /// Returns the portfolio service.
    pub fn portfolio(&self) -> &PortfolioService {
        &self.portfolio
    }

    /// Returns the automation rule service.
    pub fn rules(&self) -> &RuleService {
        &self.rules
    }

    /// Returns the analytics service.
    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    /// Probes the backend and reports the time it took.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        let started_at = Instant::now();
        let health = self.vaults.health_check().await?;
        let elapsed = started_at.elapsed();

        tracing::debug!(
            target: TRACING_TARGET,
            status = ?health.status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Backend health checked"
        );

        Ok(health.with_response_time(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use crate::rule::NewRule;
    use crate::types::{Distribution, RuleStatus, Trigger};
    use crate::vault::VaultFilters;

    const USER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn services() -> Services {
        MockProvider::instant().into_services()
    }

    #[tokio::test]
    async fn test_services_share_backend_state() {
        let services = services();
        services.rules().activate_rule("3", USER).await.unwrap();

        let overview = services.portfolio().overview(USER).await.unwrap();
        assert_eq!(overview.active_rules, 3);
    }

    #[tokio::test]
    async fn test_health_check_reports_mock_backend() {
        let health = services().health_check().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.backend.as_deref(), Some("mock"));
        assert!(health.response.is_some());
    }

    #[tokio::test]
    async fn test_vault_helpers() {
        let services = services();
        let vaults = services.vaults();

        assert_eq!(vaults.active_vaults().await.unwrap().len(), 6);
        assert_eq!(vaults.vaults_by_protocol("aave").await.unwrap().len(), 1);

        let top = vaults.top_performing_vaults(2).await.unwrap();
        assert_eq!(top[0].name, "High Yield DeFi");
        assert_eq!(top[1].name, "DeFi Blue Chip");

        let filters = VaultFilters {
            risk: Some("Low".into()),
            ..Default::default()
        };
        assert_eq!(vaults.vaults(&filters).await.unwrap().total, 3);
    }

    #[tokio::test]
    async fn test_portfolio_stats_and_allocation() {
        let services = services();
        let stats = services.portfolio().stats(USER).await.unwrap();
        assert_eq!(stats.position_count, 3);
        assert!((stats.total_pnl - 335.75).abs() < 1e-9);

        let slices = services.portfolio().allocation(USER).await.unwrap();
        let total: f64 = slices.iter().map(|slice| slice.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rule_helpers() {
        let services = services();
        let rules = services.rules();

        assert_eq!(rules.active_rules(USER).await.unwrap().len(), 2);
        assert_eq!(rules.inactive_rules(USER).await.unwrap().len(), 1);

        let paused = rules.deactivate_rule("1", USER).await.unwrap();
        assert_eq!(paused.status, RuleStatus::Paused);

        let copy = rules.duplicate_rule("2", USER).await.unwrap();
        assert_eq!(copy.name, "ETH Staking Rewards (Copy)");
        assert_eq!(copy.trigger, "Weekly");

        let stats = rules.rule_stats(USER).await.unwrap();
        assert_eq!(stats.total_rules, 4);
        assert_eq!(stats.trigger_breakdown.weekly, 2);

        let missing = rules.activate_rule("missing", USER).await.unwrap_err();
        assert_eq!(missing.message(), "Rule not found");
    }

    #[tokio::test]
    async fn test_create_rule_is_validated_locally() {
        let rule = NewRule {
            name: String::new(),
            description: None,
            user_address: USER.into(),
            vault_id: "1".into(),
            trigger: Trigger::Monthly,
            profit_threshold: None,
            distributions: vec![Distribution {
                address: "0x1".into(),
                percentage: 60.0,
                label: "Wallet".into(),
            }],
        };

        let error = services().rules().create_rule(&rule).await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
        assert!(error.message().contains("Rule name is required"));
        assert!(error.message().contains("must sum to 100%"));
    }

    #[tokio::test]
    async fn test_analytics_platform_stats() {
        let stats = services().analytics().platform_stats().await.unwrap();
        assert_eq!(stats.total_users, 1247);
        assert_eq!(stats.protocol_distribution.len(), 5);
    }
}
