//! Domain values returned by every backend.
//!
//! These are the display-ready shapes: percentages are already formatted as
//! strings, risk levels are capitalised and rule triggers carry their labels.

mod analytics;
mod page;
mod portfolio;
mod rule;
mod vault;

pub use analytics::{
    ActivityEntry, PlatformMetrics, PlatformStats, ProtocolDistribution, ProtocolShare,
    Timeframe, TvlChange, TvlMetrics, TvlPoint, UserAnalytics, UserPortfolio, UserRankings,
    UserRules, UserSummary,
};
pub use page::{Page, QueryParams};
pub use portfolio::{
    AllocationSlice, ExportFormat, PerformanceWindow, PortfolioExport, PortfolioOverview,
    PortfolioPosition, PortfolioStats, Transaction, TransactionKind, TransactionStatus,
};
pub use rule::{
    AutomationRule, Distribution, ExecutedDistribution, RuleConditions, RuleExecution,
    RuleStats, RuleStatus, RuleValidation, Trigger, TriggerBreakdown,
};
pub use vault::{ApyPoint, RiskLevel, Vault, VaultCategory, VaultPerformance, VaultReceipt};

/// Parses a display amount such as `"+210.45"`, `"$1,250.00"` or `"4.21%"`.
///
/// Sign, currency, grouping and percent characters are ignored. Returns `0.0`
/// when nothing numeric remains.
pub fn parse_amount(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '+' | '$' | ',' | '%' | ' '))
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Formats a number with two decimals and a trailing percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats a number with two decimals and an explicit sign.
pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}
