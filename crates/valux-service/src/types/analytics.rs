use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Platform-wide headline figures, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub total_value_locked: String,
    pub total_users: String,
    pub total_vaults: String,
    pub total_transactions: String,
    #[serde(rename = "averageAPY")]
    pub average_apy: String,
    pub monthly_growth: String,
    pub total_yield_generated: String,
    pub active_automations: String,
}

/// Window for TVL history queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
pub enum Timeframe {
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    Day,
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
    #[serde(rename = "1y")]
    #[strum(serialize = "1y")]
    Year,
}

/// A TVL sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvlPoint {
    pub date: String,
    pub tvl: String,
}

/// Absolute and relative TVL change over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvlChange {
    pub amount: String,
    pub percentage: f64,
}

/// TVL held by one protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolShare {
    pub protocol: String,
    pub tvl: String,
    pub percentage: f64,
}

/// TVL over time and by protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlMetrics {
    pub current: String,
    pub change: TvlChange,
    pub historical: Vec<TvlPoint>,
    pub by_protocol: Vec<ProtocolShare>,
    pub timeframe: Timeframe,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub address: String,
    pub join_date: String,
    pub total_deposited: String,
    pub total_earned: String,
    pub total_distributed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPortfolio {
    pub total_value: String,
    pub pnl: String,
    pub pnl_percentage: f64,
    pub best_performing_vault: String,
    pub worst_performing_vault: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRules {
    pub total_rules: u32,
    pub active_rules: u32,
    pub total_executions: u32,
    pub total_distributed: String,
    pub avg_execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRankings {
    pub portfolio_size: u32,
    pub total_earnings: u32,
    pub automation_usage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub timestamp: String,
}

/// Per-user analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnalytics {
    pub user: UserSummary,
    pub portfolio: UserPortfolio,
    pub rules: UserRules,
    pub rankings: UserRankings,
    pub activity: Vec<ActivityEntry>,
}

/// One slice of the protocol distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDistribution {
    pub name: String,
    pub value: f64,
    /// Hex colour, e.g. `#3B82F6`.
    pub color: String,
}

/// Numeric platform summary combining metrics, TVL change and protocols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_vaults: u64,
    pub total_transactions: u64,
    pub total_tvl: String,
    #[serde(rename = "avgAPY")]
    pub avg_apy: String,
    pub tvl_change: TvlChange,
    pub protocol_distribution: Vec<ProtocolDistribution>,
}
