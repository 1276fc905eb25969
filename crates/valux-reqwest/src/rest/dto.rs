//! Wire shapes of the valux server.
//!
//! Fields the dashboard never reads default when absent; identity fields are
//! required so that a truncated payload is rejected instead of rendered.

use serde::{Deserialize, Serialize};
use valux_service::types::{ProtocolShare, TransactionStatus};

fn default_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultDto {
    pub id: String,
    pub name: String,
    pub protocol: String,
    pub token_symbol: String,
    pub apy: f64,
    pub risk_level: String,
    #[serde(default)]
    pub category: Option<String>,
    pub tvl: String,
    #[serde(default)]
    pub insurance_available: bool,
    #[serde(default)]
    pub auto_compounding: bool,
    #[serde(default)]
    pub withdrawal_terms: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultListDto {
    pub vaults: Vec<VaultDto>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub(crate) struct PerformanceDto {
    #[serde(rename = "24h", default)]
    pub day: f64,
    #[serde(rename = "7d", default)]
    pub week: f64,
    #[serde(rename = "30d", default)]
    pub month: f64,
    #[serde(rename = "1y", default)]
    pub year: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PortfolioOverviewDto {
    pub total_value: String,
    pub total_deposited: String,
    pub total_unrealized_pnl: String,
    #[serde(default)]
    pub total_distributed: String,
    #[serde(rename = "avgAPY")]
    pub avg_apy: f64,
    #[serde(default)]
    pub performance: PerformanceDto,
    #[serde(default)]
    pub active_positions: u32,
    #[serde(default)]
    pub active_rules: u32,
    #[serde(default)]
    pub last_updated: String,
}

/// Vault summary embedded in positions, transactions and rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultRefDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub token_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PositionDto {
    pub id: String,
    pub vault_id: String,
    pub vault: VaultRefDto,
    pub deposit_amount: String,
    pub current_value: String,
    #[serde(default)]
    pub unrealized_pnl: String,
    #[serde(default)]
    pub realized_pnl: String,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub gas_price_gwei: String,
    pub status: TransactionStatus,
    pub timestamp: String,
    #[serde(default)]
    pub vault: Option<VaultRefDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionListDto {
    pub transactions: Vec<TransactionDto>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DistributionDto {
    pub recipient: String,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub vault: VaultRefDto,
    pub trigger: String,
    #[serde(default)]
    pub profit_threshold: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub last_executed: Option<String>,
    #[serde(default)]
    pub next_execution: Option<String>,
    #[serde(default)]
    pub distributions: Vec<DistributionDto>,
    #[serde(default)]
    pub total_distributed: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleListDto {
    pub rules: Vec<RuleDto>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRuleDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_address: String,
    pub vault_id: String,
    pub trigger: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_threshold: Option<String>,
    pub distributions: Vec<DistributionDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRuleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributions: Option<Vec<DistributionDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlatformAnalyticsDto {
    pub total_users: u64,
    pub total_vaults: u64,
    pub total_tvl: String,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(rename = "avgAPY")]
    pub avg_apy: f64,
    #[serde(default)]
    pub top_protocols: Vec<ProtocolShare>,
}
