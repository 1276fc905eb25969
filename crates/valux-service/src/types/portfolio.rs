use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, EnumString};

/// Relative portfolio performance over fixed windows, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceWindow {
    #[serde(rename = "24h")]
    pub day: f64,
    #[serde(rename = "7d")]
    pub week: f64,
    #[serde(rename = "30d")]
    pub month: f64,
    #[serde(rename = "1y")]
    pub year: f64,
}

/// Aggregate view of a user's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOverview {
    pub total_value: String,
    pub total_deposited: String,
    #[serde(rename = "totalPnL")]
    pub total_pnl: String,
    pub total_distributed: String,
    #[serde(rename = "avgAPY")]
    pub avg_apy: String,
    pub performance: PerformanceWindow,
    pub active_positions: u32,
    pub active_rules: u32,
    pub last_updated: String,
}

/// A user's holding in a single vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    pub id: String,
    pub vault_id: String,
    pub vault_name: String,
    pub asset: String,
    pub deposited: String,
    pub current_value: String,
    pub apy: String,
    /// Signed profit or loss, e.g. `"+210.45"`.
    pub gain_loss: String,
    /// Signed profit or loss relative to the deposit, e.g. `"+4.21%"`.
    pub gain_loss_percentage: String,
    pub last_updated: String,
}

/// Kind of a portfolio transaction as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Yield,
    Fee,
}

/// Settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[serde(alias = "completed")]
    #[strum(to_string = "confirmed", serialize = "completed")]
    Confirmed,
    Failed,
}

/// A single on-chain transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub vault_name: String,
    pub asset: String,
    pub amount: String,
    pub value: String,
    pub status: TransactionStatus,
    pub timestamp: String,
    pub tx_hash: String,
    pub gas_used: String,
    pub gas_fee: String,
}

/// Output format of a portfolio export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
    Pdf,
}

/// A generated portfolio export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioExport {
    pub format: ExportFormat,
    /// CSV text, or a JSON document.
    pub data: Value,
    pub filename: String,
    pub generated_at: String,
}

/// Numeric summary computed from an overview and its positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub overview: PortfolioOverview,
    pub positions: Vec<PortfolioPosition>,
    pub total_value: f64,
    pub total_deposited: f64,
    pub total_pnl: f64,
    pub pnl_percentage: f64,
    pub position_count: usize,
}

/// Share of the portfolio held in one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    pub vault_id: String,
    pub vault_name: String,
    pub asset: String,
    pub value: f64,
    pub percentage: f64,
    pub pnl: f64,
}
