use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Risk classification of a vault.
///
/// Serialized capitalised (`Low`) for display; [`RiskLevel::as_ref`] yields
/// the lowercase form the server expects in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Capitalised display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Investment category of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VaultCategory {
    Stable,
    Yield,
    Growth,
}

/// A yield vault ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub name: String,
    pub protocol: String,
    /// Token symbol of the deposited asset.
    pub asset: String,
    /// Annual yield, e.g. `"4.20%"`.
    pub apy: String,
    pub tvl: String,
    pub risk: RiskLevel,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_insured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_deposit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deposit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<VaultCategory>,
}

impl Vault {
    /// Numeric part of the APY string.
    pub fn apy_value(&self) -> f64 {
        super::parse_amount(&self.apy)
    }
}

/// A single point of a vault's APY history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApyPoint {
    pub date: String,
    pub apy: f64,
}

/// Historical performance of one vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPerformance {
    pub vault_id: String,
    #[serde(rename = "currentAPY")]
    pub current_apy: f64,
    #[serde(rename = "historicalAPY")]
    pub historical_apy: Vec<ApyPoint>,
    pub tvl_history: Vec<super::TvlPoint>,
    pub last_updated: String,
}

/// Outcome of a deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultReceipt {
    pub success: bool,
    pub transaction_hash: String,
    pub message: String,
}
