use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use valux_core::{Error, Result};

/// Whether a rule is currently scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleStatus {
    Active,
    Paused,
}

/// What causes an automation rule to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Weekly,
    Monthly,
    Quarterly,
    ProfitThreshold,
}

impl Trigger {
    /// Wire form, e.g. `profit_threshold`.
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::ProfitThreshold => "profit_threshold",
        }
    }

    /// Display label, e.g. `Profit Threshold`.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::ProfitThreshold => "Profit Threshold",
        }
    }

    /// Formats a raw trigger from the server; unknown values pass through.
    pub fn format(raw: &str) -> String {
        raw.parse::<Self>()
            .map_or_else(|_| raw.to_owned(), |trigger| trigger.label().to_owned())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Trigger {
    type Err = Error;

    /// Accepts the wire form, the display label and the short `threshold`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "profit_threshold" | "profit threshold" | "threshold" => Ok(Self::ProfitThreshold),
            _ => Err(Error::invalid_input().with_message(format!("Unknown trigger: {s}"))),
        }
    }
}

/// A share of distributed profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Recipient wallet address.
    pub address: String,
    pub percentage: f64,
    pub label: String,
}

/// Conditions under which a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConditions {
    pub min_profit: String,
    /// Raw trigger value as stored by the server.
    pub frequency: String,
    pub vault_ids: Vec<String>,
}

/// A profit distribution rule ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    pub id: String,
    pub name: String,
    pub status: RuleStatus,
    /// Formatted trigger label.
    pub trigger: String,
    pub last_execution: Option<String>,
    pub next_execution: Option<String>,
    pub total_distributed: String,
    pub description: String,
    pub conditions: RuleConditions,
    pub distributions: Vec<Distribution>,
}

impl AutomationRule {
    /// Returns true if the rule is scheduled.
    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }
}

/// A transfer made by a rule execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedDistribution {
    pub recipient: String,
    pub amount: String,
    pub transaction_hash: String,
}

/// Result of running a rule manually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleExecution {
    pub success: bool,
    pub execution_id: String,
    pub profit_amount: String,
    pub distributions: Vec<ExecutedDistribution>,
    pub gas_used: String,
    /// Milliseconds.
    pub execution_time: u64,
    pub message: String,
}

/// Outcome of local rule validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Number of rules per trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBreakdown {
    pub weekly: usize,
    pub monthly: usize,
    pub quarterly: usize,
    pub profit_threshold: usize,
}

/// Summary of a user's rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    pub total_rules: usize,
    pub active_rules: usize,
    pub inactive_rules: usize,
    pub total_distributed: String,
    pub trigger_breakdown: TriggerBreakdown,
}

impl RuleStats {
    /// Summarises `rules`.
    pub fn from_rules(rules: &[AutomationRule]) -> Self {
        let active_rules = rules.iter().filter(|rule| rule.is_active()).count();
        let total_distributed: f64 = rules
            .iter()
            .map(|rule| super::parse_amount(&rule.total_distributed))
            .sum();

        let count = |trigger: Trigger| {
            rules
                .iter()
                .filter(|rule| rule.trigger == trigger.label())
                .count()
        };

        Self {
            total_rules: rules.len(),
            active_rules,
            inactive_rules: rules.len() - active_rules,
            total_distributed: total_distributed.to_string(),
            trigger_breakdown: TriggerBreakdown {
                weekly: count(Trigger::Weekly),
                monthly: count(Trigger::Monthly),
                quarterly: count(Trigger::Quarterly),
                profit_threshold: count(Trigger::ProfitThreshold),
            },
        }
    }
}
