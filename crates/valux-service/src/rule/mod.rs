//! Profit distribution rules.

mod query;
mod service;
mod validate;

pub use query::{NewRule, RuleFilter, RuleUpdate};
pub use service::RuleService;
pub use validate::validate_rule;

pub use crate::{Result, ServiceHealth};
use crate::types::{AutomationRule, Page, RuleExecution};

/// Tracing target for rule operations.
pub const TRACING_TARGET: &str = "valux_service::rule";

/// Backend operations on automation rules.
///
/// Every per-rule operation is scoped to the owning user's address.
#[async_trait::async_trait]
pub trait RuleProvider: Send + Sync {
    /// Creates a rule.
    async fn create_rule(&self, rule: &NewRule) -> Result<AutomationRule>;

    /// Lists the rules owned by `address`.
    async fn user_rules(&self, address: &str, filter: &RuleFilter) -> Result<Page<AutomationRule>>;

    /// Looks a rule up by id. Returns `None` if it does not exist.
    async fn rule_by_id(&self, id: &str, user: &str) -> Result<Option<AutomationRule>>;

    /// Applies a partial update.
    async fn update_rule(&self, id: &str, user: &str, update: &RuleUpdate)
    -> Result<AutomationRule>;

    /// Deletes a rule.
    async fn delete_rule(&self, id: &str, user: &str) -> Result<()>;

    /// Flips a rule between active and paused.
    async fn toggle_rule(&self, id: &str, user: &str) -> Result<AutomationRule>;

    /// Runs a rule immediately.
    async fn execute_rule(&self, id: &str, user: &str) -> Result<RuleExecution>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
