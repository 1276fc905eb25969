//! Rule service wrapper with observability.

use std::fmt;
use std::sync::Arc;

use valux_core::Error;

use super::{
    NewRule, Result, RuleFilter, RuleProvider, RuleUpdate, ServiceHealth, TRACING_TARGET,
    validate_rule,
};
use crate::types::{
    AutomationRule, Page, RuleExecution, RuleStats, RuleStatus, RuleValidation, Trigger,
};

/// Rule service wrapper with observability.
///
/// Rules are validated locally before creation, so an invalid rule never
/// reaches the backend.
#[derive(Clone)]
pub struct RuleService {
    provider: Arc<dyn RuleProvider>,
}

impl fmt::Debug for RuleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleService").finish_non_exhaustive()
    }
}

impl RuleService {
    /// Creates a new rule service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: RuleProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Creates a new rule service sharing an existing provider.
    pub fn from_shared(provider: Arc<dyn RuleProvider>) -> Self {
        Self { provider }
    }

    /// Validates and creates a rule.
    pub async fn create_rule(&self, rule: &NewRule) -> Result<AutomationRule> {
        let validation = validate_rule(rule);
        if !validation.is_valid {
            tracing::warn!(
                target: TRACING_TARGET,
                errors = ?validation.errors,
                "Rejected invalid rule"
            );
            return Err(Error::invalid_input()
                .with_message(validation.errors.join("; "))
                .with_details(serde_json::json!({ "errors": validation.errors })));
        }

        let result = self.provider.create_rule(rule).await;
        match &result {
            Ok(created) => tracing::info!(
                target: TRACING_TARGET,
                rule_id = %created.id,
                trigger = %rule.trigger,
                "Rule created"
            ),
            Err(error) => tracing::error!(target: TRACING_TARGET, error = %error, "Rule creation failed"),
        }
        result
    }

    /// Lists the rules owned by `address`.
    pub async fn user_rules(&self, address: &str, filter: &RuleFilter) -> Result<Page<AutomationRule>> {
        tracing::debug!(target: TRACING_TARGET, %address, ?filter, "Listing rules");
        let result = self.provider.user_rules(address, filter).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, %address, error = %error, "Rule listing failed");
        }
        result
    }

    /// Looks a rule up by id.
    pub async fn rule_by_id(&self, id: &str, user: &str) -> Result<Option<AutomationRule>> {
        tracing::debug!(target: TRACING_TARGET, rule_id = %id, "Fetching rule");
        self.provider.rule_by_id(id, user).await
    }

    /// Applies a partial update.
    pub async fn update_rule(
        &self,
        id: &str,
        user: &str,
        update: &RuleUpdate,
    ) -> Result<AutomationRule> {
        tracing::info!(target: TRACING_TARGET, rule_id = %id, "Updating rule");
        let result = self.provider.update_rule(id, user, update).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, rule_id = %id, error = %error, "Rule update failed");
        }
        result
    }

    /// Deletes a rule.
    pub async fn delete_rule(&self, id: &str, user: &str) -> Result<()> {
        tracing::info!(target: TRACING_TARGET, rule_id = %id, "Deleting rule");
        let result = self.provider.delete_rule(id, user).await;
        if let Err(error) = &result {
            tracing::error!(target: TRACING_TARGET, rule_id = %id, error = %error, "Rule deletion failed");
        }
        result
    }

    /// Flips a rule between active and paused.
    pub async fn toggle_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        let result = self.provider.toggle_rule(id, user).await;
        match &result {
            Ok(rule) => tracing::info!(
                target: TRACING_TARGET,
                rule_id = %id,
                status = rule.status.as_ref(),
                "Rule toggled"
            ),
            Err(error) => tracing::error!(target: TRACING_TARGET, rule_id = %id, error = %error, "Rule toggle failed"),
        }
        result
    }

    /// Runs a rule immediately.
    pub async fn execute_rule(&self, id: &str, user: &str) -> Result<RuleExecution> {
        tracing::info!(target: TRACING_TARGET, rule_id = %id, "Executing rule");
        let result = self.provider.execute_rule(id, user).await;
        match &result {
            Ok(execution) => tracing::info!(
                target: TRACING_TARGET,
                rule_id = %id,
                execution_id = %execution.execution_id,
                distributions = execution.distributions.len(),
                "Rule executed"
            ),
            Err(error) => tracing::warn!(target: TRACING_TARGET, rule_id = %id, error = %error, "Rule execution failed"),
        }
        result
    }

    pub async fn active_rules(&self, address: &str) -> Result<Vec<AutomationRule>> {
        self.items(address, RuleFilter::new().with_active(true))
            .await
    }

    pub async fn inactive_rules(&self, address: &str) -> Result<Vec<AutomationRule>> {
        self.items(address, RuleFilter::new().with_active(false))
            .await
    }

    pub async fn rules_by_trigger(
        &self,
        address: &str,
        trigger: Trigger,
    ) -> Result<Vec<AutomationRule>> {
        self.items(address, RuleFilter::new().with_trigger(trigger))
            .await
    }

    pub async fn rules_for_vault(&self, address: &str, vault_id: &str) -> Result<Vec<AutomationRule>> {
        self.items(address, RuleFilter::new().with_vault(vault_id))
            .await
    }

    pub async fn search_rules(&self, address: &str, search: &str) -> Result<Vec<AutomationRule>> {
        self.items(address, RuleFilter::new().with_search(search))
            .await
    }

    /// Activates a rule, toggling only if it is paused.
    pub async fn activate_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        let rule = self.existing(id, user).await?;
        if rule.status == RuleStatus::Active {
            return Ok(rule);
        }
        self.toggle_rule(id, user).await
    }

    /// Pauses a rule, toggling only if it is active.
    pub async fn deactivate_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        let rule = self.existing(id, user).await?;
        if rule.status == RuleStatus::Paused {
            return Ok(rule);
        }
        self.toggle_rule(id, user).await
    }

    /// Creates a copy of a rule named `"<name> (Copy)"`.
    pub async fn duplicate_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        let rule = self.existing(id, user).await?;
        let copy = NewRule::duplicate_of(&rule, user).ok_or_else(|| {
            Error::invalid_input().with_message("Rule has no vault or trigger to copy")
        })?;
        self.create_rule(&copy).await
    }

    /// Counts and totals over every rule owned by `address`.
    pub async fn rule_stats(&self, address: &str) -> Result<RuleStats> {
        let rules = self
            .items(address, RuleFilter::new().with_executions())
            .await?;
        Ok(RuleStats::from_rules(&rules))
    }

    /// Checks a rule locally without contacting the backend.
    pub fn validate_rule(&self, rule: &NewRule) -> RuleValidation {
        validate_rule(rule)
    }

    /// Reports whether the backend is reachable.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }

    async fn existing(&self, id: &str, user: &str) -> Result<AutomationRule> {
        self.rule_by_id(id, user)
            .await?
            .ok_or_else(|| Error::not_found().with_message("Rule not found"))
    }

    async fn items(&self, address: &str, filter: RuleFilter) -> Result<Vec<AutomationRule>> {
        self.user_rules(address, &filter).await.map(Page::into_items)
    }
}
