use serde::{Deserialize, Serialize};

use crate::types::{AutomationRule, Distribution, QueryParams, Trigger};

/// A rule to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRule {
    pub name: String,
    pub description: Option<String>,
    pub user_address: String,
    pub vault_id: String,
    pub trigger: Trigger,
    pub profit_threshold: Option<String>,
    pub distributions: Vec<Distribution>,
}

impl NewRule {
    /// Builds a copy of `rule` owned by `user`, named `"<name> (Copy)"`.
    ///
    /// Returns `None` if the rule references no vault.
    pub fn duplicate_of(rule: &AutomationRule, user: &str) -> Option<Self> {
        let vault_id = rule.conditions.vault_ids.first()?.clone();
        let trigger = rule
            .conditions
            .frequency
            .parse::<Trigger>()
            .or_else(|_| rule.trigger.parse::<Trigger>())
            .ok()?;

        Some(Self {
            name: format!("{} (Copy)", rule.name),
            description: Some(rule.description.clone()),
            user_address: user.to_owned(),
            vault_id,
            trigger,
            profit_threshold: Some(rule.conditions.min_profit.clone()),
            distributions: rule.distributions.clone(),
        })
    }
}

/// Partial update of a rule. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub trigger: Option<Trigger>,
    pub profit_threshold: Option<String>,
    pub distributions: Option<Vec<Distribution>>,
    pub active: Option<bool>,
}

/// Filter for a user's rule listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFilter {
    pub vault_id: Option<String>,
    pub trigger: Option<Trigger>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub include_executions: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RuleFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_vault(mut self, vault_id: impl Into<String>) -> Self {
        self.vault_id = Some(vault_id.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_executions(mut self) -> Self {
        self.include_executions = Some(true);
        self
    }

    /// Builds the query string pairs; the address goes in the path.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(vault_id) = &self.vault_id {
            params.push(("vaultId", vault_id.clone()));
        }
        if let Some(trigger) = self.trigger {
            params.push(("trigger", trigger.as_param().to_owned()));
        }
        if let Some(active) = self.active {
            params.push(("active", active.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        if let Some(include_executions) = self.include_executions {
            params.push(("includeExecutions", include_executions.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
