use reqwest::Method;
use serde_json::Value;
use valux_core::{Result, ServiceHealth};
use valux_service::rule::{NewRule, RuleFilter, RuleProvider, RuleUpdate};
use valux_service::types::{AutomationRule, Page, RuleExecution};

use super::dto::RuleDto;
use super::{found, owner, transform};
use crate::client::ApiClient;

impl ApiClient {
    async fn rule_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        user: &str,
    ) -> Result<AutomationRule> {
        let value = self.request_value(method, path, body, &owner(user)).await?;
        let dto: RuleDto = transform::decode("rule", value)?;
        Ok(transform::rule(dto))
    }
}

#[async_trait::async_trait]
impl RuleProvider for ApiClient {
    async fn create_rule(&self, rule: &NewRule) -> Result<AutomationRule> {
        let body = transform::create_rule_body(rule);
        let value: Value = self.post("rules", Some(&body)).await?;
        let dto: RuleDto = transform::decode("rule", value)?;
        Ok(transform::rule(dto))
    }

    async fn user_rules(&self, address: &str, filter: &RuleFilter) -> Result<Page<AutomationRule>> {
        let value: Value = self
            .get(&format!("rules/user/{address}"), &filter.to_params())
            .await?;
        transform::rule_page(value)
    }

    async fn rule_by_id(&self, id: &str, user: &str) -> Result<Option<AutomationRule>> {
        let result = self
            .rule_request(Method::GET, &format!("rules/{id}"), None, user)
            .await;
        found(result)
    }

    async fn update_rule(
        &self,
        id: &str,
        user: &str,
        update: &RuleUpdate,
    ) -> Result<AutomationRule> {
        let body = serde_json::to_value(transform::update_rule_body(update))?;
        self.rule_request(Method::PUT, &format!("rules/{id}"), Some(&body), user)
            .await
    }

    async fn delete_rule(&self, id: &str, user: &str) -> Result<()> {
        self.request_value(Method::DELETE, &format!("rules/{id}"), None, &owner(user))
            .await?;
        Ok(())
    }

    async fn toggle_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        self.rule_request(Method::PUT, &format!("rules/{id}/toggle"), None, user)
            .await
    }

    async fn execute_rule(&self, id: &str, user: &str) -> Result<RuleExecution> {
        let path = format!("rules/{id}/execute");
        let value = self
            .request_value(Method::POST, &path, None, &owner(user))
            .await?;
        transform::decode("rule execution", value)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(self.health().await)
    }
}
