//! Provider trait implementations for the mock backend.

use std::cmp::Ordering;

use jiff::Timestamp;
use serde_json::{Value, json};
use uuid::Uuid;
use valux_core::{Error, Result, ServiceHealth};

use super::{MockProvider, TRACING_TARGET, data};
use crate::analytics::AnalyticsProvider;
use crate::portfolio::{ExportQuery, PortfolioProvider, TransactionQuery};
use crate::rule::{NewRule, RuleFilter, RuleProvider, RuleUpdate};
use crate::types::{
    AutomationRule, ExecutedDistribution, ExportFormat, Page, PlatformMetrics, PortfolioExport,
    PortfolioOverview, PortfolioPosition, ProtocolDistribution, RuleConditions, RuleExecution,
    RuleStatus, Timeframe, Transaction, TvlMetrics, UserAnalytics, Vault, VaultPerformance,
    VaultReceipt, parse_amount,
};
use crate::vault::{SortField, SortOrder, VaultFilters, VaultProvider, VaultQuery};

/// Random-looking 32-byte transaction hash.
fn pseudo_hash() -> String {
    format!("0x{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Numeric TVL from a display string like `$2.4M` or `$890K`.
fn tvl_value(tvl: &str) -> f64 {
    let multiplier = match tvl.chars().last() {
        Some('M' | 'm') => 1_000_000.0,
        Some('K' | 'k') => 1_000.0,
        _ => 1.0,
    };
    parse_amount(tvl.trim_end_matches(['M', 'm', 'K', 'k'])) * multiplier
}

fn require_user(user: &str) -> Result<()> {
    if user.trim().is_empty() {
        return Err(Error::invalid_input().with_message("User address is required"));
    }
    Ok(())
}

fn rule_not_found() -> Error {
    Error::not_found().with_message("Rule not found")
}

fn vault_matches(vault: &Vault, query: &VaultQuery) -> bool {
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let hit = [&vault.name, &vault.asset, &vault.protocol]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if query.risk_level.is_some_and(|risk| risk != vault.risk) {
        return false;
    }
    if query.category.is_some() && query.category != vault.category {
        return false;
    }
    if query.min_apy.is_some_and(|min| vault.apy_value() < min) {
        return false;
    }
    if query.max_apy.is_some_and(|max| vault.apy_value() > max) {
        return false;
    }
    if let Some(protocol) = &query.protocol {
        if !vault.protocol.eq_ignore_ascii_case(protocol) {
            return false;
        }
    }
    // Every mock vault is active.
    query.active != Some(false)
}

fn compare_vaults(a: &Vault, b: &Vault, field: SortField) -> Ordering {
    match field {
        SortField::Apy => a.apy_value().total_cmp(&b.apy_value()),
        SortField::Tvl => tvl_value(&a.tvl).total_cmp(&tvl_value(&b.tvl)),
        SortField::Name => a.name.cmp(&b.name),
        SortField::CreatedAt => a.id.cmp(&b.id),
    }
}

fn receipt(verb: &str, amount: &str) -> Result<VaultReceipt> {
    if parse_amount(amount) <= 0.0 {
        return Err(Error::invalid_input().with_message("Amount must be greater than zero"));
    }
    Ok(VaultReceipt {
        success: true,
        transaction_hash: pseudo_hash(),
        message: format!("Successfully {verb} {amount}"),
    })
}

fn apply_update(rule: &mut AutomationRule, update: &RuleUpdate) {
    if let Some(name) = &update.name {
        rule.name = name.clone();
    }
    if let Some(description) = &update.description {
        rule.description = description.clone();
    }
    if let Some(trigger) = update.trigger {
        rule.trigger = trigger.label().to_owned();
        rule.conditions.frequency = trigger.as_param().to_owned();
    }
    if let Some(threshold) = &update.profit_threshold {
        rule.conditions.min_profit = threshold.clone();
    }
    if let Some(distributions) = &update.distributions {
        rule.distributions = distributions.clone();
    }
    if let Some(active) = update.active {
        rule.status = if active {
            RuleStatus::Active
        } else {
            RuleStatus::Paused
        };
    }
}

impl MockProvider {
    fn find_vault(&self, id: &str) -> Option<&Vault> {
        self.state
            .vaults
            .iter()
            .map(|(_, vault)| vault)
            .find(|vault| vault.id == id)
    }
}

#[async_trait::async_trait]
impl VaultProvider for MockProvider {
    async fn list_vaults(&self, query: &VaultQuery) -> Result<Page<Vault>> {
        self.simulate_latency().await;

        let mut vaults: Vec<Vault> = self
            .state
            .vaults
            .iter()
            .map(|(_, vault)| vault)
            .filter(|vault| vault_matches(vault, query))
            .cloned()
            .collect();

        if let Some(field) = query.sort_by {
            vaults.sort_by(|a, b| compare_vaults(a, b, field));
            if query.sort_order.unwrap_or_default() == SortOrder::Desc {
                vaults.reverse();
            }
        }

        tracing::trace!(target: TRACING_TARGET, matched = vaults.len(), "Filtered mock vaults");
        Ok(Page::paginate(
            vaults,
            query.page.unwrap_or(VaultFilters::DEFAULT_PAGE),
            query.limit.unwrap_or(VaultFilters::DEFAULT_LIMIT),
        ))
    }

    async fn vault_by_id(&self, id: &str) -> Result<Option<Vault>> {
        self.simulate_latency().await;
        Ok(self.find_vault(id).cloned())
    }

    async fn vault_by_address(&self, address: &str) -> Result<Option<Vault>> {
        self.simulate_latency().await;
        Ok(self
            .state
            .vaults
            .iter()
            .find(|(vault_address, _)| vault_address.eq_ignore_ascii_case(address))
            .map(|(_, vault)| vault.clone()))
    }

    async fn vault_performance(&self, id: &str) -> Result<VaultPerformance> {
        self.simulate_latency().await;
        self.find_vault(id)
            .map(data::vault_performance)
            .ok_or_else(|| Error::not_found().with_message("Vault not found"))
    }

    async fn deposit(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt> {
        self.simulate_latency().await;
        require_user(user)?;
        self.find_vault(vault_id)
            .ok_or_else(|| Error::not_found().with_message("Vault not found"))?;
        receipt("deposited", amount).map(|mut receipt| {
            receipt.message.push_str(" into vault");
            receipt
        })
    }

    async fn withdraw(&self, vault_id: &str, amount: &str, user: &str) -> Result<VaultReceipt> {
        self.simulate_latency().await;
        require_user(user)?;
        self.find_vault(vault_id)
            .ok_or_else(|| Error::not_found().with_message("Vault not found"))?;
        receipt("withdrew", amount).map(|mut receipt| {
            receipt.message.push_str(" from vault");
            receipt
        })
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy().with_backend("mock"))
    }
}

#[async_trait::async_trait]
impl PortfolioProvider for MockProvider {
    async fn overview(&self, address: &str) -> Result<PortfolioOverview> {
        self.simulate_latency().await;
        require_user(address)?;
        let rules = self.state.rules.read().await;
        let active_rules = rules.iter().filter(|rule| rule.is_active()).count() as u32;
        Ok(data::overview(active_rules))
    }

    async fn positions(&self, address: &str) -> Result<Vec<PortfolioPosition>> {
        self.simulate_latency().await;
        require_user(address)?;
        Ok(self.state.positions.clone())
    }

    async fn transactions(&self, query: &TransactionQuery) -> Result<Page<Transaction>> {
        self.simulate_latency().await;
        require_user(&query.address)?;

        let transactions: Vec<Transaction> = self
            .state
            .transactions
            .iter()
            .filter(|tx| query.kind.is_none_or(|kind| kind.matches(tx.kind)))
            .filter(|tx| query.status.is_none_or(|status| status == tx.status))
            .cloned()
            .collect();

        Ok(Page::paginate(
            transactions,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(10),
        ))
    }

    async fn export(&self, query: &ExportQuery) -> Result<PortfolioExport> {
        self.simulate_latency().await;
        require_user(&query.address)?;

        let format = query.format.unwrap_or_default();
        let transactions = &self.state.transactions;
        let data = match format {
            ExportFormat::Csv => {
                let mut csv = String::from("id,type,vault,asset,amount,status,timestamp,txHash\n");
                for tx in transactions {
                    csv.push_str(&format!(
                        "{},{},{},{},{},{},{},{}\n",
                        tx.id,
                        tx.kind.as_ref(),
                        tx.vault_name,
                        tx.asset,
                        tx.amount,
                        tx.status.as_ref(),
                        tx.timestamp,
                        tx.tx_hash
                    ));
                }
                Value::String(csv)
            }
            ExportFormat::Json | ExportFormat::Pdf => json!({
                "address": query.address,
                "positions": self.state.positions,
                "transactions": transactions,
            }),
        };

        let period = query
            .year
            .map_or_else(|| "all".to_owned(), |year| year.to_string());

        Ok(PortfolioExport {
            format,
            data,
            filename: format!("portfolio-{}-{period}.{}", query.address, format.as_ref()),
            generated_at: Timestamp::now().to_string(),
        })
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy().with_backend("mock"))
    }
}

#[async_trait::async_trait]
impl RuleProvider for MockProvider {
    async fn create_rule(&self, rule: &NewRule) -> Result<AutomationRule> {
        self.simulate_latency().await;
        require_user(&rule.user_address)?;

        let vault = self
            .find_vault(&rule.vault_id)
            .ok_or_else(|| Error::not_found().with_message("Vault not found"))?;

        let created = AutomationRule {
            id: format!("rule_{}", Timestamp::now().as_millisecond()),
            name: rule.name.clone(),
            status: RuleStatus::Active,
            trigger: rule.trigger.label().to_owned(),
            last_execution: None,
            next_execution: None,
            total_distributed: "0".to_owned(),
            description: rule.description.clone().unwrap_or_else(|| {
                format!("{} automation rule for {}", rule.trigger.as_param(), vault.name)
            }),
            conditions: RuleConditions {
                min_profit: rule.profit_threshold.clone().unwrap_or_else(|| "0".to_owned()),
                frequency: rule.trigger.as_param().to_owned(),
                vault_ids: vec![rule.vault_id.clone()],
            },
            distributions: rule.distributions.clone(),
        };

        self.state.rules.write().await.push(created.clone());
        tracing::debug!(target: TRACING_TARGET, rule_id = %created.id, "Created mock rule");
        Ok(created)
    }

    async fn user_rules(&self, address: &str, filter: &RuleFilter) -> Result<Page<AutomationRule>> {
        self.simulate_latency().await;
        require_user(address)?;

        let needle = filter.search.as_deref().map(str::to_lowercase);
        let rules: Vec<AutomationRule> = self
            .state
            .rules
            .read()
            .await
            .iter()
            .filter(|rule| filter.active.is_none_or(|active| rule.is_active() == active))
            .filter(|rule| {
                filter
                    .trigger
                    .is_none_or(|trigger| rule.trigger == trigger.label())
            })
            .filter(|rule| {
                filter
                    .vault_id
                    .as_ref()
                    .is_none_or(|vault_id| rule.conditions.vault_ids.contains(vault_id))
            })
            .filter(|rule| {
                needle.as_ref().is_none_or(|needle| {
                    rule.name.to_lowercase().contains(needle) || rule.id == *needle
                })
            })
            .cloned()
            .collect();

        Ok(Page::paginate(
            rules,
            filter.page.unwrap_or(1),
            filter.limit.unwrap_or(20),
        ))
    }

    async fn rule_by_id(&self, id: &str, user: &str) -> Result<Option<AutomationRule>> {
        self.simulate_latency().await;
        require_user(user)?;
        let rules = self.state.rules.read().await;
        Ok(rules.iter().find(|rule| rule.id == id).cloned())
    }

    async fn update_rule(
        &self,
        id: &str,
        user: &str,
        update: &RuleUpdate,
    ) -> Result<AutomationRule> {
        self.simulate_latency().await;
        require_user(user)?;
        let mut rules = self.state.rules.write().await;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(rule_not_found)?;
        apply_update(rule, update);
        Ok(rule.clone())
    }

    async fn delete_rule(&self, id: &str, user: &str) -> Result<()> {
        self.simulate_latency().await;
        require_user(user)?;
        let mut rules = self.state.rules.write().await;
        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        if rules.len() == before {
            return Err(rule_not_found());
        }
        Ok(())
    }

    async fn toggle_rule(&self, id: &str, user: &str) -> Result<AutomationRule> {
        self.simulate_latency().await;
        require_user(user)?;
        let mut rules = self.state.rules.write().await;
        let rule = rules
            .iter_mut()
            .find(|rule| rule.id == id)
            .ok_or_else(rule_not_found)?;
        rule.status = match rule.status {
            RuleStatus::Active => RuleStatus::Paused,
            RuleStatus::Paused => RuleStatus::Active,
        };
        Ok(rule.clone())
    }

    async fn execute_rule(&self, id: &str, user: &str) -> Result<RuleExecution> {
        self.simulate_latency().await;
        require_user(user)?;
        let rules = self.state.rules.read().await;
        let rule = rules
            .iter()
            .find(|rule| rule.id == id)
            .ok_or_else(rule_not_found)?;

        if !rule.is_active() {
            return Err(Error::invalid_input().with_message("Cannot execute paused rule"));
        }

        let profit = 125.50_f64;
        let distributions = rule
            .distributions
            .iter()
            .map(|distribution| ExecutedDistribution {
                recipient: distribution.address.clone(),
                amount: format!("{:.2}", profit * distribution.percentage / 100.0),
                transaction_hash: pseudo_hash(),
            })
            .collect();

        Ok(RuleExecution {
            success: true,
            execution_id: Uuid::now_v7().to_string(),
            profit_amount: format!("{profit:.2}"),
            distributions,
            gas_used: "85000".to_owned(),
            execution_time: self.config.latency_ms,
            message: "Rule executed successfully".to_owned(),
        })
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy().with_backend("mock"))
    }
}

#[async_trait::async_trait]
impl AnalyticsProvider for MockProvider {
    async fn platform_metrics(&self) -> Result<PlatformMetrics> {
        self.simulate_latency().await;
        Ok(data::platform_metrics())
    }

    async fn tvl_metrics(&self, timeframe: Option<Timeframe>) -> Result<TvlMetrics> {
        self.simulate_latency().await;
        Ok(data::tvl_metrics(timeframe.unwrap_or_default()))
    }

    async fn user_analytics(&self, address: &str) -> Result<UserAnalytics> {
        self.simulate_latency().await;
        require_user(address)?;
        let rules = self.state.rules.read().await;
        Ok(data::user_analytics(address, &rules))
    }

    async fn protocol_distribution(&self) -> Result<Vec<ProtocolDistribution>> {
        self.simulate_latency().await;
        Ok(data::protocol_distribution())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy().with_backend("mock"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::TransactionFilter;
    use crate::types::{Distribution, RiskLevel, Trigger, TransactionStatus, VaultCategory};

    const USER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    #[tokio::test]
    async fn test_list_all_vaults() {
        let provider = MockProvider::instant();
        let page = provider.list_vaults(&VaultQuery::new()).await.unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.items.len(), 6);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let provider = MockProvider::instant();
        let query = VaultQuery::new().with_search("usd");
        let page = provider.list_vaults(&query).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5"]);
    }

    #[tokio::test]
    async fn test_risk_category_and_min_apy_filters() {
        let provider = MockProvider::instant();

        let low = VaultQuery::new().with_risk_level(RiskLevel::Low);
        assert_eq!(provider.list_vaults(&low).await.unwrap().total, 3);

        let growth = VaultQuery::new().with_category(VaultCategory::Growth);
        assert_eq!(provider.list_vaults(&growth).await.unwrap().total, 2);

        let query = VaultQuery {
            min_apy: Some(5.0),
            ..VaultQuery::default()
        };
        let page = provider.list_vaults(&query).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "6"]);
    }

    #[tokio::test]
    async fn test_sort_by_tvl_descending() {
        let provider = MockProvider::instant();
        let query = VaultQuery::new()
            .with_sort(SortField::Tvl, SortOrder::Desc)
            .with_limit(2);
        let page = provider.list_vaults(&query).await.unwrap();
        assert_eq!(page.items[0].name, "ETH Staking Vault");
        assert_eq!(page.items[1].name, "Stable Coin Basket");
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn test_vault_lookups() {
        let provider = MockProvider::instant();
        assert!(provider.vault_by_id("4").await.unwrap().is_some());
        assert!(provider.vault_by_id("99").await.unwrap().is_none());

        let address = format!("0x{:0>40}", "2");
        let vault = provider.vault_by_address(&address).await.unwrap().unwrap();
        assert_eq!(vault.protocol, "Lido");

        let error = provider.vault_performance("99").await.unwrap_err();
        assert_eq!(error.kind(), valux_core::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_deposit_returns_hash() {
        let provider = MockProvider::instant();
        let receipt = provider.deposit("1", "250", USER).await.unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.transaction_hash.len(), 66);
        assert_eq!(receipt.message, "Successfully deposited 250 into vault");

        assert!(provider.deposit("1", "0", USER).await.is_err());
    }

    #[tokio::test]
    async fn test_transaction_filters() {
        let provider = MockProvider::instant();

        let pending = TransactionQuery::new(USER).with_status(TransactionStatus::Pending);
        let page = provider.transactions(&pending).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "4");

        let yields = TransactionQuery::new(USER).with_kind(TransactionFilter::Distribution);
        assert_eq!(provider.transactions(&yields).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_missing_address_is_rejected() {
        let provider = MockProvider::instant();
        let error = provider.positions("").await.unwrap_err();
        assert_eq!(error.kind(), valux_core::ErrorKind::InvalidInput);
        assert_eq!(error.message(), "User address is required");
    }

    #[tokio::test]
    async fn test_execute_paused_rule_fails() {
        let provider = MockProvider::instant();
        let error = provider.execute_rule("3", USER).await.unwrap_err();
        assert_eq!(error.message(), "Cannot execute paused rule");

        let execution = provider.execute_rule("1", USER).await.unwrap();
        assert!(execution.success);
        assert_eq!(execution.distributions.len(), 3);
    }

    #[tokio::test]
    async fn test_rule_mutations() {
        let provider = MockProvider::instant();

        let toggled = provider.toggle_rule("3", USER).await.unwrap();
        assert_eq!(toggled.status, RuleStatus::Active);

        let update = RuleUpdate {
            name: Some("Renamed".into()),
            trigger: Some(Trigger::Quarterly),
            ..Default::default()
        };
        let updated = provider.update_rule("3", USER, &update).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.trigger, "Quarterly");
        assert_eq!(updated.conditions.frequency, "quarterly");

        provider.delete_rule("3", USER).await.unwrap();
        assert!(provider.rule_by_id("3", USER).await.unwrap().is_none());
        assert!(provider.delete_rule("3", USER).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rule_defaults() {
        let provider = MockProvider::instant();
        let rule = NewRule {
            name: "Quarterly payout".into(),
            description: None,
            user_address: USER.into(),
            vault_id: "5".into(),
            trigger: Trigger::Quarterly,
            profit_threshold: None,
            distributions: vec![Distribution {
                address: "0x1".into(),
                percentage: 100.0,
                label: "Wallet".into(),
            }],
        };

        let created = provider.create_rule(&rule).await.unwrap();
        assert_eq!(created.status, RuleStatus::Active);
        assert_eq!(created.trigger, "Quarterly");
        assert_eq!(
            created.description,
            "quarterly automation rule for Stable Coin Basket"
        );
        assert_eq!(created.conditions.min_profit, "0");

        let page = provider.user_rules(USER, &RuleFilter::new()).await.unwrap();
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_protocol_distribution_is_coloured() {
        let provider = MockProvider::instant();
        let slices = provider.protocol_distribution().await.unwrap();
        assert_eq!(slices.len(), 5);
        assert_eq!(slices[0].name, "Aave");
        assert_eq!(slices[0].color, "#3B82F6");
        assert_eq!(slices[4].color, "#8B5CF6");
    }

    #[tokio::test]
    async fn test_csv_export() {
        let provider = MockProvider::instant();
        let query = ExportQuery::new(USER, ExportFormat::Csv).with_year(2024);
        let export = provider.export(&query).await.unwrap();
        assert_eq!(export.filename, format!("portfolio-{USER}-2024.csv"));
        let csv = export.data.as_str().unwrap();
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_tvl_value_suffixes() {
        assert_eq!(tvl_value("$2.4M"), 2_400_000.0);
        assert_eq!(tvl_value("$890K"), 890_000.0);
        assert_eq!(tvl_value("1200"), 1200.0);
    }
}
