//! Pure conversions between server payloads and display values.
//!
//! Nothing here performs I/O. Malformed payloads are reported as invalid
//! input, never as one of the gateway error kinds.

use serde::de::DeserializeOwned;
use serde_json::Value;
use valux_core::{Error, Result};
use valux_service::analytics::protocol_color;
use valux_service::rule::{NewRule, RuleUpdate};
use valux_service::types::{
    AutomationRule, Distribution, Page, PerformanceWindow, PlatformMetrics, PortfolioOverview,
    PortfolioPosition, ProtocolDistribution, ProtocolShare, RiskLevel, RuleConditions, RuleStatus,
    Transaction, TransactionKind, Trigger, Vault, format_percent, format_signed,
};

use super::dto::{
    CreateRuleDto, DistributionDto, PlatformAnalyticsDto, PortfolioOverviewDto, PositionDto,
    RuleDto, RuleListDto, TransactionDto, TransactionListDto, UpdateRuleDto, VaultDto,
    VaultListDto,
};

/// Placeholder for values the server does not provide.
const NOT_AVAILABLE: &str = "N/A";

/// Decodes a payload, reporting shape mismatches as invalid input.
pub(crate) fn decode<T: DeserializeOwned>(what: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|error| {
        let message = format!("Malformed {what}: {error}");
        Error::from_source(valux_core::ErrorKind::InvalidInput, error).with_message(message)
    })
}

pub(crate) fn vault(dto: VaultDto) -> Result<Vault> {
    let risk = dto.risk_level.parse::<RiskLevel>().map_err(|_| {
        Error::invalid_input().with_message(format!("Unknown risk level: {}", dto.risk_level))
    })?;
    let features = vault_features(&dto);

    Ok(Vault {
        apy: format_percent(dto.apy),
        description: format!(
            "{} {} vault with {:.2}% APY",
            dto.protocol, dto.token_symbol, dto.apy
        ),
        risk,
        features,
        is_insured: Some(dto.insurance_available),
        min_deposit: None,
        max_deposit: None,
        category: dto.category.and_then(|category| category.parse().ok()),
        id: dto.id,
        name: dto.name,
        protocol: dto.protocol,
        asset: dto.token_symbol,
        tvl: dto.tvl,
    })
}

fn vault_features(dto: &VaultDto) -> Vec<String> {
    let mut features = Vec::new();
    if dto.insurance_available {
        features.push("Insurance Available".to_owned());
    }
    if dto.auto_compounding {
        features.push("Auto-Compounding".to_owned());
    }
    if dto.withdrawal_terms.as_deref() == Some("instant") {
        features.push("Instant Withdrawal".to_owned());
    }
    features.push(format!("{} Protocol", dto.protocol));
    features.push(format!("{} Asset", dto.token_symbol));
    features
}

pub(crate) fn vault_page(value: Value) -> Result<Page<Vault>> {
    let list: VaultListDto = decode("vault listing", value)?;
    let items = list.vaults.into_iter().map(vault).collect::<Result<_>>()?;
    Ok(Page::new(items, list.total, list.page, list.limit, list.total_pages))
}

pub(crate) fn overview(dto: PortfolioOverviewDto) -> PortfolioOverview {
    PortfolioOverview {
        total_value: dto.total_value,
        total_deposited: dto.total_deposited,
        total_pnl: dto.total_unrealized_pnl,
        total_distributed: dto.total_distributed,
        avg_apy: format_percent(dto.avg_apy),
        performance: PerformanceWindow {
            day: dto.performance.day,
            week: dto.performance.week,
            month: dto.performance.month,
            year: dto.performance.year,
        },
        active_positions: dto.active_positions,
        active_rules: dto.active_rules,
        last_updated: dto.last_updated,
    }
}

pub(crate) fn position(dto: PositionDto) -> PortfolioPosition {
    let pnl = number(&dto.unrealized_pnl) + number(&dto.realized_pnl);
    let deposited = number(&dto.deposit_amount);
    let percentage = if deposited > 0.0 {
        pnl / deposited * 100.0
    } else {
        0.0
    };

    PortfolioPosition {
        id: dto.id,
        vault_id: dto.vault_id,
        vault_name: dto.vault.name,
        asset: dto.vault.token_symbol,
        deposited: dto.deposit_amount,
        current_value: dto.current_value,
        apy: NOT_AVAILABLE.to_owned(),
        gain_loss: format_signed(pnl),
        gain_loss_percentage: format!("{}%", format_signed(percentage)),
        last_updated: dto.last_updated,
    }
}

/// Maps a server transaction type onto its display kind.
pub(crate) fn transaction_kind(raw: &str) -> TransactionKind {
    match raw {
        "withdraw" => TransactionKind::Withdraw,
        "distribution" => TransactionKind::Yield,
        "automation" => TransactionKind::Fee,
        _ => TransactionKind::Deposit,
    }
}

pub(crate) fn transaction(dto: TransactionDto) -> Transaction {
    Transaction {
        kind: transaction_kind(&dto.kind),
        vault_name: dto
            .vault
            .map(|vault| vault.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        value: dto.amount.clone(),
        id: dto.id,
        asset: dto.token_symbol,
        amount: dto.amount,
        status: dto.status,
        timestamp: dto.timestamp,
        tx_hash: dto.transaction_hash,
        gas_used: dto.gas_used,
        gas_fee: dto.gas_price_gwei,
    }
}

pub(crate) fn transaction_page(value: Value) -> Result<Page<Transaction>> {
    let list: TransactionListDto = decode("transaction listing", value)?;
    let items = list.transactions.into_iter().map(transaction).collect();
    Ok(Page::new(items, list.total, list.page, list.limit, list.total_pages))
}

/// Shortens a wallet address to `0x1234...abcd`; short values are unchanged.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub(crate) fn rule(dto: RuleDto) -> AutomationRule {
    let description = non_empty(dto.description)
        .unwrap_or_else(|| format!("{} automation rule for {}", dto.trigger, dto.vault.name));
    let distributions = dto
        .distributions
        .into_iter()
        .map(|distribution| Distribution {
            label: non_empty(distribution.description)
                .unwrap_or_else(|| truncate_address(&distribution.recipient)),
            address: distribution.recipient,
            percentage: distribution.percentage,
        })
        .collect();

    AutomationRule {
        id: dto.id,
        name: dto.name,
        status: if dto.active {
            RuleStatus::Active
        } else {
            RuleStatus::Paused
        },
        trigger: Trigger::format(&dto.trigger),
        last_execution: non_empty(dto.last_executed),
        next_execution: non_empty(dto.next_execution),
        total_distributed: dto.total_distributed,
        description,
        conditions: RuleConditions {
            min_profit: non_empty(dto.profit_threshold).unwrap_or_else(|| "0".to_owned()),
            frequency: dto.trigger,
            vault_ids: vec![dto.vault.id],
        },
        distributions,
    }
}

pub(crate) fn rule_page(value: Value) -> Result<Page<AutomationRule>> {
    let list: RuleListDto = decode("rule listing", value)?;
    let items = list.rules.into_iter().map(rule).collect();
    Ok(Page::new(items, list.total, list.page, list.limit, list.total_pages))
}

fn distribution_body(distribution: &Distribution) -> DistributionDto {
    DistributionDto {
        recipient: distribution.address.clone(),
        percentage: distribution.percentage,
        description: Some(distribution.label.clone()).filter(|label| !label.is_empty()),
    }
}

pub(crate) fn create_rule_body(rule: &NewRule) -> CreateRuleDto {
    CreateRuleDto {
        name: rule.name.clone(),
        description: rule.description.clone(),
        user_address: rule.user_address.clone(),
        vault_id: rule.vault_id.clone(),
        trigger: rule.trigger.as_param(),
        profit_threshold: rule.profit_threshold.clone(),
        distributions: rule.distributions.iter().map(distribution_body).collect(),
    }
}

pub(crate) fn update_rule_body(update: &RuleUpdate) -> UpdateRuleDto {
    UpdateRuleDto {
        name: update.name.clone(),
        description: update.description.clone(),
        trigger: update.trigger.map(|trigger| trigger.as_param()),
        profit_threshold: update.profit_threshold.clone(),
        distributions: update
            .distributions
            .as_ref()
            .map(|distributions| distributions.iter().map(distribution_body).collect()),
        active: update.active,
    }
}

pub(crate) fn platform_metrics(dto: &PlatformAnalyticsDto) -> PlatformMetrics {
    PlatformMetrics {
        total_value_locked: dto.total_tvl.clone(),
        total_users: dto.total_users.to_string(),
        total_vaults: dto.total_vaults.to_string(),
        total_transactions: dto.total_transactions.to_string(),
        average_apy: format_percent(dto.avg_apy),
        monthly_growth: NOT_AVAILABLE.to_owned(),
        total_yield_generated: NOT_AVAILABLE.to_owned(),
        active_automations: NOT_AVAILABLE.to_owned(),
    }
}

pub(crate) fn protocol_distribution(protocols: &[ProtocolShare]) -> Vec<ProtocolDistribution> {
    protocols
        .iter()
        .enumerate()
        .map(|(index, share)| ProtocolDistribution {
            name: share.protocol.clone(),
            value: share.percentage,
            color: protocol_color(index).to_owned(),
        })
        .collect()
}

fn number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use valux_core::ErrorKind;
    use valux_service::types::{TransactionStatus, VaultCategory};

    use super::*;

    fn vault_json() -> Value {
        json!({
            "id": "v1",
            "name": "USDC Lending",
            "address": "0x1111111111111111111111111111111111111111",
            "protocol": "Aave",
            "tokenAddress": "0x2222",
            "tokenSymbol": "USDC",
            "apy": 4.2,
            "riskLevel": "low",
            "category": "stable",
            "tvl": "$2.4M",
            "active": true,
            "insuranceAvailable": true,
            "autoCompounding": false,
            "withdrawalTerms": "instant",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        })
    }

    fn rule_json() -> Value {
        json!({
            "id": "r1",
            "name": "Weekly split",
            "userAddress": "0xabc",
            "vault": {"id": "v1", "name": "USDC Lending", "protocol": "Aave", "tokenSymbol": "USDC"},
            "trigger": "weekly",
            "active": false,
            "distributions": [
                {"id": "d1", "recipient": "0x1234567890abcdef1234", "percentage": 60.0},
                {"id": "d2", "recipient": "0xshort", "percentage": 40.0, "description": "Savings"}
            ],
            "executionsCount": 0,
            "totalDistributed": "0"
        })
    }

    #[test]
    fn test_vault_transform() {
        let dto: VaultDto = decode("vault", vault_json()).unwrap();
        let vault = vault(dto).unwrap();

        assert_eq!(vault.apy, "4.20%");
        assert_eq!(vault.asset, "USDC");
        assert_eq!(vault.risk, RiskLevel::Low);
        assert_eq!(vault.category, Some(VaultCategory::Stable));
        assert_eq!(vault.description, "Aave USDC vault with 4.20% APY");
        assert_eq!(
            vault.features,
            vec![
                "Insurance Available",
                "Instant Withdrawal",
                "Aave Protocol",
                "USDC Asset"
            ]
        );
        assert_eq!(vault.is_insured, Some(true));
        assert!(vault.min_deposit.is_none());
    }

    #[test]
    fn test_vault_unknown_risk_is_invalid_input() {
        let mut value = vault_json();
        value["riskLevel"] = json!("extreme");
        let dto: VaultDto = decode("vault", value).unwrap();

        let error = vault(dto).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_required_field_is_invalid_input() {
        let mut value = vault_json();
        value.as_object_mut().unwrap().remove("tokenSymbol");

        let error = decode::<VaultDto>("vault", value).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(error.message().starts_with("Malformed vault"));
    }

    #[test]
    fn test_vault_page_requires_vaults_key() {
        let error = vault_page(json!({"items": [], "total": 0})).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let page = vault_page(json!({
            "vaults": [vault_json()],
            "total": 41,
            "page": 2,
            "limit": 20,
            "totalPages": 3
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_position_pnl() {
        let dto: PositionDto = decode(
            "position",
            json!({
                "id": "p1",
                "vaultId": "v1",
                "vault": {"id": "v1", "name": "USDC Lending", "protocol": "Aave", "tokenSymbol": "USDC"},
                "depositAmount": "5000",
                "currentValue": "5210.45",
                "unrealizedPnl": "200.45",
                "realizedPnl": "10",
                "lastUpdated": "2024-01-01"
            }),
        )
        .unwrap();
        let position = position(dto);

        assert_eq!(position.gain_loss, "+210.45");
        assert_eq!(position.gain_loss_percentage, "+4.21%");
        assert_eq!(position.apy, "N/A");
        assert_eq!(position.asset, "USDC");
    }

    #[test]
    fn test_position_loss_and_zero_deposit() {
        let dto: PositionDto = decode(
            "position",
            json!({
                "id": "p2",
                "vaultId": "v2",
                "vault": {"id": "v2", "name": "ETH"},
                "depositAmount": "0",
                "currentValue": "0",
                "unrealizedPnl": "-12.3",
                "realizedPnl": "0"
            }),
        )
        .unwrap();
        let position = position(dto);

        assert_eq!(position.gain_loss, "-12.30");
        assert_eq!(position.gain_loss_percentage, "+0.00%");
    }

    #[test]
    fn test_transaction_mapping() {
        assert_eq!(transaction_kind("distribution"), TransactionKind::Yield);
        assert_eq!(transaction_kind("automation"), TransactionKind::Fee);
        assert_eq!(transaction_kind("bridge"), TransactionKind::Deposit);

        let dto: TransactionDto = decode(
            "transaction",
            json!({
                "id": "t1",
                "userId": "u1",
                "type": "withdraw",
                "amount": "100",
                "tokenSymbol": "USDC",
                "transactionHash": "0xhash",
                "blockNumber": 1,
                "gasUsed": "21000",
                "gasPriceGwei": "30",
                "status": "confirmed",
                "timestamp": "2024-01-01"
            }),
        )
        .unwrap();
        let transaction = transaction(dto);

        assert_eq!(transaction.kind, TransactionKind::Withdraw);
        assert_eq!(transaction.vault_name, "N/A");
        assert_eq!(transaction.value, "100");
        assert_eq!(transaction.gas_fee, "30");
        assert_eq!(transaction.status, TransactionStatus::Confirmed);
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address("0x12345678"), "0x12345678");
        assert_eq!(
            truncate_address("0x1234567890abcdef1234"),
            "0x1234...1234"
        );
    }

    #[test]
    fn test_rule_transform_defaults() {
        let dto: RuleDto = decode("rule", rule_json()).unwrap();
        let rule = rule(dto);

        assert_eq!(rule.status, RuleStatus::Paused);
        assert_eq!(rule.trigger, "Weekly");
        assert_eq!(rule.description, "weekly automation rule for USDC Lending");
        assert_eq!(rule.conditions.min_profit, "0");
        assert_eq!(rule.conditions.frequency, "weekly");
        assert_eq!(rule.conditions.vault_ids, vec!["v1"]);
        assert!(rule.last_execution.is_none());
        assert_eq!(rule.distributions[0].label, "0x1234...1234");
        assert_eq!(rule.distributions[1].label, "Savings");
    }

    #[test]
    fn test_create_rule_body_uses_wire_names() {
        let rule = NewRule {
            name: "Split".into(),
            description: None,
            user_address: "0xabc".into(),
            vault_id: "v1".into(),
            trigger: Trigger::ProfitThreshold,
            profit_threshold: Some("500".into()),
            distributions: vec![Distribution {
                address: "0xdef".into(),
                percentage: 100.0,
                label: "Treasury".into(),
            }],
        };

        let body = serde_json::to_value(create_rule_body(&rule)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Split",
                "userAddress": "0xabc",
                "vaultId": "v1",
                "trigger": "profit_threshold",
                "profitThreshold": "500",
                "distributions": [
                    {"recipient": "0xdef", "percentage": 100.0, "description": "Treasury"}
                ]
            })
        );
    }

    #[test]
    fn test_update_rule_body_omits_unset() {
        let update = RuleUpdate {
            active: Some(false),
            trigger: Some(Trigger::Monthly),
            ..Default::default()
        };
        let body = serde_json::to_value(update_rule_body(&update)).unwrap();
        assert_eq!(body, json!({"trigger": "monthly", "active": false}));
    }

    #[test]
    fn test_platform_metrics_and_distribution() {
        let dto: PlatformAnalyticsDto = decode(
            "platform analytics",
            json!({
                "totalUsers": 1200,
                "totalVaults": 6,
                "totalTvl": "$12.5M",
                "totalVolume": "$40M",
                "totalTransactions": 5400,
                "avgAPY": 7.456,
                "topProtocols": [
                    {"protocol": "Aave", "tvl": "$5M", "percentage": 40.0},
                    {"protocol": "Compound", "tvl": "$3M", "percentage": 24.0}
                ],
                "recentActivity": [],
                "timestamp": "t"
            }),
        )
        .unwrap();

        let metrics = platform_metrics(&dto);
        assert_eq!(metrics.total_users, "1200");
        assert_eq!(metrics.average_apy, "7.46%");
        assert_eq!(metrics.monthly_growth, "N/A");

        let slices = protocol_distribution(&dto.top_protocols);
        assert_eq!(slices[0].name, "Aave");
        assert_eq!(slices[0].color, "#3B82F6");
        assert_eq!(slices[1].color, "#EF4444");
        assert_eq!(slices[1].value, 24.0);
    }

    #[test]
    fn test_overview_transform() {
        let dto: PortfolioOverviewDto = decode(
            "portfolio overview",
            json!({
                "totalValue": "10500",
                "totalDeposited": "10000",
                "totalUnrealizedPnl": "500",
                "totalRealizedPnl": "20",
                "totalDistributed": "120",
                "avgAPY": 6.5,
                "performance": {"24h": 0.1, "7d": 0.8, "30d": 2.5, "1y": 12.0},
                "activePositions": 3,
                "activeRules": 2,
                "lastUpdated": "t"
            }),
        )
        .unwrap();
        let overview = overview(dto);

        assert_eq!(overview.total_pnl, "500");
        assert_eq!(overview.avg_apy, "6.50%");
        assert_eq!(overview.performance.month, 2.5);
    }
}
