//! Fixed data set served by the mock backend.

use jiff::{SignedDuration, Timestamp};

use crate::types::{
    ActivityEntry, ApyPoint, AutomationRule, Distribution, PerformanceWindow, PlatformMetrics,
    PortfolioOverview, PortfolioPosition, ProtocolDistribution, ProtocolShare, RiskLevel,
    RuleConditions, RuleStatus, Timeframe, Transaction, TransactionKind, TransactionStatus,
    TvlChange, TvlMetrics, TvlPoint, UserAnalytics, UserPortfolio, UserRankings, UserRules,
    UserSummary, Vault, VaultCategory, VaultPerformance,
};

/// Timestamp `hours` away from now, in RFC 3339.
fn relative(hours: i64) -> String {
    (Timestamp::now() + SignedDuration::from_hours(hours)).to_string()
}

fn now() -> String {
    Timestamp::now().to_string()
}

#[allow(clippy::too_many_arguments)]
fn vault(
    id: &str,
    name: &str,
    protocol: &str,
    asset: &str,
    apy: &str,
    tvl: &str,
    risk: RiskLevel,
    category: VaultCategory,
    description: &str,
    features: [&str; 3],
    insured: bool,
    min_deposit: &str,
) -> Vault {
    Vault {
        id: id.into(),
        name: name.into(),
        protocol: protocol.into(),
        asset: asset.into(),
        apy: apy.into(),
        tvl: tvl.into(),
        risk,
        description: description.into(),
        features: features.iter().map(|f| (*f).to_owned()).collect(),
        is_insured: insured.then_some(true),
        min_deposit: Some(min_deposit.into()),
        max_deposit: None,
        category: Some(category),
    }
}

/// Six vaults keyed by a fake contract address.
pub(super) fn vaults() -> Vec<(String, Vault)> {
    use RiskLevel::{High, Low, Medium};
    use VaultCategory::{Growth, Stable, Yield};

    let vaults = [
        vault(
            "1", "USDC Savings Vault", "Aave", "USDC", "4.2%", "$2.4M", Low, Stable,
            "Stable yield with USDC lending on Aave protocol",
            ["Auto-compounding", "Insurance covered", "Instant withdrawals"],
            true, "100",
        ),
        vault(
            "2", "ETH Staking Vault", "Lido", "ETH", "3.8%", "$5.2M", Medium, Yield,
            "Ethereum 2.0 staking with liquid staking tokens",
            ["Liquid staking", "Weekly rewards", "No lock-up period"],
            false, "0.1",
        ),
        vault(
            "3", "BTC Yield Vault", "Compound", "WBTC", "2.1%", "$1.8M", Low, Stable,
            "Conservative Bitcoin yield through Compound lending",
            ["Stable returns", "Audited protocol", "Real-time tracking"],
            false, "0.01",
        ),
        vault(
            "4", "High Yield DeFi", "Curve", "CRV-LP", "12.5%", "$890K", High, Growth,
            "High-yield farming with Curve LP tokens",
            ["High APY", "Auto-harvest", "Impermanent loss protection"],
            false, "500",
        ),
        vault(
            "5", "Stable Coin Basket", "Yearn", "USDT", "3.9%", "$3.1M", Low, Stable,
            "Diversified stable coin strategy with multiple protocols",
            ["Multi-protocol", "Rebalancing", "Gas optimization"],
            true, "50",
        ),
        vault(
            "6", "DeFi Blue Chip", "Balancer", "BAL-LP", "8.3%", "$1.2M", Medium, Growth,
            "Blue chip DeFi tokens liquidity providing",
            ["Balanced exposure", "Fee earning", "Governance tokens"],
            false, "1000",
        ),
    ];

    vaults
        .into_iter()
        .map(|vault| (format!("0x{:0>40}", vault.id), vault))
        .collect()
}

pub(super) fn vault_performance(vault: &Vault) -> VaultPerformance {
    let current = vault.apy_value();
    VaultPerformance {
        vault_id: vault.id.clone(),
        current_apy: current,
        historical_apy: vec![
            ApyPoint { date: "2024-01-01".into(), apy: current - 0.1 },
            ApyPoint { date: "2024-01-15".into(), apy: current + 0.1 },
            ApyPoint { date: "2024-01-30".into(), apy: current },
        ],
        tvl_history: vec![
            TvlPoint { date: "2024-01-01".into(), tvl: vault.tvl.clone() },
            TvlPoint { date: "2024-01-30".into(), tvl: vault.tvl.clone() },
        ],
        last_updated: now(),
    }
}

fn position(
    id: &str,
    vault_id: &str,
    vault_name: &str,
    asset: &str,
    amounts: [&str; 5],
) -> PortfolioPosition {
    let [deposited, current_value, apy, gain_loss, gain_loss_percentage] = amounts;
    PortfolioPosition {
        id: id.into(),
        vault_id: vault_id.into(),
        vault_name: vault_name.into(),
        asset: asset.into(),
        deposited: deposited.into(),
        current_value: current_value.into(),
        apy: apy.into(),
        gain_loss: gain_loss.into(),
        gain_loss_percentage: gain_loss_percentage.into(),
        last_updated: now(),
    }
}

pub(super) fn positions() -> Vec<PortfolioPosition> {
    vec![
        position("1", "1", "USDC Savings Vault", "USDC", ["5000", "5210.45", "4.2%", "+210.45", "+4.21%"]),
        position("2", "2", "ETH Staking Vault", "ETH", ["2.5", "2.5847", "3.8%", "+0.0847", "+3.39%"]),
        position("3", "4", "High Yield DeFi", "CRV-LP", ["1000", "1125.30", "12.5%", "+125.30", "+12.53%"]),
    ]
}

pub(super) fn overview(active_rules: u32) -> PortfolioOverview {
    PortfolioOverview {
        total_value: "12335.75".into(),
        total_deposited: "12000.00".into(),
        total_pnl: "335.75".into(),
        total_distributed: "2565.80".into(),
        avg_apy: "6.80%".into(),
        performance: PerformanceWindow {
            day: 0.4,
            week: 1.2,
            month: 2.8,
            year: 8.5,
        },
        active_positions: 3,
        active_rules,
        last_updated: now(),
    }
}

#[allow(clippy::too_many_arguments)]
fn transaction(
    id: &str,
    kind: TransactionKind,
    vault_name: &str,
    asset: &str,
    amount: &str,
    value: &str,
    status: TransactionStatus,
    age_hours: i64,
    tx_hash: &str,
    gas: [&str; 2],
) -> Transaction {
    Transaction {
        id: id.into(),
        kind,
        vault_name: vault_name.into(),
        asset: asset.into(),
        amount: amount.into(),
        value: value.into(),
        status,
        timestamp: relative(-age_hours),
        tx_hash: tx_hash.into(),
        gas_used: gas[0].into(),
        gas_fee: gas[1].into(),
    }
}

pub(super) fn transactions() -> Vec<Transaction> {
    use TransactionKind::{Deposit, Yield};
    use TransactionStatus::{Confirmed, Pending};

    vec![
        transaction(
            "1", Deposit, "USDC Savings Vault", "USDC", "5000", "$5,000.00", Confirmed, 7 * 24,
            "0x1234567890abcdef1234567890abcdef12345678", ["21000", "$2.45"],
        ),
        transaction(
            "2", Deposit, "ETH Staking Vault", "ETH", "2.5", "$4,850.00", Confirmed, 5 * 24,
            "0xabcdef1234567890abcdef1234567890abcdef12", ["45000", "$8.90"],
        ),
        transaction(
            "3", Yield, "USDC Savings Vault", "USDC", "210.45", "$210.45", Confirmed, 24,
            "0x9876543210fedcba9876543210fedcba98765432", ["0", "$0.00"],
        ),
        transaction(
            "4", Deposit, "High Yield DeFi", "CRV-LP", "1000", "$1,000.00", Pending, 1,
            "0xfedcba9876543210fedcba9876543210fedcba98", ["120000", "$15.60"],
        ),
    ]
}

fn distribution(address: &str, percentage: f64, label: &str) -> Distribution {
    Distribution {
        address: address.into(),
        percentage,
        label: label.into(),
    }
}

pub(super) fn rules() -> Vec<AutomationRule> {
    vec![
        AutomationRule {
            id: "1".into(),
            name: "USDC Profit Distribution".into(),
            status: RuleStatus::Active,
            trigger: "Monthly".into(),
            last_execution: Some(relative(-3 * 24)),
            next_execution: Some(relative(27 * 24)),
            total_distributed: "$1,250.00".into(),
            description: "Distribute 50% of USDC vault profits to savings, 30% to reinvestment, 20% to wallet".into(),
            conditions: RuleConditions {
                min_profit: "100".into(),
                frequency: "monthly".into(),
                vault_ids: vec!["1".into()],
            },
            distributions: vec![
                distribution("0x1234...5678", 50.0, "Savings Account"),
                distribution("0xabcd...ef90", 30.0, "Reinvestment"),
                distribution("0x9876...5432", 20.0, "Personal Wallet"),
            ],
        },
        AutomationRule {
            id: "2".into(),
            name: "ETH Staking Rewards".into(),
            status: RuleStatus::Active,
            trigger: "Weekly".into(),
            last_execution: Some(relative(-2 * 24)),
            next_execution: Some(relative(5 * 24)),
            total_distributed: "$425.80".into(),
            description: "Weekly distribution of ETH staking rewards with 70% reinvestment, 30% to wallet".into(),
            conditions: RuleConditions {
                min_profit: "50".into(),
                frequency: "weekly".into(),
                vault_ids: vec!["2".into()],
            },
            distributions: vec![
                distribution("0xdef0...1234", 70.0, "Compound Strategy"),
                distribution("0x5678...90ab", 30.0, "Withdrawal Wallet"),
            ],
        },
        AutomationRule {
            id: "3".into(),
            name: "DeFi Portfolio Rebalance".into(),
            status: RuleStatus::Paused,
            trigger: "Profit Threshold".into(),
            last_execution: Some(relative(-14 * 24)),
            next_execution: None,
            total_distributed: "$890.00".into(),
            description: "Rebalance DeFi portfolio when profits exceed 10% threshold".into(),
            conditions: RuleConditions {
                min_profit: "500".into(),
                frequency: "threshold".into(),
                vault_ids: vec!["4".into(), "6".into()],
            },
            distributions: vec![
                distribution("0xabc1...def2", 40.0, "Stable Vaults"),
                distribution("0x3456...789a", 35.0, "Growth Vaults"),
                distribution("0xbcde...f012", 25.0, "Emergency Fund"),
            ],
        },
    ]
}

pub(super) fn platform_metrics() -> PlatformMetrics {
    PlatformMetrics {
        total_value_locked: "$24.8M".into(),
        total_users: "1,247".into(),
        total_vaults: "12".into(),
        total_transactions: "8,934".into(),
        average_apy: "6.8%".into(),
        monthly_growth: "+12.5%".into(),
        total_yield_generated: "$892K".into(),
        active_automations: "456".into(),
    }
}

/// Protocol shares before colouring.
pub(super) const PROTOCOL_SHARES: [(&str, f64); 5] = [
    ("Aave", 35.0),
    ("Compound", 25.0),
    ("Yearn", 20.0),
    ("Curve", 15.0),
    ("Lido", 5.0),
];

pub(super) fn protocol_distribution() -> Vec<ProtocolDistribution> {
    PROTOCOL_SHARES
        .iter()
        .enumerate()
        .map(|(index, (name, value))| ProtocolDistribution {
            name: (*name).to_owned(),
            value: *value,
            color: crate::analytics::protocol_color(index).to_owned(),
        })
        .collect()
}

pub(super) fn tvl_metrics(timeframe: Timeframe) -> TvlMetrics {
    const HISTORY: [(&str, u64); 5] = [
        ("2024-01-01", 18_500_000),
        ("2024-01-07", 19_200_000),
        ("2024-01-14", 20_800_000),
        ("2024-01-21", 22_100_000),
        ("2024-01-28", 24_800_000),
    ];

    let total = HISTORY[HISTORY.len() - 1].1;
    let first = HISTORY[0].1;
    let change = total - first;

    TvlMetrics {
        current: total.to_string(),
        change: TvlChange {
            amount: change.to_string(),
            percentage: change as f64 / first as f64 * 100.0,
        },
        historical: HISTORY
            .iter()
            .map(|(date, tvl)| TvlPoint {
                date: (*date).to_owned(),
                tvl: tvl.to_string(),
            })
            .collect(),
        by_protocol: PROTOCOL_SHARES
            .iter()
            .map(|(protocol, percentage)| ProtocolShare {
                protocol: (*protocol).to_owned(),
                tvl: ((total as f64) * percentage / 100.0).round().to_string(),
                percentage: *percentage,
            })
            .collect(),
        timeframe,
        last_updated: now(),
    }
}

pub(super) fn user_analytics(address: &str, rules: &[AutomationRule]) -> UserAnalytics {
    let active_rules = rules.iter().filter(|rule| rule.is_active()).count() as u32;

    UserAnalytics {
        user: UserSummary {
            address: address.to_owned(),
            join_date: relative(-90 * 24),
            total_deposited: "12000.00".into(),
            total_earned: "335.75".into(),
            total_distributed: "2565.80".into(),
        },
        portfolio: UserPortfolio {
            total_value: "12335.75".into(),
            pnl: "+335.75".into(),
            pnl_percentage: 2.8,
            best_performing_vault: "High Yield DeFi".into(),
            worst_performing_vault: "ETH Staking Vault".into(),
        },
        rules: UserRules {
            total_rules: rules.len() as u32,
            active_rules,
            total_executions: 18,
            total_distributed: "2565.80".into(),
            avg_execution_time: 1450.0,
        },
        rankings: UserRankings {
            portfolio_size: 212,
            total_earnings: 187,
            automation_usage: 45,
        },
        activity: vec![
            ActivityEntry {
                kind: "deposit".into(),
                description: "Deposited 1000 CRV-LP into High Yield DeFi".into(),
                timestamp: relative(-1),
            },
            ActivityEntry {
                kind: "rule_execution".into(),
                description: "ETH Staking Rewards distributed rewards".into(),
                timestamp: relative(-2 * 24),
            },
        ],
    }
}
