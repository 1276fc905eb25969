//! Subcommands.

use clap::{Args, Subcommand};
use valux_service::portfolio::TransactionFilter;
use valux_service::types::{ExportFormat, Timeframe};
use valux_service::vault::VaultFilters;

/// What to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the message a wallet must sign to log in.
    Nonce {
        /// Wallet address.
        address: String,
    },
    /// Exchange a signed nonce message for a session.
    Login {
        /// Wallet address.
        address: String,
        /// Signature over the nonce message.
        #[arg(long)]
        signature: String,
        /// The signed message, as returned by `nonce`.
        #[arg(long)]
        message: String,
    },
    /// End the session and forget the stored tokens.
    Logout,
    /// Print the authenticated user.
    Profile,
    /// List vaults.
    Vaults(VaultArgs),
    /// Show one vault by id.
    Vault {
        id: String,
        /// Include APY and TVL history.
        #[arg(long)]
        performance: bool,
    },
    /// Portfolio summary and positions of an address.
    Portfolio {
        address: String,
    },
    /// Transaction history of an address.
    Transactions {
        address: String,
        /// deposit, withdrawal, distribution or reinvest
        #[arg(long = "type")]
        kind: Option<TransactionFilter>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Export the portfolio of an address.
    Export {
        address: String,
        /// csv, json or pdf
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Manage automation rules.
    #[command(subcommand)]
    Rules(RuleCommand),
    /// Platform statistics.
    Analytics {
        /// 24h, 7d, 30d or 1y
        #[arg(long, default_value = "30d")]
        timeframe: Timeframe,
    },
    /// Per-user analytics.
    UserAnalytics {
        address: String,
    },
    /// Check whether the backend is reachable.
    Health,
}

/// Rule subcommands. Every per-rule command is scoped to its owner.
#[derive(Debug, Clone, Subcommand)]
pub enum RuleCommand {
    /// List the rules of an address.
    List {
        address: String,
        /// Only active rules.
        #[arg(long, conflicts_with = "paused")]
        active: bool,
        /// Only paused rules.
        #[arg(long)]
        paused: bool,
    },
    /// Rule counts and totals of an address.
    Stats {
        address: String,
    },
    /// Flip a rule between active and paused.
    Toggle {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Run a rule now.
    Execute {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Copy a rule under a new name.
    Duplicate {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Delete a rule.
    Delete {
        id: String,
        #[arg(long)]
        user: String,
    },
}

/// Vault listing filters, as typed by a user.
#[derive(Debug, Clone, Default, Args)]
pub struct VaultArgs {
    /// Match name, asset or protocol.
    #[arg(long)]
    pub search: Option<String>,
    /// low, medium, high or all
    #[arg(long)]
    pub risk: Option<String>,
    /// stable, yield, growth or all
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long = "min-apy")]
    pub min_apy: Option<String>,
    #[arg(long = "max-apy")]
    pub max_apy: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<VaultArgs> for VaultFilters {
    fn from(args: VaultArgs) -> Self {
        Self {
            search: args.search,
            risk: args.risk,
            category: args.category,
            min_apy: args.min_apy,
            max_apy: args.max_apy,
            page: args.page,
            limit: args.limit,
        }
    }
}
