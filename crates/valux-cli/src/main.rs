#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::process;

use anyhow::{Context, bail};
use serde::Serialize;
use valux_reqwest::{ApiClient, AuthService, LoginRequest};
use valux_service::Services;
use valux_service::portfolio::{ExportQuery, TransactionQuery};
use valux_service::rule::RuleFilter;

use crate::config::{Cli, Command, RuleCommand};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "valux_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "valux_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %error,
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    telemetry::init_tracing()?;

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        "Starting valux"
    );
    cli.log();

    let backend = Backend::from_cli(&cli)?;
    execute(&backend, cli.command).await
}

/// The selected backend: services plus, for the REST backend, the client
/// that owns the session.
struct Backend {
    services: Services,
    client: Option<ApiClient>,
}

impl Backend {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        if !cli.backend.use_real_api {
            return Ok(Self {
                services: cli.mock.clone().into_services(),
                client: None,
            });
        }

        let client =
            ApiClient::from_config(cli.api.clone()).context("failed to create API client")?;
        Ok(Self {
            services: client.clone().into_services(),
            client: Some(client),
        })
    }

    fn auth(&self) -> anyhow::Result<AuthService> {
        match &self.client {
            Some(client) => Ok(client.auth()),
            None => bail!("authentication requires --use-real-api"),
        }
    }
}

async fn execute(backend: &Backend, command: Command) -> anyhow::Result<()> {
    let services = &backend.services;

    match command {
        Command::Nonce { address } => print(&backend.auth()?.nonce(&address).await?),
        Command::Login {
            address,
            signature,
            message,
        } => {
            let request = LoginRequest {
                address,
                signature,
                message,
            };
            let response = backend.auth()?.login(&request).await?;
            print(&response.user)
        }
        Command::Logout => {
            backend.auth()?.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Command::Profile => print(&backend.auth()?.profile().await?),
        Command::Vaults(args) => print(&services.vaults().vaults(&args.into()).await?),
        Command::Vault { id, performance } => {
            let Some(vault) = services.vaults().vault_by_id(&id).await? else {
                bail!("vault {id} not found");
            };
            if performance {
                print(&services.vaults().vault_performance(&vault.id).await?)
            } else {
                print(&vault)
            }
        }
        Command::Portfolio { address } => print(&services.portfolio().stats(&address).await?),
        Command::Transactions {
            address,
            kind,
            page,
            limit,
        } => {
            let query = TransactionQuery {
                kind,
                page,
                limit,
                ..TransactionQuery::new(address)
            };
            print(&services.portfolio().transactions(&query).await?)
        }
        Command::Export {
            address,
            format,
            year,
        } => {
            let query = ExportQuery {
                year,
                ..ExportQuery::new(address, format)
            };
            print(&services.portfolio().export(&query).await?)
        }
        Command::Rules(command) => execute_rule(services, command).await,
        Command::Analytics { timeframe } => {
            let stats = services.analytics().platform_stats().await?;
            let history = services.analytics().tvl_history(timeframe).await?;
            print(&serde_json::json!({ "stats": stats, "history": history }))
        }
        Command::UserAnalytics { address } => {
            print(&services.analytics().user_analytics(&address).await?)
        }
        Command::Health => print(&services.health_check().await?),
    }
}

async fn execute_rule(services: &Services, command: RuleCommand) -> anyhow::Result<()> {
    let rules = services.rules();

    match command {
        RuleCommand::List {
            address,
            active,
            paused,
        } => {
            let filter = match (active, paused) {
                (true, _) => RuleFilter::new().with_active(true),
                (_, true) => RuleFilter::new().with_active(false),
                _ => RuleFilter::new(),
            };
            print(&rules.user_rules(&address, &filter).await?)
        }
        RuleCommand::Stats { address } => print(&rules.rule_stats(&address).await?),
        RuleCommand::Toggle { id, user } => print(&rules.toggle_rule(&id, &user).await?),
        RuleCommand::Execute { id, user } => print(&rules.execute_rule(&id, &user).await?),
        RuleCommand::Duplicate { id, user } => print(&rules.duplicate_rule(&id, &user).await?),
        RuleCommand::Delete { id, user } => {
            rules.delete_rule(&id, &user).await?;
            println!("Deleted rule {id}");
            Ok(())
        }
    }
}

/// Writes `value` to stdout as pretty JSON.
fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
