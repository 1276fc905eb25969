//! CLI configuration.
//!
//! ```text
//! Cli
//! ├── backend: BackendConfig   # mock or REST selection
//! ├── api: ApiConfig           # server address, timeout, token file
//! ├── mock: MockConfig         # simulated latency
//! └── command: Command         # what to run
//! ```
//!
//! Every flag can also be provided through its `VALUX_*` environment
//! variable.

mod command;

use clap::{Args, Parser};
pub use command::{Command, RuleCommand};
use serde::{Deserialize, Serialize};
use valux_reqwest::ApiConfig;
use valux_service::MockConfig;

use crate::TRACING_TARGET_CONFIG;

/// Backend selection.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Talk to the valux server instead of the built-in mock data
    #[arg(long = "use-real-api", env = "VALUX_USE_REAL_API", default_value_t = false)]
    pub use_real_api: bool,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "valux")]
#[command(about = "Valux DeFi dashboard client")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub backend: BackendConfig,

    /// REST backend configuration.
    #[clap(flatten)]
    pub api: ApiConfig,

    /// Mock backend configuration.
    #[clap(flatten)]
    pub mock: MockConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads `.env` (if enabled) and parses the command line.
    ///
    /// The `.env` file is read first so that clap picks its values up as
    /// environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs the effective configuration. Tokens are never logged.
    pub fn log(&self) {
        if self.backend.use_real_api {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "rest",
                api_url = %self.api.api_url,
                timeout_secs = self.api.effective_timeout().as_secs(),
                token_file = %self.api.effective_token_file().display(),
                "Backend configuration"
            );
        } else {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                backend = "mock",
                latency_ms = self.mock.latency_ms,
                "Backend configuration"
            );
        }
    }
}
