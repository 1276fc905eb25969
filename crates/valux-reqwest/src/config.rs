//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Default server address.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Path prefix appended to the server address.
pub const API_PREFIX: &str = "api";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ApiConfig {
    /// Server address, without the `/api` prefix
    #[cfg_attr(
        feature = "config",
        arg(long = "api-url", env = "VALUX_API_URL", default_value = DEFAULT_API_URL)
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "VALUX_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "VALUX_HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// File the access and refresh tokens are persisted to
    #[cfg_attr(feature = "config", arg(long = "token-file", env = "VALUX_TOKEN_FILE"))]
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
            token_file: None,
        }
    }
}

impl ApiConfig {
    /// Creates a configuration for the server at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|agent| !agent.is_empty())
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("valux/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the token file, defaulting to `$HOME/.valux/tokens.json`.
    ///
    /// Falls back to the working directory when `HOME` is not set.
    pub fn effective_token_file(&self) -> PathBuf {
        self.token_file.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".valux")
                .join("tokens.json")
        })
    }

    /// Returns `{api_url}/api/`, the base every request path is joined to.
    pub fn base_url(&self) -> valux_core::Result<Url> {
        let root = self.api_url.trim_end_matches('/');
        let base = Url::parse(&format!("{root}/{API_PREFIX}/")).map_err(Error::from)?;
        if base.cannot_be_a_base() {
            return Err(valux_core::Error::configuration()
                .with_message(format!("API URL cannot be a base: {}", self.api_url)));
        }
        Ok(base)
    }

    /// Set the server address.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the token file.
    #[must_use]
    pub fn with_token_file(mut self, token_file: impl Into<PathBuf>) -> Self {
        self.token_file = Some(token_file.into());
        self
    }
}
