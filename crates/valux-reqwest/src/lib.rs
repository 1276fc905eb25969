#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Valux Reqwest
//!
//! HTTP backend for the valux services, built on [`reqwest`].
//!
//! - [`ApiClient`]: the gateway. Attaches bearer tokens, unwraps the server
//!   envelope and refreshes an expired session once per call
//! - [`TokenStore`]: the access/refresh token pair, persisted through a
//!   [`TokenStorage`] backend ([`FileStorage`] or [`MemoryStorage`])
//! - [`AuthService`]: wallet-signature login and logout
//! - REST implementations of every `valux_service` provider trait on
//!   [`ApiClient`]
//!
//! ```rust,ignore
//! use valux_reqwest::{ApiClient, ApiConfig};
//!
//! let services = ApiClient::from_config(ApiConfig::default())?.into_services();
//! let vaults = services.vaults().top_performing_vaults(5).await?;
//! ```

mod auth;
mod client;
mod config;
mod error;
mod rest;
mod token;

pub use auth::{
    AuthService, LoginRequest, LoginResponse, NonceResponse, TRACING_TARGET as AUTH_TARGET,
    UserProfile,
};
pub use client::{ApiClient, Query, TRACING_TARGET as CLIENT_TARGET};
pub use config::{API_PREFIX, ApiConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use reqwest::Method;
pub use rest::{TRACING_TARGET as REST_TARGET, truncate_address};
pub use token::{
    ACCESS_TOKEN_KEY, FileStorage, MemoryStorage, REFRESH_TOKEN_KEY, TRACING_TARGET as TOKEN_TARGET,
    TokenStorage, TokenStore,
};
