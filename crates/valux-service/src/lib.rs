#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Valux Service
//!
//! Resource services for the valux dashboard: vaults, portfolio, automation
//! rules and analytics. Each resource is a provider trait implemented by a
//! backend plus a service wrapper that adds logging and the convenience
//! queries built on top of the provider.
//!
//! Two backends exist. The HTTP backend lives in `valux-reqwest`; the
//! in-memory [`MockProvider`] here serves a fixed data set with simulated
//! latency. [`Services`] bundles the four services over one backend.

pub mod analytics;
mod mock;
pub mod portfolio;
#[doc(hidden)]
pub mod prelude;
pub mod rule;
mod services;
pub mod types;
pub mod vault;

pub use analytics::{AnalyticsProvider, AnalyticsService};
pub use mock::{MockConfig, MockProvider};
pub use portfolio::{PortfolioProvider, PortfolioService};
pub use rule::{RuleProvider, RuleService};
pub use services::{Backend, Services};
pub use valux_core::{
    BoxedError, Envelope, Error, ErrorKind, Result, ServiceHealth, ServiceStatus,
};
pub use vault::{VaultProvider, VaultService};
