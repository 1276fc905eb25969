//! Commonly used items from valux-service.
//!
//! ```rust,ignore
//! use valux_service::prelude::*;
//! ```

pub use crate::analytics::{AnalyticsProvider, AnalyticsService};
pub use crate::mock::{MockConfig, MockProvider};
pub use crate::portfolio::{
    ExportQuery, PortfolioProvider, PortfolioService, TransactionFilter, TransactionQuery,
};
pub use crate::rule::{NewRule, RuleFilter, RuleProvider, RuleService, RuleUpdate};
pub use crate::services::{Backend, Services};
pub use crate::types::*;
pub use crate::vault::{
    SortField, SortOrder, VaultFilters, VaultProvider, VaultQuery, VaultService,
};
pub use crate::{Error, ErrorKind, Result, ServiceHealth, ServiceStatus};
