use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::types::{ExportFormat, QueryParams, TransactionKind, TransactionStatus};

/// Transaction type filter as understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransactionFilter {
    Deposit,
    Withdrawal,
    Distribution,
    Reinvest,
}

impl TransactionFilter {
    /// Returns true if a displayed transaction of `kind` passes this filter.
    pub fn matches(&self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Deposit, TransactionKind::Deposit)
                | (Self::Withdrawal, TransactionKind::Withdraw)
                | (Self::Distribution, TransactionKind::Yield)
        )
    }
}

/// Transaction history query for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub address: String,
    pub kind: Option<TransactionFilter>,
    pub vault_id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    /// Creates an unfiltered query for `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: TransactionFilter) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_vault(mut self, vault_id: impl Into<String>) -> Self {
        self.vault_id = Some(vault_id.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_range(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self.end_date = Some(end_date.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds the query string pairs; the address goes in the path.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_ref().to_owned()));
        }
        if let Some(vault_id) = &self.vault_id {
            params.push(("vaultId", vault_id.clone()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_ref().to_owned()));
        }
        if let Some(start_date) = &self.start_date {
            params.push(("startDate", start_date.clone()));
        }
        if let Some(end_date) = &self.end_date {
            params.push(("endDate", end_date.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Portfolio export request for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportQuery {
    pub address: String,
    pub format: Option<ExportFormat>,
    pub year: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub taxable_only: Option<bool>,
}

impl ExportQuery {
    /// Creates an export request for `address` in `format`.
    pub fn new(address: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            address: address.into(),
            format: Some(format),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_taxable_only(mut self, taxable_only: bool) -> Self {
        self.taxable_only = Some(taxable_only);
        self
    }

    /// Builds the query string pairs; the address goes in the path.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(format) = self.format {
            params.push(("format", format.as_ref().to_owned()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        if let Some(start_date) = &self.start_date {
            params.push(("startDate", start_date.clone()));
        }
        if let Some(end_date) = &self.end_date {
            params.push(("endDate", end_date.clone()));
        }
        if let Some(taxable_only) = self.taxable_only {
            params.push(("taxableOnly", taxable_only.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_params_omit_unset_fields() {
        let params = TransactionQuery::new("0xabc")
            .with_status(TransactionStatus::Pending)
            .with_limit(50)
            .to_params();

        assert_eq!(
            params,
            vec![("status", "pending".to_owned()), ("limit", "50".to_owned())]
        );
    }

    #[test]
    fn test_export_params_keep_false_flag() {
        let params = ExportQuery::new("0xabc", ExportFormat::Csv)
            .with_year(2024)
            .with_taxable_only(false)
            .to_params();

        assert_eq!(
            params,
            vec![
                ("format", "csv".to_owned()),
                ("year", "2024".to_owned()),
                ("taxableOnly", "false".to_owned()),
            ]
        );
    }

    #[test]
    fn test_filter_matches_display_kinds() {
        assert!(TransactionFilter::Distribution.matches(TransactionKind::Yield));
        assert!(TransactionFilter::Withdrawal.matches(TransactionKind::Withdraw));
        assert!(!TransactionFilter::Reinvest.matches(TransactionKind::Fee));
    }
}
