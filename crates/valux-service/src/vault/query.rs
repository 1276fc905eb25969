use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::Result;
use crate::types::{QueryParams, RiskLevel, VaultCategory};

/// Field to sort vault listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Apy,
    Tvl,
    Name,
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Server-side vault filter. Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultQuery {
    pub search: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub category: Option<VaultCategory>,
    pub min_apy: Option<f64>,
    pub max_apy: Option<f64>,
    pub protocol: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl VaultQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }

    pub fn with_category(mut self, category: VaultCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    /// Builds the query string pairs sent to `GET /vaults`.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        if let Some(risk_level) = self.risk_level {
            params.push(("riskLevel", risk_level.as_ref().to_owned()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.as_ref().to_owned()));
        }
        if let Some(min_apy) = self.min_apy {
            params.push(("minAPY", min_apy.to_string()));
        }
        if let Some(max_apy) = self.max_apy {
            params.push(("maxAPY", max_apy.to_string()));
        }
        if let Some(protocol) = &self.protocol {
            params.push(("protocol", protocol.clone()));
        }
        if let Some(active) = self.active {
            params.push(("active", active.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sortBy", sort_by.as_ref().to_owned()));
        }
        if let Some(sort_order) = self.sort_order {
            params.push(("sortOrder", sort_order.as_ref().to_owned()));
        }
        params
    }
}

/// Dashboard filter form, as entered by a user.
///
/// Risk and category accept any casing; `All` (or an empty value) means no
/// filter. APY bounds are free text and ignored when not numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFilters {
    pub search: Option<String>,
    pub risk: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minAPY")]
    pub min_apy: Option<String>,
    #[serde(rename = "maxAPY")]
    pub max_apy: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl VaultFilters {
    /// Default page when none is given.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Default page size when none is given.
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Converts the form into a server query.
    ///
    /// Fails with an invalid input error on an unknown risk or category.
    pub fn to_query(&self) -> Result<VaultQuery> {
        let risk_level = selected(self.risk.as_deref())
            .map(str::parse::<RiskLevel>)
            .transpose()
            .map_err(|_| invalid("risk level", self.risk.as_deref()))?;
        let category = selected(self.category.as_deref())
            .map(str::parse::<VaultCategory>)
            .transpose()
            .map_err(|_| invalid("category", self.category.as_deref()))?;

        Ok(VaultQuery {
            search: self.search.clone().filter(|s| !s.is_empty()),
            risk_level,
            category,
            min_apy: numeric(self.min_apy.as_deref()),
            max_apy: numeric(self.max_apy.as_deref()),
            page: Some(self.page.unwrap_or(Self::DEFAULT_PAGE)),
            limit: Some(self.limit.unwrap_or(Self::DEFAULT_LIMIT)),
            ..VaultQuery::default()
        })
    }
}

fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn numeric(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse().ok())
}

fn invalid(field: &str, value: Option<&str>) -> valux_core::Error {
    valux_core::Error::invalid_input()
        .with_message(format!("Unknown {field}: {}", value.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(VaultQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_query_params_use_wire_names() {
        let params = VaultQuery::new()
            .with_risk_level(RiskLevel::High)
            .with_limit(50)
            .with_sort(SortField::CreatedAt, SortOrder::Asc)
            .to_params();

        assert_eq!(
            params,
            vec![
                ("riskLevel", "high".to_owned()),
                ("limit", "50".to_owned()),
                ("sortBy", "createdAt".to_owned()),
                ("sortOrder", "asc".to_owned()),
            ]
        );
    }

    #[test]
    fn test_filters_all_means_no_filter() {
        let filters = VaultFilters {
            risk: Some("All".into()),
            category: Some("all".into()),
            ..Default::default()
        };
        let query = filters.to_query().unwrap();

        assert!(query.risk_level.is_none());
        assert!(query.category.is_none());
        assert_eq!(query.page, Some(1));
        assert_eq!(query.limit, Some(20));
    }

    #[test]
    fn test_filters_lowercase_risk_and_parse_apy() {
        let filters = VaultFilters {
            risk: Some("Medium".into()),
            category: Some("Growth".into()),
            min_apy: Some("5".into()),
            max_apy: Some("lots".into()),
            ..Default::default()
        };
        let params = filters.to_query().unwrap().to_params();

        assert!(params.contains(&("riskLevel", "medium".to_owned())));
        assert!(params.contains(&("category", "growth".to_owned())));
        assert!(params.contains(&("minAPY", "5".to_owned())));
        assert!(!params.iter().any(|(key, _)| *key == "maxAPY"));
    }

    #[test]
    fn test_filters_reject_unknown_risk() {
        let filters = VaultFilters {
            risk: Some("extreme".into()),
            ..Default::default()
        };
        let error = filters.to_query().unwrap_err();
        assert_eq!(error.kind(), valux_core::ErrorKind::InvalidInput);
    }
}
