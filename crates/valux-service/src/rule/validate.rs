use super::NewRule;
use crate::types::RuleValidation;

/// Allowed deviation of the distribution total from 100%.
const PERCENTAGE_TOLERANCE: f64 = 0.01;

/// Checks a rule locally before it is sent anywhere.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_rule(rule: &NewRule) -> RuleValidation {
    let mut errors = Vec::new();

    if rule.name.trim().is_empty() {
        errors.push("Rule name is required".to_owned());
    }

    if rule.vault_id.trim().is_empty() {
        errors.push("Vault selection is required".to_owned());
    }

    if rule.distributions.is_empty() {
        errors.push("At least one distribution is required".to_owned());
    }

    let total: f64 = rule.distributions.iter().map(|d| d.percentage).sum();
    if (total - 100.0).abs() > PERCENTAGE_TOLERANCE {
        errors.push("Distribution percentages must sum to 100%".to_owned());
    }

    for (index, distribution) in rule.distributions.iter().enumerate() {
        let position = index + 1;
        if distribution.address.trim().is_empty() {
            errors.push(format!("Distribution {position}: Address is required"));
        }
        if distribution.percentage <= 0.0 || distribution.percentage > 100.0 {
            errors.push(format!(
                "Distribution {position}: Percentage must be between 0 and 100"
            ));
        }
    }

    RuleValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Distribution, Trigger};

    fn distribution(address: &str, percentage: f64) -> Distribution {
        Distribution {
            address: address.into(),
            percentage,
            label: String::new(),
        }
    }

    fn rule(distributions: Vec<Distribution>) -> NewRule {
        NewRule {
            name: "Monthly payout".into(),
            description: None,
            user_address: "0xabc".into(),
            vault_id: "1".into(),
            trigger: Trigger::Monthly,
            profit_threshold: None,
            distributions,
        }
    }

    #[test]
    fn test_valid_rule() {
        let validation = validate_rule(&rule(vec![
            distribution("0x1", 33.33),
            distribution("0x2", 33.33),
            distribution("0x3", 33.34),
        ]));
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_empty_rule_collects_every_error() {
        let mut empty = rule(vec![]);
        empty.name = "  ".into();
        empty.vault_id.clear();

        let validation = validate_rule(&empty);
        assert!(!validation.is_valid);
        assert_eq!(
            validation.errors,
            vec![
                "Rule name is required",
                "Vault selection is required",
                "At least one distribution is required",
                "Distribution percentages must sum to 100%",
            ]
        );
    }

    #[test]
    fn test_distribution_errors_are_numbered() {
        let validation = validate_rule(&rule(vec![
            distribution("0x1", 100.0),
            distribution("", 0.0),
        ]));
        assert_eq!(
            validation.errors,
            vec![
                "Distribution 2: Address is required",
                "Distribution 2: Percentage must be between 0 and 100",
            ]
        );
    }
}
