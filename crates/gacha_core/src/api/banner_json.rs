// Banner authoring JSON API
// Validation reports, rate previews and the config schema for the editor UI

use crate::banner::{BannerConfig, BannerValidator, ConfigViolation, Rarity};
use crate::gacha::rate_table;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ========== Request/Response Structures ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub field: String,
    pub constraint: String,
    pub message: String,
}

impl From<&ConfigViolation> for ViolationReport {
    fn from(violation: &ConfigViolation) -> Self {
        Self {
            field: violation.field(),
            constraint: violation.constraint().to_string(),
            message: violation.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateBannerResponse {
    pub success: bool,
    pub valid: bool,
    pub banner_id: Option<String>,
    pub violations: Vec<ViolationReport>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TierRateTable {
    pub rarity: Rarity,
    pub base_rate: f64,
    pub hard_pity_pull: u32,
    /// Effective rate at pull index `i + 1`
    pub rates: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateTableResponse {
    pub success: bool,
    pub banner_id: Option<String>,
    pub tiers: Vec<TierRateTable>,
    pub violations: Vec<ViolationReport>,
    pub error: Option<String>,
}

// ========== Public API Functions ==========

/// Validate a banner and list every violation
pub fn validate_banner_json(banner_json: &str) -> String {
    let response = match BannerConfig::from_json_str(banner_json) {
        Ok(config) => {
            let banner_id = config.resolved_id();
            let violations: Vec<ViolationReport> =
                BannerValidator::collect_violations(&config).iter().map(Into::into).collect();
            if violations.is_empty() {
                debug!("Banner '{}' is valid", banner_id);
            } else {
                warn!("Banner '{}' has {} violation(s)", banner_id, violations.len());
            }
            ValidateBannerResponse {
                success: true,
                valid: violations.is_empty(),
                banner_id: Some(banner_id),
                violations,
                error: None,
            }
        }
        Err(e) => ValidateBannerResponse {
            success: false,
            valid: false,
            banner_id: None,
            violations: vec![],
            error: Some(format!("Invalid banner format: {}", e)),
        },
    };

    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
}

/// Effective 5★ and 4★ rates for every pull index up to hard pity
pub fn rate_table_json(banner_json: &str) -> String {
    let failure = |error: String, violations: Vec<ViolationReport>| RateTableResponse {
        success: false,
        banner_id: None,
        tiers: vec![],
        violations,
        error: Some(error),
    };

    let response = match BannerConfig::from_json_str(banner_json) {
        Err(e) => failure(format!("Invalid banner format: {}", e), vec![]),
        Ok(config) => match BannerValidator::validate(config) {
            Err(e) => failure(
                "Banner config invalid".to_string(),
                e.violations.iter().map(Into::into).collect(),
            ),
            Ok(validated) => {
                let tiers = [Rarity::FiveStar, Rarity::FourStar]
                    .into_iter()
                    .filter_map(|rarity| {
                        let progression = validated.progression(rarity)?;
                        Some(TierRateTable {
                            rarity,
                            base_rate: validated.base_rate(rarity),
                            hard_pity_pull: progression.hard_pity_pull,
                            rates: rate_table(&validated, rarity),
                        })
                    })
                    .collect();
                RateTableResponse {
                    success: true,
                    banner_id: Some(validated.banner_id().to_string()),
                    tiers,
                    violations: vec![],
                    error: None,
                }
            }
        },
    };

    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
}

/// JSON Schema of `BannerConfig`, pretty-printed
pub fn banner_schema_json() -> String {
    let schema = schemars::schema_for!(BannerConfig);
    serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_banner;

    #[test]
    fn test_validate_valid_banner() {
        let json = sample_banner().to_json_pretty().unwrap();
        let response: ValidateBannerResponse =
            serde_json::from_str(&validate_banner_json(&json)).unwrap();
        assert!(response.success);
        assert!(response.valid);
        assert!(response.violations.is_empty());
        assert_eq!(response.banner_id, Some(sample_banner().resolved_id()));
    }

    #[test]
    fn test_validate_reports_all_violations() {
        let mut banner = sample_banner();
        banner.probability_settings.base_5star_rate = 1.5;
        banner.probability_progression.four_star.hard_pity_pull = 0;
        let json = banner.to_json_pretty().unwrap();

        let response: ValidateBannerResponse =
            serde_json::from_str(&validate_banner_json(&json)).unwrap();
        assert!(response.success);
        assert!(!response.valid);
        assert!(response.violations.len() >= 2);
        assert!(response.violations.iter().any(|v| v.constraint == "rate_range"));
        assert!(response.violations.iter().any(|v| v.constraint == "hard_pity_min"));
    }

    #[test]
    fn test_validate_malformed_json() {
        let response: ValidateBannerResponse =
            serde_json::from_str(&validate_banner_json("{not json")).unwrap();
        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_rate_table() {
        let json = sample_banner().to_json_pretty().unwrap();
        let response: RateTableResponse = serde_json::from_str(&rate_table_json(&json)).unwrap();
        assert!(response.success);
        assert_eq!(response.tiers.len(), 2);

        let five = &response.tiers[0];
        assert_eq!(five.rarity, Rarity::FiveStar);
        assert_eq!(five.rates.len(), 90);
        assert!((five.rates[0] - 0.006).abs() < 1e-12);
        assert!((five.rates[73] - 0.066).abs() < 1e-12);
        assert_eq!(five.rates[89], 1.0);
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = banner_schema_json();
        assert!(schema.contains("probability_settings"));
        assert!(schema.contains("included_item_ids"));
    }
}
