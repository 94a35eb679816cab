//! Report configuration

use crate::analytics::{CATEGORY_LIMIT, LOCATION_LIMIT, RFM_LIMIT, SELLER_LIMIT};
use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};

/// Row limits of each report table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Categories in the best and worst product tables
    pub category_limit: usize,
    /// Sellers in the review ranking
    pub seller_limit: usize,
    /// States and cities in the customer distribution
    pub location_limit: usize,
    /// Customers in each RFM leader table
    pub rfm_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category_limit: CATEGORY_LIMIT,
            seller_limit: SELLER_LIMIT,
            location_limit: LOCATION_LIMIT,
            rfm_limit: RFM_LIMIT,
        }
    }
}

impl ReportConfig {
    /// Reject limits that would produce empty tables
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("category_limit", self.category_limit),
            ("seller_limit", self.seller_limit),
            ("location_limit", self.location_limit),
            ("rfm_limit", self.rfm_limit),
        ];
        match limits.iter().find(|(_, v)| *v == 0) {
            Some((name, _)) => Err(InsightsError::ConfigError(format!(
                "{} must be at least 1",
                name
            ))),
            None => Ok(()),
        }
    }
}
