//! Order record: one row of the flattened order/customer/review table

use crate::types::{Price, ReviewScore, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of the input table
pub mod columns {
    pub const ORDER_ID: &str = "order_id";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
    pub const SELLER_ID: &str = "seller_id";
    pub const REVIEW_SCORE: &str = "review_score";
    pub const CUSTOMER_STATE: &str = "customer_state";
    pub const CUSTOMER_CITY: &str = "customer_city";
    pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
    pub const PRICE: &str = "price";

    /// Every column a dataset must carry
    pub const REQUIRED: [&str; 9] = [
        ORDER_ID,
        CUSTOMER_ID,
        PRODUCT_CATEGORY_NAME,
        SELLER_ID,
        REVIEW_SCORE,
        CUSTOMER_STATE,
        CUSTOMER_CITY,
        ORDER_PURCHASE_TIMESTAMP,
        PRICE,
    ];
}

/// A single order line item joined with its customer and review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    /// `None` when the product has no category
    pub product_category_name: Option<String>,
    pub seller_id: String,
    /// `None` when the order was never reviewed
    pub review_score: Option<ReviewScore>,
    pub customer_state: String,
    pub customer_city: String,
    pub order_purchase_timestamp: Timestamp,
    pub price: Price,
}

impl OrderRecord {
    /// Create a record with empty descriptive fields and zero price
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        order_purchase_timestamp: Timestamp,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
            product_category_name: None,
            seller_id: String::new(),
            review_score: None,
            customer_state: String::new(),
            customer_city: String::new(),
            order_purchase_timestamp,
            price: 0.0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category_name = Some(category.into());
        self
    }

    pub fn with_seller(mut self, seller_id: impl Into<String>) -> Self {
        self.seller_id = seller_id.into();
        self
    }

    pub fn with_review(mut self, score: ReviewScore) -> Self {
        self.review_score = Some(score);
        self
    }

    pub fn with_location(mut self, state: impl Into<String>, city: impl Into<String>) -> Self {
        self.customer_state = state.into();
        self.customer_city = city.into();
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = price;
        self
    }

    /// Calendar date of the purchase
    pub fn purchase_date(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }

    /// Check if the record carries a 4 or 5 star review
    pub fn has_high_review(&self) -> bool {
        self.review_score
            .map_or(false, |s| crate::types::HIGH_REVIEW_SCORES.contains(&s))
    }
}

/// Field validation shared by the CSV and DataFrame loaders.
///
/// Each function turns one cell into its typed value or a schema error
/// naming the column and the 1-based data row.
pub(crate) mod validate {
    use super::columns;
    use crate::error::{InsightsError, Result};
    use crate::types::{parse_timestamp, Price, ReviewScore, Timestamp};

    /// Required, non-blank text cell
    pub fn text(column: &str, row: usize, value: Option<&str>) -> Result<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(InsightsError::invalid_value(
                column,
                row,
                value.unwrap_or(""),
                "missing value",
            )),
        }
    }

    /// Optional text cell, blank reads as missing
    pub fn optional_text(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn timestamp(row: usize, value: Option<&str>) -> Result<Timestamp> {
        let raw = value.unwrap_or("");
        parse_timestamp(raw).ok_or_else(|| {
            InsightsError::invalid_value(
                columns::ORDER_PURCHASE_TIMESTAMP,
                row,
                raw,
                "unparseable timestamp",
            )
        })
    }

    pub fn price(row: usize, value: Option<f64>) -> Result<Price> {
        match value {
            Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
            Some(p) => Err(InsightsError::invalid_value(
                columns::PRICE,
                row,
                p.to_string(),
                "price must be a non-negative number",
            )),
            None => Err(InsightsError::invalid_value(columns::PRICE, row, "", "missing value")),
        }
    }

    pub fn price_str(row: usize, value: Option<&str>) -> Result<Price> {
        let raw = value.unwrap_or("").trim();
        let parsed = raw.parse::<f64>().map_err(|_| {
            InsightsError::invalid_value(columns::PRICE, row, raw, "non-numeric price")
        })?;
        price(row, Some(parsed))
    }

    /// Review score; `None` is a legitimate "not reviewed"
    pub fn review(row: usize, value: Option<f64>) -> Result<Option<ReviewScore>> {
        match value {
            None => Ok(None),
            Some(s) if s.fract() == 0.0 && (1.0..=5.0).contains(&s) => Ok(Some(s as ReviewScore)),
            Some(s) => Err(InsightsError::invalid_value(
                columns::REVIEW_SCORE,
                row,
                s.to_string(),
                "review score must be an integer from 1 to 5",
            )),
        }
    }

    pub fn review_str(row: usize, value: Option<&str>) -> Result<Option<ReviewScore>> {
        let raw = value.unwrap_or("").trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let parsed = raw.parse::<f64>().map_err(|_| {
            InsightsError::invalid_value(
                columns::REVIEW_SCORE,
                row,
                raw,
                "non-numeric review score",
            )
        })?;
        review(row, Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_timestamp;

    #[test]
    fn test_record_builder() {
        let ts = parse_timestamp("2018-03-01 14:30:00").unwrap();
        let record = OrderRecord::new("o1", "c1", ts)
            .with_category("toys")
            .with_seller("s1")
            .with_review(5)
            .with_location("SP", "sao paulo")
            .with_price(19.9);

        assert_eq!(record.product_category_name.as_deref(), Some("toys"));
        assert_eq!(record.purchase_date(), NaiveDate::from_ymd_opt(2018, 3, 1).unwrap());
        assert!(record.has_high_review());
        assert_eq!(record.price, 19.9);
    }

    #[test]
    fn test_validate_text() {
        assert_eq!(validate::text("seller_id", 1, Some(" s1 ")).unwrap(), "s1");
        let err = validate::text("seller_id", 2, Some("  ")).unwrap_err();
        assert!(err.is_schema_error());
        assert!(validate::text("seller_id", 2, None).is_err());
        assert_eq!(validate::optional_text(Some("")), None);
        assert_eq!(validate::optional_text(Some("toys")), Some("toys".to_string()));
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate::price_str(1, Some("29.99")).unwrap(), 29.99);
        assert!(validate::price_str(1, Some("free")).is_err());
        assert!(validate::price_str(1, Some("-1")).is_err());
        assert!(validate::price(1, None).is_err());
        assert!(validate::price(1, Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_review() {
        assert_eq!(validate::review_str(1, Some("")).unwrap(), None);
        assert_eq!(validate::review_str(1, Some("4")).unwrap(), Some(4));
        assert_eq!(validate::review_str(1, Some("5.0")).unwrap(), Some(5));
        assert!(validate::review_str(1, Some("4.5")).is_err());
        assert!(validate::review_str(1, Some("6")).is_err());
        assert!(validate::review_str(1, Some("great")).is_err());
        assert_eq!(validate::review(1, None).unwrap(), None);
    }

    #[test]
    fn test_validate_timestamp() {
        assert!(validate::timestamp(1, Some("2018-01-01 10:00:00")).is_ok());
        let err = validate::timestamp(7, Some("not a date")).unwrap_err();
        assert!(err.to_string().contains("row 7"));
    }

    #[test]
    fn test_high_review() {
        let ts = parse_timestamp("2018-03-01").unwrap();
        let base = OrderRecord::new("o1", "c1", ts);

        assert!(!base.has_high_review());
        assert!(!base.clone().with_review(3).has_high_review());
        assert!(base.clone().with_review(4).has_high_review());
        assert!(base.with_review(5).has_high_review());
    }
}
