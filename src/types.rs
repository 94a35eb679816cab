//! Core types and constants

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp type used throughout the library (purchase instants carry no zone)
pub type Timestamp = NaiveDateTime;

/// Price type (using f64 for precision)
pub type Price = f64;

/// Review score on the 1-5 star scale
pub type ReviewScore = u8;

/// Review scores counted as a high rating
pub const HIGH_REVIEW_SCORES: [ReviewScore; 2] = [4, 5];

/// Accepted purchase timestamp layouts, tried in order
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a purchase timestamp.
///
/// A bare `YYYY-MM-DD` date is read as midnight.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
