//! # order-insights
//!
//! Descriptive analytics over a flattened e-commerce order table.
//!
//! The crate turns a [`Dataset`](data::Dataset) snapshot into summary tables:
//! best and worst product categories, sellers with the most 4 and 5 star
//! reviews, customer counts per state and city, and RFM (recency, frequency,
//! monetary) metrics per customer. Every aggregate is a pure function of the
//! snapshot it borrows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use order_insights::prelude::*;
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! # fn main() -> order_insights::error::Result<()> {
//! let full = load_csv(Path::new("all_data.csv"))?;
//! let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2017, 12, 31).unwrap();
//!
//! let window = filter(&full, start, end);
//! let best = best_performing(&window);
//! let customers = rfm(&full);
//! println!("{:?} {}", best.first(), customers.len());
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::analytics::{
        best_performing, best_sellers, by_city, by_state, rfm, worst_performing, GroupKey,
        Location, Ranking, RfmRow, RfmTable, SortOrder,
    };
    pub use crate::config::ReportConfig;
    pub use crate::data::{filter, load_csv, load_dataset, DateRange, Dataset, OrderRecord};
    pub use crate::error::{InsightsError, Result};
    pub use crate::report::InsightsReport;
    pub use crate::types::*;
}
