//! Aggregation pipeline
//!
//! Every aggregate is a pure function of a borrowed [`Dataset`](crate::data::Dataset)
//! snapshot and returns a freshly built table.

pub mod geography;
pub mod grouping;
pub mod products;
pub mod rfm;
pub mod sellers;

pub use geography::{by_city, by_state, rank_locations, Location, LOCATION_LIMIT};
pub use grouping::{GroupKey, RankedGroup, Ranking, SortOrder};
pub use products::{best_performing, rank_categories, worst_performing, CATEGORY_LIMIT};
pub use rfm::{rfm, RfmRow, RfmSummary, RfmTable, RFM_LIMIT};
pub use sellers::{best_sellers, rank_sellers, SELLER_LIMIT};
