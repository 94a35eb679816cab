//! Customer distribution by state and city

use super::grouping::{count_distinct, rank, GroupKey, Ranking, SortOrder};
use crate::data::Dataset;
use serde::{Deserialize, Serialize};

/// Locations shown in each geographic ranking
pub const LOCATION_LIMIT: usize = 10;

/// Location granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    State,
    City,
}

impl Location {
    pub fn group_key(self) -> GroupKey {
        match self {
            Location::State => GroupKey::State,
            Location::City => GroupKey::City,
        }
    }
}

/// Rank locations by distinct customers.
///
/// A customer with several orders in one location counts once there.
pub fn rank_locations(subset: &Dataset, location: Location, limit: usize) -> Ranking {
    let key = location.group_key();
    let groups = count_distinct(subset, key, GroupKey::Customer);
    log::debug!("Ranking {} {:?} groups by distinct customers", groups.len(), location);
    rank(groups, key, SortOrder::Descending, limit)
}

/// Ten states with the most distinct customers
pub fn by_state(subset: &Dataset) -> Ranking {
    rank_locations(subset, Location::State, LOCATION_LIMIT)
}

/// Ten cities with the most distinct customers
pub fn by_city(subset: &Dataset) -> Ranking {
    rank_locations(subset, Location::City, LOCATION_LIMIT)
}
