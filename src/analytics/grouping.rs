//! Grouping keys, tallies and stable ranking
//!
//! Two counting strategies live in separate functions: [`count_rows`]
//! counts every row of a group, [`count_distinct`] counts distinct values
//! of a second key within each group. Both return
//! groups in first-encountered order, which is what makes every ranking's
//! tie-break stable.

use crate::data::{columns, Dataset, OrderRecord};
use crate::error::Result;
use hashbrown::{HashMap, HashSet};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of columns a dataset can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Category,
    Seller,
    State,
    City,
    Customer,
}

impl GroupKey {
    /// Source column name
    pub fn column(self) -> &'static str {
        match self {
            GroupKey::Category => columns::PRODUCT_CATEGORY_NAME,
            GroupKey::Seller => columns::SELLER_ID,
            GroupKey::State => columns::CUSTOMER_STATE,
            GroupKey::City => columns::CUSTOMER_CITY,
            GroupKey::Customer => columns::CUSTOMER_ID,
        }
    }

    /// Key value of a record, `None` when the record has no value for it
    pub fn extract(self, record: &OrderRecord) -> Option<&str> {
        match self {
            GroupKey::Category => record.product_category_name.as_deref(),
            GroupKey::Seller => Some(record.seller_id.as_str()),
            GroupKey::State => Some(record.customer_state.as_str()),
            GroupKey::City => Some(record.customer_city.as_str()),
            GroupKey::Customer => Some(record.customer_id.as_str()),
        }
    }
}

/// Sort direction of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One group of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub name: String,
    pub count: usize,
}

/// Ranked groups with the key they were grouped by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub key: GroupKey,
    pub entries: Vec<RankedGroup>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&RankedGroup> {
        self.entries.first()
    }

    /// Count for a group name, if it made the ranking
    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.count)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Name of the count column in tabular output
    pub fn count_column(&self) -> &'static str {
        match self.key {
            GroupKey::Category => "quantity",
            GroupKey::State | GroupKey::City => "customer_count",
            GroupKey::Seller | GroupKey::Customer => "count",
        }
    }

    /// Export as a two-column `DataFrame`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.names();
        let counts: Vec<u64> = self.entries.iter().map(|e| e.count as u64).collect();
        let df = DataFrame::new(vec![
            Series::new(self.key.column(), names),
            Series::new(self.count_column(), counts),
        ])?;
        Ok(df)
    }
}

/// Row count per group, in first-encountered order.
///
/// Rows without a value for `key` are skipped.
pub fn count_rows<'a, I>(rows: I, key: GroupKey) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, usize)> = Vec::new();

    for record in rows {
        let Some(name) = key.extract(record) else {
            continue;
        };
        match index.get(name) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(name, groups.len());
                groups.push((name, 1));
            }
        }
    }

    groups
}

/// Distinct `of` values per `key` group, in first-encountered order
pub fn count_distinct<'a, I>(rows: I, key: GroupKey, of: GroupKey) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, HashSet<&'a str>)> = Vec::new();

    for record in rows {
        let (Some(name), Some(value)) = (key.extract(record), of.extract(record)) else {
            continue;
        };
        let i = *index.entry(name).or_insert_with(|| {
            groups.push((name, HashSet::new()));
            groups.len() - 1
        });
        groups[i].1.insert(value);
    }

    groups
        .into_iter()
        .map(|(name, members)| (name, members.len()))
        .collect()
}

/// Stable sort by count and truncate to `limit`.
///
/// Groups with equal counts keep their input order.
pub fn rank(groups: Vec<(&str, usize)>, key: GroupKey, order: SortOrder, limit: usize) -> Ranking {
    let mut groups = groups;
    match order {
        SortOrder::Ascending => groups.sort_by(|a, b| a.1.cmp(&b.1)),
        SortOrder::Descending => groups.sort_by(|a, b| b.1.cmp(&a.1)),
    }
    groups.truncate(limit);

    Ranking {
        key,
        entries: groups
            .into_iter()
            .map(|(name, count)| RankedGroup {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}

/// Distinct customers in a dataset
pub fn distinct_customers(dataset: &Dataset) -> usize {
    dataset
        .iter()
        .map(|r| r.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct orders in a dataset
pub fn distinct_orders(dataset: &Dataset) -> usize {
    dataset
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}
