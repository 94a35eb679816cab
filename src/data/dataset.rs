//! Immutable dataset snapshot and the date-range filter

use super::record::OrderRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// An inverted range matches nothing
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Read-only snapshot of order records.
///
/// Aggregates borrow a `Dataset` and never mutate it, so one snapshot can be
/// shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    /// Create a dataset from already validated records
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest purchase dates, `None` for an empty dataset
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().map(OrderRecord::purchase_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Full date range covered by the dataset
    pub fn full_range(&self) -> Option<DateRange> {
        self.date_bounds().map(|(start, end)| DateRange::new(start, end))
    }

    /// Latest purchase date in the dataset
    pub fn max_purchase_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(OrderRecord::purchase_date).max()
    }

    /// Stable sort by purchase timestamp
    pub fn sort_by_purchase_time(&mut self) {
        self.records.sort_by_key(|r| r.order_purchase_timestamp);
    }

    /// Rows purchased within `range`, in input order
    pub fn filter_by_range(&self, range: DateRange) -> Dataset {
        if range.is_empty() {
            log::warn!(
                "Date range is inverted ({} > {}), selecting no rows",
                range.start,
                range.end
            );
            return Dataset::default();
        }

        let records: Vec<OrderRecord> = self
            .records
            .iter()
            .filter(|r| range.contains(r.purchase_date()))
            .cloned()
            .collect();

        log::debug!(
            "Filtered {} of {} rows to {}..={}",
            records.len(),
            self.records.len(),
            range.start,
            range.end
        );

        Dataset::new(records)
    }

    /// Rows purchased between `start` and `end` inclusive, in input order
    pub fn filter_by_date(&self, start: NaiveDate, end: NaiveDate) -> Dataset {
        self.filter_by_range(DateRange::new(start, end))
    }
}

impl From<Vec<OrderRecord>> for Dataset {
    fn from(records: Vec<OrderRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<OrderRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Restrict `dataset` to purchases dated within `[start, end]`.
///
/// Only the calendar date of each purchase is compared. An inverted range
/// yields an empty dataset.
pub fn filter(dataset: &Dataset, start: NaiveDate, end: NaiveDate) -> Dataset {
    dataset.filter_by_date(start, end)
}
