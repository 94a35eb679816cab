//! RFM (recency, frequency, monetary) customer segmentation

use crate::data::Dataset;
use crate::error::Result;
use crate::types::Price;
use chrono::NaiveDate;
use hashbrown::{HashMap, HashSet};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Customers shown in each RFM leader table
pub const RFM_LIMIT: usize = 5;

/// RFM metrics of one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRow {
    pub customer_id: String,
    /// Distinct orders placed
    pub frequency: usize,
    /// Total spend over all line items
    pub monetary: Price,
    /// Days between the dataset's latest purchase date and this customer's
    pub recency: u32,
}

/// Averages over an RFM table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmSummary {
    pub customers: usize,
    /// Mean recency in days, rounded to one decimal
    pub average_recency: f64,
    /// Mean frequency, rounded to two decimals
    pub average_frequency: f64,
    pub average_monetary: Price,
}

/// One RFM row per customer, in first-encountered order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RfmTable {
    /// Latest purchase date of the whole dataset
    pub anchor: Option<NaiveDate>,
    pub rows: Vec<RfmRow>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl RfmTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, customer_id: &str) -> Option<&RfmRow> {
        self.rows.iter().find(|r| r.customer_id == customer_id)
    }

    fn leaders<F>(&self, n: usize, compare: F) -> Vec<&RfmRow>
    where
        F: Fn(&RfmRow, &RfmRow) -> Ordering,
    {
        let mut rows: Vec<&RfmRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| compare(a, b));
        rows.truncate(n);
        rows
    }

    /// Most recent customers first
    pub fn by_recency(&self, n: usize) -> Vec<&RfmRow> {
        self.leaders(n, |a, b| a.recency.cmp(&b.recency))
    }

    /// Most frequent customers first
    pub fn by_frequency(&self, n: usize) -> Vec<&RfmRow> {
        self.leaders(n, |a, b| b.frequency.cmp(&a.frequency))
    }

    /// Highest spending customers first
    pub fn by_monetary(&self, n: usize) -> Vec<&RfmRow> {
        self.leaders(n, |a, b| b.monetary.total_cmp(&a.monetary))
    }

    /// Table averages, `None` when there are no customers
    pub fn summary(&self) -> Option<RfmSummary> {
        if self.rows.is_empty() {
            return None;
        }
        let n = self.rows.len() as f64;
        let recency: f64 = self.rows.iter().map(|r| r.recency as f64).sum();
        let frequency: f64 = self.rows.iter().map(|r| r.frequency as f64).sum();
        let monetary: f64 = self.rows.iter().map(|r| r.monetary).sum();

        Some(RfmSummary {
            customers: self.rows.len(),
            average_recency: round_to(recency / n, 1),
            average_frequency: round_to(frequency / n, 2),
            average_monetary: monetary / n,
        })
    }

    /// Export as a `DataFrame` with customer_id, frequency, monetary, recency
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let ids: Vec<&str> = self.rows.iter().map(|r| r.customer_id.as_str()).collect();
        let frequency: Vec<u64> = self.rows.iter().map(|r| r.frequency as u64).collect();
        let monetary: Vec<f64> = self.rows.iter().map(|r| r.monetary).collect();
        let recency: Vec<u32> = self.rows.iter().map(|r| r.recency).collect();

        let df = DataFrame::new(vec![
            Series::new("customer_id", ids),
            Series::new("frequency", frequency),
            Series::new("monetary", monetary),
            Series::new("recency", recency),
        ])?;
        Ok(df)
    }
}

struct CustomerTotals<'a> {
    customer_id: &'a str,
    orders: HashSet<&'a str>,
    monetary: Price,
    last_purchase: NaiveDate,
}

/// Per-customer RFM metrics over the full dataset.
///
/// Recency is measured against one anchor, the latest purchase date in
/// `full`, so it should be given the unfiltered dataset rather than a
/// date-range subset.
pub fn rfm(full: &Dataset) -> RfmTable {
    let Some(anchor) = full.max_purchase_date() else {
        return RfmTable::default();
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CustomerTotals> = Vec::new();

    for record in full {
        let date = record.purchase_date();
        let i = *index.entry(record.customer_id.as_str()).or_insert_with(|| {
            totals.push(CustomerTotals {
                customer_id: &record.customer_id,
                orders: HashSet::new(),
                monetary: 0.0,
                last_purchase: date,
            });
            totals.len() - 1
        });

        let entry = &mut totals[i];
        entry.orders.insert(&record.order_id);
        entry.monetary += record.price;
        entry.last_purchase = entry.last_purchase.max(date);
    }

    let rows: Vec<RfmRow> = totals
        .into_iter()
        .map(|t| RfmRow {
            customer_id: t.customer_id.to_string(),
            frequency: t.orders.len(),
            monetary: t.monetary,
            recency: (anchor - t.last_purchase).num_days() as u32,
        })
        .collect();

    log::debug!("Computed RFM for {} customers anchored at {}", rows.len(), anchor);

    RfmTable {
        anchor: Some(anchor),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OrderRecord;
    use crate::types::parse_timestamp;
    use approx::assert_relative_eq;

    fn purchase(order: &str, customer: &str, ts: &str, price: f64) -> OrderRecord {
        OrderRecord::new(order, customer, parse_timestamp(ts).unwrap()).with_price(price)
    }

    #[test]
    fn test_customer_example() {
        let ds = Dataset::new(vec![
            purchase("o1", "C", "2023-01-01 09:00:00", 10.0),
            purchase("o2", "C", "2023-03-01 18:30:00", 20.0),
            purchase("o3", "D", "2023-03-10 23:59:00", 5.0),
        ]);

        let table = rfm(&ds);
        assert_eq!(table.anchor, NaiveDate::from_ymd_opt(2023, 3, 10));

        let c = table.get("C").unwrap();
        assert_eq!(c.frequency, 2);
        assert_relative_eq!(c.monetary, 30.0);
        assert_eq!(c.recency, 9);
        assert_eq!(table.get("D").unwrap().recency, 0);
    }

    #[test]
    fn test_frequency_counts_distinct_orders() {
        let ds = Dataset::new(vec![
            purchase("o1", "C", "2023-01-01", 1.5),
            purchase("o1", "C", "2023-01-01", 2.5),
            purchase("o2", "C", "2023-01-02", 3.0),
        ]);

        let row = rfm(&ds).rows.remove(0);
        assert_eq!(row.frequency, 2);
        assert_relative_eq!(row.monetary, 7.0);
    }

    #[test]
    fn test_rows_in_first_seen_order() {
        let ds = Dataset::new(vec![
            purchase("o1", "B", "2023-01-01", 1.0),
            purchase("o2", "A", "2023-01-02", 1.0),
            purchase("o3", "B", "2023-01-03", 1.0),
        ]);
        let ids: Vec<String> = rfm(&ds).rows.into_iter().map(|r| r.customer_id).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_leaders() {
        let ds = Dataset::new(vec![
            purchase("o1", "A", "2023-01-01", 100.0),
            purchase("o2", "B", "2023-02-01", 5.0),
            purchase("o3", "B", "2023-02-02", 5.0),
            purchase("o4", "C", "2023-03-01", 50.0),
        ]);
        let table = rfm(&ds);

        let ids = |rows: Vec<&RfmRow>| {
            rows.iter()
                .map(|r| r.customer_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(table.by_recency(5)), vec!["C", "B", "A"]);
        assert_eq!(ids(table.by_frequency(1)), vec!["B"]);
        assert_eq!(ids(table.by_monetary(2)), vec!["A", "C"]);
        // Ties stay in first-seen order
        assert_eq!(ids(table.by_frequency(3)), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_summary() {
        let ds = Dataset::new(vec![
            purchase("o1", "A", "2023-01-01", 10.0),
            purchase("o2", "B", "2023-01-03", 20.0),
            purchase("o3", "B", "2023-01-04", 30.0),
        ]);
        let summary = rfm(&ds).summary().unwrap();
        assert_eq!(summary.customers, 2);
        assert_relative_eq!(summary.average_recency, 1.5);
        assert_relative_eq!(summary.average_frequency, 1.5);
        assert_relative_eq!(summary.average_monetary, 30.0);
    }

    #[test]
    fn test_empty_dataset() {
        let table = rfm(&Dataset::default());
        assert!(table.is_empty());
        assert!(table.anchor.is_none());
        assert!(table.summary().is_none());
        assert!(table.by_recency(RFM_LIMIT).is_empty());
    }

    #[test]
    fn test_to_dataframe() {
        let ds = Dataset::new(vec![purchase("o1", "A", "2023-01-01", 10.0)]);
        let df = rfm(&ds).to_dataframe().unwrap();
        assert_eq!(df.shape(), (1, 4));
        assert_eq!(df.column("frequency").unwrap().u64().unwrap().get(0), Some(1));
    }
}
