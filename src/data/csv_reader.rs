//! CSV loader for the flattened order table

use super::dataset::Dataset;
use super::record::{columns, validate, OrderRecord};
use crate::error::{InsightsError, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// CSV reader options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Sort rows by purchase timestamp after loading
    pub sort_by_purchase_time: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            sort_by_purchase_time: true,
        }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    order_id: usize,
    customer_id: usize,
    category: usize,
    seller_id: usize,
    review_score: usize,
    state: usize,
    city: usize,
    timestamp: usize,
    price: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        Ok(Self {
            order_id: find_column(headers, columns::ORDER_ID)?,
            customer_id: find_column(headers, columns::CUSTOMER_ID)?,
            category: find_column(headers, columns::PRODUCT_CATEGORY_NAME)?,
            seller_id: find_column(headers, columns::SELLER_ID)?,
            review_score: find_column(headers, columns::REVIEW_SCORE)?,
            state: find_column(headers, columns::CUSTOMER_STATE)?,
            city: find_column(headers, columns::CUSTOMER_CITY)?,
            timestamp: find_column(headers, columns::ORDER_PURCHASE_TIMESTAMP)?,
            price: find_column(headers, columns::PRICE)?,
        })
    }

    fn parse(&self, record: &csv::StringRecord, row: usize) -> Result<OrderRecord> {
        Ok(OrderRecord {
            order_id: validate::text(columns::ORDER_ID, row, record.get(self.order_id))?,
            customer_id: validate::text(columns::CUSTOMER_ID, row, record.get(self.customer_id))?,
            product_category_name: validate::optional_text(record.get(self.category)),
            seller_id: validate::text(columns::SELLER_ID, row, record.get(self.seller_id))?,
            review_score: validate::review_str(row, record.get(self.review_score))?,
            customer_state: validate::text(columns::CUSTOMER_STATE, row, record.get(self.state))?,
            customer_city: validate::text(columns::CUSTOMER_CITY, row, record.get(self.city))?,
            order_purchase_timestamp: validate::timestamp(row, record.get(self.timestamp))?,
            price: validate::price_str(row, record.get(self.price))?,
        })
    }
}

/// Find column index by name
fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| InsightsError::missing_column(name))
}

/// Reader turning CSV text into a validated [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct CsvOrderReader {
    options: CsvOptions,
}

impl CsvOrderReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Load a dataset from a CSV file
    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        log::info!("Loading order data from {}", path.display());
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    /// Load a dataset from any CSV source.
    ///
    /// Fails on the first missing column or malformed cell; no row is
    /// skipped silently.
    pub fn load_reader<R: Read>(&self, source: R) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.options.delimiter)
            .flexible(false)
            .from_reader(source);

        let headers = rdr.headers()?.clone();
        let index = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            records.push(index.parse(&record, i + 1)?);
        }

        let mut dataset = Dataset::new(records);
        if self.options.sort_by_purchase_time {
            dataset.sort_by_purchase_time();
        }

        log::info!("Loaded {} order rows", dataset.len());
        Ok(dataset)
    }
}

/// Load a dataset from a CSV file with default options
pub fn load_csv(path: &Path) -> Result<Dataset> {
    CsvOrderReader::new().load_path(path)
}
