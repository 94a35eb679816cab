//! Order data: records, dataset snapshots and loaders

pub mod csv_reader;
pub mod dataset;
pub mod frame;
pub mod record;

pub use csv_reader::{load_csv, CsvOptions, CsvOrderReader};
pub use dataset::{filter, DateRange, Dataset};
pub use frame::{dataset_from_frame, load_parquet};
pub use record::{columns, OrderRecord};

use crate::error::{InsightsError, Result};
use std::path::Path;

/// Load a dataset, choosing the reader from the file extension
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") | Some("tsv") | None => {
            let options = CsvOptions {
                delimiter: if extension.as_deref() == Some("tsv") { b'\t' } else { b',' },
                ..CsvOptions::default()
            };
            CsvOrderReader::with_options(options).load_path(path)
        }
        Some("parquet") | Some("pq") => load_parquet(path),
        Some(other) => Err(InsightsError::ParseError(format!(
            "Unsupported data file extension: .{}",
            other
        ))),
    }
}
