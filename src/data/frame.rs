//! polars interop: build a dataset from a `DataFrame` or parquet file

use super::dataset::Dataset;
use super::record::{columns, validate, OrderRecord};
use crate::error::{InsightsError, Result};
use crate::types::{Price, ReviewScore, Timestamp};
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use std::path::Path;

/// Days from 0001-01-01 (CE) to the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name).map_err(|_| InsightsError::missing_column(name))
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column(df, name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = column(df, name)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// True when a numeric column arrives as text; anything neither text nor numeric is rejected
fn is_text_column(df: &DataFrame, name: &str) -> Result<bool> {
    match column(df, name)?.dtype() {
        DataType::String => Ok(true),
        dtype if dtype.is_numeric() => Ok(false),
        dtype => Err(InsightsError::column_type(
            name,
            dtype.to_string(),
            "a numeric or string column",
        )),
    }
}

fn text_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    string_values(df, name)?
        .iter()
        .enumerate()
        .map(|(i, v)| validate::text(name, i + 1, v.as_deref()))
        .collect()
}

fn price_values(df: &DataFrame) -> Result<Vec<Price>> {
    if is_text_column(df, columns::PRICE)? {
        string_values(df, columns::PRICE)?
            .iter()
            .enumerate()
            .map(|(i, v)| validate::price_str(i + 1, v.as_deref()))
            .collect()
    } else {
        float_values(df, columns::PRICE)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| validate::price(i + 1, v))
            .collect()
    }
}

fn review_values(df: &DataFrame) -> Result<Vec<Option<ReviewScore>>> {
    if is_text_column(df, columns::REVIEW_SCORE)? {
        string_values(df, columns::REVIEW_SCORE)?
            .iter()
            .enumerate()
            .map(|(i, v)| validate::review_str(i + 1, v.as_deref()))
            .collect()
    } else {
        float_values(df, columns::REVIEW_SCORE)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| validate::review(i + 1, v))
            .collect()
    }
}

fn datetime_from_epoch(value: i64, unit: TimeUnit) -> Option<Timestamp> {
    let (ticks_per_sec, nanos_per_tick) = match unit {
        TimeUnit::Nanoseconds => (1_000_000_000, 1),
        TimeUnit::Microseconds => (1_000_000, 1_000),
        TimeUnit::Milliseconds => (1_000, 1_000_000),
    };
    let secs = value.div_euclid(ticks_per_sec);
    let nanos = (value.rem_euclid(ticks_per_sec) * nanos_per_tick) as u32;
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

fn date_from_epoch_days(days: i32) -> Option<Timestamp> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn null_timestamp(row: usize) -> InsightsError {
    InsightsError::invalid_value(
        columns::ORDER_PURCHASE_TIMESTAMP,
        row,
        "",
        "missing or out-of-range timestamp",
    )
}

fn timestamp_values(df: &DataFrame) -> Result<Vec<Timestamp>> {
    let series = column(df, columns::ORDER_PURCHASE_TIMESTAMP)?;
    match series.dtype() {
        DataType::Datetime(_, Some(_)) => Err(InsightsError::column_type(
            columns::ORDER_PURCHASE_TIMESTAMP,
            series.dtype().to_string(),
            "a datetime without time zone",
        )),
        DataType::Datetime(unit, None) => {
            let unit = *unit;
            let physical = series.cast(&DataType::Int64)?;
            physical
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.and_then(|v| datetime_from_epoch(v, unit))
                        .ok_or_else(|| null_timestamp(i + 1))
                })
                .collect()
        }
        DataType::Date => {
            let physical = series.cast(&DataType::Int32)?;
            physical
                .i32()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.and_then(date_from_epoch_days)
                        .ok_or_else(|| null_timestamp(i + 1))
                })
                .collect()
        }
        DataType::String => string_values(df, columns::ORDER_PURCHASE_TIMESTAMP)?
            .iter()
            .enumerate()
            .map(|(i, v)| validate::timestamp(i + 1, v.as_deref()))
            .collect(),
        dtype => Err(InsightsError::column_type(
            columns::ORDER_PURCHASE_TIMESTAMP,
            dtype.to_string(),
            "a datetime, date or string column",
        )),
    }
}

/// Build a dataset from a `DataFrame` holding the order table.
///
/// Rows keep the frame's order. Every required column must be present;
/// extra columns are ignored.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    for name in columns::REQUIRED {
        column(df, name)?;
    }

    let order_ids = text_values(df, columns::ORDER_ID)?;
    let customer_ids = text_values(df, columns::CUSTOMER_ID)?;
    let categories = string_values(df, columns::PRODUCT_CATEGORY_NAME)?;
    let seller_ids = text_values(df, columns::SELLER_ID)?;
    let reviews = review_values(df)?;
    let states = text_values(df, columns::CUSTOMER_STATE)?;
    let cities = text_values(df, columns::CUSTOMER_CITY)?;
    let timestamps = timestamp_values(df)?;
    let prices = price_values(df)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(OrderRecord {
            order_id: order_ids[i].clone(),
            customer_id: customer_ids[i].clone(),
            product_category_name: validate::optional_text(categories[i].as_deref()),
            seller_id: seller_ids[i].clone(),
            review_score: reviews[i],
            customer_state: states[i].clone(),
            customer_city: cities[i].clone(),
            order_purchase_timestamp: timestamps[i],
            price: prices[i],
        });
    }

    log::debug!("Converted DataFrame with {} rows into dataset", records.len());
    Ok(Dataset::new(records))
}

/// Load a dataset from a parquet file, sorted by purchase timestamp
pub fn load_parquet(path: &Path) -> Result<Dataset> {
    log::info!("Loading order data from {}", path.display());
    let file = std::fs::File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    let mut dataset = dataset_from_frame(&df)?;
    dataset.sort_by_purchase_time();
    log::info!("Loaded {} order rows", dataset.len());
    Ok(dataset)
}
