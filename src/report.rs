//! Report assembly: every aggregate for one date range

use crate::analytics::{
    rank_categories, rank_locations, rank_sellers, rfm, Location, Ranking, RfmRow, RfmSummary,
    RfmTable, SortOrder,
};
use crate::config::ReportConfig;
use crate::data::{DateRange, Dataset};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// RFM section of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmReport {
    pub summary: Option<RfmSummary>,
    pub by_recency: Vec<RfmRow>,
    pub by_frequency: Vec<RfmRow>,
    pub by_monetary: Vec<RfmRow>,
}

impl RfmReport {
    pub fn from_table(table: &RfmTable, limit: usize) -> Self {
        let owned = |rows: Vec<&RfmRow>| -> Vec<RfmRow> { rows.into_iter().cloned().collect() };
        Self {
            summary: table.summary(),
            by_recency: owned(table.by_recency(limit)),
            by_frequency: owned(table.by_frequency(limit)),
            by_monetary: owned(table.by_monetary(limit)),
        }
    }
}

/// All summary tables for one viewing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    /// Viewing window, `None` when the dataset was empty
    pub range: Option<DateRange>,
    /// Rows inside the window
    pub rows_in_range: usize,
    pub best_products: Ranking,
    pub worst_products: Ranking,
    pub best_sellers: Ranking,
    pub customers_by_state: Ranking,
    pub customers_by_city: Ranking,
    /// Computed over the full dataset regardless of the window
    pub rfm: RfmReport,
}

impl InsightsReport {
    /// Build the report for `range`.
    ///
    /// Rankings use the rows inside `range`; the RFM section always uses all
    /// of `full`. The aggregates only borrow the snapshots, so they run in
    /// parallel.
    pub fn build(full: &Dataset, range: DateRange, config: &ReportConfig) -> Result<Self> {
        config.validate()?;
        let subset = full.filter_by_range(range);
        log::info!(
            "Building report for {}..={} ({} of {} rows)",
            range.start,
            range.end,
            subset.len(),
            full.len()
        );
        Ok(Self::assemble(full, &subset, Some(range), config))
    }

    /// Build the report over the dataset's full date range
    pub fn build_full(full: &Dataset, config: &ReportConfig) -> Result<Self> {
        match full.full_range() {
            Some(range) => Self::build(full, range, config),
            None => {
                config.validate()?;
                log::warn!("Dataset is empty, building an empty report");
                Ok(Self::assemble(full, full, None, config))
            }
        }
    }

    fn assemble(
        full: &Dataset,
        subset: &Dataset,
        range: Option<DateRange>,
        config: &ReportConfig,
    ) -> Self {
        let ((best_products, worst_products), ((best_sellers, by_state), (by_city, rfm_table))) =
            rayon::join(
                || {
                    rayon::join(
                        || rank_categories(subset, SortOrder::Descending, config.category_limit),
                        || rank_categories(subset, SortOrder::Ascending, config.category_limit),
                    )
                },
                || {
                    rayon::join(
                        || {
                            rayon::join(
                                || rank_sellers(subset, config.seller_limit),
                                || rank_locations(subset, Location::State, config.location_limit),
                            )
                        },
                        || {
                            rayon::join(
                                || rank_locations(subset, Location::City, config.location_limit),
                                || rfm(full),
                            )
                        },
                    )
                },
            );

        Self {
            range,
            rows_in_range: subset.len(),
            best_products,
            worst_products,
            best_sellers,
            customers_by_state: by_state,
            customers_by_city: by_city,
            rfm: RfmReport::from_table(&rfm_table, config.rfm_limit),
        }
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
