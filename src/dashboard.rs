use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::debug;

use crate::{
    aggregate::Aggregates,
    data::StockRecord,
    error::{SdError, SdResult},
    filter::{self, FilterState},
};

/// Owns the record set and the filter, and keeps the derived data in step.
///
/// Every mutation reruns filter and aggregation in full; there is no
/// incremental update.
#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    records: Vec<StockRecord>,
    companies: Vec<String>,
    dates: Vec<NaiveDate>,

    filter: FilterState,
    filtered_count: usize,
    aggregates: Aggregates,
}

impl Dashboard {
    pub fn new(records: Vec<StockRecord>) -> Self {
        let companies = filter::available_companies(&records);
        let dates = filter::available_dates(&records);
        let filter = FilterState::initial(&records);

        let mut dashboard = Self {
            records,
            companies,
            dates,
            filter,
            filtered_count: 0,
            aggregates: Aggregates::default(),
        };
        dashboard.recompute();

        dashboard
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn filtered_records(&self) -> Vec<&StockRecord> {
        filter::compute_filtered_records(&self.records, &self.filter)
    }

    pub fn set_selected_companies(&mut self, companies: BTreeSet<String>) {
        self.filter.set_selected_companies(companies);
        self.recompute();
    }

    pub fn toggle_company(&mut self, company: &str) {
        self.filter.toggle_company(company);
        self.recompute();
    }

    pub fn toggle_all(&mut self) {
        self.filter.toggle_all(&self.companies);
        self.recompute();
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> SdResult<()> {
        self.filter.set_date_range(start, end)?;
        self.recompute();
        Ok(())
    }

    /// Date range by positions in [`Self::dates`], as a two-handle slider reports it.
    pub fn set_date_range_by_index(&mut self, start: usize, end: usize) -> SdResult<()> {
        match (self.dates.get(start), self.dates.get(end)) {
            (Some(start), Some(end)) => self.set_date_range(*start, *end),
            _ => Err(SdError::Invalid {
                code: "DATE_INDEX_OUT_OF_RANGE",
                message: format!(
                    "Date index {start}..={end} is outside 0..{}",
                    self.dates.len()
                ),
            }),
        }
    }

    /// Slider positions of the current range bounds.
    pub fn date_range_indices(&self) -> Option<(usize, usize)> {
        let range = self.filter.date_range()?;
        let start = self.dates.partition_point(|d| *d < range.start());
        let end = self
            .dates
            .partition_point(|d| *d <= range.end())
            .checked_sub(1)?;

        (start <= end).then_some((start, end))
    }

    fn recompute(&mut self) {
        let filtered = filter::compute_filtered_records(&self.records, &self.filter);
        self.filtered_count = filtered.len();
        self.aggregates = Aggregates::compute(&filtered);

        debug!(
            "Recomputed aggregates: {} line points, {} sectors, {} scatter points",
            self.aggregates.line.len(),
            self.aggregates.stacked.len(),
            self.aggregates.scatter.len()
        );
    }
}
