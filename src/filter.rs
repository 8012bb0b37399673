use std::collections::BTreeSet;

use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    data::StockRecord,
    error::{SdError, SdResult},
    utils::{datetime::date_to_str, text::compare_natural},
};

/// Inclusive day-granularity bounds with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterState {
    selected_companies: BTreeSet<String>,
    date_range: Option<DateRange>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SdResult<Self> {
        if start > end {
            return Err(SdError::Invalid {
                code: "REVERSED_DATE_RANGE",
                message: format!(
                    "Start date {} is after end date {}",
                    date_to_str(&start),
                    date_to_str(&end)
                ),
            });
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl FilterState {
    pub fn new(selected_companies: BTreeSet<String>, date_range: Option<DateRange>) -> Self {
        Self {
            selected_companies,
            date_range,
        }
    }

    /// All known companies and the full date span of the records.
    pub fn initial(records: &[StockRecord]) -> Self {
        let dates = available_dates(records);
        let date_range = match (dates.first(), dates.last()) {
            (Some(start), Some(end)) => Some(DateRange {
                start: *start,
                end: *end,
            }),
            _ => None,
        };

        Self {
            selected_companies: available_companies(records).into_iter().collect(),
            date_range,
        }
    }

    pub fn selected_companies(&self) -> &BTreeSet<String> {
        &self.selected_companies
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    pub fn is_selected(&self, company: &str) -> bool {
        self.selected_companies.contains(company)
    }

    pub fn set_selected_companies(&mut self, companies: BTreeSet<String>) {
        self.selected_companies = companies;
    }

    pub fn toggle_company(&mut self, company: &str) {
        if !self.selected_companies.remove(company) {
            self.selected_companies.insert(company.to_string());
        }
    }

    /// Selects every company, or clears the selection when all are already selected.
    pub fn toggle_all(&mut self, companies: &[String]) {
        let all_selected = companies
            .iter()
            .all(|company| self.selected_companies.contains(company));

        if all_selected {
            self.selected_companies.clear();
        } else {
            self.selected_companies = companies.iter().cloned().collect();
        }
    }

    /// Replaces both bounds. A reversed range is rejected and leaves the state untouched.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> SdResult<()> {
        self.date_range = Some(DateRange::new(start, end)?);
        Ok(())
    }

    pub fn matches(&self, record: &StockRecord) -> bool {
        match (&self.date_range, &record.date) {
            (Some(range), Some(date)) => {
                range.contains(date) && self.selected_companies.contains(&record.company)
            }
            _ => false,
        }
    }
}

pub fn compute_filtered_records<'a>(
    records: &'a [StockRecord],
    state: &FilterState,
) -> Vec<&'a StockRecord> {
    let filtered: Vec<&StockRecord> = records.iter().filter(|r| state.matches(r)).collect();
    debug!("Filtered {} of {} records", filtered.len(), records.len());

    filtered
}

/// Distinct non-empty company names in natural order.
pub fn available_companies(records: &[StockRecord]) -> Vec<String> {
    let mut companies: Vec<String> = records
        .iter()
        .filter(|r| r.has_company())
        .map(|r| r.company.clone())
        .unique()
        .collect();
    companies.par_sort_by(|a, b| compare_natural(a, b));

    companies
}

/// Distinct valid dates, ascending.
pub fn available_dates(records: &[StockRecord]) -> Vec<NaiveDate> {
    records.iter().filter_map(|r| r.date).unique().sorted().collect()
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use proptest::prelude::*;

    use super::*;

    const COMPANIES: &[&str] = &["Acme", "Globex", "Initech", ""];

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(company: &str, day: &str) -> StockRecord {
        StockRecord {
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
            company: company.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<StockRecord> {
        let mut records = vec![];
        for company in ["Acme", "Globex", "Initech"] {
            for day in ["2023-01-01", "2023-01-02", "2023-01-03", "2023-01-04"] {
                records.push(record(company, day));
            }
        }
        records.push(record("Acme", "garbage"));
        records.push(record("", "2023-01-02"));
        records
    }

    #[test]
    fn test_date_range_new() {
        assert!(DateRange::new(date("2023-01-01"), date("2023-01-01")).is_ok());

        let err = DateRange::new(date("2023-01-02"), date("2023-01-01")).unwrap_err();
        assert_eq!(err.code(), Some("REVERSED_DATE_RANGE"));
    }

    #[test]
    fn test_initial() {
        let records = sample();
        let state = FilterState::initial(&records);

        assert_eq!(state.selected_companies().len(), 3);
        assert!(!state.is_selected(""));
        assert_eq!(
            state.date_range(),
            Some(DateRange::new(date("2023-01-01"), date("2023-01-04")).unwrap())
        );
        // Everything with a valid date and a company passes.
        assert_eq!(compute_filtered_records(&records, &state).len(), 12);
    }

    #[test]
    fn test_initial_empty() {
        let state = FilterState::initial(&[]);

        assert!(state.selected_companies().is_empty());
        assert_eq!(state.date_range(), None);
        assert!(compute_filtered_records(&[], &state).is_empty());
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let records = sample();
        let mut state = FilterState::initial(&records);
        state.set_selected_companies(BTreeSet::new());

        assert!(compute_filtered_records(&records, &state).is_empty());
    }

    #[test]
    fn test_no_false_positives_or_negatives() {
        let records = sample();
        let mut state = FilterState::initial(&records);
        state.set_selected_companies(["Acme".to_string(), "Initech".to_string()].into());
        state
            .set_date_range(date("2023-01-02"), date("2023-01-03"))
            .unwrap();

        let filtered = compute_filtered_records(&records, &state);
        for r in &filtered {
            let d = r.date.unwrap();
            assert!(date("2023-01-02") <= d && d <= date("2023-01-03"));
            assert!(r.company == "Acme" || r.company == "Initech");
        }

        let expected = records
            .iter()
            .filter(|r| {
                matches!(r.date, Some(d) if d >= date("2023-01-02") && d <= date("2023-01-03"))
                    && (r.company == "Acme" || r.company == "Initech")
            })
            .count();
        assert_eq!(filtered.len(), expected);
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_single_company_single_day() {
        let records = sample();
        let mut state = FilterState::initial(&records);
        state.set_selected_companies(["Globex".to_string()].into());
        state
            .set_date_range(date("2023-01-03"), date("2023-01-03"))
            .unwrap();

        let filtered = compute_filtered_records(&records, &state);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].company, "Globex");
        assert_eq!(filtered[0].date, Some(date("2023-01-03")));
    }

    #[test]
    fn test_invalid_date_never_matches() {
        let records = vec![record("Acme", "garbage")];
        let mut state = FilterState::initial(&records);
        state.set_date_range(NaiveDate::MIN, NaiveDate::MAX).unwrap();

        assert!(compute_filtered_records(&records, &state).is_empty());
    }

    #[test]
    fn test_set_date_range_reversed_keeps_state() {
        let records = sample();
        let mut state = FilterState::initial(&records);
        let before = state.date_range();

        assert!(
            state
                .set_date_range(date("2023-01-04"), date("2023-01-01"))
                .is_err()
        );
        assert_eq!(state.date_range(), before);
    }

    #[test]
    fn test_toggle() {
        let companies = vec!["Acme".to_string(), "Globex".to_string()];
        let mut state = FilterState::new(companies.iter().cloned().collect(), None);

        state.toggle_company("Acme");
        assert!(!state.is_selected("Acme"));
        state.toggle_company("Acme");
        assert!(state.is_selected("Acme"));

        state.toggle_all(&companies);
        assert!(state.selected_companies().is_empty());
        state.toggle_all(&companies);
        assert_eq!(state.selected_companies().len(), 2);
    }

    #[test]
    fn test_available_companies_and_dates() {
        let records = vec![
            record("Company 10", "2023-01-02"),
            record("Company 2", "2023-01-01"),
            record("", "2023-01-03"),
            record("Company 2", "bad"),
        ];

        assert_eq!(available_companies(&records), ["Company 2", "Company 10"]);
        assert_eq!(
            available_dates(&records),
            [date("2023-01-01"), date("2023-01-02"), date("2023-01-03")]
        );
    }

    fn day(offset: u64) -> NaiveDate {
        date("2023-01-01") + Days::new(offset)
    }

    fn arb_record() -> impl Strategy<Value = StockRecord> {
        (
            prop::sample::select(COMPANIES.to_vec()),
            prop::option::weighted(0.8, 0u64..10),
        )
            .prop_map(|(company, offset)| StockRecord {
                date: offset.map(day),
                company: company.to_string(),
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn test_filtered_records_match_predicate(
            records in prop::collection::vec(arb_record(), 0..40),
            selected in prop::collection::btree_set(prop::sample::select(COMPANIES.to_vec()), 0..4),
            (a, b) in (0u64..10, 0u64..10),
        ) {
            let (start, end) = (day(a.min(b)), day(a.max(b)));
            let selected: BTreeSet<String> = selected.into_iter().map(str::to_string).collect();
            let mut state = FilterState::new(selected.clone(), None);
            state.set_date_range(start, end).unwrap();

            let filtered: Vec<*const StockRecord> = compute_filtered_records(&records, &state)
                .into_iter()
                .map(|r| r as *const StockRecord)
                .collect();
            let expected: Vec<*const StockRecord> = records
                .iter()
                .filter(|r| {
                    selected.contains(&r.company)
                        && matches!(r.date, Some(d) if start <= d && d <= end)
                })
                .map(|r| r as *const StockRecord)
                .collect();

            prop_assert_eq!(filtered, expected);
        }

        #[test]
        fn test_empty_selection_filters_everything(
            records in prop::collection::vec(arb_record(), 0..40),
        ) {
            let mut state = FilterState::initial(&records);
            state.set_selected_companies(BTreeSet::new());

            prop_assert!(compute_filtered_records(&records, &state).is_empty());
        }
    }
}
