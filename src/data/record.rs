use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// One parsed CSV row: a company's market data for a single day.
///
/// Malformed numeric fields hold `f64::NAN` and an unparseable date is `None`,
/// so a bad row is carried along and excluded downstream rather than aborting
/// the load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockRecord {
    pub date: Option<NaiveDate>,
    pub company: String,
    pub sector: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub dividend_yield: f64,
    pub pe_ratio: f64,
    pub market_cap: f64,
    pub sentiment: String,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum Trend {
    Bearish,
    Bullish,
    Stable,
}

impl StockRecord {
    pub fn has_company(&self) -> bool {
        !self.company.is_empty()
    }

    /// Recognized trend category, `None` for anything outside the fixed set.
    pub fn trend(&self) -> Option<Trend> {
        Trend::from_str(self.sentiment.trim()).ok()
    }
}

impl Default for StockRecord {
    fn default() -> Self {
        Self {
            date: None,
            company: String::new(),
            sector: String::new(),
            open: f64::NAN,
            close: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            dividend_yield: f64::NAN,
            pe_ratio: f64::NAN,
            market_cap: f64::NAN,
            sentiment: String::new(),
        }
    }
}
