use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{ByteRecord, ReaderBuilder};
use log::{debug, warn};

use crate::{
    data::StockRecord,
    error::SdResult,
    utils::{datetime::date_from_str, text::normalize_header},
};

const COLUMN_DATE: &str = "date";
const COLUMN_OPEN: &str = "open";
const COLUMN_CLOSE: &str = "close";
const COLUMN_COMPANY: &str = "company";
const COLUMN_HIGH: &str = "high";
const COLUMN_LOW: &str = "low";
const COLUMN_SECTOR: &str = "sector";
const COLUMN_DIVIDEND_YIELD: &str = "dividend yield";
const COLUMN_PE_RATIO: &str = "pe ratio";
const COLUMN_MARKET_CAP: &str = "market cap";
const COLUMN_SENTIMENT: &str = "sentiment";
const COLUMN_TREND: &str = "trend";

pub fn load_records(path: &Path) -> SdResult<Vec<StockRecord>> {
    let file = File::open(path)?;
    let records = parse_records(file)?;

    debug!(
        "Loaded {} records from '{}'",
        records.len(),
        path.to_string_lossy()
    );

    Ok(records)
}

/// Parses CSV rows into records. Only unreadable input is an error, bad
/// fields inside a row are coerced.
pub fn parse_records<R: Read>(reader: R) -> SdResult<Vec<StockRecord>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: HashMap<String, usize> = csv_reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, header)| (normalize_header(&String::from_utf8_lossy(header)), i))
        .collect();

    if !columns.is_empty() && !columns.contains_key(COLUMN_DATE) {
        warn!("No 'Date' column, every record will fall outside the date range");
    }

    let mut records: Vec<StockRecord> = vec![];
    let mut row = ByteRecord::new();
    while csv_reader.read_byte_record(&mut row)? {
        records.push(parse_row(&row, &columns));
    }

    Ok(records)
}

fn parse_row(row: &ByteRecord, columns: &HashMap<String, usize>) -> StockRecord {
    let field = |name: &str| -> String {
        columns
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
            .unwrap_or_default()
    };

    let sentiment = if columns.contains_key(COLUMN_SENTIMENT) {
        field(COLUMN_SENTIMENT)
    } else {
        field(COLUMN_TREND)
    };

    StockRecord {
        date: date_from_str(&field(COLUMN_DATE)).ok(),
        company: field(COLUMN_COMPANY).trim().to_string(),
        sector: field(COLUMN_SECTOR),
        open: parse_number(&field(COLUMN_OPEN)),
        close: parse_number(&field(COLUMN_CLOSE)),
        high: parse_number(&field(COLUMN_HIGH)),
        low: parse_number(&field(COLUMN_LOW)),
        dividend_yield: parse_number(&field(COLUMN_DIVIDEND_YIELD)),
        pe_ratio: parse_number(&field(COLUMN_PE_RATIO)),
        market_cap: parse_number(&field(COLUMN_MARKET_CAP)),
        sentiment,
    }
}

/// Decimal text to `f64`, anything else (empty, `inf` and `NaN` spellings
/// included) to NaN.
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}
