use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::error::{SdError, SdResult};

const SECS_PER_DAY: f64 = 86_400.0;

pub fn date_from_str(s: &str) -> SdResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y%m%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
        "%Y-%m-%d %H:%M:%S",
    ];

    let s = s.trim();

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(SdError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Days since 0001-01-01 as a continuous axis value.
pub fn date_to_days(date: &NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn datetime_to_days(datetime: &NaiveDateTime) -> f64 {
    let midnight = datetime.date().and_time(chrono::NaiveTime::MIN);
    date_to_days(&datetime.date())
        + (*datetime - midnight).num_milliseconds() as f64 / 1000.0 / SECS_PER_DAY
}

/// Inverse of [`datetime_to_days`], `None` when out of the representable range.
pub fn datetime_from_days(days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }

    let whole = days.floor();
    let date = NaiveDate::from_num_days_from_ce_opt(whole as i32)?;
    let millis = ((days - whole) * SECS_PER_DAY * 1000.0).round() as i64;

    date.and_time(chrono::NaiveTime::MIN)
        .checked_add_signed(Duration::milliseconds(millis))
}
