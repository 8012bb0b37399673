use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{data::StockRecord, utils::stats::nan_mean};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub avg_high: f64,
    pub avg_low: f64,
}

impl LinePoint {
    pub fn is_renderable(&self) -> bool {
        !self.avg_high.is_nan() && !self.avg_low.is_nan()
    }
}

/// Mean high/low across companies for each distinct date, ascending by date.
/// Records without a valid date cannot be placed on the axis and are skipped.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a StockRecord>) -> Vec<LinePoint> {
    let mut groups: BTreeMap<NaiveDate, Vec<&StockRecord>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            groups.entry(date).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(date, group)| LinePoint {
            date,
            avg_high: nan_mean(group.iter().map(|r| r.high)),
            avg_low: nan_mean(group.iter().map(|r| r.low)),
        })
        .collect()
}

/// The points a chart actually draws, dates with a NaN channel left out.
pub fn renderable_points(series: &[LinePoint]) -> Vec<LinePoint> {
    series.iter().filter(|p| p.is_renderable()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: &str, high: f64, low: f64) -> StockRecord {
        StockRecord {
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
            company: "Acme".to_string(),
            high,
            low,
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_sorted_means() {
        let records = vec![
            record("2023-01-03", 12.0, 6.0),
            record("2023-01-01", 10.0, 4.0),
            record("2023-01-01", 14.0, 6.0),
        ];
        let series = aggregate(&records);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2023-01-01");
        assert_eq!(series[0].avg_high, 12.0);
        assert_eq!(series[0].avg_low, 5.0);
        assert_eq!(series[1].date.to_string(), "2023-01-03");
        assert_eq!(series[1].avg_high, 12.0);
    }

    #[test]
    fn test_aggregate_skips_nan() {
        let records = vec![
            record("2023-01-01", 10.0, 1.0),
            record("2023-01-01", f64::NAN, 2.0),
            record("2023-01-01", 20.0, 3.0),
        ];
        let series = aggregate(&records);

        assert_eq!(series[0].avg_high, 15.0);
        assert_eq!(series[0].avg_low, 2.0);
        assert!(series[0].is_renderable());
    }

    #[test]
    fn test_aggregate_all_nan_group() {
        let records = vec![record("2023-01-01", f64::NAN, 1.0)];
        let series = aggregate(&records);

        assert!(series[0].avg_high.is_nan());
        assert!(!series[0].is_renderable());
    }

    #[test]
    fn test_aggregate_single_point() {
        let records = vec![record("2023-05-05", 7.25, 3.5)];
        let series = aggregate(&records);

        assert_eq!(
            series,
            [LinePoint {
                date: NaiveDate::from_ymd_opt(2023, 5, 5).unwrap(),
                avg_high: 7.25,
                avg_low: 3.5,
            }]
        );
    }

    #[test]
    fn test_renderable_points() {
        let records = vec![
            record("2023-01-01", 10.0, 4.0),
            record("2023-01-02", f64::NAN, 5.0),
            record("2023-01-03", 12.0, 6.0),
        ];
        let points = renderable_points(&aggregate(&records));

        assert_eq!(
            points.iter().map(|p| p.date.to_string()).collect::<Vec<_>>(),
            ["2023-01-01", "2023-01-03"]
        );
    }

    #[test]
    fn test_aggregate_skips_invalid_dates() {
        let records = vec![record("bad", 1.0, 1.0)];
        assert!(aggregate(&records).is_empty());
    }
}
