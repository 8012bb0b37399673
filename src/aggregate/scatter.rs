use serde::Serialize;

use crate::data::StockRecord;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub company: String,
    pub sector: String,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub market_cap: f64,
}

impl ScatterPoint {
    pub fn is_renderable(&self) -> bool {
        self.pe_ratio.is_finite() && self.dividend_yield.is_finite()
    }
}

pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a StockRecord>) -> Vec<ScatterPoint> {
    records
        .into_iter()
        .map(|r| ScatterPoint {
            company: r.company.clone(),
            sector: r.sector.clone(),
            pe_ratio: r.pe_ratio,
            dividend_yield: r.dividend_yield,
            market_cap: r.market_cap,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_one_point_per_record() {
        let records = vec![
            StockRecord {
                company: "Acme".to_string(),
                sector: "Energy".to_string(),
                pe_ratio: 12.0,
                dividend_yield: 1.5,
                market_cap: 3e9,
                ..Default::default()
            },
            StockRecord {
                company: "Acme".to_string(),
                sector: "Energy".to_string(),
                pe_ratio: f64::NAN,
                dividend_yield: 1.0,
                ..Default::default()
            },
        ];
        let points = aggregate(&records);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].pe_ratio, 12.0);
        assert_eq!(points[0].market_cap, 3e9);
        assert!(points[0].is_renderable());
        assert!(!points[1].is_renderable());
    }
}
