use serde::Serialize;

use crate::data::StockRecord;

pub mod line;
pub mod scatter;
pub mod stacked;
pub mod treemap;

/// Derived series for every chart, rebuilt from scratch on each filter change.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Aggregates {
    pub line: Vec<line::LinePoint>,
    pub stacked: Vec<stacked::SectorTrendCounts>,
    pub scatter: Vec<scatter::ScatterPoint>,
    pub treemap: treemap::Treemap,
}

impl Aggregates {
    pub fn compute(records: &[&StockRecord]) -> Self {
        Self {
            line: line::aggregate(records.iter().copied()),
            stacked: stacked::aggregate(records.iter().copied()),
            scatter: scatter::aggregate(records.iter().copied()),
            treemap: treemap::aggregate(records.iter().copied()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
            && self.stacked.is_empty()
            && self.scatter.is_empty()
            && self.treemap.sectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_empty() {
        let aggregates = Aggregates::compute(&[]);

        assert!(aggregates.is_empty());
        assert!(aggregates.line.is_empty());
        assert!(aggregates.stacked.is_empty());
        assert!(aggregates.scatter.is_empty());
        assert!(aggregates.treemap.sectors.is_empty());
    }
}
