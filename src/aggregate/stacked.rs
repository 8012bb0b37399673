use std::collections::HashMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::data::{StockRecord, Trend};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectorTrendCounts {
    pub sector: String,
    pub bearish: usize,
    pub bullish: usize,
    pub stable: usize,
    pub total: usize,
}

/// One stacked piece of a sector bar, spanning `[lower, upper)` on the count axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendSegment {
    pub trend: Trend,
    pub lower: usize,
    pub upper: usize,
}

impl SectorTrendCounts {
    pub fn count(&self, trend: Trend) -> usize {
        match trend {
            Trend::Bearish => self.bearish,
            Trend::Bullish => self.bullish,
            Trend::Stable => self.stable,
        }
    }

    /// Segments stacked bottom-up in the order Bearish, Bullish, Stable.
    pub fn segments(&self) -> Vec<TrendSegment> {
        let mut lower = 0;
        Trend::iter()
            .map(|trend| {
                let upper = lower + self.count(trend);
                let segment = TrendSegment {
                    trend,
                    lower,
                    upper,
                };
                lower = upper;
                segment
            })
            .collect()
    }

    fn add(&mut self, trend: Trend) {
        match trend {
            Trend::Bearish => self.bearish += 1,
            Trend::Bullish => self.bullish += 1,
            Trend::Stable => self.stable += 1,
        }
        self.total += 1;
    }
}

impl TrendSegment {
    pub fn count(&self) -> usize {
        self.upper - self.lower
    }
}

/// Trend counts per sector, in ascending order of total.
///
/// Sectors keep their first-seen order among equal totals. Records whose trend
/// is outside the recognized categories do not count towards any bucket.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a StockRecord>,
) -> Vec<SectorTrendCounts> {
    let mut sectors: Vec<SectorTrendCounts> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let i = *index.entry(record.sector.as_str()).or_insert_with(|| {
            sectors.push(SectorTrendCounts {
                sector: record.sector.clone(),
                ..Default::default()
            });
            sectors.len() - 1
        });

        if let Some(trend) = record.trend() {
            sectors[i].add(trend);
        }
    }

    sectors.sort_by_key(|s| s.total);
    sectors
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use proptest::prelude::*;

    use super::*;

    const SECTORS: &[&str] = &["Energy", "Finance", "Technology", ""];
    const SENTIMENTS: &[&str] = &[
        "Bullish", "Bearish", "Stable", " Stable ", "bullish", "Neutral", "",
    ];

    fn record(sector: &str, sentiment: &str) -> StockRecord {
        StockRecord {
            company: "Acme".to_string(),
            sector: sector.to_string(),
            sentiment: sentiment.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_aggregate_counts_and_order() {
        let records = vec![
            record("Technology", "Bullish"),
            record("Technology", "Bearish"),
            record("Technology", "Bullish"),
            record("Energy", "Stable"),
            record("Finance", "Bearish"),
            record("Finance", "Stable"),
        ];
        let counts = aggregate(&records);

        assert_eq!(
            counts.iter().map(|c| c.sector.as_str()).collect::<Vec<_>>(),
            ["Energy", "Finance", "Technology"]
        );
        assert_eq!(
            counts[2],
            SectorTrendCounts {
                sector: "Technology".to_string(),
                bearish: 1,
                bullish: 2,
                stable: 0,
                total: 3,
            }
        );
    }

    #[test]
    fn test_aggregate_excludes_unknown_trends() {
        let records = vec![
            record("Energy", "Bullish"),
            record("Energy", "Neutral"),
            record("Energy", ""),
            record("Energy", "bearish"),
        ];
        let counts = aggregate(&records);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].total, 1);
        for c in &counts {
            assert_eq!(c.bearish + c.bullish + c.stable, c.total);
        }
    }

    #[test]
    fn test_aggregate_sector_with_only_unknown_trends() {
        let records = vec![record("Aerospace", "Unknown")];
        let counts = aggregate(&records);

        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].total, 0);
    }

    #[test]
    fn test_aggregate_ties_keep_first_seen_order() {
        let records = vec![
            record("Healthcare", "Stable"),
            record("Automotive", "Bullish"),
        ];
        let counts = aggregate(&records);

        assert_eq!(counts[0].sector, "Healthcare");
        assert_eq!(counts[1].sector, "Automotive");
    }

    #[test]
    fn test_segments() {
        let counts = SectorTrendCounts {
            sector: "Energy".to_string(),
            bearish: 2,
            bullish: 0,
            stable: 3,
            total: 5,
        };
        let segments = counts.segments();

        assert_eq!(segments.len(), 3);
        assert_eq!((segments[0].lower, segments[0].upper), (0, 2));
        assert_eq!(segments[1].count(), 0);
        assert_eq!(
            (segments[2].trend, segments[2].lower, segments[2].upper),
            (Trend::Stable, 2, 5)
        );
    }

    proptest! {
        #[test]
        fn test_aggregate_counts_add_up(
            pairs in prop::collection::vec(
                (prop::sample::select(SECTORS.to_vec()), prop::sample::select(SENTIMENTS.to_vec())),
                0..60,
            ),
        ) {
            let records: Vec<StockRecord> = pairs.iter().map(|(s, t)| record(s, t)).collect();
            let counts = aggregate(&records);

            for c in &counts {
                prop_assert_eq!(c.bearish + c.bullish + c.stable, c.total);
                prop_assert_eq!(c.segments().last().map(|s| s.upper), Some(c.total));
            }
            prop_assert!(counts.windows(2).all(|w| w[0].total <= w[1].total));

            let recognized = records.iter().filter(|r| r.trend().is_some()).count();
            prop_assert_eq!(counts.iter().map(|c| c.total).sum::<usize>(), recognized);

            let sectors = records.iter().map(|r| r.sector.as_str()).unique().count();
            prop_assert_eq!(counts.len(), sectors);
        }
    }
}
