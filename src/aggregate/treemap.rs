use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;

use crate::{data::StockRecord, utils::stats::nan_mean};

pub const UNKNOWN_SECTOR: &str = "Unknown";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Treemap {
    pub sectors: Vec<TreemapSector>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreemapSector {
    pub sector: String,
    pub companies: Vec<TreemapCompany>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreemapCompany {
    pub company: String,
    pub sector: String,
    pub avg_market_cap: f64,
}

impl Treemap {
    pub fn total(&self) -> f64 {
        self.sectors.iter().map(TreemapSector::total).sum()
    }

    pub fn companies(&self) -> impl Iterator<Item = &TreemapCompany> {
        self.sectors.iter().flat_map(|s| s.companies.iter())
    }
}

impl TreemapSector {
    pub fn total(&self) -> f64 {
        self.companies.iter().map(|c| c.avg_market_cap).sum()
    }
}

/// Mean market cap per company nested under its sector.
///
/// A company takes the sector of its first record. Companies without a name or
/// without any numeric market cap are left out. Sectors and the companies
/// inside them are ordered by size, largest first.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a StockRecord>) -> Treemap {
    let mut companies: Vec<(&str, &str, Vec<f64>)> = vec![];
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let i = *index.entry(record.company.as_str()).or_insert_with(|| {
            companies.push((record.company.as_str(), record.sector.as_str(), vec![]));
            companies.len() - 1
        });
        companies[i].2.push(record.market_cap);
    }

    let mut sectors: Vec<TreemapSector> = vec![];
    for (company, sector, market_caps) in companies {
        let avg_market_cap = nan_mean(market_caps);
        if company.is_empty() || avg_market_cap.is_nan() {
            continue;
        }

        let sector = if sector.is_empty() {
            UNKNOWN_SECTOR
        } else {
            sector
        };

        let entry = TreemapCompany {
            company: company.to_string(),
            sector: sector.to_string(),
            avg_market_cap,
        };
        match sectors.iter_mut().find(|s| s.sector == sector) {
            Some(group) => group.companies.push(entry),
            None => sectors.push(TreemapSector {
                sector: sector.to_string(),
                companies: vec![entry],
            }),
        }
    }

    for sector in &mut sectors {
        sector.companies.sort_by(|a, b| {
            b.avg_market_cap
                .partial_cmp(&a.avg_market_cap)
                .unwrap_or(Ordering::Equal)
        });
    }
    sectors.sort_by(|a, b| b.total().partial_cmp(&a.total()).unwrap_or(Ordering::Equal));

    Treemap { sectors }
}
