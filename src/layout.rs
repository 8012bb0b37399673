//! Squarified treemap tiling.
//!
//! Rows are grown while their worst aspect ratio keeps improving against the
//! golden ratio, then laid out along the shorter side of the remaining area.

use serde::Serialize;

use crate::aggregate::treemap::Treemap;

const PHI: f64 = 1.618_033_988_749_895;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A company leaf of the treemap placed on screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreemapTile {
    pub company: String,
    pub sector: String,
    pub value: f64,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Shrinks every side by `amount`, collapsing to the center when too small.
    fn inset(&self, amount: f64) -> Self {
        let (mut x0, mut y0, mut x1, mut y1) = (
            self.x0 + amount,
            self.y0 + amount,
            self.x1 - amount,
            self.y1 - amount,
        );
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }

        Self { x0, y0, x1, y1 }
    }
}

impl TreemapTile {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Tiles sectors into `bounds`, then companies into their sector, keeping a
/// `padding` gap around and between every node.
pub fn squarify(treemap: &Treemap, bounds: Rect, padding: f64) -> Vec<TreemapTile> {
    let half = padding / 2.0;
    let mut tiles: Vec<TreemapTile> = vec![];

    let sector_values: Vec<f64> = treemap.sectors.iter().map(|s| s.total().max(0.0)).collect();
    let sector_rects = squarify_values(&sector_values, bounds.inset(half));

    for (sector, sector_rect) in treemap.sectors.iter().zip(sector_rects) {
        let company_values: Vec<f64> = sector
            .companies
            .iter()
            .map(|c| c.avg_market_cap.max(0.0))
            .collect();
        let company_rects = squarify_values(&company_values, sector_rect.inset(half).inset(half));

        for (company, rect) in sector.companies.iter().zip(company_rects) {
            let rect = rect.inset(half);
            tiles.push(TreemapTile {
                company: company.company.clone(),
                sector: sector.sector.clone(),
                value: company.avg_market_cap,
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            });
        }
    }

    tiles
}

/// One rectangle per value, in input order, areas proportional to values.
pub fn squarify_values(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let n = values.len();
    let mut rects = vec![Rect::default(); n];

    let Rect {
        mut x0,
        mut y0,
        mut x1,
        mut y1,
    } = bounds;
    let mut remaining: f64 = values.iter().sum();

    let (mut i0, mut i1) = (0, 0);
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        // Skip over empty nodes to seed the row.
        let mut sum = 0.0;
        while i1 < n {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 {
                break;
            }
        }

        let (mut min, mut max) = (sum, sum);
        let alpha = (dy / dx).max(dx / dy) / (remaining * PHI);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max / beta).max(beta / min);

        while i1 < n {
            let value = values[i1];
            sum += value;
            min = min.min(value);
            max = max.max(value);
            beta = sum * sum * alpha;

            let ratio = (max / beta).max(beta / min);
            if ratio > min_ratio {
                sum -= value;
                break;
            }
            min_ratio = ratio;
            i1 += 1;
        }

        let row = i0..i1;
        if dx < dy {
            let y_end = if remaining > 0.0 {
                y0 + dy * sum / remaining
            } else {
                y1
            };
            dice(&values[row.clone()], &mut rects[row], Rect::new(x0, y0, x1, y_end), sum);
            y0 = y_end;
        } else {
            let x_end = if remaining > 0.0 {
                x0 + dx * sum / remaining
            } else {
                x1
            };
            slice(&values[row.clone()], &mut rects[row], Rect::new(x0, y0, x_end, y1), sum);
            x0 = x_end;
        }

        remaining -= sum;
        i0 = i1;
    }

    rects
}

/// Lays a row out left to right.
fn dice(values: &[f64], rects: &mut [Rect], bounds: Rect, sum: f64) {
    let k = if sum > 0.0 { bounds.width() / sum } else { 0.0 };
    let mut x = bounds.x0;
    for (value, rect) in values.iter().zip(rects.iter_mut()) {
        let next = x + value * k;
        *rect = Rect::new(x, bounds.y0, next, bounds.y1);
        x = next;
    }
}

/// Lays a row out top to bottom.
fn slice(values: &[f64], rects: &mut [Rect], bounds: Rect, sum: f64) {
    let k = if sum > 0.0 { bounds.height() / sum } else { 0.0 };
    let mut y = bounds.y0;
    for (value, rect) in values.iter().zip(rects.iter_mut()) {
        let next = y + value * k;
        *rect = Rect::new(bounds.x0, y, bounds.x1, next);
        y = next;
    }
}
