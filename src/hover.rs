//! Maps a pointer position back to the data under it, for tooltips.
//!
//! Positions are in the same pixel space the scales map into. Inverting the
//! screen position into that space is the drawing layer's job.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::{
    aggregate::{line::LinePoint, scatter::ScatterPoint, stacked::SectorTrendCounts},
    data::Trend,
    layout::TreemapTile,
    scale::{BandScale, LinearScale, TimeScale},
};

pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 10.0;
pub const DEFAULT_POINT_RADIUS: f64 = 4.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum LineChannel {
    High,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHover<'a> {
    pub point: &'a LinePoint,
    pub channel: LineChannel,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarHover<'a> {
    pub counts: &'a SectorTrendCounts,
    pub trend: Trend,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverResolver {
    proximity_threshold: f64,
    point_radius: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for HoverResolver {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            point_radius: DEFAULT_POINT_RADIUS,
        }
    }
}

impl HoverResolver {
    pub fn new(proximity_threshold: f64) -> Self {
        Self {
            proximity_threshold,
            ..Default::default()
        }
    }

    /// Nearest date first, then the nearest channel within the proximity
    /// threshold. `None` hides the tooltip.
    pub fn resolve_line<'a>(
        &self,
        series: &'a [LinePoint],
        pointer: Pointer,
        x_scale: &TimeScale,
        y_scale: &LinearScale,
    ) -> Option<LineHover<'a>> {
        let hovered = x_scale.invert(pointer.x)?;
        let point = nearest_point(series, hovered)?;
        let channel = self.classify_channel(point, pointer.y, y_scale)?;

        let value = match channel {
            LineChannel::High => point.avg_high,
            LineChannel::Low => point.avg_low,
        };

        Some(LineHover {
            point,
            channel,
            value,
        })
    }

    /// Channel whose rendered value is vertically closest to `pointer_y`,
    /// provided it is strictly within the threshold. Equal distances go to `Low`.
    pub fn classify_channel(
        &self,
        point: &LinePoint,
        pointer_y: f64,
        y_scale: &LinearScale,
    ) -> Option<LineChannel> {
        let distance = |value: f64| {
            let d = (pointer_y - y_scale.apply(value)).abs();
            if d.is_nan() { f64::INFINITY } else { d }
        };

        let to_high = distance(point.avg_high);
        let to_low = distance(point.avg_low);

        if to_high < self.proximity_threshold || to_low < self.proximity_threshold {
            if to_high < to_low {
                Some(LineChannel::High)
            } else {
                Some(LineChannel::Low)
            }
        } else {
            None
        }
    }

    pub fn hit_scatter<'a>(
        &self,
        points: &'a [ScatterPoint],
        pointer: Pointer,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
    ) -> Option<&'a ScatterPoint> {
        points
            .iter()
            .filter(|p| p.is_renderable())
            .map(|p| {
                let dx = x_scale.apply(p.pe_ratio) - pointer.x;
                let dy = y_scale.apply(p.dividend_yield) - pointer.y;
                (p, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(_, d)| *d <= self.point_radius)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p)
    }
}

/// Point whose date is closest to `hovered`, by binary search over the
/// date-sorted series. Exact midpoints resolve to the later point.
pub fn nearest_point(series: &[LinePoint], hovered: NaiveDateTime) -> Option<&LinePoint> {
    let at = |p: &LinePoint| p.date.and_time(NaiveTime::MIN);

    let i = series.partition_point(|p| at(p) < hovered);
    let before = i.checked_sub(1).and_then(|j| series.get(j));
    let after = series.get(i);

    match (before, after) {
        (Some(before), Some(after)) => {
            if hovered - at(before) < at(after) - hovered {
                Some(before)
            } else {
                Some(after)
            }
        }
        (before, after) => before.or(after),
    }
}

/// Sector bar segment under the pointer. Empty segments are never hit, a
/// shared edge belongs to the lower segment.
pub fn hit_stacked_bar<'a>(
    bars: &'a [SectorTrendCounts],
    pointer: Pointer,
    x_scale: &BandScale,
    y_scale: &LinearScale,
) -> Option<BarHover<'a>> {
    let sector = x_scale.band_at(pointer.x)?;
    let counts = bars.iter().find(|b| b.sector == sector)?;
    let value = y_scale.invert(pointer.y);

    counts
        .segments()
        .into_iter()
        .filter(|s| s.count() > 0)
        .find(|s| value >= s.lower as f64 && value <= s.upper as f64)
        .map(|s| BarHover {
            counts,
            trend: s.trend,
            count: s.count(),
        })
}

pub fn hit_treemap(tiles: &[TreemapTile], pointer: Pointer) -> Option<&TreemapTile> {
    tiles.iter().find(|t| t.contains(pointer.x, pointer.y))
}
