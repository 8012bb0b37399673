use std::fmt::Display;

use crate::{
    aggregate::scatter::ScatterPoint,
    hover::{BarHover, LineChannel, LineHover, Pointer},
    layout::TreemapTile,
    utils::datetime::date_to_str,
};

/// Distance between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 10.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipContent {
    pub title: Option<String>,
    pub lines: Vec<String>,
}

/// Tooltip state owned by a single chart. Created once with the chart and
/// reused for every pointer event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipController {
    anchor: Option<Pointer>,
    content: Option<TooltipContent>,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, pointer: Pointer, content: TooltipContent) {
        self.anchor = Some(Pointer::new(
            pointer.x + TOOLTIP_OFFSET,
            pointer.y + TOOLTIP_OFFSET,
        ));
        self.content = Some(content);
    }

    pub fn hide(&mut self) {
        self.anchor = None;
        self.content = None;
    }

    /// Shows `content` when present, hides otherwise.
    pub fn update(&mut self, pointer: Pointer, content: Option<TooltipContent>) {
        match content {
            Some(content) => self.show(pointer, content),
            None => self.hide(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    pub fn current(&self) -> Option<(Pointer, &TooltipContent)> {
        match (&self.anchor, &self.content) {
            (Some(anchor), Some(content)) => Some((*anchor, content)),
            _ => None,
        }
    }
}

impl TooltipContent {
    pub fn line(hover: &LineHover) -> Self {
        let label = match hover.channel {
            LineChannel::High => "High",
            LineChannel::Low => "Low",
        };

        Self {
            title: Some(date_to_str(&hover.point.date)),
            lines: vec![format!("{label}: {:.2}", hover.value)],
        }
    }

    pub fn bar(hover: &BarHover) -> Self {
        Self {
            title: None,
            lines: vec![
                format!("Sector: {}", hover.counts.sector),
                format!("Trend: {}", hover.trend),
                format!("Count: {}", hover.count),
            ],
        }
    }

    pub fn scatter(point: &ScatterPoint) -> Self {
        Self {
            title: Some(point.company.clone()),
            lines: vec![
                format!("Sector: {}", point.sector),
                format!("P/E Ratio: {:.2}", point.pe_ratio),
                format!("Dividend Yield: {:.2}", point.dividend_yield),
                format!("Market Cap: ${:.2}B", point.market_cap / 1e9),
            ],
        }
    }

    pub fn treemap(tile: &TreemapTile) -> Self {
        Self {
            title: Some(tile.company.clone()),
            lines: vec![
                format!("Sector: {}", tile.sector),
                format!("Market Cap: ${:.0}", tile.value.round()),
            ],
        }
    }
}

impl Display for TooltipContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<&str> = vec![];
        if let Some(title) = &self.title {
            parts.push(title);
        }
        parts.extend(self.lines.iter().map(String::as_str));

        write!(f, "{}", parts.join("\n"))
    }
}
