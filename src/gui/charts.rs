use std::hash::{Hash, Hasher};

use eframe::egui;
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot, PlotTransform, Points};
use strum::IntoEnumIterator;

use crate::{
    aggregate::{
        line::{self, LinePoint},
        scatter::ScatterPoint,
        stacked::SectorTrendCounts,
        treemap::Treemap,
    },
    data::Trend,
    hover::{self, HoverResolver, Pointer},
    layout::{self, Rect},
    scale::{BandScale, LinearScale, TimeScale},
    tooltip::{TooltipContent, TooltipController},
    utils::{
        datetime::{date_to_days, date_to_str, datetime_from_days},
        text::truncate_chars,
    },
};

pub const CHART_HEIGHT: f32 = 250.0;

const BAR_PADDING: f64 = 0.2;
const TREEMAP_PADDING: f64 = 1.0;
const TREEMAP_LABEL_CHARS: usize = 12;

const COLOR_HIGH: egui::Color32 = egui::Color32::from_rgb(0xff, 0xa5, 0x00);
const COLOR_LOW: egui::Color32 = egui::Color32::from_rgb(0x46, 0x82, 0xb4);

const SECTOR_COLORS: &[(&str, egui::Color32)] = &[
    ("Aerospace", egui::Color32::from_rgb(0x4e, 0x79, 0xa7)),
    ("Automotive", egui::Color32::from_rgb(0xf2, 0x8e, 0x2b)),
    ("Consumer Goods", egui::Color32::from_rgb(0xe1, 0x57, 0x59)),
    ("Energy", egui::Color32::from_rgb(0x76, 0xb7, 0xb2)),
    ("Finance", egui::Color32::from_rgb(0x59, 0xa1, 0x4f)),
    ("Healthcare", egui::Color32::from_rgb(0xed, 0xc9, 0x49)),
    ("Technology", egui::Color32::from_rgb(0xaf, 0x7a, 0xa1)),
];

pub struct ScatterAxes {
    pub pe_max: f64,
    pub yield_max: f64,
}

/// Average high and low over time.
pub fn show_line_chart(
    ui: &mut egui::Ui,
    series: &[LinePoint],
    resolver: &HoverResolver,
    tooltip: &mut TooltipController,
) {
    let renderable = line::renderable_points(series);
    let high_points: Vec<[f64; 2]> = renderable
        .iter()
        .map(|p| [date_to_days(&p.date), p.avg_high])
        .collect();
    let low_points: Vec<[f64; 2]> = renderable
        .iter()
        .map(|p| [date_to_days(&p.date), p.avg_low])
        .collect();

    let mut plot = chart_plot("line_chart")
        .x_axis_formatter(|mark, _| {
            datetime_from_days(mark.value)
                .map(|d| date_to_str(&d.date()))
                .unwrap_or_default()
        })
        .legend(Legend::default().position(Corner::LeftTop));

    if let Some(y_scale) = LinearScale::from_extent(
        renderable.iter().flat_map(|p| [p.avg_high, p.avg_low]),
        (0.0, 1.0),
    ) {
        let (y0, y1) = y_scale.nice().domain();
        plot = plot.include_y(y0).include_y(y1);
    }

    let response = plot.show(ui, |plot_ui| {
        plot_ui.line(Line::new("High", high_points).color(COLOR_HIGH).width(1.5));
        plot_ui.line(Line::new("Low", low_points).color(COLOR_LOW).width(1.5));

        let pointer = plot_ui.pointer_coordinate()?;
        let transform = plot_ui.transform();
        let pointer = screen_pointer(transform, &pointer);
        let (x_scale, y_scale) = pixel_scales(transform);
        let x_scale = TimeScale::from_days(x_scale.domain(), x_scale.range());

        let content = resolver
            .resolve_line(&renderable, pointer, &x_scale, &y_scale)
            .map(|hover| TooltipContent::line(&hover));

        Some((pointer, content))
    });

    apply_hover(ui, "line_chart_tooltip", tooltip, response.inner);
}

/// Trend counts per sector, stacked Bearish, Bullish, Stable.
pub fn show_stacked_bar_chart(
    ui: &mut egui::Ui,
    bars: &[SectorTrendCounts],
    tooltip: &mut TooltipController,
) {
    let sectors: Vec<String> = bars.iter().map(|b| b.sector.clone()).collect();
    let band_scale =
        BandScale::new(sectors.clone(), (0.0, sectors.len() as f64)).padding(BAR_PADDING);
    let bandwidth = band_scale.bandwidth();

    let mut charts: Vec<BarChart> = vec![];
    for trend in Trend::iter() {
        let trend_bars: Vec<Bar> = bars
            .iter()
            .filter_map(|b| {
                let x = band_scale.position(&b.sector)? + bandwidth / 2.0;
                Some(
                    Bar::new(x, b.count(trend) as f64)
                        .width(bandwidth)
                        .name(&b.sector),
                )
            })
            .collect();

        let others: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(trend.to_string(), trend_bars)
            .color(trend_color(trend))
            .stack_on(&others);
        charts.push(chart);
    }

    let label_scale = band_scale.clone();
    let plot = chart_plot("stacked_bar_chart")
        .include_y(0.0)
        .include_x(0.0)
        .include_x(sectors.len() as f64)
        .x_axis_formatter(move |mark, _| {
            label_scale
                .band_at(mark.value)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .y_axis_label("Count of Trend")
        .legend(Legend::default().position(Corner::RightTop));

    let response = plot.show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }

        let pointer = plot_ui.pointer_coordinate()?;
        let transform = plot_ui.transform();
        let pointer = screen_pointer(transform, &pointer);
        let (x_scale, y_scale) = pixel_scales(transform);
        let x_band = BandScale::new(
            sectors.clone(),
            (x_scale.apply(0.0), x_scale.apply(sectors.len() as f64)),
        )
        .padding(BAR_PADDING);

        let content = hover::hit_stacked_bar(bars, pointer, &x_band, &y_scale)
            .map(|hover| TooltipContent::bar(&hover));

        Some((pointer, content))
    });

    apply_hover(ui, "stacked_bar_chart_tooltip", tooltip, response.inner);
}

/// P/E ratio against dividend yield, one point per record.
pub fn show_scatter_plot(
    ui: &mut egui::Ui,
    points: &[ScatterPoint],
    axes: &ScatterAxes,
    resolver: &HoverResolver,
    tooltip: &mut TooltipController,
) {
    let mut by_sector: Vec<(&str, Vec<[f64; 2]>)> = vec![];
    for point in points.iter().filter(|p| p.is_renderable()) {
        let xy = [point.pe_ratio, point.dividend_yield];
        match by_sector.iter_mut().find(|(s, _)| *s == point.sector) {
            Some((_, xys)) => xys.push(xy),
            None => by_sector.push((point.sector.as_str(), vec![xy])),
        }
    }

    let plot = chart_plot("scatter_plot")
        .include_x(0.0)
        .include_x(axes.pe_max)
        .include_y(0.0)
        .include_y(axes.yield_max)
        .x_axis_label("P/E Ratio")
        .y_axis_label("Dividend Yield")
        .legend(Legend::default().position(Corner::RightTop));

    let response = plot.show(ui, |plot_ui| {
        for (sector, xys) in by_sector {
            plot_ui.points(
                Points::new(sector, xys)
                    .radius(3.0)
                    .filled(false)
                    .color(sector_color(sector)),
            );
        }

        let pointer = plot_ui.pointer_coordinate()?;
        let transform = plot_ui.transform();
        let pointer = screen_pointer(transform, &pointer);
        let (x_scale, y_scale) = pixel_scales(transform);

        let content = resolver
            .hit_scatter(points, pointer, &x_scale, &y_scale)
            .map(TooltipContent::scatter);

        Some((pointer, content))
    });

    apply_hover(ui, "scatter_plot_tooltip", tooltip, response.inner);
}

/// Company size by mean market cap, grouped by sector.
pub fn show_treemap(ui: &mut egui::Ui, treemap: &Treemap, tooltip: &mut TooltipController) {
    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let bounds = response.rect;

    let tiles = layout::squarify(
        treemap,
        Rect::new(
            bounds.left() as f64,
            bounds.top() as f64,
            bounds.right() as f64,
            bounds.bottom() as f64,
        ),
        TREEMAP_PADDING,
    );

    for tile in &tiles {
        let rect = egui::Rect::from_min_max(
            egui::pos2(tile.x0 as f32, tile.y0 as f32),
            egui::pos2(tile.x1 as f32, tile.y1 as f32),
        );
        painter.rect_filled(rect, egui::CornerRadius::ZERO, sector_color(&tile.sector));
        painter.with_clip_rect(rect).text(
            rect.left_top() + egui::vec2(3.0, 2.0),
            egui::Align2::LEFT_TOP,
            truncate_chars(&tile.company, TREEMAP_LABEL_CHARS),
            egui::FontId::proportional(8.0),
            egui::Color32::WHITE,
        );
    }

    let hovered = response.hover_pos().map(|pos| {
        let pointer = Pointer::new(pos.x as f64, pos.y as f64);
        let content = hover::hit_treemap(&tiles, pointer).map(TooltipContent::treemap);
        (pointer, content)
    });

    apply_hover(ui, "treemap_tooltip", tooltip, hovered);

    show_sector_legend(ui, treemap.sectors.iter().map(|s| s.sector.as_str()));
}

pub fn show_tooltip(ui: &egui::Ui, id: &str, tooltip: &TooltipController) {
    if let Some((anchor, content)) = tooltip.current() {
        egui::Area::new(egui::Id::new(id))
            .order(egui::Order::Tooltip)
            .fixed_pos(egui::pos2(anchor.x as f32, anchor.y as f32))
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if let Some(title) = &content.title {
                        ui.strong(title);
                    }
                    for line in &content.lines {
                        ui.label(line);
                    }
                });
            });
    }
}

pub fn sector_color(sector: &str) -> egui::Color32 {
    SECTOR_COLORS
        .iter()
        .find(|(name, _)| *name == sector)
        .map(|(_, color)| *color)
        .unwrap_or_else(|| str_to_color(sector))
}

pub fn trend_color(trend: Trend) -> egui::Color32 {
    match trend {
        Trend::Bearish => egui::Color32::from_rgb(0x50, 0x84, 0xb4),
        Trend::Bullish => egui::Color32::from_rgb(0xff, 0x94, 0x2c),
        Trend::Stable => egui::Color32::from_rgb(0xf8, 0x54, 0x64),
    }
}

fn chart_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_x(false)
        .show_y(false)
}

fn apply_hover(
    ui: &egui::Ui,
    id: &str,
    tooltip: &mut TooltipController,
    hovered: Option<(Pointer, Option<TooltipContent>)>,
) {
    match hovered {
        Some((pointer, content)) => tooltip.update(pointer, content),
        None => tooltip.hide(),
    }
    show_tooltip(ui, id, tooltip);
}

fn show_sector_legend<'a>(ui: &mut egui::Ui, sectors: impl Iterator<Item = &'a str>) {
    let mut sectors: Vec<&str> = sectors.collect();
    sectors.sort_unstable();

    ui.horizontal_wrapped(|ui| {
        ui.strong("Sector");
        for sector in sectors {
            ui.label(egui::RichText::new("■").color(sector_color(sector)));
            ui.label(egui::RichText::new(sector).size(12.0));
        }
    });
}

fn screen_pointer(transform: &PlotTransform, point: &egui_plot::PlotPoint) -> Pointer {
    let pos = transform.position_from_point(point);
    Pointer::new(pos.x as f64, pos.y as f64)
}

/// Plot-value to screen-pixel scales for both axes of the current frame.
fn pixel_scales(transform: &PlotTransform) -> (LinearScale, LinearScale) {
    let bounds = transform.bounds();
    let frame = transform.frame();

    (
        LinearScale::new(
            (bounds.min()[0], bounds.max()[0]),
            (frame.left() as f64, frame.right() as f64),
        ),
        LinearScale::new(
            (bounds.min()[1], bounds.max()[1]),
            (frame.bottom() as f64, frame.top() as f64),
        ),
    )
}

fn str_to_color(s: &str) -> egui::Color32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish();

    let hue = (hash % 360) as f64;
    let saturation = 0.6;
    let lightness = 0.8;

    let (r, g, b) = hsv::hsv_to_rgb(hue, saturation, lightness);

    egui::Color32::from_rgb(r, g, b)
}
