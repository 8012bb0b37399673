use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use eframe::egui;
use log::{debug, info};
use tokio::sync::mpsc;

use crate::{
    CHANNEL_BUFFER_DEFAULT, api,
    config::Config,
    dashboard::Dashboard,
    data::StockRecord,
    error::SdError,
    gui::{
        GuiEvent,
        charts::{self, ScatterAxes},
    },
    hover::HoverResolver,
    tooltip::TooltipController,
    utils::datetime::date_to_str,
};

pub struct DashboardViewer {
    data_file: PathBuf,
    event_sender: mpsc::Sender<GuiEvent>,

    load_event_sender: mpsc::Sender<LoadEvent>,
    load_event_receiver: mpsc::Receiver<LoadEvent>,
    dashboard: Option<Dashboard>,

    resolver: HoverResolver,
    scatter_axes: ScatterAxes,
    tooltips: ChartTooltips,
    date_indices: (usize, usize),

    warning_message: Option<String>,
}

enum LoadEvent {
    Finished(Vec<StockRecord>),
    Error(SdError),
}

#[derive(Default)]
struct ChartTooltips {
    line: TooltipController,
    stacked: TooltipController,
    scatter: TooltipController,
    treemap: TooltipController,
}

impl DashboardViewer {
    pub fn new(
        cc: &eframe::CreationContext,
        event_sender: mpsc::Sender<GuiEvent>,
        data_file: &Path,
        config: &Config,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let (load_event_sender, load_event_receiver) =
            mpsc::channel::<LoadEvent>(CHANNEL_BUFFER_DEFAULT);

        Self {
            data_file: data_file.to_path_buf(),
            event_sender,

            load_event_sender,
            load_event_receiver,
            dashboard: None,

            resolver: HoverResolver::new(config.proximity_threshold),
            scatter_axes: ScatterAxes {
                pe_max: config.scatter_pe_max,
                yield_max: config.scatter_yield_max,
            },
            tooltips: ChartTooltips::default(),
            date_indices: (0, 0),

            warning_message: None,
        }
    }

    fn load_records(&mut self) {
        self.warning_message = None;

        let data_file = self.data_file.clone();
        let load_event_sender = self.load_event_sender.clone();

        tokio::spawn(async move {
            match api::load_records(&data_file).await {
                Ok(records) => {
                    let _ = load_event_sender.send(LoadEvent::Finished(records)).await;
                }
                Err(err) => {
                    let _ = load_event_sender.send(LoadEvent::Error(err)).await;
                }
            }
        });
    }

    fn on_load_records(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Finished(records) => {
                info!("Loaded {} records", records.len());

                let dashboard = Dashboard::new(records);
                self.date_indices = dashboard.date_range_indices().unwrap_or((0, 0));

                let _ = self.event_sender.try_send(GuiEvent::Loaded {
                    records: dashboard.records().len(),
                    companies: dashboard.companies().len(),
                });

                self.tooltips = ChartTooltips::default();
                self.dashboard = Some(dashboard);
            }
            LoadEvent::Error(err) => {
                self.dashboard = None;
                self.warning_message = Some(err.to_string());
            }
        }
    }

    fn on_filter_changed(&mut self) {
        if let Some(dashboard) = &self.dashboard {
            debug!("Filter changed, {} records", dashboard.filtered_count());

            let _ = self.event_sender.try_send(GuiEvent::FilterChanged {
                filter: dashboard.filter().clone(),
                records: dashboard.filtered_count(),
            });
        }
    }

    fn show_company_filter(&mut self, ui: &mut egui::Ui) -> bool {
        let Some(dashboard) = &mut self.dashboard else {
            return false;
        };

        let mut changed = false;
        let selected = dashboard.filter().selected_companies().len();
        let header = if selected == dashboard.companies().len() {
            "All Companies".to_string()
        } else {
            format!("{selected} selected")
        };

        egui::CollapsingHeader::new(header)
            .id_salt("company_filter")
            .show(ui, |ui| {
                let mut all_selected = selected == dashboard.companies().len();
                if ui.checkbox(&mut all_selected, "Select All").changed() {
                    dashboard.toggle_all();
                    changed = true;
                }

                egui::ScrollArea::vertical()
                    .max_height(200.0)
                    .show(ui, |ui| {
                        let companies = dashboard.companies().to_vec();
                        for company in companies {
                            let mut checked = dashboard.filter().is_selected(&company);
                            if ui.checkbox(&mut checked, &company).changed() {
                                dashboard.toggle_company(&company);
                                changed = true;
                            }
                        }
                    });
            });

        changed
    }

    fn show_date_filter(&mut self, ui: &mut egui::Ui) -> bool {
        let Some(dashboard) = &mut self.dashboard else {
            return false;
        };

        let dates = dashboard.dates().to_vec();
        let Some(last) = dates.len().checked_sub(1) else {
            return false;
        };

        let (mut start, mut end) = self.date_indices;
        let formatter = |v: f64, _: RangeInclusive<usize>| {
            dates
                .get(v as usize)
                .map(date_to_str)
                .unwrap_or_default()
        };

        ui.label("Date Range");
        let start_changed = ui
            .add(egui::Slider::new(&mut start, 0..=last).custom_formatter(formatter))
            .changed();
        let end_changed = ui
            .add(egui::Slider::new(&mut end, 0..=last).custom_formatter(formatter))
            .changed();

        if !start_changed && !end_changed {
            return false;
        }

        // Handles never cross, the dragged one pushes the other.
        if start_changed && start > end {
            end = start;
        } else if end_changed && end < start {
            start = end;
        }

        match dashboard.set_date_range_by_index(start, end) {
            Ok(()) => {
                self.date_indices = (start, end);
                true
            }
            Err(err) => {
                self.warning_message = Some(err.to_string());
                false
            }
        }
    }

    fn show_charts(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = &self.dashboard else {
            show_no_data(ui);
            return;
        };
        if dashboard.filtered_count() == 0 {
            show_no_data(ui);
            return;
        }

        let aggregates = dashboard.aggregates();
        let resolver = &self.resolver;
        let axes = &self.scatter_axes;
        let tooltips = &mut self.tooltips;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                columns[0].heading("Average High and Low over Time");
                charts::show_line_chart(
                    &mut columns[0],
                    &aggregates.line,
                    resolver,
                    &mut tooltips.line,
                );

                columns[1].heading("Trend by Sector");
                charts::show_stacked_bar_chart(
                    &mut columns[1],
                    &aggregates.stacked,
                    &mut tooltips.stacked,
                );
            });

            ui.add_space(12.0);

            ui.columns(2, |columns| {
                columns[0].heading("P/E Ratio vs Dividend Yield");
                charts::show_scatter_plot(
                    &mut columns[0],
                    &aggregates.scatter,
                    axes,
                    resolver,
                    &mut tooltips.scatter,
                );

                columns[1].heading("Market Cap by Company");
                charts::show_treemap(&mut columns[1], &aggregates.treemap, &mut tooltips.treemap);
            });
        });
    }
}

impl eframe::App for DashboardViewer {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let already_run = ctx.data(|d| {
            d.get_temp::<bool>(egui::Id::new("startup_once"))
                .unwrap_or(false)
        });

        if !already_run {
            self.load_records();

            ctx.data_mut(|d| d.insert_temp(egui::Id::new("startup_once"), true));
        }

        while let Ok(event) = self.load_event_receiver.try_recv() {
            self.on_load_records(event);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("tools_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("↻ Reload").clicked() {
                            self.load_records();
                        }
                    });
                });

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        let data_file = format!("🗀 {}", self.data_file.to_string_lossy());
                        ui.label(
                            egui::RichText::new(data_file)
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                        );

                        if let Some(dashboard) = &self.dashboard {
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} / {} records",
                                    dashboard.filtered_count(),
                                    dashboard.records().len()
                                ))
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(
                                    self.warning_message
                                        .as_ref()
                                        .map(|t| format!("⚠ {t}"))
                                        .unwrap_or_default(),
                                )
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        });
                    });
                });

            egui::SidePanel::left("filters_panel")
                .resizable(false)
                .default_width(200.0)
                .show_inside(ui, |ui| {
                    let companies_changed = self.show_company_filter(ui);
                    ui.separator();
                    let dates_changed = self.show_date_filter(ui);

                    if companies_changed || dates_changed {
                        self.on_filter_changed();
                    }
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                self.show_charts(ui);
            });
        });
    }
}

fn show_no_data(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("No data")
                .color(egui::Color32::DARK_GRAY)
                .size(18.0),
        );
    });
}
