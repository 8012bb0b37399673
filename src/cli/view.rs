use colored::Colorize;
use eframe::egui;
use itertools::Itertools;
use stockdash::{
    CHANNEL_BUFFER_DEFAULT, VERSION, api,
    gui::{GuiEvent, dashboard_viewer::DashboardViewer},
    utils::datetime::date_to_str,
};
use tokio::sync::mpsc;

#[derive(clap::Args)]
pub struct ViewCommand {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Print filter changes made in the window"
    )]
    verbose: bool,
}

impl ViewCommand {
    pub async fn exec(&self) {
        let (data_file, config) = match (api::get_data_file().await, api::get_config().await) {
            (Ok(data_file), Ok(config)) => (data_file, config),
            (Err(err), _) | (_, Err(err)) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        let (sender, mut receiver) = mpsc::channel::<GuiEvent>(CHANNEL_BUFFER_DEFAULT);

        let verbose = self.verbose;
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                match event {
                    GuiEvent::Loaded { records, companies } => {
                        println!(
                            "Loaded {} records of {} companies",
                            records.to_string().cyan(),
                            companies.to_string().cyan()
                        );
                    }
                    GuiEvent::FilterChanged { filter, records } => {
                        if verbose {
                            let range = filter
                                .date_range()
                                .map(|r| {
                                    format!(
                                        "{} ~ {}",
                                        date_to_str(&r.start()),
                                        date_to_str(&r.end())
                                    )
                                })
                                .unwrap_or("-".to_string());
                            println!(
                                "[{}] {} => {} records",
                                range,
                                filter.selected_companies().iter().join(", "),
                                records.to_string().cyan()
                            );
                        }
                    }
                }
            }
        });

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_maximized(true),
            ..Default::default()
        };

        let result = eframe::run_native(
            &format!("Stock Dashboard {VERSION}"),
            options,
            Box::new(|cc| {
                Ok(Box::new(DashboardViewer::new(
                    cc, sender, &data_file, &config,
                )))
            }),
        );

        if let Err(err) = result {
            println!("[!] {}", err.to_string().red());
        }
    }
}
