use clap::Subcommand;

mod config;
mod list;
mod show;
mod view;

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand, about = "Show or change configurations")]
    Config(Box<config::ConfigCommand>),

    #[command(about = "List companies in the data file")]
    #[clap(visible_aliases = &["ls"])]
    List(Box<list::ListCommand>),

    #[command(about = "Show the chart aggregates of filtered records")]
    Show(Box<show::ShowCommand>),

    #[command(about = "Open the dashboard window")]
    #[clap(visible_aliases = &["gui"])]
    View(Box<view::ViewCommand>),
}
