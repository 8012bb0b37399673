//! # stockdash CLI

use std::path::PathBuf;

use clap::Parser;

use crate::cli::Commands;

mod cli;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short = 'd',
        long = "data",
        help = "The CSV file of stock records, overrides the configured one"
    )]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    stockdash::init(cli.data_file);

    match &cli.command {
        Commands::Config(cmd) => {
            cmd.exec().await;
        }
        Commands::List(cmd) => {
            cmd.exec().await;
        }
        Commands::Show(cmd) => {
            cmd.exec().await;
        }
        Commands::View(cmd) => {
            cmd.exec().await;
        }
    }
}
