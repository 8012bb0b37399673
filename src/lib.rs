//! # stockdash lib

use std::{
    env,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use directories::ProjectDirs;

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod gui;
pub mod hover;
pub mod layout;
pub mod scale;
pub mod tooltip;
pub mod utils;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init(data_file: Option<PathBuf>) {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();

    if let Some(data_file) = data_file {
        if let Ok(mut d) = DATA_FILE.write() {
            *d = Some(data_file);
        }
    }
}

static CONFIG_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    match ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
        None => env::current_dir().unwrap_or_default(),
    }
    .join("config.toml")
});

/// Data file given on the command line, overriding the configured one.
static DATA_FILE: LazyLock<RwLock<Option<PathBuf>>> = LazyLock::new(|| RwLock::new(None));
