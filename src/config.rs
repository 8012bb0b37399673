use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{SdError, SdResult},
    hover::DEFAULT_PROXIMITY_THRESHOLD,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_file: String,
    pub proximity_threshold: f64,
    pub scatter_pe_max: f64,
    pub scatter_yield_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: "data/synthetic_stock_data.csv".to_string(),
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            scatter_pe_max: 40.0,
            scatter_yield_max: 5.0,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> SdResult<Self> {
        confy::load_path(path).map_err(Into::into)
    }

    pub fn save_to_file(&self, path: &Path) -> SdResult<()> {
        confy::store_path(path, self).map_err(Into::into)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data_file", self.data_file.clone()),
            ("proximity_threshold", self.proximity_threshold.to_string()),
            ("scatter_pe_max", self.scatter_pe_max.to_string()),
            ("scatter_yield_max", self.scatter_yield_max.to_string()),
        ]
    }

    pub fn set(&mut self, key: &str, value: &str) -> SdResult<()> {
        match key.to_lowercase().as_str() {
            "data_file" => self.data_file = value.to_string(),
            "proximity_threshold" => self.proximity_threshold = parse_positive(key, value)?,
            "scatter_pe_max" => self.scatter_pe_max = parse_positive(key, value)?,
            "scatter_yield_max" => self.scatter_yield_max = parse_positive(key, value)?,
            _ => {
                return Err(SdError::Invalid {
                    code: "UNKNOWN_CONFIG_KEY",
                    message: format!("Unknown configuration '{key}'"),
                });
            }
        }

        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> SdResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(SdError::Invalid {
            code: "INVALID_CONFIG_VALUE",
            message: format!("'{value}' is not a positive number for '{key}'"),
        }),
    }
}
