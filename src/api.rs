use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::{
    CONFIG_PATH, DATA_FILE,
    aggregate::Aggregates,
    config::Config,
    dashboard::Dashboard,
    data::{StockRecord, parser},
    error::*,
};

pub async fn get_config() -> SdResult<Config> {
    Config::from_file(&CONFIG_PATH)
}

pub async fn set_config(key: &str, value: &str) -> SdResult<()> {
    let mut config = Config::from_file(&CONFIG_PATH)?;
    config.set(key, value)?;
    config.save_to_file(&CONFIG_PATH)?;

    debug!("Config '{key}' set to '{value}'");
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    CONFIG_PATH.to_path_buf()
}

/// The data file given on the command line, else the configured one.
pub async fn get_data_file() -> SdResult<PathBuf> {
    if let Some(data_file) = DATA_FILE.read()?.as_ref() {
        return Ok(data_file.clone());
    }

    let config = get_config().await?;
    Ok(PathBuf::from(config.data_file))
}

pub async fn load_records(path: &Path) -> SdResult<Vec<StockRecord>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || parser::load_records(&path)).await?
}

/// Loads the records and narrows the filter to the requested companies and
/// dates. Missing bounds fall back to the span of the data, an empty company
/// list keeps every company.
pub async fn load_dashboard(
    path: &Path,
    companies: &[String],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> SdResult<Dashboard> {
    let records = load_records(path).await?;
    if records.is_empty() {
        return Err(SdError::NoData {
            code: "NO_RECORDS",
            message: format!("No records in '{}'", path.to_string_lossy()),
        });
    }

    let mut dashboard = Dashboard::new(records);

    if !companies.is_empty() {
        for company in companies {
            if !dashboard.companies().contains(company) {
                warn!("Unknown company '{company}'");
            }
        }
        dashboard.set_selected_companies(companies.iter().cloned().collect());
    }

    if start_date.is_some() || end_date.is_some() {
        if let (Some(first), Some(last)) = (dashboard.dates().first(), dashboard.dates().last()) {
            let start = start_date.unwrap_or(*first);
            let end = end_date.unwrap_or(*last);
            dashboard.set_date_range(start, end)?;
        }
    }

    Ok(dashboard)
}

pub fn aggregates_to_json(aggregates: &Aggregates) -> SdResult<String> {
    serde_json::to_string_pretty(aggregates).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const CSV: &str = "\
Date,Open,Close,Company,High,Low,Sector,Dividend Yield,PE Ratio,Market Cap,Sentiment
2023-01-01,10,11,Acme,12,9,Technology,1.0,20,1000,Bullish
2023-01-02,20,21,Globex,22,19,Energy,2.0,15,2000,Bearish
2023-01-03,11,12,Acme,13,10,Technology,1.1,21,1100,Stable
";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_dashboard() {
        let file = write_temp(CSV);
        let path = file.path();

        let dashboard = load_dashboard(path, &[], None, None).await.unwrap();
        assert_eq!(dashboard.filtered_count(), 3);

        let dashboard = load_dashboard(
            path,
            &["Acme".to_string()],
            NaiveDate::from_ymd_opt(2023, 1, 2),
            None,
        )
        .await
        .unwrap();
        assert_eq!(dashboard.filtered_count(), 1);

        let result = load_dashboard(
            path,
            &[],
            NaiveDate::from_ymd_opt(2023, 1, 3),
            NaiveDate::from_ymd_opt(2023, 1, 1),
        )
        .await;
        assert!(matches!(result, Err(SdError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_load_empty_file() {
        let file = write_temp("");

        assert!(load_records(file.path()).await.unwrap().is_empty());
        let err = load_dashboard(file.path(), &[], None, None).await.unwrap_err();
        assert_eq!(err.code(), Some("NO_RECORDS"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_records(Path::new("/nonexistent/stockdash.csv")).await;
        assert!(matches!(result, Err(SdError::IoError(_))));
    }

    #[test]
    fn test_aggregates_to_json() {
        let json = aggregates_to_json(&Aggregates::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["line"].as_array().unwrap().is_empty());
        assert!(value["treemap"]["sectors"].as_array().unwrap().is_empty());
    }
}
