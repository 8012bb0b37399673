use colored::Colorize;
use stockdash::{
    api,
    error::SdResult,
    filter,
    utils::datetime::date_to_str,
};
use tabled::{
    Table,
    settings::{
        Alignment, Color,
        object::{Columns, Object, Rows},
    },
};

#[derive(clap::Args)]
pub struct ListCommand;

impl ListCommand {
    pub async fn exec(&self) {
        match load_companies_as_table().await {
            Ok(Some(table)) => {
                println!("{table}");
            }
            Ok(None) => match api::get_data_file().await {
                Ok(data_file) => {
                    println!(
                        "[!] No company in '{}'",
                        data_file.to_string_lossy().yellow()
                    );
                }
                Err(err) => {
                    println!("[!] {}", err.to_string().red());
                }
            },
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}

async fn load_companies_as_table() -> SdResult<Option<Table>> {
    let data_file = api::get_data_file().await?;
    let records = api::load_records(&data_file).await?;

    let companies = filter::available_companies(&records);
    if companies.is_empty() {
        return Ok(None);
    }

    let mut table_data: Vec<Vec<String>> = vec![vec![
        "".to_string(),
        "Sector".to_string(),
        "Records".to_string(),
        "First Date".to_string(),
        "Last Date".to_string(),
    ]];

    for company in companies {
        let company_records: Vec<_> = records.iter().filter(|r| r.company == company).collect();
        let sector = company_records
            .iter()
            .map(|r| r.sector.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("-");
        let dates = company_records.iter().filter_map(|r| r.date);

        table_data.push(vec![
            company.to_string(),
            sector.to_string(),
            format!("{}", company_records.len()),
            dates
                .clone()
                .min()
                .map(|d| date_to_str(&d))
                .unwrap_or("-".to_string()),
            dates
                .max()
                .map(|d| date_to_str(&d))
                .unwrap_or("-".to_string()),
        ]);
    }

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(2..), Alignment::right());

    Ok(Some(table))
}
