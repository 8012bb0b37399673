use chrono::NaiveDate;
use colored::Colorize;
use stockdash::{
    aggregate::Aggregates,
    api,
    utils::datetime::{date_from_str, date_to_str},
};
use tabled::{
    Table,
    settings::{
        Alignment, Color,
        object::{Columns, Object, Rows},
    },
};

#[derive(clap::Args)]
pub struct ShowCommand {
    #[arg(
        short = 'c',
        long = "company",
        help = "Company to include, e.g. -c Apple -c Tesla, all companies if omitted"
    )]
    companies: Vec<String>,

    #[arg(
        short = 's',
        long = "start",
        value_parser = parse_date,
        help = "First date to include, e.g. 2023-01-01"
    )]
    start_date: Option<NaiveDate>,

    #[arg(
        short = 'e',
        long = "end",
        value_parser = parse_date,
        help = "Last date to include, e.g. 2023-12-31"
    )]
    end_date: Option<NaiveDate>,

    #[arg(long = "json", help = "Print the aggregates as JSON")]
    json: bool,
}

impl ShowCommand {
    pub async fn exec(&self) {
        let data_file = match api::get_data_file().await {
            Ok(data_file) => data_file,
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        match api::load_dashboard(
            &data_file,
            &self.companies,
            self.start_date,
            self.end_date,
        )
        .await
        {
            Ok(dashboard) => {
                let aggregates = dashboard.aggregates();

                if self.json {
                    match api::aggregates_to_json(aggregates) {
                        Ok(json) => println!("{json}"),
                        Err(err) => println!("[!] {}", err.to_string().red()),
                    }
                    return;
                }

                println!(
                    "{} of {} records",
                    dashboard.filtered_count().to_string().cyan(),
                    dashboard.records().len()
                );

                if aggregates.is_empty() {
                    println!("[!] {}", "No data".yellow());
                    return;
                }

                println!("\n{}", line_table(aggregates));
                println!("\n{}", stacked_table(aggregates));
                println!("\n{}", treemap_table(aggregates));
                println!(
                    "\n{} scatter points",
                    aggregates
                        .scatter
                        .iter()
                        .filter(|p| p.is_renderable())
                        .count()
                );
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    date_from_str(s).map_err(|err| err.to_string())
}

fn line_table(aggregates: &Aggregates) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        "Date".to_string(),
        "Avg High".to_string(),
        "Avg Low".to_string(),
    ]];

    for point in &aggregates.line {
        table_data.push(vec![
            date_to_str(&point.date),
            format_number(point.avg_high),
            format_number(point.avg_low),
        ]);
    }

    style_table(&table_data)
}

fn stacked_table(aggregates: &Aggregates) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        "Sector".to_string(),
        "Bearish".to_string(),
        "Bullish".to_string(),
        "Stable".to_string(),
        "Total".to_string(),
    ]];

    for counts in &aggregates.stacked {
        table_data.push(vec![
            counts.sector.to_string(),
            format!("{}", counts.bearish),
            format!("{}", counts.bullish),
            format!("{}", counts.stable),
            format!("{}", counts.total),
        ]);
    }

    style_table(&table_data)
}

fn treemap_table(aggregates: &Aggregates) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        "Company".to_string(),
        "Sector".to_string(),
        "Avg Market Cap".to_string(),
    ]];

    for company in aggregates.treemap.companies() {
        table_data.push(vec![
            company.company.to_string(),
            company.sector.to_string(),
            format!("${:.0}", company.avg_market_cap),
        ]);
    }

    let mut table = style_table(&table_data);
    table.modify(Columns::new(1..2), Alignment::left());
    table
}

fn style_table(table_data: &[Vec<String>]) -> Table {
    let mut table = tabled::builder::Builder::from_iter(table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(1..), Alignment::right());
    table
}

fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "-".to_string()
    }
}
