//! order-insights CLI - Command-line reporting over e-commerce order data
//!
//! Loads the flattened order table, filters it to a date range and prints
//! every summary table as text or JSON.
//!
//! ## Example Usage
//!
//! ```bash
//! # Full report over the whole dataset
//! order-insights report all_data.csv
//!
//! # Report for one quarter as JSON
//! order-insights report all_data.csv --start 2018-01-01 --end 2018-03-31 --format json
//!
//! # RFM leaders
//! order-insights rfm all_data.csv --limit 10
//!
//! # Dataset overview
//! order-insights info all_data.csv
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use order_insights::analytics::grouping::{distinct_customers, distinct_orders};
use order_insights::analytics::{rfm, RankedGroup, Ranking, RfmRow, RfmSummary};
use order_insights::config::ReportConfig;
use order_insights::data::{load_dataset, DateRange, Dataset};
use order_insights::report::{InsightsReport, RfmReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Widest bar drawn next to a ranking row
const BAR_WIDTH: usize = 30;

/// order-insights: descriptive analytics over e-commerce orders
#[derive(Parser)]
#[command(name = "order-insights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Descriptive analytics over e-commerce orders", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every summary table for a date range
    Report {
        /// Order data file (CSV, TSV or parquet)
        #[arg(value_name = "DATA")]
        data: Option<PathBuf>,

        /// First purchase date included (YYYY-MM-DD), defaults to the earliest
        #[arg(short = 's', long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last purchase date included (YYYY-MM-DD), defaults to the latest
        #[arg(short = 'e', long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Show RFM averages and leaders over the full dataset
    Rfm {
        /// Order data file
        #[arg(value_name = "DATA")]
        data: Option<PathBuf>,

        /// Customers per leader table
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show dataset size and date bounds
    Info {
        /// Order data file
        #[arg(value_name = "DATA")]
        data: Option<PathBuf>,
    },
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    /// Data file used when a command is given none
    #[serde(default)]
    data_path: Option<PathBuf>,
    /// Currency code shown next to monetary values
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    report: ReportConfig,
}

fn default_currency() -> String {
    "AUD".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            currency: default_currency(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    fn load(path: Option<&Path>) -> Self {
        if let Some(config_path) = path {
            if config_path.exists() {
                match fs::read_to_string(config_path) {
                    Ok(contents) => match toml::from_str(&contents) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("{} Failed to parse config: {}", "Warning:".yellow(), e);
                        }
                    },
                    Err(e) => {
                        eprintln!("{} Failed to read config: {}", "Warning:".yellow(), e);
                    }
                }
            } else {
                eprintln!(
                    "{} Config file {} not found, using defaults",
                    "Warning:".yellow(),
                    config_path.display()
                );
            }
        } else if let Some(home) = dirs::home_dir() {
            let default_config = home.join(".order-insights").join("config.toml");
            if default_config.exists() {
                if let Ok(contents) = fs::read_to_string(&default_config) {
                    if let Ok(config) = toml::from_str(&contents) {
                        return config;
                    }
                }
            }
        }

        Config::default()
    }

    fn data_file(&self, arg: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
        arg.or_else(|| self.data_path.clone())
            .ok_or_else(|| "No data file given and no data_path configured".into())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", raw, e))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    if let Err(e) = config.report.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "order-insights".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
    }

    let result = match cli.command {
        Commands::Report {
            data,
            start,
            end,
            format,
            output,
        } => run_report(ReportArgs {
            data,
            start,
            end,
            format,
            output,
            verbose: cli.verbose,
            config,
        }),
        Commands::Rfm { data, limit } => show_rfm(data, limit, &config),
        Commands::Info { data } => show_info(data, &config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

struct ReportArgs {
    data: Option<PathBuf>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    format: OutputFormat,
    output: Option<PathBuf>,
    verbose: bool,
    config: Config,
}

fn load(path: &Path) -> Result<Dataset, Box<dyn std::error::Error>> {
    Ok(load_dataset(path)?)
}

fn run_report(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = args.config.data_file(args.data)?;
    let full = load(&path)?;

    let report = match (full.date_bounds(), args.start, args.end) {
        (None, _, _) => InsightsReport::build_full(&full, &args.config.report)?,
        (Some((min, max)), start, end) => {
            let range = DateRange::new(start.unwrap_or(min), end.unwrap_or(max));
            InsightsReport::build(&full, range, &args.config.report)?
        }
    };

    if args.verbose {
        println!("  {} {}", "Data:".bold(), path.display());
        println!("  {} {}", "Rows:".bold(), full.len());
        println!();
    }

    let rendered = match args.format {
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Text => render_report(&report, &args.config.currency),
    };

    match args.output {
        Some(output_path) => {
            fs::write(&output_path, rendered)?;
            println!(
                "{} Report written to {}",
                "✓".green().bold(),
                output_path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn show_rfm(
    data: Option<PathBuf>,
    limit: Option<usize>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let full = load(&config.data_file(data)?)?;
    let limit = limit.unwrap_or(config.report.rfm_limit);
    if limit == 0 {
        return Err("--limit must be at least 1".into());
    }

    let table = rfm(&full);
    let section = RfmReport::from_table(&table, limit);
    println!("{}", render_rfm(&section, &config.currency));
    Ok(())
}

fn show_info(data: Option<PathBuf>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.data_file(data)?;
    let full = load(&path)?;

    println!("{}", "Dataset".bold());
    println!("{}", "=======".dimmed());
    println!("  {} {}", "File:".bold(), path.display());
    println!("  {} {}", "Rows:".bold(), full.len());
    println!("  {} {}", "Orders:".bold(), distinct_orders(&full));
    println!("  {} {}", "Customers:".bold(), distinct_customers(&full));
    match full.date_bounds() {
        Some((min, max)) => println!("  {} {} to {}", "Purchases:".bold(), min, max),
        None => println!("  {} {}", "Purchases:".bold(), "none".dimmed()),
    }
    println!();
    Ok(())
}

// Rendering

fn render_report(report: &InsightsReport, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "E-commerce Order Report".cyan().bold()));
    match report.range {
        Some(range) => out.push_str(&format!(
            "{} {} to {} ({} rows)\n\n",
            "Range:".bold(),
            range.start,
            range.end,
            report.rows_in_range
        )),
        None => out.push_str(&format!("{}\n\n", "Dataset is empty".dimmed())),
    }

    out.push_str(&render_ranking("Best Performing Product", &report.best_products));
    out.push_str(&render_ranking("Worst Performing Product", &report.worst_products));
    out.push_str(&render_ranking(
        "Highest Reviews of Seller (4 and 5 stars)",
        &report.best_sellers,
    ));
    out.push_str(&render_ranking("Number of Customer by State", &report.customers_by_state));
    out.push_str(&render_ranking("Number of Customer by City", &report.customers_by_city));
    out.push_str(&render_rfm(&report.rfm, currency));
    out
}

fn render_ranking(title: &str, ranking: &Ranking) -> String {
    let mut out = format!("{}\n{}\n", title.bold(), "-".repeat(title.len()).as_str().dimmed());
    if ranking.is_empty() {
        out.push_str(&format!("  {}\n\n", "no data".dimmed()));
        return out;
    }

    let width = ranking.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let peak = ranking.entries.iter().map(|e| e.count).max().unwrap_or(1).max(1);
    for (i, RankedGroup { name, count }) in ranking.entries.iter().enumerate() {
        let bar = "█".repeat((count * BAR_WIDTH + peak - 1) / peak);
        let bar = if i == 0 { bar.as_str().cyan() } else { bar.as_str().dimmed() };
        out.push_str(&format!("  {:<width$}  {:>6}  {}\n", name, count, bar, width = width));
    }
    out.push('\n');
    out
}

fn render_rfm(section: &RfmReport, currency: &str) -> String {
    let title = "Best Customer Based on RFM Parameters";
    let mut out = format!("{}\n{}\n", title.bold(), "-".repeat(title.len()).as_str().dimmed());

    let Some(RfmSummary {
        customers,
        average_recency,
        average_frequency,
        average_monetary,
    }) = section.summary.clone()
    else {
        out.push_str(&format!("  {}\n", "no customers".dimmed()));
        return out;
    };

    out.push_str(&format!("  {} {}\n", "Customers:".bold(), customers));
    out.push_str(&format!("  {} {:.1}\n", "Average Recency (days):".bold(), average_recency));
    out.push_str(&format!("  {} {:.2}\n", "Average Frequency:".bold(), average_frequency));
    out.push_str(&format!(
        "  {} {}\n\n",
        "Average Monetary:".bold(),
        format_currency(average_monetary, currency)
    ));

    let leaders: [(&str, &[RfmRow], fn(&RfmRow, &str) -> String); 3] = [
        ("By Recency (days)", &section.by_recency, |r, _| r.recency.to_string()),
        ("By Frequency", &section.by_frequency, |r, _| r.frequency.to_string()),
        ("By Monetary", &section.by_monetary, |r, c| format_currency(r.monetary, c)),
    ];
    for (label, rows, value) in leaders {
        out.push_str(&format!("  {}\n", label.underline()));
        for row in rows {
            out.push_str(&format!("    {}  {}\n", row.customer_id, value(row, currency)));
        }
    }
    out
}

/// Format an amount with thousands separators and two decimals
fn format_currency(amount: f64, currency: &str) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{} {}{}.{}", currency, sign, grouped, cents)
}
