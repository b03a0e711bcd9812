use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pairspread::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pairspread")]
#[command(about = "Spread construction and statistics for equity pairs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //build a spread from two or more symbols and print its statistics
    Analyze {
        //json configuration file, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //directory holding <symbol>.csv price histories
        #[arg(long)]
        data_root: Option<PathBuf>,

        //legs of the spread, reference leg first (eg SPY,IWM)
        #[arg(long, value_delimiter = ',')]
        legs: Vec<String>,

        //price field to build the spread from
        #[arg(long)]
        field: Option<String>,

        //explicit capital, one value for every leg (eg 10000) or one per leg
        //(eg 10000,-8000), beta hedge when omitted
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        capital: Vec<f64>,

        //dollar size of the reference leg for the beta hedge
        #[arg(long)]
        bet: Option<f64>,

        //display name of the spread
        #[arg(long)]
        name: Option<String>,

        //symbol to correlate the spread returns against
        #[arg(long)]
        benchmark: Option<String>,

        //first date to include (yyyy-mm-dd)
        #[arg(long)]
        start: Option<NaiveDate>,

        //last date to include (yyyy-mm-dd)
        #[arg(long)]
        end: Option<NaiveDate>,

        //output path for spread value csv
        #[arg(long)]
        output_spread_csv: Option<PathBuf>,

        //output path for combined returns csv
        #[arg(long)]
        output_returns_csv: Option<PathBuf>,
    },

    //print the day returns of one symbol
    Returns {
        //directory holding <symbol>.csv price histories
        #[arg(long, default_value = "data")]
        data_root: PathBuf,

        //symbol to load
        #[arg(long)]
        symbol: String,

        //number of most recent returns to show
        #[arg(long, default_value = "10")]
        last: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            data_root,
            legs,
            field,
            capital,
            bet,
            name,
            benchmark,
            start,
            end,
            output_spread_csv,
            output_returns_csv,
        } => {
            let mut configuration = match config {
                Some(path) => AnalysisConfiguration::from_json_file(&path)?,
                None => AnalysisConfiguration::default(),
            };

            if let Some(data_root) = data_root {
                configuration.data_root = data_root;
            }
            if !legs.is_empty() {
                configuration.legs = legs;
            }
            if let Some(field) = field {
                configuration.field = PriceField::parse(&field)
                    .ok_or_else(|| anyhow::anyhow!("Unknown price field: {}", field))?;
            }
            if let Some(capital) = capital_from_flag(capital) {
                configuration.capital = Some(capital);
            }
            if let Some(bet) = bet {
                configuration.bet = bet;
            }
            configuration.name = name.or(configuration.name);
            configuration.benchmark = benchmark.or(configuration.benchmark);
            configuration.start = start.or(configuration.start);
            configuration.end = end.or(configuration.end);
            configuration.output_spread_csv = output_spread_csv.or(configuration.output_spread_csv);
            configuration.output_returns_csv =
                output_returns_csv.or(configuration.output_returns_csv);

            run_analysis(&configuration)?;
        }
        Commands::Returns {
            data_root,
            symbol,
            last,
        } => {
            print_returns(&HistoryStore::new(data_root), &symbol, last)?;
        }
    }

    Ok(())
}

//a single value is spread over every leg, several values are taken per leg
fn capital_from_flag(values: Vec<f64>) -> Option<Capital> {
    match values.len() {
        0 => None,
        1 => Some(Capital::Uniform(values[0])),
        _ => Some(Capital::PerLeg(values)),
    }
}

fn run_analysis(config: &AnalysisConfiguration) -> Result<()> {
    println!("Pair Spread Analysis");
    println!("====================\n");

    if config.legs.len() < 2 {
        anyhow::bail!("A spread needs at least 2 legs, got {}", config.legs.len());
    }

    let store = config.history_store();

    //load each leg
    let mut columns = Vec::with_capacity(config.legs.len());
    for symbol in &config.legs {
        let series = PriceSeries::load(symbol.as_str(), &store, config.start, config.end)?;
        if let Some((first, last)) = series.date_range() {
            println!("Loaded {} bars for {} ({} to {})", series.len(), symbol, first, last);
        }
        columns.push(series.price_column(config.field)?);
    }

    let table = PriceTable::from_series(&columns)?;
    if table.is_empty() {
        anyhow::bail!("No common dates across {}", config.legs.join(", "));
    }
    println!("Aligned {} rows on field {}\n", table.len(), config.field);

    //build spread and statistics
    let mut spread = Spread::new(table, config.spread_config())
        .context("Failed to build spread")?;

    let benchmark = match &config.benchmark {
        Some(symbol) => {
            let series = PriceSeries::load(symbol.as_str(), &store, config.start, config.end)?;
            Some(series.price_column(config.field)?)
        }
        None => None,
    };
    spread.calculate_statistics(benchmark.as_ref());

    println!("{}", spread);

    //save outputs if requested
    if let Some(path) = &config.output_spread_csv {
        spread.spread_values().write_csv(path)?;
        println!("Spread values saved to {:?}", path);
    }

    if let Some(path) = &config.output_returns_csv {
        spread.returns().write_csv(path)?;
        println!("Combined returns saved to {:?}", path);
    }

    Ok(())
}

fn print_returns(store: &HistoryStore, symbol: &str, last: usize) -> Result<()> {
    let series = PriceSeries::load(symbol, store, None, None)?;
    let returns = series.day_returns()?;

    println!("Day returns for {} ({} bars)\n", symbol, series.len());

    let skip = returns.len().saturating_sub(last);
    for (date, value) in returns.iter().skip(skip) {
        match value {
            Some(r) => println!("{}  {:>8.3}%", date, r * 100.0),
            None => println!("{}  {:>9}", date, "-"),
        }
    }

    Ok(())
}
