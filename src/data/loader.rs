use crate::data::bar::PriceBar;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    adj_close: Option<f64>,
    #[serde(default)]
    volume: f64,
}

//loads daily price bars from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceBar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").context(format!(
            "Failed to parse date '{}' at line {}",
            record.date,
            index + 2
        ))?;

        //files without an adjusted column fall back to the raw close
        let adj_close = record.adj_close.unwrap_or(record.close);

        let bar = PriceBar::new(
            date,
            record.open,
            record.high,
            record.low,
            record.close,
            adj_close,
            record.volume,
        )
        .context(format!("Invalid price bar at line {}", index + 2))?;

        bars.push(bar);
    }

    //sort by date to ensure chronological order
    bars.sort_by(|a, b| a.date.cmp(&b.date));
    bars.dedup_by(|a, b| a.date == b.date);

    tracing::debug!(path = ?path, bars = bars.len(), "loaded price history");

    Ok(bars)
}

//keeps bars within an inclusive date range
pub fn filter_by_date(
    bars: &[PriceBar],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<PriceBar> {
    bars.iter()
        .filter(|bar| start.map_or(true, |s| bar.date >= s))
        .filter(|bar| end.map_or(true, |e| bar.date <= e))
        .cloned()
        .collect()
}

//per-symbol price histories stored as `<data_root>/<symbol>.csv`
#[derive(Debug, Clone)]
pub struct HistoryStore {
    data_root: PathBuf,
}

impl HistoryStore {
    pub fn new<P: Into<PathBuf>>(data_root: P) -> Self {
        HistoryStore {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    //path of a symbol's history file
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.data_root.join(format!("{}.csv", symbol))
    }

    //loads the full history of a symbol
    pub fn load(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let path = self.symbol_path(symbol);
        load_csv(&path).context(format!("Failed to load history for {}", symbol))
    }

    //loads a symbol's history within an inclusive date range
    pub fn load_range(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>> {
        let bars = self.load(symbol)?;
        Ok(filter_by_date(&bars, start, end))
    }
}
