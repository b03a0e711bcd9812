use crate::data::{HistoryStore, PriceField};
use crate::spread::{Capital, SpreadConfig, DEFAULT_BET};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete spread analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfiguration {
    //data
    pub data_root: PathBuf,
    pub legs: Vec<String>,
    pub field: PriceField,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,

    //spread construction
    pub capital: Option<Capital>,
    pub bet: f64,
    pub name: Option<String>,

    //statistics
    pub benchmark: Option<String>,

    //optional output paths
    pub output_spread_csv: Option<PathBuf>,
    pub output_returns_csv: Option<PathBuf>,
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        AnalysisConfiguration {
            data_root: PathBuf::from("data"),
            legs: vec!["SPY".to_string(), "IWM".to_string()],
            field: PriceField::AdjClose,
            start: None,
            end: None,
            capital: None,
            bet: DEFAULT_BET,
            name: None,
            benchmark: None,
            output_spread_csv: None,
            output_returns_csv: None,
        }
    }
}

impl AnalysisConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: AnalysisConfiguration = serde_json::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //history store rooted at the configured data directory
    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(self.data_root.clone())
    }

    //spread construction options
    pub fn spread_config(&self) -> SpreadConfig {
        SpreadConfig {
            capital: self.capital.clone(),
            name: self.name.clone(),
            bet: self.bet,
        }
    }
}
