use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarError {
    #[error("Invalid price bar on {date}: high ({high}) < low ({low})")]
    InvalidHighLow {
        date: NaiveDate,
        high: f64,
        low: f64,
    },
    #[error("Invalid price bar on {date}: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose {
        date: NaiveDate,
        close: f64,
        high: f64,
        low: f64,
    },
    #[error("Invalid price bar on {date}: non-positive adjusted close ({adj_close})")]
    InvalidAdjClose { date: NaiveDate, adj_close: f64 },
    #[error("Negative volume on {date}: {volume}")]
    NegativeVolume { date: NaiveDate, volume: f64 },
}

//one daily observation of a security's price history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl PriceBar {
    //creates a new PriceBar with validation
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        if high < low {
            return Err(BarError::InvalidHighLow { date, high, low });
        }

        if close < low || close > high {
            return Err(BarError::InvalidClose {
                date,
                close,
                high,
                low,
            });
        }

        //adjusted close is rescaled by splits and dividends so it may leave
        //the raw high-low range, but never goes to zero
        if adj_close <= 0.0 {
            return Err(BarError::InvalidAdjClose { date, adj_close });
        }

        if volume < 0.0 {
            return Err(BarError::NegativeVolume { date, volume });
        }

        Ok(Self::new_unchecked(
            date, open, high, low, close, adj_close, volume,
        ))
    }

    //creates a PriceBar without validation
    pub fn new_unchecked(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        }
    }

    //returns the value of the requested field
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjClose => self.adj_close,
            PriceField::Volume => self.volume,
        }
    }
}

//column of a price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    #[default]
    AdjClose,
    Volume,
}

impl PriceField {
    //parse a field name, accepting the common spellings of adjusted close
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(PriceField::Open),
            "high" => Some(PriceField::High),
            "low" => Some(PriceField::Low),
            "close" => Some(PriceField::Close),
            "adj_close" | "adjclose" | "adj close" => Some(PriceField::AdjClose),
            "volume" => Some(PriceField::Volume),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::AdjClose => "adj_close",
            PriceField::Volume => "volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
