use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BET: f64 = 100.0;

//explicit dollar allocation per leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Capital {
    //same allocation on every leg
    Uniform(f64),
    //one allocation per column, in column order
    PerLeg(Vec<f64>),
}

impl Capital {
    //expands the allocation to one value per leg, None on a length mismatch
    pub fn per_leg(&self, legs: usize) -> Option<Vec<f64>> {
        match self {
            Capital::Uniform(value) => Some(vec![*value; legs]),
            Capital::PerLeg(values) if values.len() == legs => Some(values.clone()),
            Capital::PerLeg(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Capital::Uniform(_) => 1,
            Capital::PerLeg(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//spread construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadConfig {
    //explicit allocation, the hedge is beta-derived when absent
    pub capital: Option<Capital>,
    //display name, defaults to the column names joined with '_'
    pub name: Option<String>,
    //dollar size of the reference leg in the beta-derived hedge
    pub bet: f64,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        SpreadConfig {
            capital: None,
            name: None,
            bet: DEFAULT_BET,
        }
    }
}

impl SpreadConfig {
    pub fn with_capital(capital: Capital) -> Self {
        SpreadConfig {
            capital: Some(capital),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn bet(mut self, bet: f64) -> Self {
        self.bet = bet;
        self
    }
}

//parameters of one leg of a spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegParams {
    pub symbol: String,
    //price on the last row of the table
    pub last_close: f64,
    //hedge beta, NaN except on the hedge leg of a beta-derived spread
    pub beta: f64,
    //signed dollar allocation
    pub capital: f64,
    //capital relative to the reference leg
    pub gain: f64,
    //position size implied by capital and last close
    pub shares: f64,
}

//per-leg parameter table, legs in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadParams {
    pub legs: Vec<LegParams>,
}

impl SpreadParams {
    pub fn get(&self, symbol: &str) -> Option<&LegParams> {
        self.legs.iter().find(|leg| leg.symbol == symbol)
    }

    pub fn gains(&self) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.gain).collect()
    }

    pub fn shares(&self) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.shares).collect()
    }

    pub fn capital(&self) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.capital).collect()
    }

    //hedge beta if the spread was beta-derived
    pub fn beta(&self) -> Option<f64> {
        self.legs.iter().map(|leg| leg.beta).find(|b| !b.is_nan())
    }

    //fields as rows, one column per leg
    fn to_table(&self) -> Table {
        let mut table = Table::new();

        let mut header = vec![Cell::new("")];
        header.extend(self.legs.iter().map(|leg| Cell::new(&leg.symbol)));
        table.add_row(Row::new(header));

        let fields: [(&str, fn(&LegParams) -> f64); 5] = [
            ("last close", |leg| leg.last_close),
            ("beta", |leg| leg.beta),
            ("capital", |leg| leg.capital),
            ("gain", |leg| leg.gain),
            ("shares", |leg| leg.shares),
        ];

        for (label, value) in fields {
            let mut row = vec![Cell::new(label)];
            row.extend(
                self.legs
                    .iter()
                    .map(|leg| Cell::new(&format!("{:.4}", value(leg)))),
            );
            table.add_row(Row::new(row));
        }

        table
    }

    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }
}

impl fmt::Display for SpreadParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_capital_broadcasts() {
        assert_eq!(Capital::Uniform(5.0).per_leg(3), Some(vec![5.0, 5.0, 5.0]));
        assert_eq!(Capital::PerLeg(vec![1.0, 2.0]).per_leg(2), Some(vec![1.0, 2.0]));
        assert_eq!(Capital::PerLeg(vec![1.0, 2.0]).per_leg(3), None);
    }

    #[test]
    fn capital_deserializes_untagged() {
        let scalar: Capital = serde_json::from_str("10000.0").unwrap();
        assert_eq!(scalar, Capital::Uniform(10000.0));
        let pair: Capital = serde_json::from_str("[100.0, -50.0]").unwrap();
        assert_eq!(pair, Capital::PerLeg(vec![100.0, -50.0]));
    }

    #[test]
    fn default_config_bets_one_hundred() {
        let config = SpreadConfig::default();
        assert_eq!(config.bet, DEFAULT_BET);
        assert!(config.capital.is_none());
        assert_eq!(SpreadConfig::default().name("X").bet(5.0).name.as_deref(), Some("X"));
    }
}
