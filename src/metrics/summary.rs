use crate::data::TimeSeries;
use crate::metrics::statistics::{correlation_by_date, quantile, sample_std};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

//distribution summary of a spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadStatistics {
    //sample std of the combined returns
    pub std: f64,
    //75th percentile of the spread value
    pub q75: f64,
    //25th percentile of the spread value
    pub q25: f64,
    //latest spread value
    pub last: f64,
    //rows in the price table
    pub samples: usize,
    //correlation of the combined returns with a benchmark's returns
    pub corr: Option<f64>,
}

impl SpreadStatistics {
    //calculate the summary from combined returns and spread values
    pub fn from_series(
        returns: &TimeSeries,
        spread: &TimeSeries,
        samples: usize,
        benchmark_returns: Option<&TimeSeries>,
    ) -> Self {
        let spread_values = spread.valid_values();

        SpreadStatistics {
            std: sample_std(&returns.valid_values()),
            q75: quantile(&spread_values, 0.75),
            q25: quantile(&spread_values, 0.25),
            last: spread.last_value().unwrap_or(f64::NAN),
            samples,
            corr: benchmark_returns.map(|b| correlation_by_date(returns, b)),
        }
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Statistic"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Std (returns)"),
            Cell::new(&format!("{:.4}%", self.std * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("75%"),
            Cell::new(&format!("${:.2}", self.q75)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("25%"),
            Cell::new(&format!("${:.2}", self.q25)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Last"),
            Cell::new(&format!("${:.2}", self.last)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Samples"),
            Cell::new(&format!("{}", self.samples)),
        ]));

        if let Some(corr) = self.corr {
            table.add_row(Row::new(vec![
                Cell::new("Correlation"),
                Cell::new(&format!("{:.3}", corr)),
            ]));
        }

        table
    }

    //prints statistics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }
}

impl fmt::Display for SpreadStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap())
            .collect()
    }

    #[test]
    fn summarizes_spread() {
        let returns = TimeSeries::new("r", dates(4), vec![None, Some(0.01), Some(-0.01), Some(0.03)]);
        let spread = TimeSeries::from_values("s", dates(4), vec![100.0, 101.0, 99.0, 102.0]);

        let stats = SpreadStatistics::from_series(&returns, &spread, 4, None);
        assert!((stats.std - 0.02).abs() < 1e-12);
        assert!((stats.q25 - 99.75).abs() < 1e-12);
        assert!((stats.q75 - 101.25).abs() < 1e-12);
        assert_eq!(stats.last, 102.0);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.corr, None);
    }

    #[test]
    fn renders_correlation_only_when_present() {
        let returns = TimeSeries::new("r", dates(3), vec![None, Some(0.01), Some(0.02)]);
        let spread = TimeSeries::from_values("s", dates(3), vec![1.0, 2.0, 3.0]);

        let without = SpreadStatistics::from_series(&returns, &spread, 3, None).to_string();
        assert!(!without.contains("Correlation"));

        let with = SpreadStatistics::from_series(&returns, &spread, 3, Some(&returns)).to_string();
        assert!(with.contains("Correlation"));
        assert!(with.contains("1.000"));
    }
}
