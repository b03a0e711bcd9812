use crate::data::{PriceTable, TimeSeries};
use crate::error::{AnalysisError, Result};
use crate::metrics::{cumulative_sum, estimate_beta, SpreadStatistics};
use crate::spread::params::{Capital, LegParams, SpreadConfig, SpreadParams};
use std::fmt;

//capital-weighted combination of aligned price columns
//
//the first column is the reference leg. without explicit capital the
//table must hold exactly two columns and the second leg is hedged by
//the ols beta of its returns on the reference leg's returns
#[derive(Debug, Clone)]
pub struct Spread {
    name: String,
    table: PriceTable,
    params: SpreadParams,
    returns: TimeSeries,
    stats: Option<SpreadStatistics>,
}

impl Spread {
    //builds the spread and its parameter table in one step
    pub fn new(table: PriceTable, config: SpreadConfig) -> Result<Self> {
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| table.symbols().join("_"));

        let (params, returns) = calculate(&table, config.capital.as_ref(), config.bet, &name)?;

        tracing::debug!(
            spread = %name,
            legs = params.legs.len(),
            rows = table.len(),
            "spread calculated"
        );

        Ok(Spread {
            name,
            table,
            params,
            returns,
            stats: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn params(&self) -> &SpreadParams {
        &self.params
    }

    //combined returns, undefined wherever a leg's return is undefined
    pub fn returns(&self) -> &TimeSeries {
        &self.returns
    }

    //statistics from the last calculate_statistics call
    pub fn stats(&self) -> Option<&SpreadStatistics> {
        self.stats.as_ref()
    }

    //ordered leg names
    pub fn symbols(&self) -> Vec<&str> {
        self.table.symbols()
    }

    //dollar value of the position at every row, recomputed on each call
    pub fn spread_values(&self) -> TimeSeries {
        let shares = self.params.shares();
        let values = (0..self.table.len())
            .map(|row| {
                self.table
                    .columns()
                    .zip(shares.iter())
                    .map(|((_, prices), shares)| prices[row] * shares)
                    .sum::<f64>()
            })
            .collect();

        TimeSeries::from_values(self.name.clone(), self.table.dates().to_vec(), values)
    }

    //running sum of combined returns in percent
    pub fn cumulative_returns(&self) -> TimeSeries {
        TimeSeries::new(
            self.name.clone(),
            self.returns.dates.clone(),
            cumulative_sum(&self.returns.values, 100.0),
        )
    }

    //computes and stores the statistics summary, correlating against
    //the first column of the benchmark when given
    pub fn calculate_statistics(&mut self, benchmark: Option<&PriceTable>) -> &SpreadStatistics {
        let benchmark_returns = benchmark.map(|b| {
            b.all_returns()
                .into_iter()
                .next()
                .unwrap_or_else(|| TimeSeries::new("benchmark", Vec::new(), Vec::new()))
        });

        let stats = SpreadStatistics::from_series(
            &self.returns,
            &self.spread_values(),
            self.table.len(),
            benchmark_returns.as_ref(),
        );

        tracing::debug!(spread = %self.name, std = stats.std, last = stats.last, "statistics calculated");

        self.stats.insert(stats)
    }
}

//assembles the parameter table and the combined return series
fn calculate(
    table: &PriceTable,
    capital: Option<&Capital>,
    bet: f64,
    name: &str,
) -> Result<(SpreadParams, TimeSeries)> {
    let last_close = table.last_row().ok_or(AnalysisError::EmptyTable)?;
    let legs = table.num_columns();
    let returns = table.all_returns();

    let mut beta = vec![f64::NAN; legs];

    let (capital, gain) = match capital {
        None => {
            if legs != 2 {
                return Err(AnalysisError::InsufficientColumns(legs));
            }

            let hedge_beta = estimate_beta(&returns[0].values, &returns[1].values);
            if hedge_beta.is_nan() {
                tracing::warn!(spread = %name, "hedge beta is undefined");
            }
            beta[1] = hedge_beta;

            let gain = vec![1.0, -1.0 / hedge_beta];
            let capital = gain.iter().map(|g| g * bet).collect::<Vec<_>>();
            (capital, gain)
        }
        Some(capital) => {
            let capital = capital
                .per_leg(legs)
                .ok_or(AnalysisError::CapitalMismatch {
                    capital: capital.len(),
                    columns: legs,
                })?;
            let gain = capital.iter().map(|c| c / capital[0]).collect::<Vec<_>>();
            (capital, gain)
        }
    };

    let params = SpreadParams {
        legs: table
            .symbols()
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| {
                if last_close[i] == 0.0 {
                    tracing::warn!(spread = %name, leg = %symbol, "last close is zero");
                }

                LegParams {
                    symbol: symbol.to_string(),
                    last_close: last_close[i],
                    beta: beta[i],
                    capital: capital[i],
                    gain: gain[i],
                    shares: capital[i] / last_close[i],
                }
            })
            .collect(),
    };

    let combined = (0..table.len())
        .map(|row| {
            returns
                .iter()
                .zip(gain.iter())
                .map(|(series, gain)| series.values[row].map(|r| r * gain))
                .sum::<Option<f64>>()
        })
        .collect();

    Ok((
        params,
        TimeSeries::new(name, table.dates().to_vec(), combined),
    ))
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(10);
        writeln!(f, "{}{}{}", rule, self.name, rule)?;
        match &self.stats {
            Some(stats) => write!(f, "{}", stats)?,
            None => writeln!(f, "None")?,
        }
        write!(f, "{}", self.params)
    }
}
