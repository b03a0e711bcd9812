use crate::data::series::TimeSeries;
use crate::error::{AnalysisError, Result};
use crate::metrics::simple_returns;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

//date-aligned price table, one column per instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: IndexMap<String, Vec<f64>>,
}

impl PriceTable {
    //creates a table, every column must have one value per date
    //and every date must be unique
    pub fn new(dates: Vec<NaiveDate>, columns: IndexMap<String, Vec<f64>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(dates.len());
        if let Some(date) = dates.iter().find(|d| !seen.insert(**d)) {
            return Err(AnalysisError::DuplicateDate(*date));
        }

        for (name, values) in &columns {
            if values.len() != dates.len() {
                return Err(AnalysisError::ColumnLength {
                    column: name.clone(),
                    expected: dates.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(PriceTable { dates, columns })
    }

    //creates a single column table
    pub fn single(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let mut columns = IndexMap::new();
        columns.insert(name.into(), values);
        Self::new(dates, columns)
    }

    //inner-joins tables on date, keeping column order of the inputs
    pub fn from_series(tables: &[PriceTable]) -> Result<Self> {
        let mut common: Option<BTreeSet<NaiveDate>> = None;
        for table in tables {
            let dates: BTreeSet<NaiveDate> = table.dates.iter().copied().collect();
            common = Some(match common {
                None => dates,
                Some(acc) => acc.intersection(&dates).copied().collect(),
            });
        }
        let dates: Vec<NaiveDate> = common.unwrap_or_default().into_iter().collect();

        let mut columns = IndexMap::new();
        for table in tables {
            for (name, values) in &table.columns {
                if columns.contains_key(name) {
                    return Err(AnalysisError::DuplicateColumn(name.clone()));
                }

                let joined: Vec<f64> = dates
                    .iter()
                    .filter_map(|d| table.row_index(*d).map(|i| values[i]))
                    .collect();
                columns.insert(name.clone(), joined);
            }
        }

        tracing::debug!(
            tables = tables.len(),
            rows = dates.len(),
            "joined price tables"
        );

        Self::new(dates, columns)
    }

    fn row_index(&self, date: NaiveDate) -> Option<usize> {
        //dates are usually sorted, fall back to a scan if not
        match self.dates.binary_search(&date) {
            Ok(i) => Some(i),
            Err(_) => self.dates.iter().position(|d| *d == date),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    //ordered column names
    pub fn symbols(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AnalysisError::UnknownColumn(name.to_string()))
    }

    pub fn column_at(&self, index: usize) -> Option<(&str, &[f64])> {
        self.columns
            .get_index(index)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    //number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    //values of the last row in column order
    pub fn last_row(&self) -> Option<Vec<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(
            self.columns
                .values()
                .map(|v| v[v.len() - 1])
                .collect(),
        )
    }

    //close-to-close returns of one column
    pub fn returns(&self, name: &str) -> Result<TimeSeries> {
        let values = self.column(name)?;
        Ok(TimeSeries::new(
            name,
            self.dates.clone(),
            simple_returns(values),
        ))
    }

    //close-to-close returns of every column, in column order
    pub fn all_returns(&self) -> Vec<TimeSeries> {
        self.columns
            .iter()
            .map(|(name, values)| TimeSeries::new(name, self.dates.clone(), simple_returns(values)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let mut columns = IndexMap::new();
        columns.insert("A".to_string(), vec![1.0, 2.0]);
        let err = PriceTable::new(vec![day(1)], columns).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnLength { expected: 1, actual: 2, .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceTable::single("A", vec![day(1), day(2), day(1)], vec![1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateDate(d) if d == day(1)));
    }

    #[test]
    fn joins_on_common_dates() {
        let a = PriceTable::single("A", vec![day(1), day(2), day(3)], vec![1.0, 2.0, 3.0]).unwrap();
        let b = PriceTable::single("B", vec![day(2), day(3), day(4)], vec![20.0, 30.0, 40.0]).unwrap();

        let joined = PriceTable::from_series(&[a, b]).unwrap();
        assert_eq!(joined.symbols(), vec!["A", "B"]);
        assert_eq!(joined.dates(), &[day(2), day(3)]);
        assert_eq!(joined.column("A").unwrap(), &[2.0, 3.0]);
        assert_eq!(joined.column("B").unwrap(), &[20.0, 30.0]);
        assert_eq!(joined.last_row(), Some(vec![3.0, 30.0]));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let a = PriceTable::single("A", vec![day(1)], vec![1.0]).unwrap();
        let err = PriceTable::from_series(&[a.clone(), a]).unwrap_err();
        assert!(matches!(err, AnalysisError::DuplicateColumn(_)));
    }

    #[test]
    fn returns_start_undefined() {
        let a = PriceTable::single("A", vec![day(1), day(2), day(3)], vec![10.0, 11.0, 9.9]).unwrap();
        let r = a.returns("A").unwrap();
        assert_eq!(r.values[0], None);
        assert!((r.values[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((r.values[2].unwrap() + 0.1).abs() < 1e-12);
        assert!(matches!(a.returns("B"), Err(AnalysisError::UnknownColumn(_))));
    }

    #[test]
    fn empty_table_has_no_last_row() {
        let a = PriceTable::single("A", vec![], vec![]).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.last_row(), None);
    }
}
