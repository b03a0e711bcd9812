use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

//a dated series of values, `None` where the value is undefined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        TimeSeries {
            name: name.into(),
            dates,
            values,
        }
    }

    //builds a fully defined series
    pub fn from_values(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        Self::new(name, dates, values.into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    //iterates over (date, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    //defined values only, in date order
    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    //number of defined values
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    //value at the last row (may be undefined)
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    //value on a given date
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .and_then(|i| self.values[i])
    }

    //writes the series as `date,<name>` csv; undefined values are left empty
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .context(format!("Failed to create CSV file: {:?}", path))?;

        writer.write_record(["date", self.name.as_str()])?;
        for (date, value) in self.iter() {
            let value = value.map(|v| v.to_string()).unwrap_or_default();
            writer.write_record([date.to_string(), value])?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect()
    }

    #[test]
    fn counts_defined_values() {
        let s = TimeSeries::new("r", dates(3), vec![None, Some(0.1), Some(-0.2)]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.count(), 2);
        assert_eq!(s.valid_values(), vec![0.1, -0.2]);
        assert_eq!(s.last_value(), Some(-0.2));
        assert_eq!(s.get(dates(3)[0]), None);
        assert_eq!(s.get(dates(3)[1]), Some(0.1));
    }

    #[test]
    fn writes_csv_with_blank_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        let s = TimeSeries::new("r", dates(2), vec![None, Some(0.5)]);
        s.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "date,r\n2024-03-01,\n2024-03-02,0.5\n");
    }
}
