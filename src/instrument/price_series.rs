use crate::data::{HistoryStore, PriceBar, PriceField, PriceTable, TimeSeries};
use crate::error::{AnalysisError, Result};
use crate::metrics::simple_returns;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//one instrument's daily price history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    //instrument name (eg SPY, IWM)
    name: String,

    //daily bars in ascending date order, None until loaded
    history: Option<Vec<PriceBar>>,
}

impl PriceSeries {
    //creates a series with no data loaded
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        tracing::debug!(symbol = %name, "price series created");
        PriceSeries {
            name,
            history: None,
        }
    }

    //creates a series holding the given bars
    pub fn with_history(name: impl Into<String>, history: Vec<PriceBar>) -> Self {
        let mut series = Self::new(name);
        series.set_history(history);
        series
    }

    //loads a series through a history store, optionally limited to a date range
    pub fn load(
        name: impl Into<String>,
        store: &HistoryStore,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let bars = store.load_range(&name, start, end)?;
        Ok(Self::with_history(name, bars))
    }

    //replaces the loaded history, keeping the first bar of any repeated date
    pub fn set_history(&mut self, mut history: Vec<PriceBar>) {
        history.sort_by(|a, b| a.date.cmp(&b.date));
        history.dedup_by(|a, b| a.date == b.date);
        tracing::debug!(symbol = %self.name, bars = history.len(), "history set");
        self.history = Some(history);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> Option<&[PriceBar]> {
        self.history.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.history.is_some()
    }

    //number of loaded bars
    pub fn len(&self) -> usize {
        self.history.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //first and last loaded dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let history = self.history.as_ref()?;
        Some((history.first()?.date, history.last()?.date))
    }

    fn bars(&self) -> Result<&[PriceBar]> {
        self.history
            .as_deref()
            .ok_or_else(|| AnalysisError::NoData(self.name.clone()))
    }

    //single column table of one field, labelled with the instrument name
    pub fn price_column(&self, field: PriceField) -> Result<PriceTable> {
        let bars = self.bars()?;
        let dates = bars.iter().map(|b| b.date).collect();
        let values = bars.iter().map(|b| b.field(field)).collect();
        PriceTable::single(self.name.clone(), dates, values)
    }

    //same as price_column with the field given by name
    pub fn price_column_named(&self, field: &str) -> Result<PriceTable> {
        let field =
            PriceField::parse(field).ok_or_else(|| AnalysisError::UnknownField(field.to_string()))?;
        self.price_column(field)
    }

    //close-to-close returns of one field, recomputed on every call
    pub fn returns(&self, field: PriceField) -> Result<TimeSeries> {
        let bars = self.bars()?;
        let prices: Vec<f64> = bars.iter().map(|b| b.field(field)).collect();
        Ok(TimeSeries::new(
            self.name.clone(),
            bars.iter().map(|b| b.date).collect(),
            simple_returns(&prices),
        ))
    }

    //adjusted close-to-close returns, first value undefined
    pub fn day_returns(&self) -> Result<TimeSeries> {
        self.returns(PriceField::AdjClose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(d: u32, close: f64, adj_close: f64) -> PriceBar {
        PriceBar::new_unchecked(
            NaiveDate::from_ymd_opt(2024, 4, d).unwrap(),
            close,
            close,
            close,
            close,
            adj_close,
            1000.0,
        )
    }

    #[test]
    fn views_fail_without_data() {
        let spy = PriceSeries::new("SPY");
        assert!(!spy.is_loaded());
        assert!(matches!(spy.price_column(PriceField::AdjClose), Err(AnalysisError::NoData(_))));
        assert!(matches!(spy.day_returns(), Err(AnalysisError::NoData(_))));
    }

    #[test]
    fn price_column_is_labelled_with_name() {
        let spy = PriceSeries::with_history("SPY", vec![bar(2, 11.0, 5.5), bar(1, 10.0, 5.0)]);
        let table = spy.price_column(PriceField::AdjClose).unwrap();

        assert_eq!(table.symbols(), vec!["SPY"]);
        assert_eq!(table.column("SPY").unwrap(), &[5.0, 5.5]);
        assert_eq!(spy.date_range().map(|(s, _)| s), Some(table.dates()[0]));
    }

    #[test]
    fn repeated_dates_keep_first_bar() {
        let spy = PriceSeries::with_history(
            "SPY",
            vec![bar(1, 10.0, 10.0), bar(2, 11.0, 11.0), bar(1, 99.0, 99.0)],
        );
        assert_eq!(spy.len(), 2);

        let table = spy.price_column(PriceField::AdjClose).unwrap();
        assert_eq!(table.column("SPY").unwrap(), &[10.0, 11.0]);
    }

    #[test]
    fn unknown_field_name_fails() {
        let spy = PriceSeries::with_history("SPY", vec![bar(1, 10.0, 10.0)]);
        assert!(matches!(
            spy.price_column_named("vwap"),
            Err(AnalysisError::UnknownField(_))
        ));
        assert!(spy.price_column_named("Adj Close").is_ok());
    }

    #[test]
    fn day_returns_use_adjusted_close() {
        let spy = PriceSeries::with_history(
            "SPY",
            vec![bar(1, 10.0, 5.0), bar(2, 10.0, 5.5), bar(3, 10.0, 4.95)],
        );
        let r = spy.day_returns().unwrap();

        assert_eq!(r.len(), 3);
        assert_eq!(r.values[0], None);
        assert!((r.values[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((r.values[2].unwrap() + 0.1).abs() < 1e-12);

        let raw = spy.returns(PriceField::Close).unwrap();
        assert_eq!(raw.values[1], Some(0.0));
    }
}
