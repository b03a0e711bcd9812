use chrono::NaiveDate;
use thiserror::Error;

//errors raised by the analytical core
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No price data loaded for {0}")]
    NoData(String),
    #[error("Unknown price field: {0}")]
    UnknownField(String),
    #[error("Column {column} has {actual} values but the table has {expected} dates")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("Duplicate date in price table: {0}")]
    DuplicateDate(NaiveDate),
    #[error("Price table has no rows")]
    EmptyTable,
    #[error("Beta hedge needs exactly 2 columns, table has {0}")]
    InsufficientColumns(usize),
    #[error("Capital has {capital} values but the table has {columns} columns")]
    CapitalMismatch { capital: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
