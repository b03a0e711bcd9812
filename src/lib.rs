//a Rust-based spread construction and statistics toolkit for equity pairs research

pub mod config;
pub mod data;
pub mod error;
pub mod instrument;
pub mod metrics;
pub mod spread;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::AnalysisConfiguration;
    pub use crate::data::{
        filter_by_date, load_csv, HistoryStore, PriceBar, PriceField, PriceTable, TimeSeries,
    };
    pub use crate::error::AnalysisError;
    pub use crate::instrument::PriceSeries;
    pub use crate::metrics::{estimate_beta, SpreadStatistics};
    pub use crate::spread::{Capital, LegParams, Spread, SpreadConfig, SpreadParams};
}
