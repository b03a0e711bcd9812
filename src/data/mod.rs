pub mod bar;
pub mod loader;
pub mod series;
pub mod table;

pub use bar::{BarError, PriceBar, PriceField};
pub use loader::{filter_by_date, load_csv, HistoryStore};
pub use series::TimeSeries;
pub use table::PriceTable;
