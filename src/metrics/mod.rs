pub mod statistics;
pub mod summary;

pub use statistics::{
    correlation_by_date, cumulative_sum, estimate_beta, is_constant, ols_beta, pearson, quantile,
    sample_std, simple_returns,
};
pub use summary::SpreadStatistics;
