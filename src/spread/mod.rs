pub mod params;
#[allow(clippy::module_inception)]
pub mod spread;

pub use params::{Capital, LegParams, SpreadConfig, SpreadParams, DEFAULT_BET};
pub use spread::Spread;
