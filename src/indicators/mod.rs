//! Indicator engine: pure transformations from candles to derived series.

pub mod momentum;
pub mod series;
pub mod trend;

pub use momentum::*;
pub use series::*;
pub use trend::*;
