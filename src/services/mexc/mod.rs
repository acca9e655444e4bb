pub mod messages;
pub mod provider;

pub use provider::{candles_from_klines, MexcClient};
