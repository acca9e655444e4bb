//! External collaborators: candle source and notifier.

pub mod market_data;
pub mod mexc;
pub mod notifier;
pub mod telegram;

pub use market_data::{CandleSource, MarketDataError};
pub use mexc::MexcClient;
pub use notifier::Notifier;
pub use telegram::TelegramNotifier;
