//! Durable state between evaluation cycles.

pub mod state_store;

pub use state_store::{FileStateStore, StateKey, StateStore, StateStoreError};
