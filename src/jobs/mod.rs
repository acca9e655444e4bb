//! Evaluation cycle: fetch, compute, decide, persist.

pub mod context;
pub mod cycle;
pub mod types;

pub use context::{CycleSettings, JobContext};
pub use cycle::run_cycle;
pub use types::{CycleError, CycleOutcome, CycleReport, CycleStatus};
