//! Streak analysis, per-symbol evaluation and alert decisions.

pub mod decision;
pub mod engine;
pub mod streak;

pub use decision::*;
pub use engine::SnapshotEngine;
pub use streak::*;
