//! Runtime, scheduling and the HTTP surface around the evaluation cycle.

pub mod http;
pub mod runtime;
pub mod scheduler;

pub use http::*;
pub use runtime::*;
pub use scheduler::*;
