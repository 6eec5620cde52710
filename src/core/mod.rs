//! Core sorting engine module
//!
//! Per-file copy tasks and the dispatcher that fans them out and waits
//! for all of them.

mod dispatcher;
mod task;

pub use dispatcher::*;
pub use task::*;
