//! File system module
//!
//! Source tree walking and the async copy primitives used by the
//! dispatcher.

mod operations;
mod walker;

pub use operations::*;
pub use walker::*;
