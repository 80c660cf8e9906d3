//! Command implementations.

mod bench;
mod demo;

pub use bench::run_bench;
pub use demo::run_demo;
