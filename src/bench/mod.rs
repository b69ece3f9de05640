//! Benchmark harness and driver.

mod driver;
mod harness;

pub use driver::{execute, print_summary, RunOptions, RunSummary};
pub use harness::{benchmark, synthetic_input, BenchOptions, BenchReport, WARMUP_RUNS};
