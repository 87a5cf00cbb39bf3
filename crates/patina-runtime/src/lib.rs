//! Reference host: random-tick sweeps over a consistent world snapshot.
#![forbid(unsafe_code)]

pub mod config;
mod runner;
pub mod scene;
mod stats;

pub use config::{RuntimeConfig, TickConfig};
pub use runner::{TickReport, TickRunner};
pub use stats::{block_counts, stage_histogram};
