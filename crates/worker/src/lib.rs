//! Interval scheduler for the monitoring units of work.
//!
//! Every tick collects the modules whose collection interval has elapsed
//! (pruning afterwards) and then runs one alert pass.

pub mod config;
pub mod scheduler;

pub use config::WorkerConfig;
