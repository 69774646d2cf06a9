//! Units of work for the monitoring engine.
//!
//! Each function takes the pool and an explicit `now`, runs to completion and
//! reports partial failures in its result instead of aborting:
//!
//! - [`collect::collect_enabled`]: one collection pass followed by a prune.
//! - [`retention::prune`]: per-module retention cleanup.
//! - [`matrix::load_matrix`]: the system-health matrix.
//! - [`alerts::process_alerts`]: one alert evaluation pass.
//!
//! Both the HTTP API and the worker binary drive these.

pub mod alerts;
pub mod collect;
pub mod config;
pub mod error;
pub mod matrix;
pub mod retention;
pub mod schedule;

pub use config::MonitorConfig;
pub use error::MonitorError;
