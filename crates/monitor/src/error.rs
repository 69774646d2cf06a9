use healthmesh_core::error::CoreError;

/// Error type for a unit of work that could not run at all.
///
/// Per-module and per-rule failures are not errors; they are collected in
/// the unit's report.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
