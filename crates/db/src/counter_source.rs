//! Postgres-backed [`CounterSource`].

use async_trait::async_trait;
use healthmesh_core::catalog::RawCounters;
use healthmesh_core::collection::CounterSource;
use healthmesh_core::error::CoreError;
use healthmesh_core::modules::ModuleId;
use healthmesh_core::types::Timestamp;

use crate::repositories::OperationalRepo;
use crate::DbPool;

/// Reads raw counters from the operational tables through [`OperationalRepo`].
#[derive(Clone)]
pub struct PgCounterSource {
    pool: DbPool,
}

impl PgCounterSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterSource for PgCounterSource {
    async fn counters(&self, module: ModuleId, now: Timestamp) -> Result<RawCounters, CoreError> {
        OperationalRepo::counters(&self.pool, module, now)
            .await
            .map_err(|e| CoreError::Upstream {
                source_name: module.to_string(),
                message: e.to_string(),
            })
    }
}
