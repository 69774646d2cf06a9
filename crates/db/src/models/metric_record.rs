//! Metric store models.

use healthmesh_core::catalog::ComputedMetric;
use healthmesh_core::error::CoreError;
use healthmesh_core::matrix::MetricSample;
use healthmesh_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `metric_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MetricRecord {
    pub id: DbId,
    pub module: String,
    pub metric_name: String,
    pub value: f64,
    pub unit: String,
    pub status: String,
    pub collected_at: Timestamp,
    pub metadata: serde_json::Value,
}

impl MetricRecord {
    /// The aggregator's view of this record.
    pub fn sample(&self) -> Result<MetricSample, CoreError> {
        Ok(MetricSample {
            module: self.module.parse()?,
            metric_name: self.metric_name.clone(),
            value: self.value,
            status: self.status.parse()?,
            collected_at: self.collected_at,
        })
    }
}

/// A metric ready to be written. `collected_at` is shared by the whole batch.
#[derive(Debug, Clone)]
pub struct CreateMetricRecord {
    pub module: String,
    pub metric_name: String,
    pub value: f64,
    pub unit: String,
    pub status: String,
    pub metadata: serde_json::Value,
}

impl From<&ComputedMetric> for CreateMetricRecord {
    fn from(m: &ComputedMetric) -> Self {
        Self {
            module: m.module.to_string(),
            metric_name: m.metric_name.to_string(),
            value: m.value,
            unit: m.unit.to_string(),
            status: m.status.to_string(),
            metadata: m.metadata(),
        }
    }
}
