//! Remote API boundaries
//!
//! The orchestrator only sees the traits defined here, so tests can swap in
//! in-memory fakes. The concrete clients speak HTTP: [`StationClient`] to
//! the source station (basic auth), [`PlatformClient`] to the target
//! platform (bearer-token session).

pub mod auth;
mod platform;
mod station;

pub use auth::{AccessToken, AuthSession, StaticToken, TokenSource};
pub use platform::PlatformClient;
pub use station::StationClient;

use async_trait::async_trait;

use crate::error::Error;
use crate::models::{
    Correction, Datasource, LearnedMapping, PlatformDevice, SourceEntity, SourceField,
    TargetDevice, TrainOutcome,
};

/// Read side of the source station
#[async_trait]
pub trait SourceApi: Send + Sync {
    /// List every entity the station exposes
    async fn entities(&self) -> Result<Vec<SourceEntity>, Error>;

    /// Fetch the raw fields of one entity
    async fn entity_fields(&self, entity_id: &str) -> Result<Vec<SourceField>, Error>;
}

/// Read/write side of the target platform
#[async_trait]
pub trait TargetApi: Send + Sync {
    /// List all devices in a building (aggregated across pages)
    async fn list_devices(&self, building_id: &str) -> Result<Vec<PlatformDevice>, Error>;

    /// List the datasources provisioned in a building
    async fn list_datasources(&self, building_id: &str) -> Result<Vec<Datasource>, Error>;

    /// Create a single device under a datasource
    async fn create_device(
        &self,
        building_id: &str,
        datasource_id: &str,
        device: &TargetDevice,
    ) -> Result<(), Error>;

    /// Create a batch of devices in one call (atomic from our side)
    async fn create_devices_batch(
        &self,
        building_id: &str,
        datasource_id: &str,
        devices: &[TargetDevice],
    ) -> Result<(), Error>;
}

/// The human-correction feedback service.
///
/// Training is a discrete, operator-triggered action; the sync pipeline
/// never trains as a side effect.
#[async_trait]
pub trait CorrectionLearner: Send + Sync {
    /// Record one human correction
    async fn submit_correction(&self, correction: &Correction) -> Result<(), Error>;

    /// Trigger a training run
    async fn train(&self) -> Result<TrainOutcome, Error>;

    /// Service statistics, opaque to the pipeline
    async fn stats(&self) -> Result<serde_json::Value, Error>;

    /// Current learned point mappings
    async fn mappings(&self) -> Result<Vec<LearnedMapping>, Error>;
}
