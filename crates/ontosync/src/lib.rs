//! Core library for the building ontology sync pipeline
//!
//! This crate provides the pieces that turn a source station's free-form
//! point and device naming into the canonical ontology of a target
//! building-management platform, and push the result upstream:
//! - Rule-based name and device-type mapping
//! - Point-kind inference and confidence gating
//! - Paginated collection aggregation
//! - The sync orchestrator (fetch, transform, preview, create, verify)
//! - HTTP clients for the station, the platform, and the correction learner

pub mod api;
pub mod error;
pub mod mapping;
pub mod models;
pub mod paging;
pub mod sync;
pub mod transform;

pub use api::{CorrectionLearner, PlatformClient, SourceApi, StationClient, TargetApi};
pub use error::Error;
pub use mapping::{infer_kind, OntologyMapper};
pub use models::*;
pub use sync::{
    CreateFailure, CreateMode, DevicePreview, SyncOptions, SyncOrchestrator, SyncPlan, SyncReport,
};
pub use transform::{filter_by_confidence, transform_entity, TransformOptions};
