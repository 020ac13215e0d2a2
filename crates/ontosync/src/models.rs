//! Wire and domain models for the sync pipeline
//!
//! Source-side records are read-only within a sync run and fetched fresh on
//! every invocation. Target-side devices and points are built in memory by
//! the transformer and discarded once the creation call has been made; the
//! remote platform is the sole durable store.
//!
//! All deserialization ignores unknown wire keys by contract.

use serde::{Deserialize, Serialize};

/// Data kind of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Bool,
    Number,
    Str,
}

/// An entity (piece of equipment) as listed by the source station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "entityType")]
    pub entity_type: String,
    /// Populated from the per-entity fields endpoint; empty on the listing wire
    #[serde(default)]
    pub fields: Vec<SourceField>,
}

/// A raw point on a source entity, annotated by the upstream matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceField {
    #[serde(rename = "addr")]
    pub address: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// The matcher's candidate canonical field name
    #[serde(rename = "canonicalField")]
    pub canonical_field: String,
    /// Match confidence, 0-100, assigned upstream and only consumed here
    #[serde(default)]
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Explicit kind, when the source supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PointKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    /// Explicit enumeration values, when the source supplies them
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub point_enum: Option<Vec<String>>,
}

/// Source listing envelope: `GET /entities`
#[derive(Debug, Clone, Deserialize)]
pub struct EntityList {
    pub entities: Vec<SourceEntity>,
}

/// Per-entity fields envelope: `GET /entity/{id}/fields`
#[derive(Debug, Clone, Deserialize)]
pub struct FieldList {
    pub fields: Vec<SourceField>,
}

/// A point in the target platform's creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPoint {
    pub name: String,
    #[serde(rename = "pointId")]
    pub point_id: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    pub kind: PointKind,
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Mandatory `["false","true"]` for Bool points without an explicit enum
    #[serde(rename = "pointEnum", skip_serializing_if = "Option::is_none")]
    pub point_enum: Option<Vec<String>>,
}

/// A device in the target platform's creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDevice {
    pub id: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub points: Vec<TargetPoint>,
}

/// One page of a paginated platform listing: `{data, total}`
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// A building as listed by the target platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A datasource (integration container) in a target building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A device as listed by the target platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDevice {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A point as listed by the target platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPoint {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "deviceId", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// A human correction submitted to the learner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    #[serde(rename = "pointName")]
    pub point_name: String,
    #[serde(rename = "correctMatch")]
    pub correct_match: String,
    #[serde(rename = "equipmentType", skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
}

/// Result of an explicit training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A learned point mapping reported by the learner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedMapping {
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "canonicalField")]
    pub canonical_field: String,
    pub confidence: u8,
}

/// Learner mappings envelope: `GET /mappings`
#[derive(Debug, Clone, Deserialize)]
pub struct MappingList {
    pub mappings: Vec<LearnedMapping>,
}
