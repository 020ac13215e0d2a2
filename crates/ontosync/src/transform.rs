//! Confidence gating and entity transformation
//!
//! Turns one source entity plus its raw fields into one target-ready device,
//! or nothing when the entity carries no usable ontology information. The
//! transform is pure; all I/O stays in the orchestrator.

use crate::mapping::{infer_kind, OntologyMapper};
use crate::models::{PointKind, SourceEntity, SourceField, TargetDevice, TargetPoint};

/// Enum values forced onto boolean points that carry no explicit enum
const BOOL_ENUM: [&str; 2] = ["false", "true"];

/// Tunables for the entity transform
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Minimum upstream match confidence (0-100, inclusive) for a field to
    /// become a point
    pub min_confidence: u8,
    /// Prefix for generated target device ids, keeping them stable and
    /// recognizable across reruns
    pub device_id_prefix: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            min_confidence: 70,
            device_id_prefix: "station".to_string(),
        }
    }
}

/// Retain the fields whose confidence meets `min_confidence`.
///
/// Pure filter: confidence values are untouched and input order is kept.
pub fn filter_by_confidence(fields: &[SourceField], min_confidence: u8) -> Vec<SourceField> {
    fields
        .iter()
        .filter(|f| f.confidence >= min_confidence)
        .cloned()
        .collect()
}

/// Transform a source entity into a target device, or `None` when the
/// entity should be dropped.
///
/// Drops entities carrying the generic equipment marker (no actionable
/// ontology information) and entities left with zero points after the
/// confidence gate. Point ids combine the entity id and field address, so
/// re-syncing the same source yields the same ids.
pub fn transform_entity(
    entity: &SourceEntity,
    mapper: &OntologyMapper,
    options: &TransformOptions,
) -> Option<TargetDevice> {
    if entity.entity_type.eq_ignore_ascii_case("equipment") {
        return None;
    }

    let points: Vec<TargetPoint> = filter_by_confidence(&entity.fields, options.min_confidence)
        .into_iter()
        .map(|field| build_point(&entity.id, &field, mapper))
        .collect();

    if points.is_empty() {
        return None;
    }

    Some(TargetDevice {
        id: format!("{}_{}", options.device_id_prefix, entity.id),
        name: entity.name.clone(),
        display_name: entity.name.clone(),
        path: None,
        points,
    })
}

fn build_point(entity_id: &str, field: &SourceField, mapper: &OntologyMapper) -> TargetPoint {
    let name = mapper.map_field_name(&field.canonical_field);
    let kind = field
        .kind
        .unwrap_or_else(|| infer_kind(&field.canonical_field));

    // Target-schema invariant: Bool points always carry an enum
    let point_enum = field.point_enum.clone().or_else(|| {
        (kind == PointKind::Bool).then(|| BOOL_ENUM.iter().map(|s| s.to_string()).collect())
    });

    TargetPoint {
        name,
        point_id: format!("{}_{}", entity_id, field.address),
        source_id: field.original_name.clone(),
        kind,
        writable: field.writable.unwrap_or(false),
        unit: field.units.clone(),
        point_enum,
    }
}
