//! Point-kind inference from canonical field names

use crate::models::PointKind;

/// Substrings that mark a boolean point (checked before the string markers)
const BOOL_INDICATORS: &[&str] = &["status", "enable", "alarm", "fault", "run"];

/// Substrings that mark a string/enum point
const STR_INDICATORS: &[&str] = &["mode", "state"];

/// Infer a point's data kind from its canonical field name.
///
/// Total, case-insensitive substring classification. Boolean indicators
/// take precedence over string indicators, so `Run_Mode` is Bool; anything
/// matching neither set is Number.
pub fn infer_kind(canonical_name: &str) -> PointKind {
    let lower = canonical_name.to_lowercase();

    if BOOL_INDICATORS.iter().any(|m| lower.contains(m)) {
        return PointKind::Bool;
    }

    if STR_INDICATORS.iter().any(|m| lower.contains(m)) {
        return PointKind::Str;
    }

    PointKind::Number
}
