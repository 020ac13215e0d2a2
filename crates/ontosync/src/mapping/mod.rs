//! Rule-based mapping from source naming to the canonical ontology
//!
//! Two deterministic, total mappings live here: field names (e.g.
//! `supply_fan_run_command` → `Supply_Fan_Cmd`) and device types (e.g.
//! `VAV_RH_DSP` → `vav`). Both are driven by ordered tables where more
//! specific entries precede general ones; reordering a table changes
//! mapping results, so declaration order is part of the contract.

mod kind;

pub use kind::infer_kind;

/// Full-match pattern of a field-naming rule
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Matches exactly this field identifier
    Exact(&'static str),
    /// Matches every input (terminal catch-all)
    Any,
}

impl Pattern {
    fn matches(self, input: &str) -> bool {
        match self {
            Pattern::Exact(p) => p == input,
            Pattern::Any => true,
        }
    }
}

/// Replacement half of a field-naming rule
#[derive(Debug, Clone, Copy)]
enum Replacement {
    /// A fixed canonical point name
    Literal(&'static str),
    /// A name computed from the matched input
    Derived(fn(&str) -> String),
}

struct FieldRule {
    pattern: Pattern,
    replacement: Replacement,
}

const fn literal(pattern: &'static str, name: &'static str) -> FieldRule {
    FieldRule {
        pattern: Pattern::Exact(pattern),
        replacement: Replacement::Literal(name),
    }
}

/// Field naming rules, evaluated top to bottom; first full match wins.
/// The terminal catch-all guarantees every input maps to some name.
const FIELD_RULES: &[FieldRule] = &[
    // Supply fan
    literal("supply_fan_run_command", "Supply_Fan_Cmd"),
    literal("supply_fan_run_status", "Supply_Fan_Status"),
    literal("supply_fan_speed_percentage_command", "Supply_Fan_Speed_Cmd"),
    // Discharge fan
    literal("discharge_fan_run_command", "Discharge_Fan_Cmd"),
    literal("discharge_fan_run_status", "Discharge_Fan_Status"),
    literal("discharge_fan_speed_percentage_command", "Discharge_Fan_Speed_Cmd"),
    // Return fan
    literal("return_fan_run_command", "Return_Fan_Cmd"),
    literal("return_fan_run_status", "Return_Fan_Status"),
    // Supply air temperature
    literal("supply_air_temperature_sensor", "Supply_Air_Temp"),
    literal("supply_air_temperature_setpoint", "Supply_Air_Temp_Sp"),
    // Zone temperature
    literal("zone_air_temperature_sensor", "Zone_Temp"),
    literal("zone_air_temperature_setpoint", "Zone_Temp_Sp"),
    literal("zone_air_cooling_temperature_setpoint", "Zone_Cooling_Sp"),
    literal("zone_air_heating_temperature_setpoint", "Zone_Heating_Sp"),
    // Return air temperature
    literal("return_air_temperature_sensor", "Return_Air_Temp"),
    literal("return_air_temperature_setpoint", "Return_Air_Temp_Sp"),
    // Mixed air temperature
    literal("mixed_air_temperature_sensor", "Mixed_Air_Temp"),
    // Discharge air temperature
    literal("discharge_air_temperature_sensor", "Discharge_Air_Temp"),
    literal("discharge_air_temperature_setpoint", "Discharge_Air_Temp_Sp"),
    // Outside air temperature
    literal("outside_air_temperature_sensor", "Outside_Air_Temp"),
    // Valves
    literal("heating_valve_percentage_command", "Heating_Valve_Cmd"),
    literal("cooling_valve_percentage_command", "Cooling_Valve_Cmd"),
    literal("reheat_valve_percentage_command", "Reheat_Valve_Cmd"),
    // Dampers
    literal("supply_air_damper_percentage_command", "Damper_Cmd"),
    literal("outside_air_damper_percentage_command", "OA_Damper_Cmd"),
    literal("return_air_damper_percentage_command", "RA_Damper_Cmd"),
    literal("exhaust_air_damper_percentage_command", "EA_Damper_Cmd"),
    // Airflow
    literal("supply_air_flow_sensor", "Supply_Airflow"),
    literal("supply_air_flow_setpoint", "Supply_Airflow_Sp"),
    literal("zone_air_flow_sensor", "Zone_Airflow"),
    // Static pressure
    literal("supply_air_static_pressure_sensor", "Supply_Static_Pressure"),
    literal("supply_air_static_pressure_setpoint", "Supply_Static_Pressure_Sp"),
    // Modes
    literal("occupancy_mode", "Occupancy_Mode"),
    literal("occupancy_command", "Occupancy_Cmd"),
    literal("run_mode", "Run_Mode"),
    literal("run_command", "Run_Cmd"),
    // Catch-all: title-case each underscore-delimited segment
    FieldRule {
        pattern: Pattern::Any,
        replacement: Replacement::Derived(title_case),
    },
];

/// Device type table: source type token → canonical category.
/// Exact match first, then first entry whose token prefixes the input.
const DEVICE_TYPES: &[(&str, &str)] = &[
    ("AHU_SFSS", "ahu"),
    ("AHU_SFVSC", "ahu"),
    ("AHU", "ahu"),
    ("VAV_SD_DSP", "vav"),
    ("VAV_RH_DSP", "vav"),
    ("VAV", "vav"),
    ("FCU_DFSS_DFVSC", "fcu"),
    ("FCU", "fcu"),
];

/// Title-case each underscore-delimited segment:
/// `zone_air_temperature_sensor` → `Zone_Air_Temperature_Sensor`
fn title_case(raw: &str) -> String {
    raw.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Deterministic mapper from source naming to the canonical ontology
#[derive(Debug, Clone, Copy, Default)]
pub struct OntologyMapper;

impl OntologyMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a source field identifier to its canonical point name.
    ///
    /// Total: the terminal catch-all produces a title-cased name for any
    /// input no specific rule covers.
    pub fn map_field_name(&self, source_field: &str) -> String {
        for rule in FIELD_RULES {
            if rule.pattern.matches(source_field) {
                return match rule.replacement {
                    Replacement::Literal(name) => name.to_string(),
                    Replacement::Derived(f) => f(source_field),
                };
            }
        }
        // Unreachable while the table ends in a catch-all; kept total anyway.
        title_case(source_field)
    }

    /// Map a source device type to its canonical category.
    ///
    /// Resolution order: exact match, then the first table entry `t` where
    /// the input starts with `t_`, then the lowercased token before the
    /// first underscore. Always returns a non-empty category.
    pub fn map_device_type(&self, source_type: &str) -> String {
        for (token, category) in DEVICE_TYPES {
            if *token == source_type {
                return (*category).to_string();
            }
        }

        for (token, category) in DEVICE_TYPES {
            let is_prefixed = source_type
                .strip_prefix(token)
                .is_some_and(|rest| rest.starts_with('_'));
            if is_prefixed {
                return (*category).to_string();
            }
        }

        let first_token = source_type.split('_').next().unwrap_or_default();
        if first_token.is_empty() {
            return "unknown".to_string();
        }
        first_token.to_lowercase()
    }
}
