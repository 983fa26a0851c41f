//! Flow and pressure estimate
//!
//! Coarse sizing rule: every irrigation group draws 150 L/h and costs 0.2 bar
//! of pressure between the source and the end of the line.

use serde::{Deserialize, Serialize};

pub const FLOW_PER_GROUP_LPH: f64 = 150.0;
pub const PRESSURE_DROP_PER_GROUP_BAR: f64 = 0.2;
pub const MIN_END_PRESSURE_BAR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEstimate {
    pub group_count: usize,
    pub required_flow_lph: f64,
    pub pressure_at_end_bar: f64,
    pub warnings: Vec<String>,
}

pub fn estimate_flow(group_count: usize, source_pressure_bar: f64) -> FlowEstimate {
    let groups = group_count as f64;
    let pressure_at_end_bar = source_pressure_bar - groups * PRESSURE_DROP_PER_GROUP_BAR;

    let mut warnings = Vec::new();
    if pressure_at_end_bar < MIN_END_PRESSURE_BAR {
        warnings.push(format!(
            "Pressure at the end of the system is very low ({:.2} bar)",
            pressure_at_end_bar
        ));
    }

    FlowEstimate {
        group_count,
        required_flow_lph: groups * FLOW_PER_GROUP_LPH,
        pressure_at_end_bar,
        warnings,
    }
}
