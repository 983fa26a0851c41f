//! Drip line layout
//!
//! A 13 mm main line runs parallel to the y-axis just outside the planted
//! area. Each plant gets a 4 mm lateral from the main line to a drip emitter
//! at its base. Laterals are laid out in (y, x) order.

use super::emitters::EmitterKind;
use crate::model::PlantPlacement;
use crate::utils::geometry::Point;
use serde::{Deserialize, Serialize};

/// Clearance between the main line and the westmost plant (m)
pub const MAIN_LINE_OFFSET_M: f64 = 0.2;
/// Recommended maximum total 4 mm tubing (m)
pub const MAX_LATERAL_RUN_M: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lateral {
    pub instance_id: String,
    pub start: Point,
    pub end: Point,
}

impl Lateral {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterPoint {
    pub kind: EmitterKind,
    pub position: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DripLayout {
    /// Two end points of the 13 mm main line (empty without plants)
    pub main_line: Vec<Point>,
    pub laterals: Vec<Lateral>,
    pub emitters: Vec<EmitterPoint>,
    pub total_lateral_length_m: f64,
    pub warnings: Vec<String>,
}

pub fn layout(placements: &[PlantPlacement]) -> DripLayout {
    if placements.is_empty() {
        return DripLayout::default();
    }

    let mut sorted: Vec<&PlantPlacement> = placements.iter().collect();
    sorted.sort_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
    });

    let min_x = sorted.iter().map(|p| p.position.x).fold(f64::INFINITY, f64::min);
    let min_y = sorted.iter().map(|p| p.position.y).fold(f64::INFINITY, f64::min);
    let max_y = sorted.iter().map(|p| p.position.y).fold(f64::NEG_INFINITY, f64::max);
    let main_x = min_x - MAIN_LINE_OFFSET_M;

    let mut laterals = Vec::with_capacity(sorted.len());
    let mut emitters = Vec::with_capacity(sorted.len());
    for placement in sorted {
        laterals.push(Lateral {
            instance_id: placement.instance_id.clone(),
            start: Point::new(main_x, placement.position.y),
            end: placement.position,
        });
        emitters.push(EmitterPoint {
            kind: EmitterKind::DripEmitter,
            position: placement.position,
        });
    }

    let total_lateral_length_m: f64 = laterals.iter().map(Lateral::length).sum();
    let mut warnings = Vec::new();
    if total_lateral_length_m > MAX_LATERAL_RUN_M {
        warnings.push(format!(
            "Total length of 4mm pipe ({:.1}m) exceeds the recommended maximum of {:.1}m",
            total_lateral_length_m, MAX_LATERAL_RUN_M
        ));
    }

    DripLayout {
        main_line: vec![Point::new(main_x, min_y), Point::new(main_x, max_y)],
        laterals,
        emitters,
        total_lateral_length_m,
        warnings,
    }
}
