//! Conflict detection
//!
//! Validation pass over an arrangement. Spacing, compatibility and zone
//! findings come from the shared `ConstraintScan`; water competition is
//! checked here. The arrangement is never modified, so repeated calls give
//! identical reports.

use crate::calculator::AgronomicCalculator;
use crate::config::ConstraintConfig;
use crate::constraints::ConstraintScan;
use crate::model::{GardenZone, PlantPlacement, WaterNeed};
use crate::utils::geometry::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Spacing breaches below this share of the requirement are high severity
const HIGH_SEVERITY_SPACING_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingViolation {
    pub plant1: String,
    pub plant2: String,
    pub current_distance: f64,
    pub required_distance: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityViolation {
    pub plant1: String,
    pub plant2: String,
    pub distance: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneViolation {
    pub plant_id: String,
    pub position: Point,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    WaterCompetition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConflict {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Crowded plant first, then its high-water neighbours
    pub plants: Vec<String>,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub spacing_violations: Vec<SpacingViolation>,
    pub compatibility_violations: Vec<CompatibilityViolation>,
    pub zone_violations: Vec<ZoneViolation>,
    pub resource_conflicts: Vec<ResourceConflict>,
}

impl ConflictReport {
    pub fn total(&self) -> usize {
        self.spacing_violations.len()
            + self.compatibility_violations.len()
            + self.zone_violations.len()
            + self.resource_conflicts.len()
    }

    pub fn is_clear(&self) -> bool {
        self.total() == 0
    }

    pub fn high_severity_count(&self) -> usize {
        self.spacing_violations
            .iter()
            .map(|v| v.severity)
            .chain(self.compatibility_violations.iter().map(|v| v.severity))
            .chain(self.zone_violations.iter().map(|v| v.severity))
            .chain(self.resource_conflicts.iter().map(|v| v.severity))
            .filter(|s| *s == Severity::High)
            .count()
    }
}

pub struct ConflictDetector {
    calculator: Arc<AgronomicCalculator>,
    config: ConstraintConfig,
}

impl ConflictDetector {
    pub fn new(calculator: Arc<AgronomicCalculator>, config: ConstraintConfig) -> Self {
        Self { calculator, config }
    }

    pub fn detect(&self, placements: &[PlantPlacement], zones: &[GardenZone]) -> ConflictReport {
        let scan = ConstraintScan::run(
            placements,
            zones,
            &self.calculator,
            self.config.assumed_soil_quality,
        );
        let id = |idx: usize| placements[idx].instance_id.clone();

        let spacing_violations = scan
            .spacing_breaches
            .iter()
            .map(|b| SpacingViolation {
                plant1: id(b.first),
                plant2: id(b.second),
                current_distance: b.distance,
                required_distance: b.required,
                severity: if b.distance < b.required * HIGH_SEVERITY_SPACING_RATIO {
                    Severity::High
                } else {
                    Severity::Medium
                },
            })
            .collect();

        let compatibility_violations = scan
            .incompatible_within(self.config.incompatible_report_radius_m)
            .map(|p| CompatibilityViolation {
                plant1: id(p.first),
                plant2: id(p.second),
                distance: p.distance,
                severity: Severity::High,
            })
            .collect();

        let zone_violations = scan
            .outside_zones
            .iter()
            .map(|&idx| ZoneViolation {
                plant_id: id(idx),
                position: placements[idx].position,
                severity: Severity::High,
            })
            .collect();

        let report = ConflictReport {
            spacing_violations,
            compatibility_violations,
            zone_violations,
            resource_conflicts: self.water_competition(placements),
        };

        tracing::debug!(
            "Conflict scan over {} placements: {} findings",
            placements.len(),
            report.total()
        );
        report
    }

    /// High-water plants crowded by more than the threshold of other
    /// high-water plants within the competition radius
    fn water_competition(&self, placements: &[PlantPlacement]) -> Vec<ResourceConflict> {
        let thirsty: Vec<&PlantPlacement> = placements
            .iter()
            .filter(|p| p.profile.water_need() == WaterNeed::High)
            .collect();

        let mut conflicts = Vec::new();
        for (i, center) in thirsty.iter().enumerate() {
            let neighbours: Vec<String> = thirsty
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    *j != i && center.distance_to(other) < self.config.water_competition_radius_m
                })
                .map(|(_, other)| other.instance_id.clone())
                .collect();

            if neighbours.len() > self.config.water_competition_threshold {
                let mut plants = Vec::with_capacity(neighbours.len() + 1);
                plants.push(center.instance_id.clone());
                plants.extend(neighbours);
                conflicts.push(ResourceConflict {
                    kind: ResourceKind::WaterCompetition,
                    plants,
                    severity: Severity::Medium,
                    description: "Multiple high-water-need plants in close proximity".to_string(),
                });
            }
        }
        conflicts
    }
}
