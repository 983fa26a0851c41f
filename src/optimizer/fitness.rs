//! Placement fitness
//!
//! 10 points per placed plant, minus:
//! - spacing: 10 per centimetre of shortfall for each breaching pair, so a
//!   5 cm breach weighs as much as an incompatible pair and 10 cm as much
//!   as an unzoned plant
//! - compatibility: 50 per incompatible pair within the fitness radius
//! - zones: 100 per placement outside every zone
//!
//! An empty candidate scores −∞.

use crate::calculator::AgronomicCalculator;
use crate::config::ConstraintConfig;
use crate::constraints::ConstraintScan;
use crate::model::{GardenZone, PlantPlacement};

pub const POINTS_PER_PLANT: f64 = 10.0;
/// Shortfall is charged in the profile's unit (cm)
pub const SPACING_PENALTY_PER_CM: f64 = 10.0;
pub const INCOMPATIBLE_PENALTY: f64 = 50.0;
pub const OUTSIDE_ZONE_PENALTY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBreakdown {
    pub base: f64,
    pub spacing_penalty: f64,
    pub compatibility_penalty: f64,
    pub zone_penalty: f64,
}

impl FitnessBreakdown {
    pub fn total(&self) -> f64 {
        self.base - (self.spacing_penalty + self.compatibility_penalty + self.zone_penalty)
    }
}

pub fn breakdown(
    scan: &ConstraintScan,
    placement_count: usize,
    config: &ConstraintConfig,
) -> FitnessBreakdown {
    let shortfall_cm = scan.total_spacing_shortfall() * 100.0;
    let close_incompatible = scan
        .incompatible_within(config.incompatible_fitness_radius_m)
        .count();

    FitnessBreakdown {
        base: POINTS_PER_PLANT * placement_count as f64,
        spacing_penalty: shortfall_cm * SPACING_PENALTY_PER_CM,
        compatibility_penalty: close_incompatible as f64 * INCOMPATIBLE_PENALTY,
        zone_penalty: scan.outside_zones.len() as f64 * OUTSIDE_ZONE_PENALTY,
    }
}

/// Fitness of a candidate arrangement (higher is better)
pub fn evaluate(
    candidate: &[PlantPlacement],
    zones: &[GardenZone],
    calculator: &AgronomicCalculator,
    config: &ConstraintConfig,
    soil_quality: f64,
) -> f64 {
    if candidate.is_empty() {
        return f64::NEG_INFINITY;
    }
    let scan = ConstraintScan::run(candidate, zones, calculator, soil_quality);
    breakdown(&scan, candidate.len(), config).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::fixtures::{profile, spec};
    use crate::model::zone::fixtures::zone;
    use crate::model::PlantProfile;
    use crate::utils::geometry::Point;
    use approx::assert_relative_eq;
    use chrono::Utc;
    use std::sync::Arc;

    fn place(id: &str, profile: &Arc<PlantProfile>, x: f64, y: f64) -> PlantPlacement {
        PlantPlacement::new(id, Arc::clone(profile), Point::new(x, y), Utc::now())
    }

    #[test]
    fn test_empty_is_negative_infinity() {
        let calc = AgronomicCalculator::new();
        let f = evaluate(&[], &[], &calc, &ConstraintConfig::default(), 0.7);
        assert_eq!(f, f64::NEG_INFINITY);
    }

    #[test]
    fn test_legal_arrangement_scores_base() {
        let calc = AgronomicCalculator::new();
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];
        let placements = vec![place("l-1", &lettuce, 0.0, 0.0), place("l-2", &lettuce, 1.0, 0.0)];
        let f = evaluate(&placements, &zones, &calc, &ConstraintConfig::default(), 0.7);
        assert_relative_eq!(f, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_penalties() {
        let calc = AgronomicCalculator::new();
        let mut t = spec("Tomato");
        t.incompatible = vec!["Potato".into()];
        let tomato = Arc::new(PlantProfile::new(t).unwrap());
        let potato = Arc::new(profile("Potato"));
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];

        let placements = vec![
            place("tomato-1", &tomato, 0.0, 0.0),
            place("potato-1", &potato, 0.145, 0.0),
            place("potato-2", &potato, 40.0, 0.0),
        ];
        let scan = ConstraintScan::run(&placements, &zones, &calc, 0.7);
        let b = breakdown(&scan, placements.len(), &ConstraintConfig::default());
        // 20 cm short of 34.5 cm
        assert_relative_eq!(b.spacing_penalty, 200.0, epsilon = 1e-9);
        assert_eq!(b.compatibility_penalty, 50.0);
        assert_eq!(b.zone_penalty, 100.0);

        let f = evaluate(&placements, &zones, &calc, &ConstraintConfig::default(), 0.7);
        assert_relative_eq!(f, 30.0 - 350.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spacing_shortfall_charged_per_centimetre() {
        let calc = AgronomicCalculator::new();
        let tomato = Arc::new(profile("Tomato"));
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];
        // 14.5 cm short of 34.5 cm outweighs a whole unzoned plant
        let placements = vec![place("tomato-1", &tomato, 0.0, 0.0), place("tomato-2", &tomato, 0.2, 0.0)];
        let f = evaluate(&placements, &zones, &calc, &ConstraintConfig::default(), 0.7);
        assert_relative_eq!(f, 20.0 - 145.0, epsilon = 1e-9);
        assert!(20.0 - f > OUTSIDE_ZONE_PENALTY);
    }

    #[test]
    fn test_duplicate_position_lowers_fitness() {
        let calc = AgronomicCalculator::new();
        let cfg = ConstraintConfig::default();
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];
        let mut placements = vec![place("l-1", &lettuce, 0.0, 0.0), place("l-2", &lettuce, 1.0, 0.0)];
        let before = evaluate(&placements, &zones, &calc, &cfg, 0.7);

        placements.push(place("l-3", &lettuce, 1.0, 0.0));
        let after = evaluate(&placements, &zones, &calc, &cfg, 0.7);
        assert!(after < before);
    }
}
