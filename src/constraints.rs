//! Shared constraint scan
//!
//! One pass over an arrangement collecting spacing breaches, incompatible
//! pairs and unzoned placements. The optimizer's fitness and the conflict
//! detector both read from this, so what the search optimises and what the
//! detector reports come from the same checks.

use crate::calculator::AgronomicCalculator;
use crate::model::{GardenZone, PlantPlacement};

/// Two placements closer than their required spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingBreach {
    pub first: usize,
    pub second: usize,
    /// Metres
    pub distance: f64,
    /// Metres
    pub required: f64,
}

impl SpacingBreach {
    pub fn shortfall(&self) -> f64 {
        self.required - self.distance
    }
}

/// Two placements whose profiles are incompatible (any distance)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompatiblePair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintScan {
    pub spacing_breaches: Vec<SpacingBreach>,
    pub incompatible_pairs: Vec<IncompatiblePair>,
    /// Indices of placements contained in no zone
    pub outside_zones: Vec<usize>,
}

impl ConstraintScan {
    /// Scan every pair once (i < j) and every placement against the zones
    pub fn run(
        placements: &[PlantPlacement],
        zones: &[GardenZone],
        calculator: &AgronomicCalculator,
        soil_quality: f64,
    ) -> Self {
        let mut scan = ConstraintScan::default();

        for i in 0..placements.len() {
            let a = &placements[i];
            for j in i + 1..placements.len() {
                let b = &placements[j];
                let distance = a.distance_to(b);

                let required = calculator.required_spacing_m(&a.profile, &b.profile, soil_quality);
                if distance < required {
                    scan.spacing_breaches.push(SpacingBreach {
                        first: i,
                        second: j,
                        distance,
                        required,
                    });
                }

                if a.profile.is_incompatible_with(&b.profile) {
                    scan.incompatible_pairs.push(IncompatiblePair {
                        first: i,
                        second: j,
                        distance,
                    });
                }
            }

            if !zones.iter().any(|z| z.contains(&a.position)) {
                scan.outside_zones.push(i);
            }
        }

        scan
    }

    /// Σ shortfall (m) over all spacing breaches
    pub fn total_spacing_shortfall(&self) -> f64 {
        self.spacing_breaches.iter().map(|b| b.shortfall()).sum()
    }

    /// Incompatible pairs closer than `radius` (m)
    pub fn incompatible_within(&self, radius: f64) -> impl Iterator<Item = &IncompatiblePair> {
        self.incompatible_pairs.iter().filter(move |p| p.distance < radius)
    }
}
