//! Agronomic calculator
//!
//! Deterministic scientific formulas used by every other component:
//! - `optimal_spacing`: soil-quality interpolated spacing (memoised)
//! - `water`: crop-coefficient evapotranspiration demand
//! - `solar`: zone-based solar exposure score
//! - `growth`: stress-adjusted maturity and yield prediction
//!
//! Missing environment readings fall back to documented neutral values; no
//! function here returns an error.

pub mod growth;
pub mod solar;
pub mod water;

pub use growth::{GrowthPrediction, StressFactors};

use crate::model::PlantProfile;
use moka::sync::Cache;
use std::sync::Arc;

/// Spacing cache capacity (entries)
const SPACING_CACHE_CAPACITY: u64 = 1000;

pub struct AgronomicCalculator {
    spacing_cache: Cache<(Arc<PlantProfile>, u64), f64>,
}

impl Default for AgronomicCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl AgronomicCalculator {
    pub fn new() -> Self {
        Self {
            spacing_cache: Cache::new(SPACING_CACHE_CAPACITY),
        }
    }

    /// Optimal spacing (cm) for a soil quality in [0, 1]
    ///
    /// Poor soil (0) → `spacing_optimal`, good soil (1) → `spacing_min`,
    /// linear in between, never below `spacing_min`. Out-of-range qualities
    /// are clamped; NaN counts as poor soil.
    pub fn optimal_spacing(&self, profile: &Arc<PlantProfile>, soil_quality: f64) -> f64 {
        let quality = if soil_quality.is_nan() {
            0.0
        } else {
            soil_quality.clamp(0.0, 1.0)
        };
        self.spacing_cache
            .get_with((Arc::clone(profile), quality.to_bits()), || {
                interpolate_spacing(profile, quality)
            })
    }

    /// Required spacing between two profiles, in metres
    ///
    /// The wider of the two plants' requirements applies.
    pub fn required_spacing_m(
        &self,
        a: &Arc<PlantProfile>,
        b: &Arc<PlantProfile>,
        soil_quality: f64,
    ) -> f64 {
        let a_cm = self.optimal_spacing(a, soil_quality);
        let b_cm = if Arc::ptr_eq(a, b) {
            a_cm
        } else {
            self.optimal_spacing(b, soil_quality)
        };
        a_cm.max(b_cm) / 100.0
    }
}

fn interpolate_spacing(profile: &PlantProfile, quality: f64) -> f64 {
    let min = profile.spacing_min();
    let optimal = profile.spacing_optimal();
    let spacing = optimal + (min - optimal) * quality;
    spacing.max(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::fixtures::{profile, spec};
    use approx::assert_relative_eq;

    #[test]
    fn test_spacing_endpoints() {
        let calc = AgronomicCalculator::new();
        let p = Arc::new(profile("Tomato"));
        assert_eq!(calc.optimal_spacing(&p, 1.0), p.spacing_min());
        assert_eq!(calc.optimal_spacing(&p, 0.0), p.spacing_optimal());
        // 45 + (30 - 45) * 0.7 = 34.5
        assert_relative_eq!(calc.optimal_spacing(&p, 0.7), 34.5, epsilon = 1e-9);
    }

    #[test]
    fn test_spacing_monotone_non_increasing() {
        let calc = AgronomicCalculator::new();
        let p = Arc::new(profile("Tomato"));
        let mut previous = f64::INFINITY;
        for step in 0..=20 {
            let q = step as f64 / 20.0;
            let s = calc.optimal_spacing(&p, q);
            assert!(s <= previous);
            assert!(s >= p.spacing_min());
            previous = s;
        }
    }

    #[test]
    fn test_spacing_out_of_range_quality() {
        let calc = AgronomicCalculator::new();
        let p = Arc::new(profile("Tomato"));
        assert_eq!(calc.optimal_spacing(&p, 3.0), p.spacing_min());
        assert_eq!(calc.optimal_spacing(&p, -1.0), p.spacing_optimal());
        assert_eq!(calc.optimal_spacing(&p, f64::NAN), p.spacing_optimal());
    }

    #[test]
    fn test_memoised_value_is_stable() {
        let calc = AgronomicCalculator::new();
        let p = Arc::new(profile("Tomato"));
        let first = calc.optimal_spacing(&p, 0.7);
        let second = calc.optimal_spacing(&Arc::new(profile("Tomato")), 0.7);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_required_spacing_uses_wider_plant() {
        let calc = AgronomicCalculator::new();
        let small = Arc::new(profile("Basil"));
        let mut s = spec("Squash");
        s.spacing_min = 90.0;
        s.spacing_optimal = 120.0;
        let wide = Arc::new(PlantProfile::new(s).unwrap());
        // Squash at q=1 → 90 cm
        assert_relative_eq!(calc.required_spacing_m(&small, &wide, 1.0), 0.9, epsilon = 1e-9);
        assert_relative_eq!(calc.required_spacing_m(&wide, &small, 1.0), 0.9, epsilon = 1e-9);
    }
}
