//! Solar exposure score
//!
//! base(zone sun class) × seasonal factor × (1 + slope/90 × 0.2), clamped to
//! [0, 1]. Placements outside every zone score a neutral 0.5; the conflict
//! detector reports them separately.

use super::AgronomicCalculator;
use crate::model::zone::zone_containing;
use crate::model::{GardenZone, PlantPlacement, SunData};

pub const UNZONED_EXPOSURE: f64 = 0.5;

impl AgronomicCalculator {
    pub fn solar_exposure(
        &self,
        placement: &PlantPlacement,
        zones: &[GardenZone],
        sun: &SunData,
    ) -> f64 {
        let Some(zone) = zone_containing(&placement.position, zones) else {
            tracing::debug!(
                "{} is outside every zone, using neutral exposure",
                placement.instance_id
            );
            return UNZONED_EXPOSURE;
        };
        zone_exposure(zone, sun.seasonal_factor)
    }
}

pub fn zone_exposure(zone: &GardenZone, seasonal_factor: f64) -> f64 {
    let base = zone.sun_exposure.base_exposure();
    let slope_factor = 1.0 + (zone.slope / 90.0) * 0.2;
    let score = base * seasonal_factor * slope_factor;
    if score.is_nan() {
        return UNZONED_EXPOSURE;
    }
    score.clamp(0.0, 1.0)
}
