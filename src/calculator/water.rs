//! Daily water demand
//!
//! Crop-coefficient evapotranspiration model:
//!   water = ET0 × Kc(stage) × need multiplier × moisture factor × footprint
//! with footprint = width_max² (cm² → m²).

use super::AgronomicCalculator;
use crate::model::{GrowthStage, PlantProfile, Weather};

/// Never plan less than this (litres/day)
pub const MIN_DAILY_WATER_L: f64 = 0.1;

/// Soil moisture at which the moisture factor is 1.0
const REFERENCE_MOISTURE: f64 = 0.3;

impl AgronomicCalculator {
    /// Daily water need (litres/day), floored at `MIN_DAILY_WATER_L`
    pub fn water_needs(
        &self,
        profile: &PlantProfile,
        weather: &Weather,
        soil_moisture: f64,
        stage: GrowthStage,
    ) -> f64 {
        daily_water_need(profile, weather.et0, soil_moisture, stage)
    }
}

pub fn daily_water_need(
    profile: &PlantProfile,
    et0: f64,
    soil_moisture: f64,
    stage: GrowthStage,
) -> f64 {
    let kc = stage.crop_coefficient();
    let need = profile.water_need().multiplier();
    let moisture_factor = moisture_factor(soil_moisture);
    let footprint_m2 = profile.width_max() * profile.width_max() / 10_000.0;

    let daily = et0 * kc * need * moisture_factor * footprint_m2;
    if daily.is_nan() {
        return MIN_DAILY_WATER_L;
    }
    daily.max(MIN_DAILY_WATER_L)
}

/// soil_moisture / 0.3 clamped to [0.5, 1.5]
fn moisture_factor(soil_moisture: f64) -> f64 {
    if soil_moisture.is_nan() {
        return 1.0;
    }
    (soil_moisture / REFERENCE_MOISTURE).clamp(0.5, 1.5)
}
