//! Growth and yield prediction
//!
//! Combined stress is the mean of water, nutrient, temperature and humidity
//! stress. It slows maturity (growth modifier 1 − 0.5 × stress, clamped to
//! [0.5, 1.5]) and trims yield by up to 30%.

use super::AgronomicCalculator;
use crate::model::{Environment, GrowthStage, PlantPlacement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressFactors {
    pub water: f64,
    pub nutrient: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl StressFactors {
    pub fn combined(&self) -> f64 {
        (self.water + self.nutrient + self.temperature + self.humidity) / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPrediction {
    pub combined_stress: f64,
    pub growth_modifier: f64,
    pub adjusted_maturity_days: u32,
    /// kg per plant
    pub predicted_yield: f64,
    /// Elapsed time over adjusted maturity, in [0, 1]
    pub progress: f64,
    /// Cumulative stage shares up to the current stage
    pub stage_progress: f64,
    pub days_to_harvest: i64,
    pub health_score: f64,
    pub stress: StressFactors,
}

impl AgronomicCalculator {
    pub fn growth_prediction(
        &self,
        placement: &PlantPlacement,
        environment: &Environment,
    ) -> GrowthPrediction {
        predict_growth(placement, environment, environment.reference_time())
    }
}

/// 1 − 0.5 × stress, clamped to [0.5, 1.5]
pub fn growth_modifier(combined_stress: f64) -> f64 {
    let modifier = 1.0 - combined_stress * 0.5;
    if modifier.is_nan() {
        return 1.0;
    }
    modifier.clamp(0.5, 1.5)
}

pub fn predict_growth(
    placement: &PlantPlacement,
    environment: &Environment,
    as_of: DateTime<Utc>,
) -> GrowthPrediction {
    let profile = &placement.profile;
    let stress = StressFactors {
        water: placement.water_stress,
        nutrient: placement.nutrient_stress,
        temperature: environment.temperature_stress,
        humidity: environment.humidity_stress,
    };
    let combined_stress = stress.combined();
    let modifier = growth_modifier(combined_stress);

    // Truncated; at least one day so progress stays defined
    let adjusted_maturity_days =
        ((profile.days_to_maturity() as f64 / modifier) as u32).max(1);

    let predicted_yield =
        profile.yield_per_plant() * placement.health_score * (1.0 - 0.3 * combined_stress);

    let days_elapsed = (as_of - placement.planted_on).num_days();
    let progress = (days_elapsed as f64 / adjusted_maturity_days as f64).clamp(0.0, 1.0);
    let days_to_harvest = (adjusted_maturity_days as i64 - days_elapsed).max(0);

    GrowthPrediction {
        combined_stress,
        growth_modifier: modifier,
        adjusted_maturity_days,
        predicted_yield,
        progress,
        stage_progress: stage_progress(placement.stage),
        days_to_harvest,
        health_score: placement.health_score,
        stress,
    }
}

fn stage_progress(stage: GrowthStage) -> f64 {
    GrowthStage::all()
        .iter()
        .take_while(|s| **s <= stage)
        .map(|s| s.stage_share())
        .sum()
}
