//! Plant placements
//!
//! One located instance of a profile, with growth and stress state.

use crate::model::profile::PlantProfile;
use crate::utils::geometry::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Growth stage, strictly ordered from seed to harvest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Seed,
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
    Harvest,
}

impl GrowthStage {
    /// FAO-56 style crop coefficient (Kc)
    pub fn crop_coefficient(&self) -> f64 {
        match self {
            GrowthStage::Seed => 0.3,
            GrowthStage::Seedling => 0.5,
            GrowthStage::Vegetative => 0.8,
            GrowthStage::Flowering => 1.0,
            GrowthStage::Fruiting => 1.1,
            GrowthStage::Harvest => 0.7,
        }
    }

    /// Share of the crop cycle spent in this stage
    pub fn stage_share(&self) -> f64 {
        match self {
            GrowthStage::Seed => 0.1,
            GrowthStage::Seedling => 0.2,
            GrowthStage::Vegetative => 0.4,
            GrowthStage::Flowering => 0.2,
            GrowthStage::Fruiting => 0.1,
            GrowthStage::Harvest => 0.0,
        }
    }

    pub fn all() -> &'static [GrowthStage] {
        &[
            GrowthStage::Seed,
            GrowthStage::Seedling,
            GrowthStage::Vegetative,
            GrowthStage::Flowering,
            GrowthStage::Fruiting,
            GrowthStage::Harvest,
        ]
    }
}

/// A plant instance placed in the garden
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantPlacement {
    pub instance_id: String,
    pub profile: Arc<PlantProfile>,
    pub position: Point,
    pub planted_on: DateTime<Utc>,
    pub stage: GrowthStage,
    /// Health in [0, 1]
    pub health_score: f64,
    /// Water stress in [0, 1]
    pub water_stress: f64,
    /// Nutrient stress in [0, 1]
    pub nutrient_stress: f64,
}

impl PlantPlacement {
    /// Healthy, unstressed seed at `position`
    pub fn new(
        instance_id: impl Into<String>,
        profile: Arc<PlantProfile>,
        position: Point,
        planted_on: DateTime<Utc>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            profile,
            position,
            planted_on,
            stage: GrowthStage::Seed,
            health_score: 1.0,
            water_stress: 0.0,
            nutrient_stress: 0.0,
        }
    }

    pub fn with_stage(mut self, stage: GrowthStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_health(mut self, health: f64) -> Self {
        self.set_health(health);
        self
    }

    pub fn with_stress(mut self, water: f64, nutrient: f64) -> Self {
        self.set_stress(water, nutrient);
        self
    }

    pub fn set_health(&mut self, health: f64) {
        self.health_score = clamp_unit(health);
    }

    pub fn set_stress(&mut self, water: f64, nutrient: f64) {
        self.water_stress = clamp_unit(water);
        self.nutrient_stress = clamp_unit(nutrient);
    }

    pub fn distance_to(&self, other: &PlantPlacement) -> f64 {
        self.position.distance_to(&other.position)
    }
}

/// Clamp to [0, 1]; NaN maps to 0
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
