//! Plant profiles
//!
//! Immutable agronomic description of a crop. Profiles are validated once at
//! construction and then shared by placements through `Arc<PlantProfile>`.
//! They are `Eq + Hash` so they can key the spacing cache.
//!
//! Dimensions are centimetres, yield kg, consumption litres/day.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Broad crop category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantCategory {
    Vegetable,
    Herb,
    Fruit,
    Flower,
    Root,
    Legume,
}

/// Water-need tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterNeed {
    Low,
    Medium,
    High,
}

impl WaterNeed {
    /// Severity score (1-3)
    pub fn score(&self) -> u8 {
        match self {
            WaterNeed::Low => 1,
            WaterNeed::Medium => 2,
            WaterNeed::High => 3,
        }
    }

    /// Multiplier applied on top of crop evapotranspiration
    pub fn multiplier(&self) -> f64 {
        match self {
            WaterNeed::Low => 0.7,
            WaterNeed::Medium => 1.0,
            WaterNeed::High => 1.3,
        }
    }

    pub fn all() -> &'static [WaterNeed] {
        &[WaterNeed::Low, WaterNeed::Medium, WaterNeed::High]
    }
}

/// Sun requirement of a plant, or sun class of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunExposure {
    FullSun,
    PartialSun,
    Shade,
}

impl SunExposure {
    /// Base solar exposure of a zone with this class
    pub fn base_exposure(&self) -> f64 {
        match self {
            SunExposure::FullSun => 1.0,
            SunExposure::PartialSun => 0.6,
            SunExposure::Shade => 0.3,
        }
    }
}

/// Free-form profile input, normalised by `PlantProfile::new`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantProfileSpec {
    pub name: String,
    pub category: PlantCategory,
    pub spacing_min: f64,
    pub spacing_optimal: f64,
    pub water_need: WaterNeed,
    pub sun_exposure: SunExposure,
    pub days_to_maturity: u32,
    pub height_max: f64,
    pub width_max: f64,
    pub root_depth: f64,
    pub yield_per_plant: f64,
    #[serde(default)]
    pub companions: Vec<String>,
    #[serde(default)]
    pub incompatible: Vec<String>,
    #[serde(default)]
    pub water_consumption_daily: f64,
    #[serde(default)]
    pub nutrient_requirements: Vec<(String, f64)>,
    #[serde(default)]
    pub frost_tolerant: bool,
    #[serde(default)]
    pub heat_tolerant: bool,
}

/// Validated, immutable plant profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PlantProfileSpec")]
pub struct PlantProfile {
    name: String,
    category: PlantCategory,
    spacing_min: f64,
    spacing_optimal: f64,
    water_need: WaterNeed,
    sun_exposure: SunExposure,
    days_to_maturity: u32,
    height_max: f64,
    width_max: f64,
    root_depth: f64,
    yield_per_plant: f64,
    companions: BTreeSet<String>,
    incompatible: BTreeSet<String>,
    water_consumption_daily: f64,
    nutrient_requirements: Vec<(String, f64)>,
    frost_tolerant: bool,
    heat_tolerant: bool,
}

impl PlantProfile {
    /// Validate and normalise a profile
    pub fn new(spec: PlantProfileSpec) -> Result<Self, ProfileError> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let measures = [
            ("spacing_min", spec.spacing_min),
            ("spacing_optimal", spec.spacing_optimal),
            ("height_max", spec.height_max),
            ("width_max", spec.width_max),
            ("root_depth", spec.root_depth),
            ("yield_per_plant", spec.yield_per_plant),
            ("water_consumption_daily", spec.water_consumption_daily),
        ];
        for (field, value) in measures {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::InvalidMeasure { name, field, value });
            }
        }
        for (_, amount) in &spec.nutrient_requirements {
            if !amount.is_finite() || *amount < 0.0 {
                return Err(ProfileError::InvalidMeasure {
                    name,
                    field: "nutrient_requirements",
                    value: *amount,
                });
            }
        }

        if spec.spacing_min > spec.spacing_optimal {
            return Err(ProfileError::SpacingOrder {
                name,
                min: spec.spacing_min,
                optimal: spec.spacing_optimal,
            });
        }
        if spec.days_to_maturity == 0 {
            return Err(ProfileError::ZeroMaturity { name });
        }

        let companions = normalize_names(spec.companions);
        let incompatible = normalize_names(spec.incompatible);

        if companions.contains(&name) {
            return Err(ProfileError::SelfReference { name, relation: "companion" });
        }
        if incompatible.contains(&name) {
            return Err(ProfileError::SelfReference { name, relation: "incompatible" });
        }
        if let Some(other) = companions.intersection(&incompatible).next() {
            return Err(ProfileError::ContradictoryRelation {
                other: other.clone(),
                name,
            });
        }

        // Canonical order; the last amount wins for repeated nutrients
        let mut nutrients: Vec<(String, f64)> = Vec::with_capacity(spec.nutrient_requirements.len());
        for (nutrient, amount) in spec.nutrient_requirements {
            let nutrient = nutrient.trim().to_string();
            match nutrients.iter_mut().find(|(n, _)| *n == nutrient) {
                Some(existing) => existing.1 = amount,
                None => nutrients.push((nutrient, amount)),
            }
        }
        nutrients.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self {
            name,
            category: spec.category,
            spacing_min: spec.spacing_min,
            spacing_optimal: spec.spacing_optimal,
            water_need: spec.water_need,
            sun_exposure: spec.sun_exposure,
            days_to_maturity: spec.days_to_maturity,
            height_max: spec.height_max,
            width_max: spec.width_max,
            root_depth: spec.root_depth,
            yield_per_plant: spec.yield_per_plant,
            companions,
            incompatible,
            water_consumption_daily: spec.water_consumption_daily,
            nutrient_requirements: nutrients,
            frost_tolerant: spec.frost_tolerant,
            heat_tolerant: spec.heat_tolerant,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> PlantCategory {
        self.category
    }

    /// Minimum spacing (cm)
    pub fn spacing_min(&self) -> f64 {
        self.spacing_min
    }

    /// Optimal spacing on poor soil (cm)
    pub fn spacing_optimal(&self) -> f64 {
        self.spacing_optimal
    }

    pub fn water_need(&self) -> WaterNeed {
        self.water_need
    }

    pub fn sun_exposure(&self) -> SunExposure {
        self.sun_exposure
    }

    pub fn days_to_maturity(&self) -> u32 {
        self.days_to_maturity
    }

    pub fn height_max(&self) -> f64 {
        self.height_max
    }

    pub fn width_max(&self) -> f64 {
        self.width_max
    }

    pub fn root_depth(&self) -> f64 {
        self.root_depth
    }

    pub fn yield_per_plant(&self) -> f64 {
        self.yield_per_plant
    }

    pub fn companions(&self) -> &BTreeSet<String> {
        &self.companions
    }

    pub fn incompatible(&self) -> &BTreeSet<String> {
        &self.incompatible
    }

    pub fn water_consumption_daily(&self) -> f64 {
        self.water_consumption_daily
    }

    pub fn nutrient_requirements(&self) -> &[(String, f64)] {
        &self.nutrient_requirements
    }

    pub fn frost_tolerant(&self) -> bool {
        self.frost_tolerant
    }

    pub fn heat_tolerant(&self) -> bool {
        self.heat_tolerant
    }

    pub fn is_companion_of(&self, other: &PlantProfile) -> bool {
        self.companions.contains(&other.name) || other.companions.contains(&self.name)
    }

    /// True when either profile lists the other as incompatible
    pub fn is_incompatible_with(&self, other: &PlantProfile) -> bool {
        self.incompatible.contains(&other.name) || other.incompatible.contains(&self.name)
    }
}

impl TryFrom<PlantProfileSpec> for PlantProfile {
    type Error = ProfileError;

    fn try_from(spec: PlantProfileSpec) -> Result<Self, Self::Error> {
        PlantProfile::new(spec)
    }
}

fn normalize_names(names: Vec<String>) -> BTreeSet<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

// Floats compare and hash by bit pattern. Construction rejects NaN, so this
// is a total equivalence.
impl PartialEq for PlantProfile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.spacing_min.to_bits() == other.spacing_min.to_bits()
            && self.spacing_optimal.to_bits() == other.spacing_optimal.to_bits()
            && self.water_need == other.water_need
            && self.sun_exposure == other.sun_exposure
            && self.days_to_maturity == other.days_to_maturity
            && self.height_max.to_bits() == other.height_max.to_bits()
            && self.width_max.to_bits() == other.width_max.to_bits()
            && self.root_depth.to_bits() == other.root_depth.to_bits()
            && self.yield_per_plant.to_bits() == other.yield_per_plant.to_bits()
            && self.companions == other.companions
            && self.incompatible == other.incompatible
            && self.water_consumption_daily.to_bits() == other.water_consumption_daily.to_bits()
            && self.nutrient_requirements.len() == other.nutrient_requirements.len()
            && self
                .nutrient_requirements
                .iter()
                .zip(&other.nutrient_requirements)
                .all(|(a, b)| a.0 == b.0 && a.1.to_bits() == b.1.to_bits())
            && self.frost_tolerant == other.frost_tolerant
            && self.heat_tolerant == other.heat_tolerant
    }
}

impl Eq for PlantProfile {}

impl Hash for PlantProfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.category.hash(state);
        self.spacing_min.to_bits().hash(state);
        self.spacing_optimal.to_bits().hash(state);
        self.water_need.hash(state);
        self.sun_exposure.hash(state);
        self.days_to_maturity.hash(state);
        self.height_max.to_bits().hash(state);
        self.width_max.to_bits().hash(state);
        self.root_depth.to_bits().hash(state);
        self.yield_per_plant.to_bits().hash(state);
        self.companions.hash(state);
        self.incompatible.hash(state);
        self.water_consumption_daily.to_bits().hash(state);
        for (nutrient, amount) in &self.nutrient_requirements {
            nutrient.hash(state);
            amount.to_bits().hash(state);
        }
        self.frost_tolerant.hash(state);
        self.heat_tolerant.hash(state);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Baseline spec for tests: medium water, full sun, 30-45 cm spacing
    pub fn spec(name: &str) -> PlantProfileSpec {
        PlantProfileSpec {
            name: name.to_string(),
            category: PlantCategory::Vegetable,
            spacing_min: 30.0,
            spacing_optimal: 45.0,
            water_need: WaterNeed::Medium,
            sun_exposure: SunExposure::FullSun,
            days_to_maturity: 60,
            height_max: 50.0,
            width_max: 40.0,
            root_depth: 30.0,
            yield_per_plant: 2.0,
            companions: Vec::new(),
            incompatible: Vec::new(),
            water_consumption_daily: 1.0,
            nutrient_requirements: Vec::new(),
            frost_tolerant: false,
            heat_tolerant: false,
        }
    }

    pub fn profile(name: &str) -> PlantProfile {
        PlantProfile::new(spec(name)).expect("fixture profile is valid")
    }
}
