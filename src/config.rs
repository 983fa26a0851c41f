//! Engine configuration
//!
//! All knobs have working defaults; a JSON file may override any subset.

use crate::error::EngineError;
use crate::irrigation::emitters::EmitterKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Genetic-algorithm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that an offspring mutates (whole individual)
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub tournament_size: usize,
    /// Max position jitter per axis when mutating (m)
    pub mutation_jitter_m: f64,
    /// Wall-clock cap, checked between generations
    pub max_duration_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            tournament_size: 3,
            mutation_jitter_m: 0.5,
            max_duration_ms: None,
        }
    }
}

/// Thresholds shared by the fitness function and the conflict detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Soil quality assumed when deriving required spacing
    pub assumed_soil_quality: f64,
    /// Incompatible pairs closer than this are penalised during search (m)
    pub incompatible_fitness_radius_m: f64,
    /// Incompatible pairs closer than this are reported (m)
    pub incompatible_report_radius_m: f64,
    pub water_competition_radius_m: f64,
    /// Report when more than this many high-water neighbours crowd a plant
    pub water_competition_threshold: usize,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            assumed_soil_quality: 0.7,
            incompatible_fitness_radius_m: 1.0,
            incompatible_report_radius_m: 2.0,
            water_competition_radius_m: 1.0,
            water_competition_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationConfig {
    /// Added to each irrigation group's radius (m)
    pub buffer_m: f64,
    pub default_soil_moisture: f64,
    pub source_pressure_bar: f64,
    /// Emitter used for run-time estimates
    pub emitter: EmitterKind,
}

impl Default for IrrigationConfig {
    fn default() -> Self {
        Self {
            buffer_m: 1.0,
            default_soil_moisture: 0.5,
            source_pressure_bar: 2.5,
            emitter: EmitterKind::DripEmitter,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub optimizer: OptimizerConfig,
    pub constraints: ConstraintConfig,
    pub irrigation: IrrigationConfig,
    /// Worker threads for fitness evaluation and batch runs (None = rayon default)
    pub worker_threads: Option<usize>,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse engine config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let opt = &self.optimizer;
        for (name, rate) in [
            ("mutation_rate", opt.mutation_rate),
            ("crossover_rate", opt.crossover_rate),
            ("assumed_soil_quality", self.constraints.assumed_soil_quality),
            ("default_soil_moisture", self.irrigation.default_soil_moisture),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be within [0, 1] (got {})",
                    name, rate
                )));
            }
        }
        if opt.population_size < 2 {
            return Err(EngineError::InvalidConfig(
                "population_size must be at least 2".to_string(),
            ));
        }
        if opt.tournament_size == 0 {
            return Err(EngineError::InvalidConfig(
                "tournament_size must be positive".to_string(),
            ));
        }
        if !opt.mutation_jitter_m.is_finite() || opt.mutation_jitter_m < 0.0 {
            return Err(EngineError::InvalidConfig(
                "mutation_jitter_m must be a non-negative number".to_string(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(EngineError::InvalidConfig(
                "worker_threads must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}
