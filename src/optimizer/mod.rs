//! Placement optimizer (genetic algorithm)
//!
//! Each individual is one placement per requested profile. Per generation:
//! evaluate fitness (in parallel), remember the best individual ever seen,
//! then breed a fresh population through tournament selection, single-point
//! crossover and whole-individual jitter. The population is replaced in full;
//! the best individual survives only through the running best.
//!
//! Fitness evaluation runs on the current rayon pool. All random draws stay
//! on the calling thread, so a seeded run is reproducible for any pool size.

pub mod fitness;
pub mod operators;

use crate::calculator::AgronomicCalculator;
use crate::config::{ConstraintConfig, OptimizerConfig};
use crate::model::{GardenZone, PlantPlacement, PlantProfile};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-request search options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConstraints {
    /// Seed for a reproducible run (None = entropy)
    pub seed: Option<u64>,
    /// Planting date stamped on generated placements (None = now)
    pub planting_date: Option<DateTime<Utc>>,
    /// Overrides the configured assumed soil quality
    pub soil_quality: Option<f64>,
}

impl PlacementConstraints {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Best arrangement found by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub placements: Vec<PlantPlacement>,
    pub best_fitness: f64,
    pub generations_run: usize,
}

impl OptimizationOutcome {
    fn empty() -> Self {
        Self {
            placements: Vec::new(),
            best_fitness: f64::NEG_INFINITY,
            generations_run: 0,
        }
    }
}

pub struct PlacementOptimizer {
    calculator: Arc<AgronomicCalculator>,
    config: OptimizerConfig,
    constraints: ConstraintConfig,
}

impl PlacementOptimizer {
    pub fn new(
        calculator: Arc<AgronomicCalculator>,
        config: OptimizerConfig,
        constraints: ConstraintConfig,
    ) -> Self {
        Self {
            calculator,
            config,
            constraints,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Fitness of one candidate at the given soil quality
    pub fn fitness(&self, candidate: &[PlantPlacement], zones: &[GardenZone], soil_quality: f64) -> f64 {
        fitness::evaluate(candidate, zones, &self.calculator, &self.constraints, soil_quality)
    }

    /// Search for a placement of `profiles` inside `zones`
    ///
    /// No profiles or no zones yield an empty outcome with −∞ fitness.
    pub fn optimize<R: Rng>(
        &self,
        profiles: &[Arc<PlantProfile>],
        zones: &[GardenZone],
        request: &PlacementConstraints,
        rng: &mut R,
    ) -> OptimizationOutcome {
        if profiles.is_empty() || zones.is_empty() {
            tracing::debug!(
                "Nothing to optimize ({} profiles, {} zones)",
                profiles.len(),
                zones.len()
            );
            return OptimizationOutcome::empty();
        }

        let soil_quality = request
            .soil_quality
            .unwrap_or(self.constraints.assumed_soil_quality);
        let planted_on = request.planting_date.unwrap_or_else(Utc::now);
        let population_size = self.config.population_size;
        let budget = self.config.max_duration_ms.map(Duration::from_millis);
        let started = Instant::now();

        let mut population: Vec<Vec<PlantPlacement>> = Vec::with_capacity(population_size);
        for _ in 0..population_size {
            match operators::random_individual(profiles, zones, planted_on, rng) {
                Some(individual) => population.push(individual),
                None => return OptimizationOutcome::empty(),
            }
        }

        let mut best_fitness = f64::NEG_INFINITY;
        let mut best: Option<Vec<PlantPlacement>> = None;
        let mut generations_run = 0;

        for generation in 0..self.config.generations {
            if let Some(limit) = budget {
                if generation > 0 && started.elapsed() >= limit {
                    tracing::info!(
                        "Time budget of {:?} reached after {} generations",
                        limit,
                        generation
                    );
                    break;
                }
            }

            let scores: Vec<f64> = population
                .par_iter()
                .map(|individual| self.fitness(individual, zones, soil_quality))
                .collect();

            for (individual, &score) in population.iter().zip(&scores) {
                if score > best_fitness {
                    best_fitness = score;
                    best = Some(individual.clone());
                }
            }

            let mut next = Vec::with_capacity(population_size);
            while next.len() < population_size {
                let p1 = &population[operators::tournament_select(&scores, self.config.tournament_size, rng)];
                let p2 = &population[operators::tournament_select(&scores, self.config.tournament_size, rng)];

                let (mut child1, mut child2) = if rng.gen::<f64>() < self.config.crossover_rate {
                    operators::crossover(p1, p2, rng)
                } else {
                    (p1.clone(), p2.clone())
                };

                if rng.gen::<f64>() < self.config.mutation_rate {
                    operators::mutate(&mut child1, self.config.mutation_jitter_m, rng);
                }
                if rng.gen::<f64>() < self.config.mutation_rate {
                    operators::mutate(&mut child2, self.config.mutation_jitter_m, rng);
                }

                next.push(child1);
                next.push(child2);
            }
            next.truncate(population_size);
            population = next;
            generations_run = generation + 1;

            if generation % 10 == 0 {
                tracing::info!("Generation {}: best fitness = {:.3}", generation, best_fitness);
            }
        }

        match best {
            Some(placements) => OptimizationOutcome {
                placements,
                best_fitness,
                generations_run,
            },
            None => OptimizationOutcome {
                generations_run,
                ..OptimizationOutcome::empty()
            },
        }
    }
}
