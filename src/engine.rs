//! Agronomic engine façade
//!
//! Wires the calculator, optimizer, irrigation planner and conflict detector
//! together behind four operations:
//! - `optimize_placement` / `optimize_batch`: genetic search for arrangements
//! - `comprehensive_analysis`: water, solar, growth, conflicts and an overall
//!   efficiency score for an arrangement
//! - `incremental_update`: re-evaluates only what one added plant affects
//!
//! The engine keeps no state between calls apart from the spacing cache.
//! CPU-heavy work runs on the engine's own rayon pool.

use crate::calculator::{growth, AgronomicCalculator, GrowthPrediction};
use crate::config::EngineConfig;
use crate::conflicts::{ConflictDetector, ConflictReport};
use crate::error::EngineError;
use crate::irrigation::{IrrigationPlanner, WaterPlan};
use crate::model::zone::{total_area, zone_containing};
use crate::model::{Environment, GardenZone, PlantPlacement, PlantProfile, PlantProfileSpec};
use crate::optimizer::{OptimizationOutcome, PlacementConstraints, PlacementOptimizer};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// One independent optimization job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub profiles: Vec<Arc<PlantProfile>>,
    pub zones: Vec<GardenZone>,
    #[serde(default)]
    pub constraints: PlacementConstraints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyDetails {
    pub total_plants: usize,
    pub total_conflicts: usize,
    /// Mean water-need score (1 = low, 3 = high)
    pub avg_water_need: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// 0–100
    pub overall_score: f64,
    pub space_utilization: f64,
    pub water_efficiency: f64,
    pub solar_efficiency: f64,
    pub conflict_penalty: f64,
    pub details: EfficiencyDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub water_analysis: WaterPlan,
    /// instance id → exposure score
    pub solar_analysis: BTreeMap<String, f64>,
    pub growth_predictions: BTreeMap<String, GrowthPrediction>,
    pub conflicts: ConflictReport,
    /// kg
    pub total_predicted_yield: f64,
    pub efficiency_metrics: EfficiencyMetrics,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlantAnalysis {
    pub instance_id: String,
    pub zone_id: Option<String>,
    /// Litres/day
    pub water_need: f64,
    pub solar_exposure: f64,
    pub growth_prediction: GrowthPrediction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalUpdate {
    /// Existing placements followed by the (refreshed) new one
    pub placements: Vec<PlantPlacement>,
    pub new_plant_analysis: NewPlantAnalysis,
    pub conflicts: ConflictReport,
    pub irrigation: WaterPlan,
}

pub struct AgronomicEngine {
    config: EngineConfig,
    calculator: Arc<AgronomicCalculator>,
    optimizer: PlacementOptimizer,
    irrigation: IrrigationPlanner,
    detector: ConflictDetector,
    pool: ThreadPool,
}

impl AgronomicEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("agronomic-worker-{}", i));
        if let Some(threads) = config.worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let calculator = Arc::new(AgronomicCalculator::new());
        let optimizer = PlacementOptimizer::new(
            Arc::clone(&calculator),
            config.optimizer.clone(),
            config.constraints.clone(),
        );
        let irrigation = IrrigationPlanner::new(Arc::clone(&calculator), config.irrigation.clone());
        let detector = ConflictDetector::new(Arc::clone(&calculator), config.constraints.clone());

        tracing::info!(
            "Agronomic engine ready ({} worker threads)",
            pool.current_num_threads()
        );

        Ok(Self {
            config,
            calculator,
            optimizer,
            irrigation,
            detector,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &AgronomicCalculator {
        &self.calculator
    }

    pub fn optimizer(&self) -> &PlacementOptimizer {
        &self.optimizer
    }

    pub fn irrigation_planner(&self) -> &IrrigationPlanner {
        &self.irrigation
    }

    pub fn conflict_detector(&self) -> &ConflictDetector {
        &self.detector
    }

    /// Best arrangement of `profiles` inside `zones`
    pub fn optimize_placement(
        &self,
        profiles: &[Arc<PlantProfile>],
        zones: &[GardenZone],
        constraints: &PlacementConstraints,
    ) -> OptimizationOutcome {
        let start = Instant::now();
        let outcome = self.pool.install(|| {
            let mut rng = constraints.rng();
            self.optimizer.optimize(profiles, zones, constraints, &mut rng)
        });
        tracing::info!(
            "Optimized {} plants in {:?} ({} generations, fitness {:.3})",
            profiles.len(),
            start.elapsed(),
            outcome.generations_run,
            outcome.best_fitness
        );
        outcome
    }

    /// Independent optimizations in parallel, results in request order
    pub fn optimize_batch(&self, requests: &[PlacementRequest]) -> Vec<OptimizationOutcome> {
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let mut rng = request.constraints.rng();
                    self.optimizer.optimize(
                        &request.profiles,
                        &request.zones,
                        &request.constraints,
                        &mut rng,
                    )
                })
                .collect()
        })
    }

    pub fn comprehensive_analysis(
        &self,
        placements: &[PlantPlacement],
        zones: &[GardenZone],
        environment: &Environment,
    ) -> AnalysisReport {
        let start = Instant::now();
        let as_of = environment.reference_time();

        let water_analysis = self.irrigation.plan(placements, zones, &environment.weather);

        let per_plant: Vec<(String, f64, GrowthPrediction)> = self.pool.install(|| {
            placements
                .par_iter()
                .map(|p| {
                    (
                        p.instance_id.clone(),
                        self.calculator.solar_exposure(p, zones, &environment.sun),
                        growth::predict_growth(p, environment, as_of),
                    )
                })
                .collect()
        });

        let total_predicted_yield: f64 = per_plant.iter().map(|(_, _, g)| g.predicted_yield).sum();
        let solar_scores: Vec<f64> = per_plant.iter().map(|(_, solar, _)| *solar).collect();

        let mut solar_analysis: BTreeMap<String, f64> = BTreeMap::new();
        let mut growth_predictions = BTreeMap::new();
        for (id, solar, prediction) in per_plant {
            let key = unique_id(&id, |k| solar_analysis.contains_key(k));
            if key != id {
                tracing::debug!("Duplicate instance id {} reported as {}", id, key);
            }
            solar_analysis.insert(key.clone(), solar);
            growth_predictions.insert(key, prediction);
        }

        let conflicts = self.detector.detect(placements, zones);
        let efficiency_metrics =
            efficiency_metrics(placements, zones, &water_analysis, &solar_scores, &conflicts);

        tracing::debug!(
            "Analysed {} placements in {:?}: score {:.1}, {} conflicts",
            placements.len(),
            start.elapsed(),
            efficiency_metrics.overall_score,
            conflicts.total()
        );

        AnalysisReport {
            water_analysis,
            solar_analysis,
            growth_predictions,
            conflicts,
            total_predicted_yield,
            efficiency_metrics,
            generated_at: Utc::now(),
        }
    }

    /// Add one placement and refresh what it touches
    ///
    /// The new plant's water stress is set from the unmet share of its
    /// zone's water budget, and its health is capped accordingly. Existing
    /// placements are returned unchanged. A new plant whose id is already
    /// placed gets a `#n` suffix.
    pub fn incremental_update(
        &self,
        current_placements: &[PlantPlacement],
        mut new_placement: PlantPlacement,
        zones: &[GardenZone],
        environment: &Environment,
    ) -> IncrementalUpdate {
        let id = unique_id(&new_placement.instance_id, |k| {
            current_placements.iter().any(|p| p.instance_id == k)
        });
        if id != new_placement.instance_id {
            tracing::debug!(
                "Instance id {} already placed, adding as {}",
                new_placement.instance_id,
                id
            );
            new_placement.instance_id = id;
        }

        let mut placements = Vec::with_capacity(current_placements.len() + 1);
        placements.extend_from_slice(current_placements);
        placements.push(new_placement);

        let irrigation = self.irrigation.plan(&placements, zones, &environment.weather);

        let new_idx = placements.len() - 1;
        let zone_id = zone_containing(&placements[new_idx].position, zones).map(|z| z.id.clone());
        if let Some(budget) = zone_id.as_deref().and_then(|id| irrigation.budget_for(id)) {
            let stress = budget.water_stress();
            let new = &mut placements[new_idx];
            let health = new.health_score.min(1.0 - 0.5 * stress);
            let nutrient = new.nutrient_stress;
            new.set_stress(stress, nutrient);
            new.set_health(health);
        }

        let new = &placements[new_idx];
        let new_plant_analysis = NewPlantAnalysis {
            instance_id: new.instance_id.clone(),
            zone_id,
            water_need: self.irrigation.placement_water(new, &environment.weather),
            solar_exposure: self.calculator.solar_exposure(new, zones, &environment.sun),
            growth_prediction: self.calculator.growth_prediction(new, environment),
        };

        let conflicts = self.detector.detect(&placements, zones);

        tracing::debug!(
            "Incremental update for {}: {} conflicts across {} placements",
            new_plant_analysis.instance_id,
            conflicts.total(),
            placements.len()
        );

        IncrementalUpdate {
            placements,
            new_plant_analysis,
            conflicts,
            irrigation,
        }
    }
}

/// Validate caller-supplied specs into shareable profiles
///
/// Fails on the first invalid spec.
pub fn prepare_profiles<I>(specs: I) -> Result<Vec<Arc<PlantProfile>>, EngineError>
where
    I: IntoIterator<Item = PlantProfileSpec>,
{
    specs
        .into_iter()
        .map(|spec| PlantProfile::new(spec).map(Arc::new).map_err(EngineError::from))
        .collect()
}

/// `id`, or the first free `id#2`, `id#3`, ...
fn unique_id(id: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(id) {
        return id.to_string();
    }
    (2usize..)
        .map(|n| format!("{}#{}", id, n))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| id.to_string())
}

/// Overall efficiency of an arrangement, 0–100
///
/// 25 points each for space utilisation, irrigation efficiency, mean solar
/// exposure and freedom from conflicts. `solar` holds one score per
/// placement. An empty arrangement scores 0.
pub fn efficiency_metrics(
    placements: &[PlantPlacement],
    zones: &[GardenZone],
    water: &WaterPlan,
    solar: &[f64],
    conflicts: &ConflictReport,
) -> EfficiencyMetrics {
    if placements.is_empty() {
        return EfficiencyMetrics::default();
    }

    let mut area = total_area(zones);
    if area <= 0.0 {
        area = 1.0;
    }
    let space_utilization = placements.len() as f64 / area;
    let water_efficiency = water.efficiency_score;
    let solar_efficiency = if solar.is_empty() {
        0.0
    } else {
        solar.iter().sum::<f64>() / solar.len() as f64
    };
    let conflict_penalty = conflicts.spacing_violations.len() as f64 * 0.1
        + conflicts.compatibility_violations.len() as f64 * 0.2
        + conflicts.zone_violations.len() as f64 * 0.3;

    let overall_score = space_utilization * 25.0
        + water_efficiency * 25.0
        + solar_efficiency * 25.0
        + (1.0 - conflict_penalty.min(1.0)) * 25.0;

    let avg_water_need = placements
        .iter()
        .map(|p| p.profile.water_need().score() as f64)
        .sum::<f64>()
        / placements.len() as f64;

    EfficiencyMetrics {
        overall_score: overall_score.clamp(0.0, 100.0),
        space_utilization,
        water_efficiency,
        solar_efficiency,
        conflict_penalty,
        details: EfficiencyDetails {
            total_plants: placements.len(),
            total_conflicts: conflicts.total(),
            avg_water_need,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::model::profile::fixtures::{profile, spec};
    use crate::model::zone::fixtures::zone;
    use crate::model::WaterNeed;
    use crate::utils::geometry::Point;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn engine() -> AgronomicEngine {
        let mut config = EngineConfig::default();
        config.optimizer.generations = 10;
        config.worker_threads = Some(2);
        AgronomicEngine::new(config).unwrap()
    }

    fn planted() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn at(id: &str, profile: &Arc<PlantProfile>, x: f64, y: f64) -> PlantPlacement {
        PlantPlacement::new(id, Arc::clone(profile), Point::new(x, y), planted())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.optimizer.crossover_rate = -0.1;
        assert!(matches!(
            AgronomicEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_prepare_profiles() {
        let profiles = prepare_profiles(vec![spec("Tomato"), spec("Basil")]).unwrap();
        assert_eq!(profiles.len(), 2);

        let mut bad = spec("Okra");
        bad.companions = vec!["Okra".into()];
        let err = prepare_profiles(vec![spec("Tomato"), bad]).unwrap_err();
        assert!(matches!(err, EngineError::Profile(ProfileError::SelfReference { .. })));
    }

    #[test]
    fn test_empty_analysis() {
        let report = engine().comprehensive_analysis(&[], &[], &Environment::default());
        assert_eq!(report.efficiency_metrics, EfficiencyMetrics::default());
        assert_eq!(report.total_predicted_yield, 0.0);
        assert!(report.conflicts.is_clear());
        assert!(report.solar_analysis.is_empty());
    }

    #[test]
    fn test_efficiency_metrics_components() {
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 4.0, Point::new(0.0, 0.0))];
        let placements = vec![at("lettuce-1", &lettuce, 0.0, 0.0), at("lettuce-2", &lettuce, 0.1, 0.0)];
        let env = Environment {
            as_of: Some(planted()),
            ..Environment::default()
        };
        let report = engine().comprehensive_analysis(&placements, &zones, &env);
        let m = &report.efficiency_metrics;

        assert_relative_eq!(m.space_utilization, 0.5, epsilon = 1e-12);
        assert_relative_eq!(m.solar_efficiency, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.conflict_penalty, 0.1, epsilon = 1e-12);
        // One tier → balance 1.0, no overlap
        assert_relative_eq!(m.water_efficiency, 1.0, epsilon = 1e-12);
        // 12.5 + 25 + 25 + 22.5
        assert_relative_eq!(m.overall_score, 85.0, epsilon = 1e-9);
        assert_eq!(m.details.total_plants, 2);
        assert_eq!(m.details.total_conflicts, 1);
        assert_relative_eq!(m.details.avg_water_need, 2.0);

        assert_relative_eq!(report.total_predicted_yield, 4.0, epsilon = 1e-12);
        assert_eq!(report.growth_predictions["lettuce-2"].days_to_harvest, 60);
    }

    #[test]
    fn test_overall_score_is_capped() {
        let lettuce = Arc::new(profile("Lettuce"));
        // Dense planting on a tiny zone drives utilisation far above 1
        let zones = vec![zone("a", 0.5, Point::new(0.0, 0.0))];
        let placements: Vec<_> = (0..8)
            .map(|i| at(&format!("lettuce-{}", i + 1), &lettuce, 0.0, 0.0))
            .collect();
        let report = engine().comprehensive_analysis(&placements, &zones, &Environment::default());
        assert!(report.efficiency_metrics.overall_score <= 100.0);
        assert!(report.efficiency_metrics.space_utilization > 1.0);
    }

    #[test]
    fn test_incremental_update_applies_zone_deficit() {
        let mut s = spec("Squash");
        s.water_need = WaterNeed::High;
        let squash = Arc::new(PlantProfile::new(s).unwrap());
        let mut bed = zone("a", 20.0, Point::new(0.0, 0.0));
        bed.water_availability = 0.468;
        let zones = vec![bed];

        let current = vec![at("squash-1", &squash, 0.0, 0.0)];
        let new = at("squash-2", &squash, 1.0, 0.0);
        let update = engine().incremental_update(&current, new, &zones, &Environment::default());

        // Two squash need 0.936 L/day against 0.468 supplied
        assert_eq!(update.placements.len(), 2);
        let added = &update.placements[1];
        assert_relative_eq!(added.water_stress, 0.5, epsilon = 1e-9);
        assert_relative_eq!(added.health_score, 0.75, epsilon = 1e-9);
        assert_eq!(update.placements[0], current[0]);

        let analysis = &update.new_plant_analysis;
        assert_eq!(analysis.zone_id.as_deref(), Some("a"));
        assert_relative_eq!(analysis.water_need, 0.468, epsilon = 1e-9);
        assert_relative_eq!(analysis.growth_prediction.stress.water, 0.5, epsilon = 1e-9);
        assert_eq!(update.irrigation.groups.len(), 1);
        assert!(update.conflicts.is_clear());
    }

    #[test]
    fn test_incremental_update_outside_zones() {
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 4.0, Point::new(0.0, 0.0))];
        let new = at("lettuce-1", &lettuce, 30.0, 0.0);
        let update = engine().incremental_update(&[], new, &zones, &Environment::default());

        assert!(update.new_plant_analysis.zone_id.is_none());
        assert_eq!(update.new_plant_analysis.solar_exposure, 0.5);
        assert_eq!(update.placements[0].water_stress, 0.0);
        assert_eq!(update.conflicts.zone_violations.len(), 1);
    }

    #[test]
    fn test_unique_id() {
        let taken = ["tomato-1", "tomato-1#2"];
        assert_eq!(unique_id("basil-1", |k| taken.iter().any(|t| *t == k)), "basil-1");
        assert_eq!(unique_id("tomato-1", |k| taken.iter().any(|t| *t == k)), "tomato-1#3");
    }

    #[test]
    fn test_analysis_keeps_plants_with_shared_ids() {
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 4.0, Point::new(0.0, 0.0)), zone("b", 4.0, Point::new(5.0, 0.0))];
        let placements = vec![at("lettuce-1", &lettuce, 0.0, 0.0), at("lettuce-1", &lettuce, 5.0, 0.0)];
        let env = Environment {
            as_of: Some(planted()),
            ..Environment::default()
        };
        let report = engine().comprehensive_analysis(&placements, &zones, &env);

        assert_relative_eq!(report.total_predicted_yield, 4.0, epsilon = 1e-12);
        assert_eq!(report.solar_analysis.len(), 2);
        assert!(report.growth_predictions.contains_key("lettuce-1#2"));
        assert_relative_eq!(report.efficiency_metrics.solar_efficiency, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_incremental_update_renames_taken_id() {
        let lettuce = Arc::new(profile("Lettuce"));
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];
        let current = vec![at("lettuce-1", &lettuce, -1.0, 0.0)];
        let new = at("lettuce-1", &lettuce, 1.0, 0.0);
        let update = engine().incremental_update(&current, new, &zones, &Environment::default());

        assert_eq!(update.placements[0].instance_id, "lettuce-1");
        assert_eq!(update.placements[1].instance_id, "lettuce-1#2");
        assert_eq!(update.new_plant_analysis.instance_id, "lettuce-1#2");
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let engine = engine();
        let zones = vec![zone("a", 10.0, Point::new(0.0, 0.0))];
        let profiles = vec![Arc::new(profile("Tomato")), Arc::new(profile("Basil"))];
        let requests: Vec<PlacementRequest> = (0..3)
            .map(|seed| PlacementRequest {
                profiles: profiles.clone(),
                zones: zones.clone(),
                constraints: PlacementConstraints {
                    seed: Some(seed),
                    planting_date: Some(planted()),
                    soil_quality: None,
                },
            })
            .collect();

        let batch = engine.optimize_batch(&requests);
        assert_eq!(batch.len(), 3);
        for (request, outcome) in requests.iter().zip(&batch) {
            let single = engine.optimize_placement(&request.profiles, &request.zones, &request.constraints);
            assert_eq!(&single, outcome);
        }
    }
}
