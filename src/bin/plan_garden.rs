//! Plan a garden from a JSON scenario
//!
//! Usage: plan_garden [scenario.json] [engine_config.json]
//!
//! Optimizes the placement of every profile in the scenario, analyses the
//! result and prints the report as pretty JSON. Log level via RUST_LOG.

use agronomic_engine_rust::{
    AgronomicEngine, AnalysisReport, EngineConfig, Environment, GardenZone, PlacementConstraints,
    PlantPlacement, PlantProfile,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Deserialize)]
struct Scenario {
    profiles: Vec<PlantProfile>,
    zones: Vec<GardenZone>,
    #[serde(default)]
    environment: Environment,
    #[serde(default)]
    constraints: PlacementConstraints,
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    best_fitness: f64,
    generations_run: usize,
    placements: Vec<PlantPlacement>,
    analysis: AnalysisReport,
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario JSON: {:?}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agronomic_engine_rust=info,plan_garden=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample_scenario.json"));
    let config = match args.next() {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let scenario = load_scenario(&scenario_path)?;
    tracing::info!(
        "Loaded {} profiles and {} zones from {:?}",
        scenario.profiles.len(),
        scenario.zones.len(),
        scenario_path
    );

    let engine = AgronomicEngine::new(config).context("Failed to build engine")?;
    let profiles: Vec<Arc<PlantProfile>> = scenario.profiles.into_iter().map(Arc::new).collect();

    let outcome = engine.optimize_placement(&profiles, &scenario.zones, &scenario.constraints);
    let analysis =
        engine.comprehensive_analysis(&outcome.placements, &scenario.zones, &scenario.environment);

    tracing::info!(
        "Overall efficiency {:.1}/100, {} conflicts, {:.2} kg predicted",
        analysis.efficiency_metrics.overall_score,
        analysis.conflicts.total(),
        analysis.total_predicted_yield
    );

    for group in &analysis.water_analysis.groups {
        tracing::info!(
            "{:?} water: {} plants, {:.2} L/day, {} {:.0} min/day each",
            group.water_need,
            group.instance_ids.len(),
            group.daily_water_l,
            group.emitter.display_name(),
            group.runtime_minutes
        );
    }

    let output = PlanOutput {
        best_fitness: outcome.best_fitness,
        generations_run: outcome.generations_run,
        placements: outcome.placements,
        analysis,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize plan")?
    );
    Ok(())
}
