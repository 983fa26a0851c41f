//! Agronomic Placement & Simulation Engine
//!
//! Plans vegetable-garden layouts and predicts their agronomic outcome.
//!
//! Modules:
//! - `model/`: Plant profiles, garden zones, placements, environment snapshots
//! - `calculator/`: Spacing, water demand, solar exposure, growth prediction
//! - `constraints`: Shared spacing/compatibility/containment scan
//! - `optimizer/`: Genetic-algorithm placement search
//! - `irrigation/`: Water-need grouping, zone budgets, flow and drip layout
//! - `conflicts`: Conflict detection over an arrangement
//! - `engine`: Façade combining all of the above
//!
//! All computation is synchronous and CPU-bound; fitness evaluation and
//! batch runs use rayon.

pub mod calculator;
pub mod config;
pub mod conflicts;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod irrigation;
pub mod model;
pub mod optimizer;
pub mod utils;

// Re-export commonly used types
pub use calculator::{AgronomicCalculator, GrowthPrediction, StressFactors};
pub use config::{ConstraintConfig, EngineConfig, IrrigationConfig, OptimizerConfig};
pub use conflicts::{ConflictDetector, ConflictReport, Severity};
pub use engine::{
    prepare_profiles, AgronomicEngine, AnalysisReport, EfficiencyMetrics, IncrementalUpdate,
    PlacementRequest,
};
pub use error::{EngineError, ProfileError};
pub use irrigation::{IrrigationPlanner, WaterPlan};
pub use model::{
    Environment, GardenZone, GrowthStage, PlantCategory, PlantPlacement, PlantProfile,
    PlantProfileSpec, SunData, SunExposure, Weather, WaterNeed,
};
pub use optimizer::{OptimizationOutcome, PlacementConstraints, PlacementOptimizer};
pub use utils::Point;
