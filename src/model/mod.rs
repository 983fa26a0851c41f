//! Data model: profiles, zones, placements and environment snapshots

pub mod environment;
pub mod placement;
pub mod profile;
pub mod zone;

pub use environment::{Environment, SunData, Weather};
pub use placement::{GrowthStage, PlantPlacement};
pub use profile::{PlantCategory, PlantProfile, PlantProfileSpec, SunExposure, WaterNeed};
pub use zone::GardenZone;
