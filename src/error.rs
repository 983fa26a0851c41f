//! Error types
//!
//! Caller-facing validation errors. Everything downstream of construction
//! degrades to neutral defaults instead of failing.

use thiserror::Error;

/// Rejected plant profile (raised by `PlantProfile::new`)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("plant profile name must not be empty")]
    EmptyName,

    #[error("{name}: {field} must be a finite, non-negative number (got {value})")]
    InvalidMeasure {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("{name}: spacing_min ({min} cm) exceeds spacing_optimal ({optimal} cm)")]
    SpacingOrder { name: String, min: f64, optimal: f64 },

    #[error("{name}: days_to_maturity must be at least 1")]
    ZeroMaturity { name: String },

    #[error("{name}: lists itself as a {relation} plant")]
    SelfReference {
        name: String,
        relation: &'static str,
    },

    #[error("{name}: '{other}' is listed as both companion and incompatible")]
    ContradictoryRelation { name: String, other: String },
}

/// Engine construction / configuration failures
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
