//! Environmental snapshot
//!
//! Every field has a neutral default, so a partial (or empty) JSON object is
//! a valid environment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ET0: f64 = 5.0;

/// Weather readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weather {
    /// Reference evapotranspiration (mm/day)
    pub et0: f64,
}

impl Default for Weather {
    fn default() -> Self {
        Self { et0: DEFAULT_ET0 }
    }
}

/// Solar readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunData {
    pub seasonal_factor: f64,
}

impl Default for SunData {
    fn default() -> Self {
        Self { seasonal_factor: 1.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub weather: Weather,
    pub sun: SunData,
    pub temperature_stress: f64,
    pub humidity_stress: f64,
    /// Instant the analysis refers to (defaults to now)
    pub as_of: Option<DateTime<Utc>>,
}

impl Environment {
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}
