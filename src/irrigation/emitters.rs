//! Emitter catalogue
//!
//! Efficiency is the share of delivered water that reaches the root zone.
//! Soaker hose figures are per metre of hose; one metre is laid per plant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    DripEmitter,
    MicroSprayer,
    SoakerHose,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitterSpec {
    pub kind: EmitterKind,
    pub water_efficiency: f64,
    /// Flow per emitter (or per metre of hose), L/h
    pub flow_lph: f64,
    /// Wetted area per emitter (or per metre of hose), m²
    pub coverage_m2: f64,
}

impl EmitterKind {
    pub fn spec(&self) -> EmitterSpec {
        let (water_efficiency, flow_lph, coverage_m2) = match self {
            EmitterKind::DripEmitter => (0.9, 4.0, 0.01),
            EmitterKind::MicroSprayer => (0.75, 60.0, 0.5),
            EmitterKind::SoakerHose => (0.95, 20.0, 0.2),
        };
        EmitterSpec {
            kind: *self,
            water_efficiency,
            flow_lph,
            coverage_m2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EmitterKind::DripEmitter => "Drip Emitter",
            EmitterKind::MicroSprayer => "Micro-Sprayer",
            EmitterKind::SoakerHose => "Soaker Hose",
        }
    }

    pub fn all() -> &'static [EmitterKind] {
        &[
            EmitterKind::DripEmitter,
            EmitterKind::MicroSprayer,
            EmitterKind::SoakerHose,
        ]
    }
}

impl EmitterSpec {
    /// Minutes of run time to put `litres` into the root zone of one plant
    pub fn runtime_minutes(&self, litres: f64) -> f64 {
        let effective_lph = self.flow_lph * self.water_efficiency;
        if effective_lph <= 0.0 || !litres.is_finite() || litres <= 0.0 {
            return 0.0;
        }
        litres / effective_lph * 60.0
    }
}
