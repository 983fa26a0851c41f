//! Irrigation planning
//!
//! Architecture:
//! - Groups placements by water-need tier (one group per non-empty tier)
//! - Group footprint: centroid of members, radius = farthest member + buffer
//! - Daily demand per tier from the calculator's water model
//! - Efficiency score: tier balance minus an overlap penalty between groups
//! - Per-zone water budgets, flow/pressure estimate and drip layout

pub mod drip_layout;
pub mod emitters;
pub mod hydraulics;

pub use drip_layout::DripLayout;
pub use emitters::{EmitterKind, EmitterSpec};
pub use hydraulics::FlowEstimate;

use crate::calculator::AgronomicCalculator;
use crate::config::IrrigationConfig;
use crate::model::{GardenZone, PlantPlacement, WaterNeed, Weather};
use crate::utils::geometry::{centroid, circle_overlap, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Overlap penalty per metre of overlapping group radius
const OVERLAP_PENALTY_PER_M: f64 = 0.1;

/// Placements sharing a water-need tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationGroup {
    pub water_need: WaterNeed,
    pub center: Point,
    pub radius: f64,
    pub instance_ids: Vec<String>,
    /// Litres/day for the whole group
    pub daily_water_l: f64,
    pub emitter: EmitterKind,
    /// Daily run time for an average member
    pub runtime_minutes: f64,
}

/// Demand against supply for one garden zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBudget {
    pub zone_id: String,
    pub plant_count: usize,
    pub demand_l: f64,
    pub supply_l: f64,
    pub deficit: bool,
}

impl ZoneBudget {
    /// Unmet share of demand in [0, 1]
    pub fn water_stress(&self) -> f64 {
        if self.demand_l <= 0.0 {
            return 0.0;
        }
        ((self.demand_l - self.supply_l) / self.demand_l).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterPlan {
    pub groups: Vec<IrrigationGroup>,
    pub total_water_needs: BTreeMap<WaterNeed, f64>,
    pub efficiency_score: f64,
    pub zone_budgets: Vec<ZoneBudget>,
    pub flow: FlowEstimate,
    pub drip_layout: DripLayout,
}

impl WaterPlan {
    pub fn total_daily_water(&self) -> f64 {
        self.total_water_needs.values().sum()
    }

    pub fn budget_for(&self, zone_id: &str) -> Option<&ZoneBudget> {
        self.zone_budgets.iter().find(|b| b.zone_id == zone_id)
    }
}

pub struct IrrigationPlanner {
    calculator: Arc<AgronomicCalculator>,
    config: IrrigationConfig,
}

impl IrrigationPlanner {
    pub fn new(calculator: Arc<AgronomicCalculator>, config: IrrigationConfig) -> Self {
        Self { calculator, config }
    }

    /// Daily need (L) of one placement at the planning soil moisture
    pub fn placement_water(&self, placement: &PlantPlacement, weather: &Weather) -> f64 {
        self.calculator.water_needs(
            &placement.profile,
            weather,
            self.config.default_soil_moisture,
            placement.stage,
        )
    }

    pub fn plan(
        &self,
        placements: &[PlantPlacement],
        zones: &[GardenZone],
        weather: &Weather,
    ) -> WaterPlan {
        let water: Vec<f64> = placements
            .iter()
            .map(|p| self.placement_water(p, weather))
            .collect();

        let groups = self.group(placements, &water);
        let total_water_needs: BTreeMap<WaterNeed, f64> = groups
            .iter()
            .map(|g| (g.water_need, g.daily_water_l))
            .collect();
        let efficiency_score = efficiency_score(&groups);
        let zone_budgets = zone_budgets(placements, &water, zones);
        let flow = hydraulics::estimate_flow(groups.len(), self.config.source_pressure_bar);
        let drip_layout = drip_layout::layout(placements);

        tracing::debug!(
            "Irrigation plan: {} groups, {:.2} L/day, efficiency {:.3}",
            groups.len(),
            total_water_needs.values().sum::<f64>(),
            efficiency_score
        );

        WaterPlan {
            groups,
            total_water_needs,
            efficiency_score,
            zone_budgets,
            flow,
            drip_layout,
        }
    }

    fn group(&self, placements: &[PlantPlacement], water: &[f64]) -> Vec<IrrigationGroup> {
        let emitter = self.config.emitter.spec();

        WaterNeed::all()
            .iter()
            .filter_map(|&need| {
                let members: Vec<usize> = (0..placements.len())
                    .filter(|&i| placements[i].profile.water_need() == need)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let center = centroid(members.iter().map(|&i| &placements[i].position));
                let farthest = members
                    .iter()
                    .map(|&i| placements[i].position.distance_to(&center))
                    .fold(0.0, f64::max);
                let daily_water_l: f64 = members.iter().map(|&i| water[i]).sum();

                Some(IrrigationGroup {
                    water_need: need,
                    center,
                    radius: farthest + self.config.buffer_m,
                    instance_ids: members
                        .iter()
                        .map(|&i| placements[i].instance_id.clone())
                        .collect(),
                    daily_water_l,
                    emitter: emitter.kind,
                    runtime_minutes: emitter.runtime_minutes(daily_water_l / members.len() as f64),
                })
            })
            .collect()
    }
}

/// Tier balance minus overlap penalty, clamped to [0, 1]; 0 without groups
pub fn efficiency_score(groups: &[IrrigationGroup]) -> f64 {
    if groups.is_empty() {
        return 0.0;
    }

    let mut total_overlap = 0.0;
    for (i, a) in groups.iter().enumerate() {
        for b in &groups[i + 1..] {
            total_overlap += circle_overlap(a.center, a.radius, b.center, b.radius);
        }
    }

    let max_need = groups.iter().map(|g| g.daily_water_l).fold(f64::NEG_INFINITY, f64::max);
    let min_need = groups.iter().map(|g| g.daily_water_l).fold(f64::INFINITY, f64::min);
    let water_balance = 1.0 - (max_need - min_need) / 10.0;

    (water_balance - total_overlap * OVERLAP_PENALTY_PER_M).clamp(0.0, 1.0)
}

/// Each placement counts against the first zone containing it
fn zone_budgets(placements: &[PlantPlacement], water: &[f64], zones: &[GardenZone]) -> Vec<ZoneBudget> {
    let mut demand: Vec<(usize, f64)> = vec![(0, 0.0); zones.len()];
    for (placement, litres) in placements.iter().zip(water) {
        if let Some(idx) = zones.iter().position(|z| z.contains(&placement.position)) {
            demand[idx].0 += 1;
            demand[idx].1 += litres;
        }
    }

    zones
        .iter()
        .zip(demand)
        .map(|(zone, (plant_count, demand_l))| ZoneBudget {
            zone_id: zone.id.clone(),
            plant_count,
            demand_l,
            supply_l: zone.water_availability,
            deficit: demand_l > zone.water_availability,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::fixtures::spec;
    use crate::model::zone::fixtures::zone;
    use crate::model::PlantProfile;
    use approx::assert_relative_eq;
    use chrono::Utc;

    fn tiered(name: &str, need: WaterNeed) -> Arc<PlantProfile> {
        let mut s = spec(name);
        s.water_need = need;
        Arc::new(PlantProfile::new(s).unwrap())
    }

    fn at(id: &str, profile: &Arc<PlantProfile>, x: f64, y: f64) -> PlantPlacement {
        PlantPlacement::new(id, Arc::clone(profile), Point::new(x, y), Utc::now())
    }

    fn planner() -> IrrigationPlanner {
        IrrigationPlanner::new(Arc::new(AgronomicCalculator::new()), IrrigationConfig::default())
    }

    #[test]
    fn test_groups_by_tier() {
        let medium = tiered("Lettuce", WaterNeed::Medium);
        let high = tiered("Tomato", WaterNeed::High);
        let placements = vec![
            at("lettuce-1", &medium, 0.0, 0.0),
            at("tomato-1", &high, 10.0, 0.0),
            at("lettuce-2", &medium, 2.0, 0.0),
        ];
        let plan = planner().plan(&placements, &[], &Weather::default());

        assert_eq!(plan.groups.len(), 2);
        let lettuce = &plan.groups[0];
        assert_eq!(lettuce.water_need, WaterNeed::Medium);
        assert_eq!(lettuce.instance_ids, vec!["lettuce-1", "lettuce-2"]);
        assert_eq!(lettuce.center, Point::new(1.0, 0.0));
        assert_relative_eq!(lettuce.radius, 2.0, epsilon = 1e-12);

        // Seed Kc 0.3, moisture 0.5 → factor 1.5, footprint 0.16 m²
        assert_relative_eq!(plan.total_water_needs[&WaterNeed::Medium], 0.72, epsilon = 1e-9);
        assert_relative_eq!(plan.total_water_needs[&WaterNeed::High], 0.468, epsilon = 1e-9);
        assert!(!plan.total_water_needs.contains_key(&WaterNeed::Low));
        assert_relative_eq!(plan.total_daily_water(), 1.188, epsilon = 1e-9);
    }

    #[test]
    fn test_efficiency_separated_and_overlapping() {
        let low = tiered("Thyme", WaterNeed::Low);
        let high = tiered("Tomato", WaterNeed::High);

        let apart = vec![at("thyme-1", &low, 0.0, 0.0), at("tomato-1", &high, 10.0, 0.0)];
        let plan = planner().plan(&apart, &[], &Weather::default());
        // 1 − (0.468 − 0.252) / 10
        assert_relative_eq!(plan.efficiency_score, 0.9784, epsilon = 1e-9);

        let close = vec![at("thyme-1", &low, 0.0, 0.0), at("tomato-1", &high, 1.0, 0.0)];
        let plan = planner().plan(&close, &[], &Weather::default());
        // Two 1 m circles 1 m apart overlap by 1 m
        assert_relative_eq!(plan.efficiency_score, 0.8784, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_plan() {
        let plan = planner().plan(&[], &[], &Weather::default());
        assert!(plan.groups.is_empty());
        assert_eq!(plan.efficiency_score, 0.0);
        assert_eq!(plan.flow.required_flow_lph, 0.0);
        assert!(plan.drip_layout.laterals.is_empty());
    }

    #[test]
    fn test_zone_budgets() {
        let high = tiered("Tomato", WaterNeed::High);
        let mut dry = zone("dry", 10.0, Point::new(0.0, 0.0));
        dry.water_availability = 0.5;
        let wet = zone("wet", 10.0, Point::new(20.0, 0.0));
        let placements = vec![
            at("tomato-1", &high, 0.0, 0.0),
            at("tomato-2", &high, 0.5, 0.0),
            at("tomato-3", &high, 20.0, 0.0),
            at("tomato-4", &high, 50.0, 0.0),
        ];
        let plan = planner().plan(&placements, &[dry, wet], &Weather::default());

        let dry = plan.budget_for("dry").unwrap();
        assert_eq!(dry.plant_count, 2);
        assert_relative_eq!(dry.demand_l, 0.936, epsilon = 1e-9);
        assert!(dry.deficit);
        assert_relative_eq!(dry.water_stress(), (0.936 - 0.5) / 0.936, epsilon = 1e-9);

        let wet = plan.budget_for("wet").unwrap();
        assert_eq!(wet.plant_count, 1);
        assert!(!wet.deficit);
        assert_eq!(wet.water_stress(), 0.0);
    }

    #[test]
    fn test_runtime_uses_configured_emitter() {
        let medium = tiered("Lettuce", WaterNeed::Medium);
        let placements = vec![at("lettuce-1", &medium, 0.0, 0.0)];
        let config = IrrigationConfig {
            emitter: EmitterKind::MicroSprayer,
            ..IrrigationConfig::default()
        };
        let planner = IrrigationPlanner::new(Arc::new(AgronomicCalculator::new()), config);
        let plan = planner.plan(&placements, &[], &Weather::default());
        let group = &plan.groups[0];
        assert_eq!(group.emitter, EmitterKind::MicroSprayer);
        // 0.36 L at 60 L/h × 0.75
        assert_relative_eq!(group.runtime_minutes, 0.48, epsilon = 1e-9);
    }
}
