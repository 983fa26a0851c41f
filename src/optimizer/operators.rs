//! Genetic operators: random placement, tournament selection, single-point
//! crossover and whole-individual jitter mutation.
//!
//! All randomness is drawn from the caller's generator.

use crate::model::{GardenZone, PlantPlacement, PlantProfile};
use chrono::{DateTime, Utc};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::f64::consts::TAU;
use std::sync::Arc;

/// One placement per profile, each in a random zone
///
/// Returns None when there is no zone to place into.
pub fn random_individual<R: Rng>(
    profiles: &[Arc<PlantProfile>],
    zones: &[GardenZone],
    planted_on: DateTime<Utc>,
    rng: &mut R,
) -> Option<Vec<PlantPlacement>> {
    profiles
        .iter()
        .enumerate()
        .map(|(slot, profile)| {
            let zone = zones.choose(rng)?;
            // Uniform angle and uniform radius (denser toward the centre)
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(0.0..=zone.radius());
            let position = zone.center.offset_polar(angle, distance);
            Some(PlantPlacement::new(
                instance_id(profile, slot),
                Arc::clone(profile),
                position,
                planted_on,
            ))
        })
        .collect()
}

/// Stable id for the plant in `slot`, e.g. "sweet-basil-3"
pub fn instance_id(profile: &PlantProfile, slot: usize) -> String {
    let slug: String = profile
        .name()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", slug, slot + 1)
}

/// Sample `size` distinct individuals, return the index of the fittest
///
/// Ties keep the first sampled.
pub fn tournament_select<R: Rng>(fitness: &[f64], size: usize, rng: &mut R) -> usize {
    if fitness.is_empty() {
        return 0;
    }
    let amount = size.clamp(1, fitness.len());
    let mut contenders = index::sample(rng, fitness.len(), amount).into_iter();
    let mut best = contenders.next().unwrap_or(0);
    for idx in contenders {
        if fitness[idx] > fitness[best] {
            best = idx;
        }
    }
    best
}

/// Single-point crossover producing complementary children
///
/// Parents of unequal length, or shorter than two, are cloned unchanged.
pub fn crossover<R: Rng>(
    parent1: &[PlantPlacement],
    parent2: &[PlantPlacement],
    rng: &mut R,
) -> (Vec<PlantPlacement>, Vec<PlantPlacement>) {
    if parent1.len() != parent2.len() || parent1.len() < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut = rng.gen_range(1..parent1.len());

    let mut child1 = Vec::with_capacity(parent1.len());
    child1.extend_from_slice(&parent1[..cut]);
    child1.extend_from_slice(&parent2[cut..]);

    let mut child2 = Vec::with_capacity(parent2.len());
    child2.extend_from_slice(&parent2[..cut]);
    child2.extend_from_slice(&parent1[cut..]);

    (child1, child2)
}

/// Shift every placement by an independent uniform offset in [−jitter, jitter]
pub fn mutate<R: Rng>(individual: &mut [PlantPlacement], jitter: f64, rng: &mut R) {
    if jitter <= 0.0 {
        return;
    }
    for placement in individual.iter_mut() {
        placement.position.x += rng.gen_range(-jitter..=jitter);
        placement.position.y += rng.gen_range(-jitter..=jitter);
    }
}
