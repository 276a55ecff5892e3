use crate::creature::Creature;
use crate::fitness::FitnessLevel;
use bevy::log::warn;
use rand::Rng;

/// Selection weight for each fitness level
pub fn selection_weight(level: FitnessLevel) -> u32 {
    match level {
        FitnessLevel::Best => 4,
        FitnessLevel::Good => 3,
        FitnessLevel::NotBad => 2,
        FitnessLevel::Poor => 1,
    }
}

/// Outcome of one parent draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Position in the candidate list
    pub index: usize,
    /// Set when the weights were degenerate and the first candidate was returned
    pub fallback: bool,
}

/// Roulette-wheel draw over integer weights.
///
/// Draws `r` uniformly in `[0, W)` and returns the first index whose cumulative
/// weight exceeds `r`. A zero total returns index 0 with `fallback` set.
/// Returns `None` only for an empty slice.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<Selection> {
    if weights.is_empty() {
        return None;
    }

    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        warn!(
            candidates = weights.len(),
            "Total selection weight is zero; falling back to the first candidate"
        );
        return Some(Selection {
            index: 0,
            fallback: true,
        });
    }

    let pick = rng.gen_range(0..total);
    let mut cumulative = 0u64;
    for (index, &weight) in weights.iter().enumerate() {
        cumulative += u64::from(weight);
        if pick < cumulative {
            return Some(Selection {
                index,
                fallback: false,
            });
        }
    }

    // Unreachable while pick < total
    Some(Selection {
        index: weights.len() - 1,
        fallback: true,
    })
}

/// Pick one parent, weighted by fitness. Two calls are independent and may
/// return the same creature.
pub fn select_parent<H, R: Rng + ?Sized>(
    candidates: &[&Creature<H>],
    rng: &mut R,
) -> Option<Selection> {
    let weights: Vec<u32> = candidates
        .iter()
        .map(|creature| selection_weight(creature.fitness()))
        .collect();
    weighted_index(&weights, rng)
}
