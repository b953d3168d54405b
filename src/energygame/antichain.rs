//! Maintenance of minimal energy sets (antichains) under the dominance order.

use crate::energy::{Energy, EnergyArray, EnergyConf};

/// Reduce a collection of energies to its minimal elements.
///
/// A candidate is dropped if an already kept energy dominates it (is less or equal),
/// otherwise it replaces all kept energies that it dominates itself.
/// Duplicates are kept only once. The resulting set does not depend on the order of
/// `candidates`, only the order of rows in the returned array does.
///
/// # Panics
///
/// Panics if any candidate does not have the configuration `conf`.
pub fn minimize<I>(candidates: I, conf: EnergyConf) -> EnergyArray
where
    I: IntoIterator<Item=Energy>,
{
    let mut minima: Vec<Energy> = Vec::new();
    for candidate in candidates {
        if minima.iter().any(|kept| kept.dominates(&candidate)) {
            continue;
        }
        minima.retain(|kept| !candidate.dominates(kept));
        minima.push(candidate);
    }
    EnergyArray::from_energies(&minima, conf)
}

/// Minimal suprema of every pair of energies taken from `left` and `right`.
///
/// An energy that suffices against both sets of options must lie above one energy of each.
/// If either side is empty, so is the result.
pub fn combine(left: &EnergyArray, right: &EnergyArray) -> EnergyArray {
    let candidates = left.iter()
        .flat_map(|l| right.iter().map(move |r| l.sup(&r)));
    minimize(candidates, left.get_conf())
}

/// Whether no energy of `energies` dominates another one.
pub fn is_antichain(energies: &EnergyArray) -> bool {
    let all: Vec<Energy> = energies.iter().collect();
    all.iter().enumerate().all(|(i, a)| {
        all.iter().enumerate().all(|(j, b)| i == j || !a.dominates(b))
    })
}
