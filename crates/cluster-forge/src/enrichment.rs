//! Sequential supernova enrichment of a forming cluster.
//!
//! Stars come off the distribution in strictly decreasing mass order and
//! spend a shared iron budget: every eligible star explodes, its yield is
//! deducted, and the star at which the budget first runs dry marks the end
//! of star formation. Two termination readings of this loop coexist in the
//! model's lineage and both are supported, behind an explicit policy
//! choice.

use massfunction::{MassFunction, MassFunctionError, StarExtractor};
use serde::{Deserialize, Serialize};
use stellar_tables::{EvolutionTable, SupernovaTable, YieldTable};

/// Stars below this mass no longer explode; extraction stops here (M☉).
pub const SN_MASS_CUTOFF: f64 = 8.0;

/// How the enrichment loop decides it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationPolicy {
    /// Stop extracting as soon as the budget is exhausted. Reaching a star
    /// below the low-mass cutoff first flags the whole cluster
    /// non-convergent.
    StopAtExhaustion,

    /// Always extract down to the low-mass cutoff, recording the first
    /// budget crossing and, separately, the total number of potential
    /// supernovae above the cutoff.
    ContinueToCutoff,
}

/// Outcome of the enrichment loop for one cluster.
///
/// The crossing fields are `None` when the budget never ran dry before
/// the low-mass cutoff (`converged` is then false).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Supernovae exploded up to the budget crossing.
    pub supernova_count: Option<u64>,

    /// Mass of the star whose explosion exhausted the budget (M☉).
    pub last_star_mass: Option<f64>,

    /// Lifetime of that star — the star-formation duration (Myr).
    pub formation_time_myr: Option<f64>,

    /// Total potential supernovae down to the cutoff
    /// ([`TerminationPolicy::ContinueToCutoff`] only).
    pub potential_supernovae: Option<u64>,

    /// Whether the budget was exhausted before the cutoff was reached.
    pub converged: bool,
}

/// Replays the supernova enrichment of one cluster.
///
/// # Arguments
/// * `mf` - The cluster's initial mass function
/// * `produced_iron` - Iron budget to spend (M☉)
/// * `evolution` - Lifetime table for the star-formation duration
/// * `supernovae` - Eligibility lookup by stellar mass
/// * `yields` - Iron yield lookup by stellar mass
/// * `policy` - Which termination reading to apply
pub fn simulate_enrichment(
    mf: &MassFunction,
    produced_iron: f64,
    evolution: &EvolutionTable,
    supernovae: &SupernovaTable,
    yields: &YieldTable,
    policy: TerminationPolicy,
) -> Result<EnrichmentResult, MassFunctionError> {
    match policy {
        TerminationPolicy::StopAtExhaustion => {
            stop_at_exhaustion(mf, produced_iron, evolution, supernovae, yields)
        }
        TerminationPolicy::ContinueToCutoff => {
            continue_to_cutoff(mf, produced_iron, evolution, supernovae, yields)
        }
    }
}

fn stop_at_exhaustion(
    mf: &MassFunction,
    produced_iron: f64,
    evolution: &EvolutionTable,
    supernovae: &SupernovaTable,
    yields: &YieldTable,
) -> Result<EnrichmentResult, MassFunctionError> {
    let mut extractor = StarExtractor::new(mf);
    let mut budget = produced_iron;
    let mut count = 0u64;
    let mut last_mass = mf.max_mass();

    while budget > 0.0 {
        let mass = extractor.next_most_massive()?;

        if mass < SN_MASS_CUTOFF {
            // The budget outlasted every SN progenitor: no consistent
            // star-formation duration exists for this cluster.
            return Ok(EnrichmentResult {
                supernova_count: None,
                last_star_mass: None,
                formation_time_myr: None,
                potential_supernovae: None,
                converged: false,
            });
        }

        if supernovae.explodes(mass) {
            budget -= yields.iron_yield(mass);
            count += 1;
            last_mass = mass;
        }
    }

    Ok(EnrichmentResult {
        supernova_count: Some(count),
        last_star_mass: Some(last_mass),
        formation_time_myr: Some(evolution.time_from_mass(last_mass)),
        potential_supernovae: None,
        converged: true,
    })
}

fn continue_to_cutoff(
    mf: &MassFunction,
    produced_iron: f64,
    evolution: &EvolutionTable,
    supernovae: &SupernovaTable,
    yields: &YieldTable,
) -> Result<EnrichmentResult, MassFunctionError> {
    let mut extractor = StarExtractor::new(mf);
    let mut budget = produced_iron;
    let mut total = 0u64;
    let mut crossing = (budget <= 0.0).then(|| (0u64, mf.max_mass()));

    loop {
        let mass = extractor.next_most_massive()?;

        if mass < SN_MASS_CUTOFF {
            break;
        }

        if supernovae.explodes(mass) {
            budget -= yields.iron_yield(mass);
            total += 1;

            if budget <= 0.0 && crossing.is_none() {
                crossing = Some((total, mass));
            }
        }
    }

    Ok(match crossing {
        Some((count, mass)) => EnrichmentResult {
            supernova_count: Some(count),
            last_star_mass: Some(mass),
            formation_time_myr: Some(evolution.time_from_mass(mass)),
            potential_supernovae: Some(total),
            converged: true,
        },
        None => EnrichmentResult {
            supernova_count: None,
            last_star_mass: None,
            formation_time_myr: None,
            potential_supernovae: Some(total),
            converged: false,
        },
    })
}
