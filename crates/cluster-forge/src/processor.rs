//! The batch reconstruction pipeline.
//!
//! Three stages run in order over a catalog of cluster records: infer each
//! cluster's IMF and initial mass, derive its produced-iron budget, then
//! replay the supernova enrichment. Clusters are independent — the solver
//! stages fan out across them with rayon — and one cluster failing its
//! table construction or solve never stops the rest of the batch.

use rayon::prelude::*;
use stellar_tables::{DataTable, EvolutionTable, SupernovaTable, YieldTable};

use crate::enrichment::{simulate_enrichment, TerminationPolicy};
use crate::record::ClusterRecord;
use crate::synthesis::ImfGenerator;

/// Shift from the observed \[Fe/H\] to the total metallicity \[Z/H\],
/// accounting for α-element enhancement (dex).
pub const ALPHA_ENHANCEMENT: f64 = 0.3;

/// Iron mass fraction of the Sun (Asplund et al. 2009).
pub const IRON_MASS_FRACTION_SUN: f64 = 1.3e-3;

/// Runs the reconstruction over a catalog of clusters.
pub struct Processor<'a> {
    remnant_table: &'a DataTable,
    supernovae: &'a SupernovaTable,
    yields: &'a YieldTable,
    policy: TerminationPolicy,
}

impl<'a> Processor<'a> {
    /// # Arguments
    /// * `remnant_table` - Raw stellar-evolution table (per-metallicity
    ///   lifetime and remnant-mass columns)
    /// * `supernovae` - SN-eligibility lookup
    /// * `yields` - Iron-yield lookup
    /// * `policy` - Enrichment termination policy
    pub fn new(
        remnant_table: &'a DataTable,
        supernovae: &'a SupernovaTable,
        yields: &'a YieldTable,
        policy: TerminationPolicy,
    ) -> Self {
        Self {
            remnant_table,
            supernovae,
            yields,
            policy,
        }
    }

    /// Runs all three stages in order.
    pub fn process(&self, records: &mut [ClusterRecord]) {
        self.compute_imfs(records);
        Self::compute_iron(records);
        self.compute_supernovae(records);
    }

    /// Stage 1: infer each cluster's IMF and initial mass from its
    /// present-day mass, age and orbit.
    pub fn compute_imfs(&self, records: &mut [ClusterRecord]) {
        records.par_iter_mut().for_each(|record| {
            let Some(evolution) = self.evolution_for(record) else {
                return;
            };

            let generator = ImfGenerator::new(&evolution);
            let imf = generator.imf_from_present(
                record.mass,
                record.age_gyr,
                record.r_apo,
                record.r_peri,
            );

            tracing::debug!(
                cluster = %record.name,
                m_ini = imf.m_tot(),
                m_max = imf.max_mass(),
                "inferred initial mass function"
            );

            record.initial_mass = Some(imf.m_tot());
            record.imf = Some(imf);
        });
    }

    /// Stage 2: the iron budget each cluster produced during formation.
    ///
    /// The budget follows from the iron spread observed today: the gas not
    /// turned into stars carried the rest of the iron away.
    pub fn compute_iron(records: &mut [ClusterRecord]) {
        for record in records {
            let Some(m_ini) = record.initial_mass else {
                continue;
            };

            let enriched = 10.0_f64.powf(record.fe_h + record.fe_spread)
                - 10.0_f64.powf(record.fe_h - record.fe_spread);

            record.produced_iron =
                Some(IRON_MASS_FRACTION_SUN * enriched * m_ini * (1.0 / record.sfe - 1.0));
        }
    }

    /// Stage 3: replay the enrichment loop for each cluster.
    pub fn compute_supernovae(&self, records: &mut [ClusterRecord]) {
        records.par_iter_mut().for_each(|record| {
            let (Some(imf), Some(produced_iron)) = (record.imf.clone(), record.produced_iron)
            else {
                return;
            };
            let Some(evolution) = self.evolution_for(record) else {
                return;
            };

            match simulate_enrichment(
                &imf,
                produced_iron,
                &evolution,
                self.supernovae,
                self.yields,
                self.policy,
            ) {
                Ok(result) => {
                    if !result.converged {
                        tracing::warn!(
                            cluster = %record.name,
                            "iron budget outlasted the supernova progenitors"
                        );
                    }

                    record.supernova_count = result.supernova_count;
                    record.potential_supernovae = result.potential_supernovae;
                    record.last_star_mass = result.last_star_mass;
                    record.formation_time_myr = result.formation_time_myr;
                }
                Err(err) => {
                    tracing::warn!(
                        cluster = %record.name,
                        %err,
                        "skipping cluster: enrichment loop failed"
                    );
                }
            }
        });
    }

    /// The evolution table at this record's metallicity, or `None` (with a
    /// warning) when construction fails; other records keep processing.
    fn evolution_for(&self, record: &ClusterRecord) -> Option<EvolutionTable> {
        let zh = record.fe_h + ALPHA_ENHANCEMENT;

        match EvolutionTable::new(self.remnant_table, zh) {
            Ok(evolution) => Some(evolution),
            Err(err) => {
                tracing::warn!(
                    cluster = %record.name,
                    zh,
                    %err,
                    "skipping cluster: evolution table construction failed"
                );
                None
            }
        }
    }
}
