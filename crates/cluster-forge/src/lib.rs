//! Star-cluster formation-history reconstruction.
//!
//! Given a cluster's present-day mass, age, orbit and metallicity, this
//! crate infers its initial stellar mass function and replays the
//! sequential iron enrichment produced by its supernovae, yielding the
//! number of supernovae and the duration of star formation. All of it is
//! deterministic: stars are extracted from the inferred distribution by
//! optimal sampling, never drawn at random.

pub mod enrichment;
pub mod processor;
pub mod record;
pub mod scaling;
pub mod synthesis;

#[cfg(test)]
mod scaling_test;

// Re-export types
pub use enrichment::{simulate_enrichment, EnrichmentResult, TerminationPolicy, SN_MASS_CUTOFF};
pub use processor::Processor;
pub use record::{load_catalog, write_catalog, ClusterRecord};
pub use synthesis::ImfGenerator;
