//! Tabular stellar data.
//!
//! Everything the reconstruction pipeline looks up rather than computes
//! lives here: the whitespace-table reader, one shared
//! bisection-with-interpolation primitive, the metallicity-interpolated
//! stellar-evolution table (lifetimes and remnant masses), the
//! supernova-eligibility table and the iron-yield table.

pub mod evolution;
pub mod lookup;
pub mod supernova;
pub mod table;
pub mod yields;

#[cfg(test)]
mod table_test;
#[cfg(test)]
mod yields_test;

// Re-export types
pub use evolution::EvolutionTable;
pub use lookup::AxisOrder;
pub use supernova::SupernovaTable;
pub use table::{DataTable, TableError};
pub use yields::YieldTable;
