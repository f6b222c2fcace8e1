//! Supernova eligibility by stellar mass.

use crate::table::{DataTable, TableError};

/// Column holding the table masses, in M☉.
pub const MASS_COLUMN: &str = "mass[Msun]";

/// Column holding the explosion flags (0 or 1).
pub const FLAG_COLUMN: &str = "SN";

/// Which stars end their lives as supernovae.
///
/// Queries resolve by nearest-neighbor match against the ascending mass
/// rows; masses beyond either end clamp to the edge row. When a query sits
/// exactly halfway between two rows, the higher-index row wins.
#[derive(Debug, Clone)]
pub struct SupernovaTable {
    masses: Vec<f64>,
    flags: Vec<bool>,
}

impl SupernovaTable {
    /// Builds the table from the `mass[Msun]` and `SN` columns.
    pub fn new(table: &DataTable) -> Result<Self, TableError> {
        let masses = table.numeric(MASS_COLUMN)?;
        let flags = table
            .numeric(FLAG_COLUMN)?
            .into_iter()
            .map(|flag| flag != 0.0)
            .collect();

        Self::from_parts(masses, flags)
    }

    /// Builds the table from prepared rows.
    pub fn from_parts(masses: Vec<f64>, flags: Vec<bool>) -> Result<Self, TableError> {
        if masses.is_empty() {
            return Err(TableError::EmptyColumn {
                name: MASS_COLUMN.to_owned(),
            });
        }

        Ok(Self { masses, flags })
    }

    /// Whether a star of the given mass explodes as a supernova.
    pub fn explodes(&self, mass: f64) -> bool {
        let n = self.masses.len();
        let idx = self.masses.partition_point(|&m| m < mass);

        if idx == 0 {
            return self.flags[0];
        }
        if idx == n {
            return self.flags[n - 1];
        }

        // Equal distances resolve to the higher-index row.
        if self.masses[idx] - mass <= mass - self.masses[idx - 1] {
            self.flags[idx]
        } else {
            self.flags[idx - 1]
        }
    }
}
