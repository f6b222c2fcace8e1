//! Iron yields of exploding stars.

use crate::lookup::{interp_lookup, AxisOrder};
use crate::table::{DataTable, TableError};

/// Column holding the table masses, in M☉.
pub const MASS_COLUMN: &str = "mass[Msun]";

/// Column holding the iron yields, in M☉.
pub const IRON_COLUMN: &str = "Fe[Msun]";

/// Iron mass ejected by a star, as a function of its initial mass.
///
/// Piecewise-linear over the ascending mass rows, linearly extrapolated
/// beyond either end from the two nearest rows, clamped to be
/// non-negative. A single-row table yields a constant.
#[derive(Debug, Clone)]
pub struct YieldTable {
    masses: Vec<f64>,
    iron: Vec<f64>,
}

impl YieldTable {
    /// Builds the table from the `mass[Msun]` and `Fe[Msun]` columns.
    pub fn new(table: &DataTable) -> Result<Self, TableError> {
        Self::from_parts(table.numeric(MASS_COLUMN)?, table.numeric(IRON_COLUMN)?)
    }

    /// Builds the table from prepared rows.
    pub fn from_parts(masses: Vec<f64>, iron: Vec<f64>) -> Result<Self, TableError> {
        if masses.is_empty() {
            return Err(TableError::EmptyColumn {
                name: MASS_COLUMN.to_owned(),
            });
        }

        Ok(Self { masses, iron })
    }

    /// Iron yield of a star of the given mass, in M☉ (never negative).
    pub fn iron_yield(&self, mass: f64) -> f64 {
        interp_lookup(&self.masses, &self.iron, mass, AxisOrder::Ascending).max(0.0)
    }
}
