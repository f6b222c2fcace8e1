//! Metallicity-interpolated stellar lifetimes and remnant masses.
//!
//! Evolution tables carry one row per reference initial mass and one
//! column pair per tabulated metallicity (`t_<ZH>` holding log₁₀ lifetimes
//! in years, `Mfin_<ZH>` holding remnant masses in M☉). Construction
//! collapses the metallicity axis onto a single target value; all later
//! queries interpolate along the mass axis only.

use massfunction::MassFunction;

use crate::lookup::{interp_lookup, lin_inter_extrapolate, AxisOrder};
use crate::table::{DataTable, TableError};

/// Column holding the reference initial masses, in M☉.
pub const MASS_COLUMN: &str = "mass[Msun]";

/// Prefix of the metallicity-tagged lifetime columns (log₁₀ years).
pub const LIFETIME_PREFIX: &str = "t_";

/// Prefix of the metallicity-tagged remnant-mass columns (M☉).
pub const REMNANT_PREFIX: &str = "Mfin_";

/// Stellar lifetime and remnant mass as functions of initial mass, for one
/// fixed metallicity.
///
/// Lookups run in log space over the ascending reference-mass axis and
/// deliberately extrapolate beyond either end of the table — in contrast
/// to direct distribution queries, which refuse out-of-bounds masses.
#[derive(Debug, Clone)]
pub struct EvolutionTable {
    zh: f64,
    /// log₁₀ reference masses, strictly ascending.
    log_masses: Vec<f64>,
    /// log₁₀ lifetime in years, aligned to `log_masses` (descending).
    log_lifetimes: Vec<f64>,
    /// log₁₀ remnant mass in M☉, aligned to `log_masses`.
    log_remnants: Vec<f64>,
}

impl EvolutionTable {
    /// Collapses a raw evolution table onto the target metallicity `zh`.
    ///
    /// For each tracked quantity the metallicity-tagged columns are
    /// scanned: an exact tag match is used directly, a bracketed target is
    /// interpolated row-wise between the nearest tags on either side, a
    /// target outside the tagged range extrapolates from the two nearest
    /// tags on the populated side, and a single available column is used
    /// as-is. Remnant-mass columns are converted to log₁₀ before the
    /// metallicity interpolation.
    ///
    /// # Errors
    /// `MissingColumn`/`EmptyColumn`/`UnsortedMasses` for a bad mass
    /// column, `NoTaggedColumns` when a quantity has no usable column.
    pub fn new(table: &DataTable, zh: f64) -> Result<Self, TableError> {
        let masses = table.numeric(MASS_COLUMN)?;

        if masses.is_empty() {
            return Err(TableError::EmptyColumn {
                name: MASS_COLUMN.to_owned(),
            });
        }
        if masses.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TableError::UnsortedMasses);
        }

        let log_masses = masses.iter().map(|m| m.log10()).collect();
        let log_lifetimes = collapse_tagged(table, LIFETIME_PREFIX, zh, false)?;
        let log_remnants = collapse_tagged(table, REMNANT_PREFIX, zh, true)?;

        Ok(Self {
            zh,
            log_masses,
            log_lifetimes,
            log_remnants,
        })
    }

    /// The metallicity this table was collapsed onto (dex).
    pub fn zh(&self) -> f64 {
        self.zh
    }

    /// Life expectancy of a star of the given initial mass, in Myr.
    pub fn time_from_mass(&self, mass: f64) -> f64 {
        let log_time_yr = interp_lookup(
            &self.log_masses,
            &self.log_lifetimes,
            mass.log10(),
            AxisOrder::Ascending,
        );

        10.0_f64.powf(log_time_yr - 6.0)
    }

    /// Initial mass of the star whose life expectancy is `t_myr`, in M☉.
    ///
    /// The lifetime axis falls with mass, so this is the descending-axis
    /// use of the shared lookup primitive.
    pub fn mass_from_time(&self, t_myr: f64) -> f64 {
        let log_mass = interp_lookup(
            &self.log_lifetimes,
            &self.log_masses,
            t_myr.log10() + 6.0,
            AxisOrder::Descending,
        );

        10.0_f64.powf(log_mass)
    }

    /// Remnant mass left by a star of the given initial mass, in M☉.
    pub fn remnant_mass_from_mass(&self, mass: f64) -> f64 {
        let log_remnant = interp_lookup(
            &self.log_masses,
            &self.log_remnants,
            mass.log10(),
            AxisOrder::Ascending,
        );

        10.0_f64.powf(log_remnant)
    }

    /// Mass of a cluster's stellar content surviving after `elapsed_myr`.
    ///
    /// Stars below the death mass (the mass whose lifetime equals the
    /// elapsed time) still live and retain their full mass. Stars above it
    /// contribute their remnants: the dead mass range is partitioned at
    /// the midpoints of consecutive reference masses, the remnant mass is
    /// evaluated at each sub-interval's midpoint and weighted by the
    /// distribution's mass fraction over that sub-interval. A death mass
    /// above the distribution's top bound means nothing has died yet; one
    /// outside the tabulated reference range collapses the partition to
    /// the single remaining interval.
    pub fn surviving_mass(&self, mf: &MassFunction, elapsed_myr: f64) -> f64 {
        let top = mf.max_mass();
        let m_death = self.mass_from_time(elapsed_myr);

        if m_death >= top {
            return mf.mass_between(mf.min_mass(), top);
        }

        let living = mf.mass_between(mf.min_mass(), m_death);

        let mut cuts = vec![m_death];
        for window in self.log_masses.windows(2) {
            let mid = (10.0_f64.powf(window[0]) + 10.0_f64.powf(window[1])) / 2.0;

            if mid > m_death && mid < top {
                cuts.push(mid);
            }
        }
        cuts.push(top);

        let remnants: f64 = cuts
            .windows(2)
            .map(|w| {
                let mid = (w[0] + w[1]) / 2.0;
                self.remnant_mass_from_mass(mid) * mf.mass_portion(w[0], w[1])
            })
            .sum();

        living + remnants
    }
}

/// Collapses the `prefix`-tagged columns of `table` onto metallicity `zh`.
fn collapse_tagged(
    table: &DataTable,
    prefix: &str,
    zh: f64,
    log_convert: bool,
) -> Result<Vec<f64>, TableError> {
    let mut tagged: Vec<(f64, Vec<f64>)> = Vec::new();

    for name in table.headers() {
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let Ok(metal) = suffix.parse::<f64>() else {
            continue;
        };

        let mut column = table.numeric(name)?;

        if log_convert {
            for value in &mut column {
                *value = value.log10();
            }
        }

        tagged.push((metal, column));
    }

    if tagged.is_empty() {
        return Err(TableError::NoTaggedColumns {
            prefix: prefix.to_owned(),
        });
    }

    tagged.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("metallicity tags are finite"));

    if let Some((_, column)) = tagged.iter().find(|(metal, _)| *metal == zh) {
        return Ok(column.clone());
    }
    if tagged.len() == 1 {
        return Ok(tagged[0].1.clone());
    }

    // Bracketing pair, or the two nearest tags on the populated side.
    let (lo, hi) = match tagged.iter().position(|(metal, _)| *metal > zh) {
        Some(0) => (0, 1),
        Some(i) => (i - 1, i),
        None => (tagged.len() - 2, tagged.len() - 1),
    };

    let (metal_lo, col_lo) = &tagged[lo];
    let (metal_hi, col_hi) = &tagged[hi];

    Ok(col_lo
        .iter()
        .zip(col_hi)
        .map(|(&v_lo, &v_hi)| lin_inter_extrapolate((*metal_lo, v_lo), (*metal_hi, v_hi), zh))
        .collect())
}
