//! Piecewise power-law mass distributions.
//!
//! The distribution is defined by k+1 mass breakpoints and k slopes, with
//! per-segment constants chained so the density is continuous at the
//! interior breakpoints. The topmost breakpoint is treated as one discrete
//! star: the cluster mass is the continuum integral from the lower bound to
//! the top bound *plus* the top-bound mass itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default breakpoints of the Kroupa (2001) IMF, in solar masses.
const DEFAULT_BOUNDS: [f64; 3] = [0.08, 0.5, 150.0];

/// Default slopes of the Kroupa (2001) IMF.
const DEFAULT_ALPHAS: [f64; 2] = [1.3, 2.3];

/// Tolerance for detecting the logarithmic special case of an exponent.
const EXPONENT_EPS: f64 = 1e-10;

/// Errors from direct function-value and rank queries.
///
/// Lookup-table style queries elsewhere in the pipeline extrapolate by
/// design; these queries instead refuse masses outside the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MassFunctionError {
    /// The queried mass lies outside the distribution's bounds.
    #[error("mass {mass} M☉ outside the distribution bounds [{lo}, {hi}] M☉")]
    OutOfBounds { mass: f64, lo: f64, hi: f64 },

    /// A rank query walked past the lowest segment: fewer stars remain
    /// below the reference mass than the requested rank.
    #[error("rank {rank} exceeds the stars remaining below {mass} M☉")]
    Exhausted { mass: f64, rank: f64 },
}

/// A segmented power-law mass distribution (an IMF).
///
/// Immutable once constructed. Instances are cheap to build and are created
/// in large numbers as trial distributions during root-finding.
///
/// # Example
/// ```
/// use massfunction::MassFunction;
///
/// let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);
/// let n = mf.total_count();
/// assert!(n > 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassFunction {
    m_tot: f64,
    bounds: Vec<f64>,
    alphas: Vec<f64>,
    ks: Vec<f64>,
}

impl MassFunction {
    /// Builds a distribution with total mass `m_tot` over the given
    /// breakpoints and slopes.
    ///
    /// Requires `bounds.len() == alphas.len() + 1`. A mismatched shape does
    /// not fail: the distribution falls back to the canonical two-segment
    /// Kroupa (2001) default and a diagnostic is logged.
    ///
    /// # Arguments
    /// * `m_tot` - Total cluster mass in solar masses
    /// * `bounds` - Strictly increasing breakpoints, `m_min..=m_max` (M☉)
    /// * `alphas` - One power-law slope per segment
    pub fn new(m_tot: f64, bounds: Vec<f64>, alphas: Vec<f64>) -> Self {
        let (bounds, alphas) = if bounds.len() != alphas.len() + 1 {
            tracing::warn!(
                n_bounds = bounds.len(),
                n_alphas = alphas.len(),
                "invalid mass function shape, need one slope less than \
                 breakpoints; falling back to the Kroupa (2001) IMF"
            );
            (DEFAULT_BOUNDS.to_vec(), DEFAULT_ALPHAS.to_vec())
        } else {
            (bounds, alphas)
        };

        let ks = compute_ks(m_tot, &bounds, &alphas);

        Self {
            m_tot,
            bounds,
            alphas,
            ks,
        }
    }

    /// Total mass of the distribution in solar masses.
    pub fn m_tot(&self) -> f64 {
        self.m_tot
    }

    /// Segment breakpoints in ascending order (M☉).
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Per-segment power-law slopes.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Per-segment normalization constants.
    pub fn ks(&self) -> &[f64] {
        &self.ks
    }

    /// Lower mass bound (M☉).
    pub fn min_mass(&self) -> f64 {
        self.bounds[0]
    }

    /// Upper mass bound, the mass of the single most massive star (M☉).
    pub fn max_mass(&self) -> f64 {
        *self.bounds.last().expect("bounds are never empty")
    }

    /// Number density of the distribution at `mass`.
    ///
    /// This is a direct function-value query: a mass outside the bounds is
    /// an error, never an extrapolation.
    pub fn function_value(&self, mass: f64) -> Result<f64, MassFunctionError> {
        let seg = self.segment_of(mass)?;
        Ok(self.ks[seg] * mass.powf(-self.alphas[seg]))
    }

    /// Mass density (`mass × function_value`) at `mass`.
    pub fn mass_density(&self, mass: f64) -> Result<f64, MassFunctionError> {
        Ok(mass * self.function_value(mass)?)
    }

    /// Closed-form integral `Σᵢ ∫ kᵢ m^(shift − αᵢ) dm` over `[m1, m2]`.
    ///
    /// The interval is clipped to the distribution bounds and contributions
    /// accumulate across every segment it spans. `shift = 0` integrates the
    /// star count, `shift = 1` the mass. Segments where the integrand's
    /// exponent hits −1 use the logarithmic antiderivative.
    pub fn integral(&self, m1: f64, m2: f64, shift: f64) -> f64 {
        let m1 = m1.max(self.bounds[0]);
        let m2 = m2.min(self.max_mass());

        let mut total = 0.0;

        for (seg, window) in self.bounds.windows(2).enumerate() {
            let lo = m1.max(window[0]);
            let hi = m2.min(window[1]);

            if lo < hi {
                total += segment_integral(lo, hi, self.alphas[seg], self.ks[seg], shift);
            }
        }

        total
    }

    /// Number of stars with masses in the closed interval `[m1, m2]`.
    ///
    /// When `m2` reaches the top bound the count includes the discrete most
    /// massive star, which lives outside the continuum.
    pub fn count(&self, m1: f64, m2: f64) -> f64 {
        let n = self.integral(m1, m2, 0.0);

        if m2 >= self.max_mass() {
            n + 1.0
        } else {
            n
        }
    }

    /// Total number of stars in the cluster.
    pub fn total_count(&self) -> f64 {
        self.count(self.bounds[0], self.max_mass())
    }

    /// Stellar mass contained in the closed interval `[m1, m2]` (M☉).
    ///
    /// When `m2` reaches the top bound the discrete most massive star's
    /// mass is added on top of the continuum integral.
    pub fn mass_between(&self, m1: f64, m2: f64) -> f64 {
        let m = self.integral(m1, m2, 1.0);

        if m2 >= self.max_mass() {
            m + self.max_mass()
        } else {
            m
        }
    }

    /// Fraction of the total cluster mass between `m1` and `m2`.
    pub fn mass_portion(&self, m1: f64, m2: f64) -> f64 {
        self.mass_between(m1, m2) / self.m_tot
    }

    /// Mass of the star `num_stars` ranks less massive than a star of the
    /// given mass, under optimal sampling.
    ///
    /// Analytically inverts the count integral of the segment containing
    /// `mass`. When the requested rank exceeds the count remaining in that
    /// segment, the walk continues into the next lower segment with the
    /// remainder. The rank may be fractional.
    ///
    /// # Errors
    /// `OutOfBounds` if `mass` lies outside the distribution;
    /// `Exhausted` if the rank walks past the lowest bound.
    pub fn rank_to_mass(&self, mass: f64, num_stars: f64) -> Result<f64, MassFunctionError> {
        self.segment_of(mass)?;

        let mut mass = mass;
        let mut rank = num_stars;

        loop {
            let seg = self
                .segment_of(mass)
                .expect("mass stays within bounds during the walk");
            let to_bound = self.count(self.bounds[seg], mass);

            if to_bound < rank {
                if seg == 0 {
                    return Err(MassFunctionError::Exhausted { mass, rank });
                }

                rank -= to_bound;
                mass = self.bounds[seg];
                continue;
            }

            let alpha = self.alphas[seg];
            let k = self.ks[seg];

            // Invert N = ∫_m'^m k x^-α dx for m'.
            return Ok(if (alpha - 1.0).abs() < EXPONENT_EPS {
                (mass.ln() - rank / k).exp()
            } else {
                (mass.powf(1.0 - alpha) - rank * (1.0 - alpha) / k).powf(1.0 / (1.0 - alpha))
            });
        }
    }

    /// Index of the segment containing `mass`, or `OutOfBounds`.
    fn segment_of(&self, mass: f64) -> Result<usize, MassFunctionError> {
        if mass < self.bounds[0] || mass > self.max_mass() {
            return Err(MassFunctionError::OutOfBounds {
                mass,
                lo: self.bounds[0],
                hi: self.max_mass(),
            });
        }

        for seg in 0..self.alphas.len() {
            if mass <= self.bounds[seg + 1] {
                return Ok(seg);
            }
        }

        unreachable!("bounded mass always falls into a segment");
    }
}

/// Antiderivative of `k m^(shift − α)` evaluated over `[m1, m2]`.
fn segment_integral(m1: f64, m2: f64, alpha: f64, k: f64, shift: f64) -> f64 {
    let exponent = 1.0 + shift - alpha;

    if exponent.abs() < EXPONENT_EPS {
        k * (m2.ln() - m1.ln())
    } else {
        k / exponent * (m2.powf(exponent) - m1.powf(exponent))
    }
}

/// Derives the per-segment constants for the given shape.
///
/// Preliminary constants follow the continuity recurrence
/// `k[i+1] = k[i] · b^(α[i+1] − α[i])` at each interior breakpoint `b`,
/// then one global factor rescales them so the continuum mass integral
/// equals `m_tot` minus the discrete top-bound star.
fn compute_ks(m_tot: f64, bounds: &[f64], alphas: &[f64]) -> Vec<f64> {
    let mut ks = vec![1.0];

    for i in 0..alphas.len() - 1 {
        let b = bounds[i + 1];
        let k = ks[i] * b.powf(-alphas[i]) / b.powf(-alphas[i + 1]);
        ks.push(k);
    }

    let continuum_mass: f64 = (0..alphas.len())
        .map(|i| segment_integral(bounds[i], bounds[i + 1], alphas[i], ks[i], 1.0))
        .sum();

    let top_mass = bounds[bounds.len() - 1];
    let factor = (m_tot - top_mass) / continuum_mass;

    for k in &mut ks {
        *k *= factor;
    }

    ks
}
