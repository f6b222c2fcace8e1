//! Population synthesis: inferring a cluster's IMF from what is left of it.
//!
//! Two nested inversions run here. The inner one finds the top mass bound
//! at which the distribution's tail up to the absolute stellar mass
//! ceiling holds exactly one star (the most massive star under optimal
//! sampling). The outer one finds the initial cluster mass whose surviving
//! fraction — stellar evolution plus dynamical dissolution along the orbit
//! — reproduces the observed present-day mass. Both are plain bounded
//! Newton–Raphson loops with finite-difference derivatives; running out of
//! iterations is a logged warning, never a failure, and the last iterate
//! is used.

use massfunction::MassFunction;
use stellar_tables::EvolutionTable;

use crate::scaling::density_from_mass;

/// Metal mass fraction of the Sun (Z☉).
const METAL_FRACTION_SUN: f64 = 0.0142;

/// Shift of the low-mass slopes per unit solar-scaled metal excess,
/// following Yan et al. (2021).
const DELTA_ALPHA: f64 = 63.0;

/// Absolute stellar mass ceiling, in M☉.
const MASS_CEILING: f64 = 150.0;

/// Canonical interior breakpoints of the IMF, in M☉.
const LOW_BOUNDS: [f64; 3] = [0.08, 0.5, 1.0];

/// Dissolution-law coefficients from Baumgardt & Makino (2003).
const BETA: f64 = 1.91;
const GAMMA: f64 = 0.02;
const X_EXPONENT: f64 = 0.75;

/// Reference time after which early stellar mass loss is evaluated (Myr).
const MASS_LOSS_REFERENCE_MYR: f64 = 1000.0;

/// Newton–Raphson tolerance and iteration cap, shared by both solves.
const TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;

/// Finite-difference step of the top-bound solve (M☉).
const TOP_BOUND_STEP: f64 = 1.0;

/// Finite-difference step of the initial-mass solve (M☉).
const INITIAL_MASS_STEP: f64 = 1e3;

/// Residual of the one-star condition on a distribution's upper end.
///
/// Returns the tail count integral of the last segment from the top bound
/// up to the 150 M☉ ceiling, minus one. Zero means the top bound is
/// exactly the mass of the single most massive star. Pure in the
/// distribution, so trial evaluations are independent and memoizable.
/// Assumes no breakpoints above the top bound.
pub fn check_upper_end(mf: &MassFunction) -> f64 {
    let m_max = mf.max_mass();
    let alpha = *mf.alphas().last().expect("at least one segment");
    let k = *mf.ks().last().expect("at least one segment");

    if (alpha - 1.0).abs() < 1e-10 {
        k * (MASS_CEILING.ln() - m_max.ln()) - 1.0
    } else {
        k / (1.0 - alpha) * (MASS_CEILING.powf(1.0 - alpha) - m_max.powf(1.0 - alpha)) - 1.0
    }
}

/// Generates initial mass functions for one metallicity.
///
/// Borrows the evolution table collapsed onto that metallicity; the
/// table supplies the surviving-mass fraction that couples the outer
/// solve to stellar evolution.
#[derive(Debug)]
pub struct ImfGenerator<'a> {
    zh: f64,
    evolution: &'a EvolutionTable,
}

impl<'a> ImfGenerator<'a> {
    pub fn new(evolution: &'a EvolutionTable) -> Self {
        Self {
            zh: evolution.zh(),
            evolution,
        }
    }

    /// The metallicity this generator works at (dex).
    pub fn zh(&self) -> f64 {
        self.zh
    }

    /// Slopes of the canonical four-breakpoint IMF for a cluster of the
    /// given initial mass.
    ///
    /// The two low-mass slopes shift linearly with the metal excess over
    /// solar; the high-mass slope steepens with the log of the birth
    /// density (via the mass–density relation) and flattens to the
    /// canonical 2.3 below the density threshold.
    pub fn compute_alphas(&self, m_ini: f64) -> [f64; 3] {
        let metal_shift = DELTA_ALPHA * (10.0_f64.powf(self.zh) - 1.0) * METAL_FRACTION_SUN;

        let y = -0.14 * self.zh + 0.99 * (density_from_mass(m_ini) * 1e-6).log10();
        let alpha3 = if y < -0.87 { 2.3 } else { -0.41 * y + 1.94 };

        [1.3 + metal_shift, 2.3 + metal_shift, alpha3]
    }

    /// Builds the IMF of a cluster of initial mass `m_ini`.
    ///
    /// The top mass bound starts from the Pflamm-Altenburg & Kroupa (2007)
    /// closed-form estimate and is refined by Newton–Raphson on
    /// [`check_upper_end`] with a symmetric finite-difference derivative.
    pub fn compute_mass_function(&self, m_ini: f64) -> MassFunction {
        let alphas = self.compute_alphas(m_ini).to_vec();
        let log_m = m_ini.log10();

        let mut m_max = 10.0_f64.powf(
            2.56 * log_m * (3.82_f64.powf(9.17) + log_m.powf(9.17)).powf(-1.0 / 9.17) - 0.38,
        );

        let trial = |m_max: f64| {
            MassFunction::new(
                m_ini,
                vec![LOW_BOUNDS[0], LOW_BOUNDS[1], LOW_BOUNDS[2], m_max],
                alphas.clone(),
            )
        };

        let mut mf = trial(m_max);

        for _ in 0..MAX_ITERATIONS {
            mf = trial(m_max);

            let delta = check_upper_end(&mf);

            if delta.abs() < TOLERANCE {
                return mf;
            }

            let derivative = 0.5
                * (check_upper_end(&trial(m_max + TOP_BOUND_STEP))
                    - check_upper_end(&trial(m_max - TOP_BOUND_STEP)))
                / TOP_BOUND_STEP;

            m_max -= delta / derivative;
        }

        tracing::warn!(
            m_ini,
            m_max,
            "top mass bound did not converge, using the last estimate"
        );

        mf
    }

    /// Initial cluster mass reproducing the observed present-day state.
    ///
    /// Newton–Raphson on [`Self::present_day_residual`], starting from
    /// twice the present mass. Non-convergence logs a warning and returns
    /// the last iterate.
    ///
    /// # Arguments
    /// * `present_mass` - Observed cluster mass (M☉)
    /// * `age_gyr` - Cluster age (Gyr)
    /// * `r_apo` - Orbital apocenter (kpc)
    /// * `r_peri` - Orbital pericenter (kpc)
    pub fn solve_initial_mass(
        &self,
        present_mass: f64,
        age_gyr: f64,
        r_apo: f64,
        r_peri: f64,
    ) -> f64 {
        let mut m_ini = 2.0 * present_mass;

        for _ in 0..MAX_ITERATIONS {
            let error = self.present_day_residual(present_mass, age_gyr, r_apo, r_peri, m_ini);

            if error.abs() < TOLERANCE {
                return m_ini;
            }

            let derivative = 0.5
                * (self.present_day_residual(
                    present_mass,
                    age_gyr,
                    r_apo,
                    r_peri,
                    m_ini + INITIAL_MASS_STEP,
                ) - self.present_day_residual(
                    present_mass,
                    age_gyr,
                    r_apo,
                    r_peri,
                    m_ini - INITIAL_MASS_STEP,
                ))
                / INITIAL_MASS_STEP;

            m_ini -= error / derivative;
        }

        tracing::warn!(
            present_mass,
            m_ini,
            "initial mass did not converge, using the last estimate"
        );

        m_ini
    }

    /// The IMF inferred from present-day observables: solves the initial
    /// mass, then builds the distribution for it.
    pub fn imf_from_present(
        &self,
        present_mass: f64,
        age_gyr: f64,
        r_apo: f64,
        r_peri: f64,
    ) -> MassFunction {
        let m_ini = self.solve_initial_mass(present_mass, age_gyr, r_apo, r_peri);

        self.compute_mass_function(m_ini)
    }

    /// Present-day mass of a cluster born with `m_ini`, the closed-form
    /// forward counterpart of [`Self::solve_initial_mass`].
    pub fn present_mass(&self, m_ini: f64, r_apo: f64, r_peri: f64, age_gyr: f64) -> f64 {
        let eccentricity = (r_apo - r_peri) / (r_apo + r_peri);

        let imf = self.compute_mass_function(m_ini);
        let n = imf.total_count();
        let p_sf = self.surviving_fraction(&imf);

        p_sf * m_ini
            * (1.0
                - (age_gyr * 1000.0) / (BETA * r_apo * (1.0 - eccentricity))
                    * (n / (GAMMA * n).ln()).powf(-X_EXPONENT))
    }

    /// Residual of the present-day condition at a trial initial mass.
    ///
    /// Combines the trial IMF's total star count, the surviving-mass
    /// fraction after the reference time, and the Baumgardt & Makino
    /// (2003) dissolution law along the orbit; zero when the trial mass
    /// dissolves to exactly the observed mass at the cluster's age.
    fn present_day_residual(
        &self,
        present_mass: f64,
        age_gyr: f64,
        r_apo: f64,
        r_peri: f64,
        m_ini: f64,
    ) -> f64 {
        let eccentricity = (r_apo - r_peri) / (r_apo + r_peri);
        let orbit_factor = r_apo * (1.0 - eccentricity);

        let imf = self.compute_mass_function(m_ini);
        let n = imf.total_count();
        let p_sf = self.surviving_fraction(&imf);

        BETA * (n / (GAMMA * n).ln()).powf(X_EXPONENT) * orbit_factor
            * (1.0 - present_mass / (p_sf * m_ini))
            / (age_gyr * 1000.0)
            - 1.0
    }

    /// Fraction of a cluster's stellar mass surviving early evolution.
    fn surviving_fraction(&self, imf: &MassFunction) -> f64 {
        self.evolution.surviving_mass(imf, MASS_LOSS_REFERENCE_MYR) / imf.m_tot()
    }
}
