//! Empirical star-cluster scaling relations.
//!
//! Mass–radius and mass–density relations from Marks & Kroupa (2012),
//! plus the half-mass crossing and two-body relaxation timescales. Masses
//! in M☉, radii in pc, times in Myr.

/// Gravitational constant in pc³ / (Myr² M☉).
pub const G: f64 = 0.00449;

/// Half-mass crossing time of a cluster, in Myr.
///
/// # Arguments
/// * `m_ini` - Initial cluster mass (M☉)
/// * `r_half` - Half-mass radius (pc)
pub fn crossing_time(m_ini: f64, r_half: f64) -> f64 {
    (2.0 * r_half).powf(1.5) / (G * m_ini).sqrt()
}

/// Two-body relaxation time of a cluster, in Myr.
///
/// # Arguments
/// * `m_ini` - Initial cluster mass (M☉)
/// * `n` - Number of stars in the cluster
/// * `r_half` - Half-mass radius (pc)
pub fn relaxation_time(m_ini: f64, n: f64, r_half: f64) -> f64 {
    0.1 * n / n.ln() * crossing_time(m_ini, r_half)
}

/// Initial half-mass radius from the cluster mass (pc).
pub fn mass_to_radius(mass: f64) -> f64 {
    0.10 * mass.powf(0.13)
}

/// Initial cluster density from the cluster mass (M☉/pc³).
pub fn density_from_mass(m_ini: f64) -> f64 {
    10.0_f64.powf(0.61 * m_ini.log10() + 2.08)
}

/// Initial cluster mass from the cluster density (M☉); inverse of
/// [`density_from_mass`].
pub fn mass_from_density(density: f64) -> f64 {
    density.powf(1.0 / 0.61) * 10.0_f64.powf(-2.08 / 0.61)
}
