//! Deterministic star-by-star extraction from a mass function.

use crate::function::{MassFunction, MassFunctionError};

/// Walks one [`MassFunction`] in strictly decreasing mass order.
///
/// The first extraction returns the distribution's top bound (the single
/// most massive star); each later extraction returns the star exactly one
/// rank below the previous one. The sequence never terminates on its own —
/// the caller owns the stopping condition. An extractor is bound to its
/// distribution and cannot be restarted; construct a new one instead.
///
/// # Example
/// ```
/// use massfunction::{MassFunction, StarExtractor};
///
/// let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);
/// let mut extractor = StarExtractor::new(&mf);
///
/// let first = extractor.next_most_massive().unwrap();
/// let second = extractor.next_most_massive().unwrap();
/// assert!(second < first);
/// ```
#[derive(Debug)]
pub struct StarExtractor<'a> {
    mass_function: &'a MassFunction,
    last_mass: Option<f64>,
}

impl<'a> StarExtractor<'a> {
    /// Creates an extractor positioned before the most massive star.
    pub fn new(mass_function: &'a MassFunction) -> Self {
        Self {
            mass_function,
            last_mass: None,
        }
    }

    /// Mass of the most recently extracted star, if any (M☉).
    pub fn last_mass(&self) -> Option<f64> {
        self.last_mass
    }

    /// Extracts the next most massive star (M☉).
    ///
    /// # Errors
    /// `Exhausted` once the rank walk would pass the distribution's lower
    /// bound; callers in practice stop well above it.
    pub fn next_most_massive(&mut self) -> Result<f64, MassFunctionError> {
        let next = match self.last_mass {
            None => self.mass_function.max_mass(),
            Some(last) => self.mass_function.rank_to_mass(last, 1.0)?,
        };

        self.last_mass = Some(next);

        Ok(next)
    }
}
