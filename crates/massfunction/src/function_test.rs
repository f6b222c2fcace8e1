use approx::assert_relative_eq;

use crate::function::{MassFunction, MassFunctionError};

#[test]
fn constructor_stores_shape() {
    let mf = MassFunction::new(1.0, vec![0.08, 1.0], vec![1.0]);

    assert_eq!(mf.m_tot(), 1.0);
    assert_eq!(mf.bounds(), &[0.08, 1.0]);
    assert_eq!(mf.alphas(), &[1.0]);

    let mf = MassFunction::new(3.0, vec![0.08, 1.0, 2.0], vec![1.0, 2.0]);

    assert_eq!(mf.m_tot(), 3.0);
    assert_eq!(mf.bounds(), &[0.08, 1.0, 2.0]);
    assert_eq!(mf.alphas(), &[1.0, 2.0]);
    assert_eq!(mf.min_mass(), 0.08);
    assert_eq!(mf.max_mass(), 2.0);
}

#[test]
fn mismatched_shape_falls_back_to_kroupa() {
    // Two slopes need three breakpoints; this shape is invalid.
    let mf = MassFunction::new(1000.0, vec![0.08, 150.0], vec![1.3, 2.3]);

    assert_eq!(mf.bounds(), &[0.08, 0.5, 150.0]);
    assert_eq!(mf.alphas(), &[1.3, 2.3]);
    assert_eq!(mf.m_tot(), 1000.0);
}

#[test]
fn normalization_constants() {
    // Mtot equal to the top-bound star leaves nothing for the continuum.
    let mf = MassFunction::new(1.0, vec![0.08, 1.0], vec![1.0]);

    assert_eq!(mf.ks().len(), 1);
    assert_relative_eq!(mf.ks()[0], 0.0);

    // Slope 1.0: the mass integral is linear, k = 1/(1 - 0.08).
    let mf = MassFunction::new(2.0, vec![0.08, 1.0], vec![1.0]);

    assert_relative_eq!(mf.ks()[0], 1.0 / 0.92, max_relative = 1e-12);

    // Slope 2.0: the mass integral takes the logarithmic form.
    let mf = MassFunction::new(2.0, vec![0.08, 1.0], vec![2.0]);

    assert_relative_eq!(
        mf.ks()[0],
        1.0 / (1.0_f64 / 0.08).ln(),
        max_relative = 1e-12
    );

    let mf = MassFunction::new(3.0, vec![0.08, 1.0, 2.0], vec![1.0, 2.0]);

    assert_eq!(mf.ks().len(), 2);
    assert_relative_eq!(mf.ks()[1], mf.ks()[0], max_relative = 1e-12);
    assert_relative_eq!(
        mf.ks()[0],
        1.0 / (0.92 + 2.0_f64.ln()),
        max_relative = 1e-12
    );

    // Continuity at an interior breakpoint scales the next constant.
    let mf = MassFunction::new(2.0, vec![0.08, 0.5, 1.0], vec![1.3, 2.3]);

    assert_relative_eq!(mf.ks()[0], 1.0 / 1.020812012357620, max_relative = 1e-12);
    assert_relative_eq!(mf.ks()[1], 0.5 / 1.020812012357620, max_relative = 1e-12);
}

#[test]
fn function_value_follows_the_segments() {
    let mf = MassFunction::new(2.0, vec![0.08, 1.0], vec![1.0]);

    assert_relative_eq!(
        mf.function_value(0.08).unwrap(),
        1.0 / (0.92 * 0.08),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        mf.function_value(0.5).unwrap(),
        1.0 / (0.92 * 0.5),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        mf.function_value(1.0).unwrap(),
        1.0 / 0.92,
        max_relative = 1e-12
    );

    // At an interior breakpoint both segment laws agree (continuity).
    let mf = MassFunction::new(2.0, vec![0.08, 0.5, 1.0], vec![1.3, 2.3]);

    assert_relative_eq!(
        mf.function_value(0.5).unwrap(),
        0.5_f64.powf(-1.3) * mf.ks()[0],
        max_relative = 1e-12
    );
    assert_relative_eq!(
        mf.function_value(0.5).unwrap(),
        0.5_f64.powf(-2.3) * mf.ks()[1],
        max_relative = 1e-12
    );

    assert_relative_eq!(
        mf.mass_density(0.3).unwrap(),
        0.3 * mf.function_value(0.3).unwrap(),
        max_relative = 1e-12
    );
}

#[test]
fn direct_queries_reject_masses_outside_the_bounds() {
    let mf = MassFunction::new(3.0, vec![0.08, 1.0, 2.0], vec![1.0, 2.0]);

    assert!(matches!(
        mf.function_value(0.05),
        Err(MassFunctionError::OutOfBounds { .. })
    ));
    assert!(matches!(
        mf.function_value(3.0),
        Err(MassFunctionError::OutOfBounds { .. })
    ));
    assert!(matches!(
        mf.mass_density(0.05),
        Err(MassFunctionError::OutOfBounds { .. })
    ));
    assert!(matches!(
        mf.rank_to_mass(3.0, 1.0),
        Err(MassFunctionError::OutOfBounds { .. })
    ));
}

#[test]
fn integral_spans_segments_and_clips() {
    // Degenerate continuum: k = 0, only the discrete top star remains.
    let mf = MassFunction::new(1.0, vec![0.08, 1.0], vec![1.0]);

    assert_relative_eq!(mf.integral(0.08, 1.0, 0.0), 0.0);
    assert_relative_eq!(mf.integral(0.08, 2.0, 0.0), 0.0);
    assert_relative_eq!(mf.count(0.08, 1.0), 1.0);
    assert_relative_eq!(mf.count(0.08, 2.0), 1.0);
    assert_relative_eq!(mf.total_count(), 1.0);

    let mf = MassFunction::new(2.0, vec![0.08, 1.0], vec![1.0]);

    assert_relative_eq!(mf.integral(0.08, 1.0, 1.0), 1.0, max_relative = 1e-12);
    // The count integral of a slope-1 segment is logarithmic, and the
    // upper limit clips to the top bound.
    assert_relative_eq!(
        mf.integral(0.08, 2.0, 0.0),
        (1.0_f64.ln() - 0.08_f64.ln()) / 0.92,
        max_relative = 1e-12
    );

    let mf = MassFunction::new(3.0, vec![0.08, 1.0, 2.0], vec![1.0, 2.0]);

    assert_relative_eq!(mf.integral(0.08, 2.0, 1.0), 1.0, max_relative = 1e-12);
    assert_relative_eq!(
        mf.integral(0.08, 1.0, 1.0),
        0.92 / (0.92 + 2.0_f64.ln()),
        max_relative = 1e-12
    );
}

#[test]
fn total_count_is_continuum_plus_the_top_star() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);

    assert_relative_eq!(
        mf.total_count(),
        mf.integral(0.08, 100.0, 0.0) + 1.0,
        max_relative = 1e-12
    );
}

#[test]
fn mass_between_includes_the_top_star() {
    let mf = MassFunction::new(1.0, vec![0.08, 1.0], vec![1.0]);

    assert_relative_eq!(mf.mass_between(0.08, 1.0), 1.0, max_relative = 1e-12);
    assert_relative_eq!(mf.mass_between(0.08, 2.0), 1.0, max_relative = 1e-12);
    assert_relative_eq!(mf.mass_between(0.5, 1.0), 1.0, max_relative = 1e-12);
    assert_relative_eq!(mf.mass_between(0.5, 0.6), 0.0);

    assert_relative_eq!(mf.mass_portion(0.08, 1.0), 1.0, max_relative = 1e-12);
    assert_relative_eq!(mf.mass_portion(0.5, 0.6), 0.0);

    let mf = MassFunction::new(3.0, vec![0.08, 1.0, 2.0], vec![1.0, 2.0]);

    assert_relative_eq!(mf.mass_between(0.08, 2.0), 3.0, max_relative = 1e-12);
    assert_relative_eq!(mf.mass_between(0.08, 3.0), 3.0, max_relative = 1e-12);

    let continuum_below_one = 0.92 / (0.92 + 2.0_f64.ln());
    assert_relative_eq!(
        mf.mass_between(0.08, 1.0),
        continuum_below_one,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        mf.mass_portion(0.08, 1.0),
        continuum_below_one / 3.0,
        max_relative = 1e-12
    );
}

#[test]
fn rank_to_mass_inverts_the_count_within_a_segment() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);

    let m1 = 2.0;
    let m2 = 50.0;
    let n = mf.count(m1, m2);

    assert_relative_eq!(mf.rank_to_mass(m2, n).unwrap(), m1, max_relative = 1e-9);
}

#[test]
fn rank_to_mass_inverts_the_count_across_segments() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);

    // m1 below the interior breakpoint, m2 above: the walk crosses it.
    let m1 = 0.2;
    let m2 = 50.0;
    let n = mf.count(m1, m2);

    assert_relative_eq!(mf.rank_to_mass(m2, n).unwrap(), m1, max_relative = 1e-9);

    // From the top bound the count includes the discrete top star.
    let n = mf.count(0.3, 100.0);

    assert_relative_eq!(
        mf.rank_to_mass(100.0, n).unwrap(),
        0.3,
        max_relative = 1e-9
    );
}

#[test]
fn rank_to_mass_inverts_the_logarithmic_segment() {
    // A slope-1.0 segment exercises the logarithmic inverse.
    let mf = MassFunction::new(50.0, vec![0.08, 10.0], vec![1.0]);

    let n = mf.count(1.0, 5.0);

    assert_relative_eq!(mf.rank_to_mass(5.0, n).unwrap(), 1.0, max_relative = 1e-9);
}

#[test]
fn rank_past_the_lowest_segment_is_exhausted() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);

    let total = mf.total_count();

    assert!(matches!(
        mf.rank_to_mass(100.0, total * 2.0),
        Err(MassFunctionError::Exhausted { .. })
    ));
}
