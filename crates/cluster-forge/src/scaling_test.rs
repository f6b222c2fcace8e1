use approx::assert_relative_eq;

use crate::scaling::{
    crossing_time, density_from_mass, mass_from_density, mass_to_radius, relaxation_time, G,
};

#[test]
fn crossing_time_scales_with_radius_and_mass() {
    // A mass of 1/G makes the denominator unity.
    let result = crossing_time(1.0 / G, 3.0);

    assert_relative_eq!(result, 6.0_f64.powf(1.5), max_relative = 1e-5);
}

#[test]
fn relaxation_time_counts_stars() {
    let result = relaxation_time(1.0 / G, 10.0, 3.0);

    assert_relative_eq!(
        result,
        6.0_f64.powf(1.5) / 10.0_f64.ln(),
        max_relative = 1e-5
    );
}

#[test]
fn solar_mass_cluster_radius() {
    assert_relative_eq!(mass_to_radius(1.0), 0.1, max_relative = 1e-5);
}

#[test]
fn density_and_mass_relations_invert_each_other() {
    assert_relative_eq!(
        density_from_mass(10.0),
        10.0_f64.powf(0.61 + 2.08),
        max_relative = 1e-5
    );

    for mass in [1.0, 10.0, 20.0, 100.0, 150.0] {
        assert_relative_eq!(
            mass_from_density(density_from_mass(mass)),
            mass,
            max_relative = 1e-5
        );
    }
}
