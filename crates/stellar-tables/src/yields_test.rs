use approx::assert_relative_eq;

use crate::table::DataTable;
use crate::yields::YieldTable;

#[test]
fn interpolates_between_rows() {
    let yields = YieldTable::from_parts(vec![10.0, 20.0], vec![0.05, 0.1]).unwrap();

    assert_relative_eq!(yields.iron_yield(10.0), 0.05);
    assert_relative_eq!(yields.iron_yield(15.0), 0.075, max_relative = 1e-12);
    assert_relative_eq!(yields.iron_yield(20.0), 0.1);
}

#[test]
fn extrapolates_beyond_both_ends() {
    let yields = YieldTable::from_parts(vec![10.0, 20.0], vec![0.05, 0.1]).unwrap();

    assert_relative_eq!(yields.iron_yield(30.0), 0.15, max_relative = 1e-12);
    assert_relative_eq!(yields.iron_yield(5.0), 0.025, max_relative = 1e-12);
}

#[test]
fn yields_never_go_negative() {
    // Falling yields extrapolate below zero at high mass; the lookup
    // clamps instead.
    let yields = YieldTable::from_parts(vec![10.0, 20.0], vec![0.05, 0.01]).unwrap();

    assert_relative_eq!(yields.iron_yield(40.0), 0.0);
}

#[test]
fn single_row_table_is_a_constant_yield() {
    let yields = YieldTable::from_parts(vec![8.0], vec![0.074]).unwrap();

    assert_relative_eq!(yields.iron_yield(8.0), 0.074);
    assert_relative_eq!(yields.iron_yield(120.0), 0.074);
}

#[test]
fn builds_from_a_data_table() {
    let table = DataTable::parse(
        "mass[Msun] Fe[Msun]\n10.0 0.05\n20.0 0.1\n",
        &["mass[Msun]", "Fe[Msun]"],
    )
    .unwrap();
    let yields = YieldTable::new(&table).unwrap();

    assert_relative_eq!(yields.iron_yield(15.0), 0.075, max_relative = 1e-12);
}
