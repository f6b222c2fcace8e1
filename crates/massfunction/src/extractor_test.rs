use approx::assert_relative_eq;

use crate::extractor::StarExtractor;
use crate::function::MassFunction;

/// Masses of the most massive stars of a 1000 M☉ Kroupa-like cluster,
/// computed from the closed-form rank inversion.
const EXPECTED_SEQUENCE: [f64; 18] = [
    100.0,
    37.25701942381608,
    24.516667055863117,
    18.72454481455272,
    15.342693919909495,
    13.099324107107401,
    11.490204391104232,
    10.273250422565809,
    9.316940190015194,
    8.543315163945714,
    7.903065746515376,
    7.363391521696144,
    6.901577171843005,
    6.501364477254261,
    6.150792506827555,
    5.840854504041673,
    5.564631384355116,
    5.316714887089405,
];

#[test]
fn extraction_matches_the_closed_form_sequence() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);
    let mut extractor = StarExtractor::new(&mf);

    for expected in EXPECTED_SEQUENCE {
        let mass = extractor.next_most_massive().unwrap();
        assert_relative_eq!(mass, expected, max_relative = 1e-9);
    }
}

#[test]
fn extraction_is_strictly_decreasing() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);
    let mut extractor = StarExtractor::new(&mf);

    let mut last = f64::INFINITY;

    for _ in 0..500 {
        let mass = extractor.next_most_massive().unwrap();
        assert!(mass < last, "masses must strictly decrease, got {mass}");
        last = mass;
    }
}

#[test]
fn each_extracted_star_sits_at_its_integer_rank() {
    let mf = MassFunction::new(10_000.0, vec![0.08, 0.5, 1.0, 140.0], vec![1.3, 2.3, 1.8]);
    let mut extractor = StarExtractor::new(&mf);

    // The n-th extracted star has exactly n stars at or above its mass.
    for n in 1..=1000 {
        let mass = extractor.next_most_massive().unwrap();
        assert_relative_eq!(
            mf.count(mass, mf.max_mass()),
            n as f64,
            max_relative = 1e-6
        );
    }
}

#[test]
fn first_extraction_is_the_top_bound() {
    let mf = MassFunction::new(1000.0, vec![0.08, 0.5, 100.0], vec![1.3, 2.3]);
    let mut extractor = StarExtractor::new(&mf);

    assert_eq!(extractor.last_mass(), None);
    assert_eq!(extractor.next_most_massive().unwrap(), mf.max_mass());
    assert_eq!(extractor.last_mass(), Some(100.0));
}
