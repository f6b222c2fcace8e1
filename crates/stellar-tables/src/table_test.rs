use approx::assert_relative_eq;

use crate::table::{DataTable, TableError};

const CLUSTER_FILE: &str = "\
# present-day globular cluster properties
Name     Mass    R_a   R_p   # inline comment
NGC104   8.95e5  7.44  5.46
NGC288   9.34e4  12.42 1.84
";

#[test]
fn parses_whitespace_columns_and_comments() {
    let table = DataTable::parse(CLUSTER_FILE, &["Name", "Mass"]).unwrap();

    assert_eq!(table.headers(), &["Name", "Mass", "R_a", "R_p"]);
    assert_eq!(table.rows(), 2);
    assert_eq!(table.text("Name").unwrap(), &["NGC104", "NGC288"]);

    let mass = table.numeric("Mass").unwrap();
    assert_relative_eq!(mass[0], 8.95e5);
    assert_relative_eq!(mass[1], 9.34e4);
}

#[test]
fn missing_required_column_is_a_named_error() {
    let err = DataTable::parse(CLUSTER_FILE, &["Name", "SFE"]).unwrap_err();

    match err {
        TableError::MissingColumn { name } => assert_eq!(name, "SFE"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn empty_required_column_is_rejected() {
    let err = DataTable::parse("Name Mass\n", &["Name", "Mass"]).unwrap_err();

    match err {
        TableError::EmptyColumn { name } => assert_eq!(name, "Name"),
        other => panic!("expected EmptyColumn, got {other:?}"),
    }
}

#[test]
fn ragged_rows_are_rejected() {
    let err = DataTable::parse("a b c\n1 2\n", &[]).unwrap_err();

    assert!(matches!(
        err,
        TableError::RaggedRow {
            row: 1,
            found: 2,
            expected: 3
        }
    ));
}

#[test]
fn blank_input_has_no_header() {
    assert!(matches!(
        DataTable::parse("# only comments\n\n", &[]),
        Err(TableError::NoHeader)
    ));
}

#[test]
fn non_numeric_cells_fail_typed_access() {
    let table = DataTable::parse(CLUSTER_FILE, &[]).unwrap();

    match table.numeric("Name").unwrap_err() {
        TableError::NotNumeric { name, value } => {
            assert_eq!(name, "Name");
            assert_eq!(value, "NGC104");
        }
        other => panic!("expected NotNumeric, got {other:?}"),
    }
}
