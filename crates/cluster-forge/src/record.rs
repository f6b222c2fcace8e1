//! Per-cluster records and catalog I/O.

use std::io::{self, Write};
use std::path::Path;

use massfunction::MassFunction;
use serde::{Deserialize, Serialize};
use stellar_tables::{DataTable, TableError};

/// Columns every cluster property file must carry.
pub const REQUIRED_COLUMNS: [&str; 8] =
    ["Name", "Mass", "R_a", "R_p", "SFE", "Fe-H", "FeSpread", "Age"];

/// One cluster: the observed inputs plus the derived quantities the
/// pipeline stages fill in as they run.
///
/// Records never share mutable state — each pipeline stage works on one
/// record at a time, so a batch can be processed in parallel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    // Observed inputs.
    pub name: String,
    /// Present-day mass (M☉).
    pub mass: f64,
    /// Orbital apocenter (kpc).
    pub r_apo: f64,
    /// Orbital pericenter (kpc).
    pub r_peri: f64,
    /// Star-formation efficiency.
    pub sfe: f64,
    /// Iron abundance \[Fe/H\] (dex).
    pub fe_h: f64,
    /// Internal iron abundance spread (dex).
    pub fe_spread: f64,
    /// Age (Gyr).
    pub age_gyr: f64,

    // Derived by the pipeline.
    pub imf: Option<MassFunction>,
    /// Initial cluster mass (M☉).
    pub initial_mass: Option<f64>,
    /// Iron budget produced during formation (M☉).
    pub produced_iron: Option<f64>,
    /// Supernovae up to the budget crossing.
    pub supernova_count: Option<u64>,
    /// Potential supernovae down to the low-mass cutoff.
    pub potential_supernovae: Option<u64>,
    /// Mass of the last star contributing to star formation (M☉).
    pub last_star_mass: Option<f64>,
    /// Star-formation duration (Myr).
    pub formation_time_myr: Option<f64>,
}

/// Builds cluster records from a parsed property table.
pub fn load_catalog(table: &DataTable) -> Result<Vec<ClusterRecord>, TableError> {
    let names = table.text("Name")?;
    let masses = table.numeric("Mass")?;
    let r_apos = table.numeric("R_a")?;
    let r_peris = table.numeric("R_p")?;
    let sfes = table.numeric("SFE")?;
    let fe_hs = table.numeric("Fe-H")?;
    let fe_spreads = table.numeric("FeSpread")?;
    let ages = table.numeric("Age")?;

    Ok((0..table.rows())
        .map(|row| ClusterRecord {
            name: names[row].clone(),
            mass: masses[row],
            r_apo: r_apos[row],
            r_peri: r_peris[row],
            sfe: sfes[row],
            fe_h: fe_hs[row],
            fe_spread: fe_spreads[row],
            age_gyr: ages[row],
            imf: None,
            initial_mass: None,
            produced_iron: None,
            supernova_count: None,
            potential_supernovae: None,
            last_star_mass: None,
            formation_time_myr: None,
        })
        .collect())
}

/// Reads and validates a cluster property file.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<ClusterRecord>, TableError> {
    load_catalog(&DataTable::read(path, &REQUIRED_COLUMNS)?)
}

/// Writes the records as an aligned text table for the report consumer.
///
/// Derived values still unset render as `nan`; the distribution object
/// itself is not a printable column and is skipped.
pub fn write_catalog<W: Write>(records: &[ClusterRecord], mut out: W) -> io::Result<()> {
    let columns: Vec<(&str, Vec<String>)> = vec![
        ("Name", records.iter().map(|r| r.name.clone()).collect()),
        ("Mass", records.iter().map(|r| r.mass.to_string()).collect()),
        ("R_a", records.iter().map(|r| r.r_apo.to_string()).collect()),
        ("R_p", records.iter().map(|r| r.r_peri.to_string()).collect()),
        ("SFE", records.iter().map(|r| r.sfe.to_string()).collect()),
        ("Fe-H", records.iter().map(|r| r.fe_h.to_string()).collect()),
        (
            "FeSpread",
            records.iter().map(|r| r.fe_spread.to_string()).collect(),
        ),
        (
            "Age",
            records.iter().map(|r| r.age_gyr.to_string()).collect(),
        ),
        (
            "Mini",
            records.iter().map(|r| optional(r.initial_mass)).collect(),
        ),
        (
            "ProducedIron",
            records.iter().map(|r| optional(r.produced_iron)).collect(),
        ),
        (
            "NSN",
            records
                .iter()
                .map(|r| optional(r.supernova_count.map(|n| n as f64)))
                .collect(),
        ),
        (
            "mlast",
            records.iter().map(|r| optional(r.last_star_mass)).collect(),
        ),
        (
            "SFD",
            records
                .iter()
                .map(|r| optional(r.formation_time_myr))
                .collect(),
        ),
    ];

    let widths: Vec<usize> = columns
        .iter()
        .map(|(header, cells)| {
            cells
                .iter()
                .map(String::len)
                .chain([header.len()])
                .max()
                .unwrap_or(0)
                + 4
        })
        .collect();

    for ((header, _), &width) in columns.iter().zip(&widths) {
        write!(out, "{header:<width$}")?;
    }
    writeln!(out)?;

    for row in 0..records.len() {
        for ((_, cells), &width) in columns.iter().zip(&widths) {
            write!(out, "{:<width$}", cells[row])?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_owned(), |v| v.to_string())
}
