//! Reconstruct the formation histories of a cluster catalog.
//!
//! Usage: cargo run -p cluster-forge --example reconstruct -- \
//!     <cluster_file> <sn_file> <ejecta_file> <remnant_file>
//!
//! Prints the processed catalog (initial masses, iron budgets, supernova
//! counts and star-formation durations) as an aligned table on stdout.

use std::env;
use std::error::Error;
use std::io;
use std::process::ExitCode;

use cluster_forge::record::read_catalog;
use cluster_forge::{write_catalog, Processor, TerminationPolicy};
use stellar_tables::{evolution, supernova, yields, DataTable, SupernovaTable, YieldTable};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Missing parameter.\nUsage: {} <cluster_file> <sn_file> <ejecta_file> <remnant_file>",
            args[0]
        );
        return ExitCode::FAILURE;
    }

    match run(&args[1..]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut records = read_catalog(&args[0])?;

    let sn_table = DataTable::read(&args[1], &[supernova::MASS_COLUMN, supernova::FLAG_COLUMN])?;
    let ejecta_table = DataTable::read(&args[2], &[yields::MASS_COLUMN, yields::IRON_COLUMN])?;
    let remnant_table = DataTable::read(&args[3], &[evolution::MASS_COLUMN])?;

    let supernovae = SupernovaTable::new(&sn_table)?;
    let iron_yields = YieldTable::new(&ejecta_table)?;

    Processor::new(
        &remnant_table,
        &supernovae,
        &iron_yields,
        TerminationPolicy::StopAtExhaustion,
    )
    .process(&mut records);

    write_catalog(&records, io::stdout().lock())?;

    eprintln!("Processed {} clusters", records.len());

    Ok(())
}
