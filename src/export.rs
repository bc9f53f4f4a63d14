//! Saves a series to disk as a two-column CSV file.
//!
//! Rows end in a bare carriage return, which is what the consumer of
//! `pm25py.csv` splits on.

use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};

use crate::history::Series;

pub const LINE_TERMINATOR: u8 = b'\r';
const HEADER: [&str; 2] = ["original_period", "original_value"];

pub fn save_series(series: &Series, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Failed to create `{}`", file_path.display()))?;

    write_series(series, file)
        .with_context(|| format!("Failed to write `{}`", file_path.display()))
}

pub fn write_series<W: Write>(series: &Series, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(LINE_TERMINATOR))
        .from_writer(out);

    writer.write_record(HEADER)?;
    for observation in &series.observations {
        writer.serialize(observation)?;
    }
    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
