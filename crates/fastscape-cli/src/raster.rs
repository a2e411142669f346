//! ASCII Arc/Info raster writer: six header lines, then `H-2` rows of
//! `W-2` whitespace-separated elevation values. The halo ring is never
//! emitted, matching the `ncols`/`nrows` header.

use anyhow::{Context, Result};
use fastscape_core::grid::SimState;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};

pub fn write_ascii_raster(path: &str, state: &SimState) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating output file {path}"))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "ncols {}", state.width - 2)?;
    writeln!(out, "nrows {}", state.height - 2)?;
    writeln!(out, "xllcorner 637500.000")?;
    writeln!(out, "yllcorner 206000.000")?;
    writeln!(out, "cellsize 500.000")?;
    writeln!(out, "NODATA_value -9999")?;

    let mut line = String::new();
    for y in 1..state.height - 1 {
        line.clear();
        for x in 1..state.width - 1 {
            if x > 1 {
                line.push(' ');
            }
            let _ = write!(line, "{}", state.h[state.index(x, y)]);
        }
        writeln!(out, "{line}")?;
    }

    out.flush().context("flushing output file")?;
    Ok(())
}
