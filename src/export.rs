//! CSV export of a decoded grid.
//!
//! _Requires Cargo feature `std`._
//!
//! Each channel `i` is written to three files in the target directory:
//! `main{i}.csv` (one row), `tercets{i}.csv` (one row per band) and
//! `totals{i}.csv` (one row per total). Every row has one column per sample,
//! so a grid without samples is written as empty lines.

use std::{format, fs, path::Path, string::String, vec::Vec};

use log::debug;

use crate::{
    grid::{MeasurementGrid, Query, View},
    sans::sample::CHANNELS,
};

/// Write every channel of a grid to CSV files in a directory.
pub fn export_csv(grid: &MeasurementGrid, dir: impl AsRef<Path>) -> csv::Result<()> {
    let dir = dir.as_ref();

    for channel in 0..CHANNELS {
        for (name, kind) in [
            ("main", Query::Main),
            ("tercets", Query::Tercets),
            ("totals", Query::Totals),
        ] {
            let path = dir.join(format!("{name}{channel}.csv"));
            // Channels within range always yield a slice.
            if let Ok(view) = grid.query(kind, channel, false) {
                debug!("Writing {}", path.display());
                write_view(view, &path)?;
            }
        }
    }

    Ok(())
}

fn write_view(view: View<'_>, path: &Path) -> csv::Result<()> {
    // The writer quotes an empty record as `""`.
    if view.shape().last() == Some(&0) {
        fs::write(path, "\n".repeat(view.rows().count()))?;
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;

    for row in view.rows() {
        let fields: Vec<String> = row.iter().map(|v| format!("{v:?}")).collect();
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}
