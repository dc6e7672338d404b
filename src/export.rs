use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Deserialize;
use tracing::{error, info};

use crate::display::{format_roster_sheet, RosterSheet};
use crate::error::{Result, RosterError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// `roster-YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("roster-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Renders the sheet in the requested format.
///
/// CSV rows are `group,name,passenger 1..N`: one row per team member
/// (group `red`/`green`) followed by one row per car (`car 1`, `car 2`, ...)
/// with the driver in `name`.
pub fn render_sheet(sheet: &RosterSheet, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Text => Ok(format_roster_sheet(sheet).into_bytes()),
        ExportFormat::Csv => render_csv(sheet),
    }
}

fn render_csv(sheet: &RosterSheet) -> Result<Vec<u8>> {
    let width = sheet.max_passengers();
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec!["group".to_string(), "name".to_string()];
    header.extend((1..=width).map(|i| format!("passenger {}", i)));
    wtr.write_record(&header)?;

    let blanks = vec![String::new(); width];
    for (group, names) in [("red", &sheet.red), ("green", &sheet.green)] {
        for name in names {
            let mut record = vec![group.to_string(), name.clone()];
            record.extend(blanks.iter().cloned());
            wtr.write_record(&record)?;
        }
    }

    for (i, row) in sheet.cars.iter().enumerate() {
        let mut record = vec![format!("car {}", i + 1), row.driver.clone()];
        record.extend(row.passengers.iter().cloned());
        record.resize(width + 2, String::new());
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| RosterError::Io(e.into_error()))
}

/// Writes the dated sheet into `dir` and returns the file path.
///
/// The dated path only ever holds a complete sheet: the bytes go to a
/// sibling `.tmp` file that is renamed into place, and removed again if
/// anything fails.
pub fn write_export(
    sheet: &RosterSheet,
    dir: &Path,
    format: ExportFormat,
    date: NaiveDate,
) -> Result<PathBuf> {
    let bytes = render_sheet(sheet, format)?;
    fs::create_dir_all(dir)?;
    let file_name = export_file_name(format, date);
    let path = dir.join(&file_name);
    let tmp = dir.join(format!("{}.tmp", file_name));

    if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, &path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    info!(path = %path.display(), "Exported roster sheet");
    Ok(path)
}

/// Allows one export at a time
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    in_progress: Arc<AtomicBool>,
}

/// Held while an export runs; dropping it frees the guard
#[derive(Debug)]
pub struct ExportTicket {
    in_progress: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn try_begin(&self) -> Result<ExportTicket> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RosterError::ExportInProgress)?;
        Ok(ExportTicket {
            in_progress: Arc::clone(&self.in_progress),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Runs one guarded export, logging any failure
    pub fn run<T>(&self, export: impl FnOnce() -> Result<T>) -> Result<T> {
        let _ticket = self.try_begin()?;
        export().inspect_err(|e| error!("Export failed: {}", e))
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::Release);
    }
}
