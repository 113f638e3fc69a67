//! Pipeline orchestration.
//!
//! The orchestrator is the only place stage errors are logged and swallowed.
//! The stages themselves return `Result` so tests and other callers can
//! observe failures directly; here they degrade to log lines, matching the
//! artifact-or-silence contract of the batch run.

use std::path::PathBuf;

use log::{error, info};

use crate::{charts, dataset, report};

/// Default client name when none is supplied on the command line.
pub const DEFAULT_CLIENT: &str = "ClientXYZ";

/// Fixed file locations used by a run.
#[derive(Clone, Debug)]
pub struct Paths {
    /// Input CSV with the insurance records.
    pub data: PathBuf,
    /// Directory receiving the chart PNGs and the PDF report.
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/insurance.csv"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Runs the full pipeline for one client.
///
/// A load failure stops the run before any artifact is produced.  A chart
/// failure is logged and the report is still attempted (it will fail in turn
/// if its images are missing).  A report failure is logged and produces no
/// document.  Nothing is returned; outcomes are observable through the log
/// and the presence of output files.
pub fn run(client: &str, paths: &Paths) {
    let table = match dataset::load_table(&paths.data) {
        Ok(table) => {
            info!("data loaded successfully ({} records)", table.len());
            table
        }
        Err(err) => {
            error!("error loading data: {err:#}");
            return;
        }
    };

    match charts::render_charts(&table, &paths.output_dir) {
        Ok(()) => info!("charts generated successfully"),
        Err(err) => error!("error generating charts: {err:#}"),
    }

    match report::render_report(client, &table, &paths.output_dir) {
        Ok(path) => info!("report generated: {}", path.display()),
        Err(err) => error!("error generating report: {err:#}"),
    }
}
