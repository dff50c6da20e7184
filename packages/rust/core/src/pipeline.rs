//! End-to-end `update` pipeline: table → records → patched document.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use advisorboard_shared::{AppConfig, BoardTotals, ColumnsConfig, RenderConfig, Result};

use crate::patcher::{self, PatchOutcome};
use crate::reader;

/// Configuration for the `update_board` pipeline.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Advisor table to read.
    pub table: PathBuf,
    /// Document whose marked region is rewritten.
    pub document: PathBuf,
    /// Header labels to look up.
    pub columns: ColumnsConfig,
    /// Rendering options.
    pub render: RenderConfig,
}

impl From<&AppConfig> for UpdateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            table: config.paths.table.clone(),
            document: config.paths.document.clone(),
            columns: config.columns.clone(),
            render: config.render.clone(),
        }
    }
}

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The document was rewritten.
    Patched,
    /// The document already held the rendered records.
    Unchanged,
    /// The document has no marked region; it was not touched.
    RegionMissing,
    /// The table had no advisors; the document was not touched.
    NoRecords,
}

impl From<PatchOutcome> for UpdateOutcome {
    fn from(outcome: PatchOutcome) -> Self {
        match outcome {
            PatchOutcome::Patched => Self::Patched,
            PatchOutcome::Unchanged => Self::Unchanged,
            PatchOutcome::RegionMissing => Self::RegionMissing,
        }
    }
}

/// Result of the `update_board` pipeline.
#[derive(Debug)]
pub struct UpdateReport {
    pub outcome: UpdateOutcome,
    /// Advisor count and count sum over the records read.
    pub totals: BoardTotals,
    pub table: PathBuf,
    pub document: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes without error.
    fn done(&self, report: &UpdateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &UpdateReport) {}
}

/// Run the full `update` pipeline.
///
/// 1. Read the advisor table
/// 2. Stop with [`UpdateOutcome::NoRecords`] if it holds no advisors
/// 3. Splice the rendered array into the document
#[instrument(skip_all, fields(table = %config.table.display(), document = %config.document.display()))]
pub fn update_board(
    config: &UpdateConfig,
    progress: &dyn ProgressReporter,
) -> Result<UpdateReport> {
    let start = Instant::now();

    progress.phase(&format!("Reading data from {}", config.table.display()));
    let records = reader::read_table(&config.table, &config.columns)?;
    let totals = BoardTotals::from_records(&records);

    let outcome = if records.is_empty() {
        warn!("no advisors found in table, skipping document update");
        UpdateOutcome::NoRecords
    } else {
        progress.phase(&format!("Updating {}", config.document.display()));
        patcher::patch_document(&config.document, &records, &config.render)?.into()
    };

    let report = UpdateReport {
        outcome,
        totals,
        table: config.table.clone(),
        document: config.document.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        outcome = ?report.outcome,
        advisors = totals.advisors,
        total_count = totals.total_count,
        "update pipeline complete"
    );

    progress.done(&report);
    Ok(report)
}
