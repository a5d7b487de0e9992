use crate::excluder::{self, FileReport};
use anyhow::Result;
use rayon::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    DryRun,
}

#[derive(Debug)]
pub struct ProcessedFileResult {
    pub path: PathBuf,
    pub outcome: Result<FileReport, String>,
}

impl ProcessedFileResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs the exclusion pass over each file. Files are independent; duplicates must be removed by
/// the caller so no path is rewritten twice at once.
pub fn process_files(
    files: Vec<PathBuf>,
    exclusions: &[String],
    mode: Mode,
) -> Result<Vec<ProcessedFileResult>> {
    let r: Vec<ProcessedFileResult> = files
        .par_iter()
        .map(|p| {
            let o = match mode {
                Mode::Apply => excluder::exclude(p, exclusions),
                Mode::DryRun => excluder::preview(p, exclusions),
            };
            match &o {
                Ok(report) => log::info!(
                    "{}: {} of {} lines removed",
                    p.display(),
                    report.removed().count(),
                    report.outcomes.len()
                ),
                Err(e) => log::error!("{}", e),
            }
            ProcessedFileResult {
                path: p.clone(),
                outcome: o.map_err(|e| e.to_string()),
            }
        })
        .collect();
    Ok(r)
}
