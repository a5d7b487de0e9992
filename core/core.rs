pub mod config;
pub mod excluder;
pub mod processor;

use std::path::PathBuf;

pub use config::{
    CliArgs, Command, CompletionArgs, DEFAULT_EXCLUSIONS, FileConfig, LinepruneArgs, ROOT_FILE,
    Settings,
};
pub use excluder::{
    ExclusionOutcome, FileReport, exclude, exclude_lines, exclude_lines_with_outcomes, preview,
    remove_first_line,
};
pub use processor::{Mode, ProcessedFileResult, process_files};

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("Read failed for {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}
