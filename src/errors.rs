use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::LineIndex;

/// Error type for pipeline configuration, IO, parsing, and pairing failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("bundle file '{}' is malformed: {reason}", path.display())]
    MalformedBundle { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("line index {index} is out of range for a corpus of {total} lines")]
    LineOutOfRange { index: LineIndex, total: usize },
    #[error("pairing error: {0}")]
    Pairing(String),
}
