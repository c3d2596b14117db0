//! Typed errors for the I/O boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading graph input files.
#[derive(Debug, Error)]
pub enum GraphIoError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: malformed header: {line}")]
    MalformedHeader { path: PathBuf, line: String },
    #[error("{path}: malformed edge on line {line_no}: {line}")]
    MalformedEdge {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("{path}: expected {expected} edges in header, found {found}")]
    EdgeCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}
