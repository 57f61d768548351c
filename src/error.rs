//! Error types for capacity selection and file persistence.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Prime selection was asked for a size it cannot serve.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    #[error("requested size {requested} is too small to hold a prime")]
    TooSmall { requested: usize },
    #[error("requested size {requested} exceeds the supported maximum {max}")]
    TooLarge { requested: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read records: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write records: {0}")]
    Write(#[source] io::Error),
}
