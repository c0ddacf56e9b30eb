//! Error types for dataset verification and promotion.

use crate::promote::ConflictKind;
use crate::session::SessionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An input directory is missing or cannot be listed.
    #[error("cannot access directory '{path}': {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report file could not be created or written.
    #[error("failed to write report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read report '{path}': {source}")]
    ReportRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// One or both destination files already exist. Nothing was copied.
    #[error("{0}")]
    PromotionConflict(ConflictKind),

    /// A copy failed after the conflict check passed. Earlier copies are left in place.
    #[error("Failed to copy files: {path}: {source}")]
    PromotionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read text file '{path}': {source}")]
    TextRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save text: {path}: {source}")]
    TextSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, Error>;
