use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

/// Errors surfaced by document generation, keyword checks and data loading.
///
/// Problems inside a single markup unit (a placeholder that cannot be mapped back
/// onto the markup, an out-of-range splice) are never errors; they are collected as
/// [`Diagnostic`](crate::Diagnostic)s in the returned report instead.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("failed to open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid office archive: {source}", path.display())]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive error: {0}")]
    Zip(#[from] ZipError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("error reading data file {}: {source}", path.display())]
    DataFile {
        path: PathBuf,
        #[source]
        source: Box<ForgeError>,
    },

    #[error("unsupported data file format: {0} (use .json or .csv)")]
    UnsupportedDataFormat(String),

    #[error("unsupported document format: {0} (use docx, pptx or xlsx)")]
    UnsupportedDocument(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("no records found in data file")]
    NoRecords,
}

impl ForgeError {
    pub(crate) fn data_file(path: impl Into<PathBuf>, source: ForgeError) -> Self {
        ForgeError::DataFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
