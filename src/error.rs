// Error kinds for the library.
//
// Callers decide per operation whether an error is fatal: file and parse
// errors are scoped to a single document, store errors abort the batch they
// happened in, and only a failure to open the store ends the process.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A file or directory is missing or unreadable.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frequency-map file is not a flat `{ "token": count }` object.
    #[error("Malformed frequency map in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The vector norm is zero, so token weights are undefined.
    #[error("Degenerate vector for {document}: norm is zero")]
    DegenerateVector { document: String },

    /// Connection, prepare, bind or step failure against the store.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The store could not be opened at all.
    #[error("Failed to open store at {}: {source}", path.display())]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn degenerate(document: impl Into<String>) -> Self {
        Self::DegenerateVector {
            document: document.into(),
        }
    }

    /// True for the kinds that only affect one document (I/O and parse).
    pub fn is_per_document(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
