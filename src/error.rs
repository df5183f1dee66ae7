use std::io;
use std::result;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = result::Result<T, Error>;

/// Unified error type for store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration declares no databases.
    #[error("no databases configured")]
    NoDatabases,
    /// The same database name is configured more than once.
    #[error("database {0:?} is configured more than once")]
    DuplicateDatabase(String),
    /// The store holds a number of databases other than exactly one.
    #[error("store is configured with {0} databases, not exactly 1")]
    NotSingleDatabase(usize),
    /// No value stored under the requested key.
    #[error("key not found")]
    NotFound,
    /// Value encoding failed.
    #[error("value encoding failed: {0}")]
    Encode(String),
    /// Value decoding failed, or a zero-length value was stored.
    #[error("value decoding failed: {0}")]
    Decode(String),
    /// The store has been closed; no further operations are possible.
    #[error("store is closed")]
    Closed,
    /// Operating-system level failure.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// Any other failure reported by the storage engine.
    #[error("storage engine error: {0}")]
    Engine(lmdb::Error),
}

impl From<lmdb::Error> for Error {
    fn from(err: lmdb::Error) -> Error {
        match err {
            lmdb::Error::NotFound => Error::NotFound,
            err => Error::Engine(err),
        }
    }
}
