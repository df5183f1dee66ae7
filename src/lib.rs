//! A serialized-writer key-value layer over LMDB.
//!
//! The engine allows any number of concurrent read transactions but exactly
//! one write transaction, which must run on a single thread. [`Store::open`]
//! spawns one dedicated writer thread owning that right; every mutating call
//! on a [`Db`] handle is packaged as a transaction function, queued to the
//! writer, and blocks until its transaction commits or aborts. Reads bypass
//! the writer entirely.

mod codec;
mod config;
mod db;
mod env;
mod error;
mod writer;

pub use codec::Codec;
pub use config::{DbConfig, StoreConfig};
pub use db::Db;
pub use env::Store;
pub use error::{Error, Result};

// Engine types that appear on the public surface.
pub use lmdb::{Environment, EnvironmentFlags, RwTransaction, WriteFlags};
