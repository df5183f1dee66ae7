use std::sync::Arc;

use lmdb::{RwTransaction, Transaction, WriteFlags};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::env::StoreInner;
use crate::error::{Error, Result};

/// Handle to one named database inside a [`Store`].
///
/// Obtained from [`Store::database`] or [`Store::single_database`]; never
/// construct it directly. Handles are cheap to clone and safe to use from
/// any thread. Mutating calls block until the writer thread has committed or
/// aborted the transaction; reads run on the calling thread and never wait
/// on the writer.
///
/// [`Store`]: crate::Store
/// [`Store::database`]: crate::Store::database
/// [`Store::single_database`]: crate::Store::single_database
#[derive(Clone)]
pub struct Db {
    db: lmdb::Database,
    codec: Codec,
    inner: Arc<StoreInner>,
}

impl Db {
    pub(crate) fn new(db: lmdb::Database, codec: Codec, inner: Arc<StoreInner>) -> Db {
        Db { db, codec, inner }
    }

    /// Encode `value` with the configured codec and store it under `key`.
    ///
    /// Either the key maps to the new value afterwards or, on any error, the
    /// database is unchanged. Encoding failures surface as [`Error::Encode`]
    /// before anything is submitted to the writer.
    pub fn put<T>(&self, key: &[u8], value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = self.codec.encode(value)?;
        self.put_owned(key.to_vec(), bytes)
    }

    /// Store `value` under `key` verbatim, bypassing the codec.
    pub fn put_bytes(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.put_owned(key.to_vec(), value.to_vec())
    }

    fn put_owned(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let db = self.db;
        self.inner
            .submit(Box::new(move |txn: &mut RwTransaction<'_>| {
                txn.put(db, &key, &value, WriteFlags::empty())
                    .map_err(Error::from)
            }))
    }

    /// Return a copy of the bytes stored under `key`, safe to retain after
    /// the read transaction ends.
    ///
    /// Absent keys yield [`Error::NotFound`].
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.inner.check_open()?;
        let txn = self.inner.env.begin_ro_txn()?;
        let bytes = txn.get(self.db, &key)?.to_vec();
        Ok(bytes)
    }

    /// Read the value under `key` and decode it with the configured codec.
    ///
    /// A stored zero-length value is a decode error, not an empty value.
    pub fn get_as<T>(&self, key: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get(key)?;
        if bytes.is_empty() {
            return Err(Error::Decode("zero-length value stored".into()));
        }
        self.codec.decode(&bytes)
    }

    /// Delete the value stored under `key`.
    ///
    /// Deleting an absent key reports the engine's [`Error::NotFound`].
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let db = self.db;
        let key = key.to_vec();
        self.inner
            .submit(Box::new(move |txn: &mut RwTransaction<'_>| {
                txn.del(db, &key, None).map_err(Error::from)
            }))
    }

    /// Remove every key from the database, keeping the database itself open
    /// and usable.
    pub fn clear(&self) -> Result<()> {
        let db = self.db;
        self.inner
            .submit(Box::new(move |txn: &mut RwTransaction<'_>| {
                txn.clear_db(db).map_err(Error::from)
            }))
    }

    /// Run an arbitrary transaction function on the writer thread.
    ///
    /// The function may touch any database in the environment; a returned
    /// error aborts the whole transaction and is surfaced verbatim. Blocks
    /// until the transaction has been committed or aborted.
    pub fn update<F>(&self, op: F) -> Result<()>
    where
        F: for<'e> FnOnce(&mut RwTransaction<'e>) -> Result<()> + Send + 'static,
    {
        self.inner.submit(Box::new(op))
    }

    /// The engine-level database handle, for use inside [`Db::update`]
    /// transaction functions.
    pub fn handle(&self) -> lmdb::Database {
        self.db
    }
}
