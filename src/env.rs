use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Sender};
use lmdb::{DatabaseFlags, Environment};
use log::warn;

use crate::config::StoreConfig;
use crate::db::Db;
use crate::error::{Error, Result};
use crate::writer::{run_writer, TxnOp, WriteMessage, WriteRequest};

/// State shared between the store, its database handles and the writer
/// thread.
pub(crate) struct StoreInner {
    pub(crate) env: Environment,
    sender: Sender<WriteMessage>,
    closed: AtomicBool,
}

impl StoreInner {
    /// Hand a transaction function to the writer thread and block until it
    /// has been committed or aborted.
    pub(crate) fn submit(&self, op: TxnOp) -> Result<()> {
        self.check_open()?;
        let (reply, outcome) = bounded(1);
        self.sender
            .send(WriteMessage::Run(WriteRequest { op, reply }))
            .map_err(|_| Error::Closed)?;
        // A dropped reply means the worker shut down before reaching us.
        outcome.recv().unwrap_or(Err(Error::Closed))
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }
        Ok(())
    }
}

/// Handle to one open storage environment and its named databases.
///
/// Created by [`Store::open`]; never construct the struct directly. The
/// store and every [`Db`] obtained from it become unusable once it is
/// closed.
pub struct Store {
    inner: Arc<StoreInner>,
    databases: HashMap<String, Db>,
    worker: Option<JoinHandle<()>>,
}

impl Store {
    /// Open the environment described by `config` and start the writer
    /// thread.
    ///
    /// Every configured database is created or opened before the worker
    /// starts; any failing step aborts the whole initialization and leaves
    /// nothing callable behind.
    pub fn open(config: StoreConfig) -> Result<Store> {
        if config.databases.is_empty() {
            return Err(Error::NoDatabases);
        }
        let env = Environment::new()
            .set_flags(config.flags)
            .set_map_size(config.map_size)
            .set_max_readers(config.max_readers)
            .set_max_dbs(config.databases.len() as u32)
            .open_with_permissions(&config.path, config.mode as _)?;

        let (sender, requests) = unbounded();
        let inner = Arc::new(StoreInner {
            env,
            sender,
            closed: AtomicBool::new(false),
        });

        // The worker does not exist yet, so creating databases with the
        // engine's own write transactions keeps the single-writer rule.
        let mut databases = HashMap::with_capacity(config.databases.len());
        for db_config in &config.databases {
            if databases.contains_key(&db_config.name) {
                return Err(Error::DuplicateDatabase(db_config.name.clone()));
            }
            let handle = inner
                .env
                .create_db(Some(&db_config.name), DatabaseFlags::empty())?;
            let codec = db_config.codec.or(config.codec).unwrap_or_default();
            databases.insert(
                db_config.name.clone(),
                Db::new(handle, codec, Arc::clone(&inner)),
            );
        }

        let worker_inner = Arc::clone(&inner);
        let worker = thread::Builder::new()
            .name("lumostore-writer".into())
            .spawn(move || run_writer(worker_inner, requests))?;

        Ok(Store {
            inner,
            databases,
            worker: Some(worker),
        })
    }

    /// Look up a database handle by name. Unknown names return `None`, not
    /// an error.
    pub fn database(&self, name: &str) -> Option<Db> {
        self.databases.get(name).cloned()
    }

    /// Return the sole database handle.
    ///
    /// Fails unless exactly one database is configured.
    pub fn single_database(&self) -> Result<Db> {
        match self.databases.len() {
            1 => self
                .databases
                .values()
                .next()
                .cloned()
                .ok_or(Error::NoDatabases),
            n => Err(Error::NotSingleDatabase(n)),
        }
    }

    /// Direct access to the underlying engine environment.
    pub fn env(&self) -> &Environment {
        &self.inner.env
    }

    /// Flush to disk and stop the writer thread.
    ///
    /// Requests fully submitted before this call are serviced first; any
    /// submission afterwards fails with [`Error::Closed`]. The store and all
    /// of its database handles are unusable once this returns.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Err(Error::Closed);
        }
        self.inner
            .sender
            .send(WriteMessage::Shutdown)
            .map_err(|_| Error::Closed)?;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("write worker panicked during shutdown");
            }
        }
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        // A store dropped without an explicit close still flushes and stops
        // its worker.
        let _ = self.shutdown();
    }
}
