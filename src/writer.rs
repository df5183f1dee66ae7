use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use lmdb::Transaction;
use log::{debug, warn};

use crate::env::StoreInner;
use crate::error::{Error, Result};

/// A unit of work executed on the writer thread inside one write transaction.
pub(crate) type TxnOp = Box<dyn for<'e> FnOnce(&mut lmdb::RwTransaction<'e>) -> Result<()> + Send>;

/// One queued write: a transaction function plus its private reply channel.
pub(crate) struct WriteRequest {
    pub(crate) op: TxnOp,
    pub(crate) reply: Sender<Result<()>>,
}

pub(crate) enum WriteMessage {
    Run(WriteRequest),
    Shutdown,
}

/// Body of the dedicated writer thread.
///
/// This is the only place in the crate that begins a write transaction, so
/// the engine's one-writer-on-one-thread requirement holds for the life of
/// the environment. Requests are serviced strictly in channel order; the
/// shutdown message travels the same channel, so everything submitted before
/// it is serviced, then the environment is flushed and the thread exits.
pub(crate) fn run_writer(inner: Arc<StoreInner>, requests: Receiver<WriteMessage>) {
    debug!("write worker started");
    for message in requests {
        match message {
            WriteMessage::Run(request) => {
                let result = run_txn(&inner.env, request.op);
                // The submitting side may be gone; its result is then moot.
                let _ = request.reply.send(result);
            }
            WriteMessage::Shutdown => break,
        }
    }
    if let Err(err) = inner.env.sync(true) {
        warn!("final sync failed: {}", err);
    }
    debug!("write worker stopped");
}

/// Run one transaction function to completion: commit on success, abort on
/// error. The caller's error is surfaced verbatim.
fn run_txn(env: &lmdb::Environment, op: TxnOp) -> Result<()> {
    let mut txn = env.begin_rw_txn()?;
    match op(&mut txn) {
        Ok(()) => txn.commit().map_err(Error::from),
        Err(err) => {
            txn.abort();
            Err(err)
        }
    }
}
