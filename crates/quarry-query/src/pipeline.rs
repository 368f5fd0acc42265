//! Single-writer update pipeline.
//!
//! The database itself is not synchronized; this module packages the
//! intended runtime discipline: one dedicated apply thread drains an
//! inbound queue and takes the write lock per update, while readers hold
//! the read lock for the duration of a request. Updates are applied in
//! submission order, which satisfies the per-file ordering requirement for
//! any single producer.

use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel as channel;

use crate::db::QueryDb;
use crate::update::IndexUpdate;

/// Shared handle readers use to reach the database.
pub type SharedQueryDb = Arc<RwLock<QueryDb>>;

/// The pipeline was shut down and accepts no further updates.
#[derive(Debug, thiserror::Error)]
#[error("query pipeline is shut down")]
pub struct PipelineClosed;

enum Task {
    Apply(Box<IndexUpdate>),
    Flush(channel::Sender<()>),
}

pub struct QueryPipeline {
    db: SharedQueryDb,
    sender: channel::Sender<Task>,
    worker: JoinHandle<()>,
}

impl QueryPipeline {
    /// Starts the apply thread over `db`.
    pub fn spawn(db: QueryDb) -> Self {
        let db = Arc::new(RwLock::new(db));
        let (sender, receiver) = channel::unbounded();
        let worker_db = Arc::clone(&db);
        let worker = thread::Builder::new()
            .name("quarry-query".to_string())
            .spawn(move || apply_loop(worker_db, receiver))
            .expect("failed to spawn query thread");
        Self { db, sender, worker }
    }

    /// Shared handle for readers. Hold the read lock only for the duration
    /// of one request; string slices borrowed from the database must not
    /// outlive the lock guard.
    pub fn db(&self) -> SharedQueryDb {
        Arc::clone(&self.db)
    }

    /// Enqueues an update. Updates submitted from one thread are applied in
    /// submission order.
    pub fn submit(&self, update: IndexUpdate) -> Result<(), PipelineClosed> {
        self.sender
            .send(Task::Apply(Box::new(update)))
            .map_err(|_| PipelineClosed)
    }

    /// Blocks until every previously submitted update has been applied.
    pub fn flush(&self) -> Result<(), PipelineClosed> {
        let (done, wait) = channel::bounded(1);
        self.sender
            .send(Task::Flush(done))
            .map_err(|_| PipelineClosed)?;
        wait.recv().map_err(|_| PipelineClosed)
    }

    /// Applies everything still queued, then stops the apply thread.
    pub fn shutdown(self) {
        let Self { db: _, sender, worker } = self;
        drop(sender);
        if worker.join().is_err() {
            tracing::error!("query thread panicked during shutdown");
        }
    }
}

fn apply_loop(db: SharedQueryDb, receiver: channel::Receiver<Task>) {
    while let Ok(task) = receiver.recv() {
        match task {
            Task::Apply(update) => {
                let mut db = db.write().expect("query db lock poisoned");
                db.apply(*update);
            }
            Task::Flush(done) => {
                // Tasks are handled in order, so reaching the marker means
                // every earlier update is visible to readers.
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("query pipeline drained, apply thread exiting");
}
