//! The live, queryable symbol store.
//!
//! Per-file snapshots from the indexer are diffed against their predecessor
//! ([`IndexUpdate::delta`]) and the resulting update is merged into
//! [`QueryDb`], which keeps dense, stably-slotted vectors of file, function,
//! type, and variable records for the language-server read paths.

mod db;
mod file_def;
mod pipeline;
mod records;
mod update;

pub use db::QueryDb;
pub use file_def::build_file_def_update;
pub use pipeline::{PipelineClosed, QueryPipeline, SharedQueryDb};
pub use records::{FileDef, FileDefUpdate, QueryFile, QueryFunc, QueryType, QueryVar};
pub use update::{IndexUpdate, UseUpdate, UsrUpdate};
