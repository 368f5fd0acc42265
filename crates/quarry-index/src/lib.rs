//! Per-file index snapshots and their serialized forms.

mod serialize;
mod snapshot;

pub use serialize::*;
pub use snapshot::*;
