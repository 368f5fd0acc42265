//! Snapshot serialization.
//!
//! Snapshots round-trip through two formats: a self-describing textual one
//! (JSON, convenient to inspect and diff) and a compact binary one. Both are
//! version-gated; a snapshot written by an incompatible Quarry version reads
//! back as `None`, which callers treat as "no previous snapshot".

use serde::{Deserialize, Serialize};

use crate::snapshot::IndexSnapshot;

/// Bumped whenever the serialized snapshot shape changes incompatibly.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Length of the version header preceding a binary payload.
const BINARY_HEADER_LEN: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Self-describing JSON with the version embedded in the document.
    Json,
    /// A little-endian `u32` version header followed by a bincode payload.
    Binary,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    BinaryEncode(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    BinaryDecode(#[from] bincode::error::DecodeError),

    #[error("snapshot shorter than the 4-byte version header ({len} bytes)")]
    Truncated { len: usize },
}

#[derive(Serialize)]
struct VersionedSnapshotRef<'a> {
    version: u32,
    snapshot: &'a IndexSnapshot,
}

#[derive(Deserialize)]
struct VersionedSnapshot {
    #[allow(dead_code)]
    version: u32,
    snapshot: IndexSnapshot,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serializes `snapshot` in the requested format at the current version.
pub fn write_snapshot(
    format: SnapshotFormat,
    snapshot: &IndexSnapshot,
) -> Result<Vec<u8>, SnapshotError> {
    match format {
        SnapshotFormat::Json => {
            let versioned = VersionedSnapshotRef {
                version: SNAPSHOT_FORMAT_VERSION,
                snapshot,
            };
            Ok(serde_json::to_vec_pretty(&versioned)?)
        }
        SnapshotFormat::Binary => {
            let mut out = Vec::with_capacity(BINARY_HEADER_LEN + 1024);
            out.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
            let payload = bincode::serde::encode_to_vec(snapshot, bincode::config::standard())?;
            out.extend_from_slice(&payload);
            Ok(out)
        }
    }
}

/// Deserializes a snapshot written by [`write_snapshot`].
///
/// Returns `Ok(None)` when the stored version differs from
/// `expected_version` (defaulting to [`SNAPSHOT_FORMAT_VERSION`]); callers
/// treat that the same as a missing snapshot. Malformed payloads are errors.
pub fn read_snapshot(
    format: SnapshotFormat,
    bytes: &[u8],
    expected_version: Option<u32>,
) -> Result<Option<IndexSnapshot>, SnapshotError> {
    let expected = expected_version.unwrap_or(SNAPSHOT_FORMAT_VERSION);
    match format {
        SnapshotFormat::Json => {
            let probe: VersionProbe = serde_json::from_slice(bytes)?;
            if probe.version != expected {
                return Ok(None);
            }
            let versioned: VersionedSnapshot = serde_json::from_slice(bytes)?;
            Ok(Some(versioned.snapshot))
        }
        SnapshotFormat::Binary => {
            let Some(header) = bytes.get(..BINARY_HEADER_LEN) else {
                return Err(SnapshotError::Truncated { len: bytes.len() });
            };
            let version = u32::from_le_bytes(header.try_into().expect("4-byte header slice"));
            if version != expected {
                return Ok(None);
            }
            let (snapshot, _) = bincode::serde::decode_from_slice(
                &bytes[BINARY_HEADER_LEN..],
                bincode::config::standard(),
            )?;
            Ok(Some(snapshot))
        }
    }
}
