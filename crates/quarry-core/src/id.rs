//! Strongly-typed IDs used across Quarry.
//!
//! These are `#[repr(transparent)]` newtypes to keep them cheap and
//! type-safe.

use serde::{Deserialize, Serialize};

/// Unified symbol resolver: an opaque, stable 64-bit identifier for a
/// semantic entity. The same entity hashes to the same `Usr` across indexer
/// runs.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Usr(u64);

impl Usr {
    /// Reserved sentinel values. Neither may ever be stored in an index map
    /// or entity vector; delta application filters them out.
    pub const RESERVED: [Usr; 2] = [Usr(!0u64), Usr(!0u64 - 1)];

    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 == !0u64 || self.0 == !0u64 - 1
    }
}

impl std::fmt::Debug for Usr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Usr({})", self.0)
    }
}

impl From<u64> for Usr {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Copy,
            Clone,
            Default,
            Eq,
            PartialEq,
            Hash,
            Ord,
            PartialOrd,
            Serialize,
            Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn to_raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    FileId,
    "Dense slot of a file in the query database. Stable for process lifetime \
     once allocated; never reused for a different path."
);
