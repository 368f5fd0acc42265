//! Symbol identities and occurrence records.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::id::{FileId, Usr};
use crate::role::Role;
use crate::text::Range;

/// The coarse kind of a symbol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    #[default]
    Invalid,
    File,
    Type,
    Func,
    Var,
}

/// `(kind, usr)` pair identifying a symbol in the query database.
///
/// For `kind == File` the `usr` holds the file's dense slot rather than a
/// semantic hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId {
    pub usr: Usr,
    pub kind: SymbolKind,
}

impl SymbolId {
    #[inline]
    pub const fn new(kind: SymbolKind, usr: Usr) -> Self {
        Self { usr, kind }
    }

    #[inline]
    pub fn file(file_id: FileId) -> Self {
        Self {
            usr: Usr::new(file_id.to_raw() as u64),
            kind: SymbolKind::File,
        }
    }
}

/// A referenced occurrence of a symbol inside some file.
///
/// `file_id` is undefined until the query database applies the containing
/// update; snapshot-time uses carry the default slot.
///
/// Equality and hashing cover `(range, file_id)` only: a file contributes at
/// most one use per range, and contribution subtraction during merge relies
/// on exactly this identity.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Use {
    pub range: Range,
    pub usr: Usr,
    pub kind: SymbolKind,
    pub role: Role,
    pub file_id: FileId,
}

impl Use {
    pub const fn new(range: Range, usr: Usr, kind: SymbolKind, role: Role) -> Self {
        Self {
            range,
            usr,
            kind,
            role,
            file_id: FileId::from_raw(0),
        }
    }
}

impl PartialEq for Use {
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range && self.file_id == other.file_id
    }
}

impl Eq for Use {}

impl Hash for Use {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.range.hash(state);
        self.file_id.hash(state);
    }
}

/// A symbol occurrence inside a known file; the containing `FileDef` implies
/// the file, so no `file_id` is carried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRef {
    pub range: Range,
    pub usr: Usr,
    pub kind: SymbolKind,
    pub role: Role,
}

impl SymbolRef {
    pub const fn new(range: Range, usr: Usr, kind: SymbolKind, role: Role) -> Self {
        Self {
            range,
            usr,
            kind,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Range;

    #[test]
    fn use_identity_is_range_and_file() {
        let mut a = Use::new(
            Range::on_line(1, 2, 5),
            Usr::new(7),
            SymbolKind::Type,
            Role::REFERENCE,
        );
        let mut b = Use::new(
            Range::on_line(1, 2, 5),
            Usr::new(9),
            SymbolKind::Func,
            Role::CALL,
        );
        // Different usr/kind/role, same (range, file_id): equal.
        assert_eq!(a, b);

        b.file_id = FileId::from_raw(3);
        assert_ne!(a, b);

        a.file_id = FileId::from_raw(3);
        assert_eq!(a, b);
    }

    #[test]
    fn file_symbol_id_wraps_the_slot() {
        let id = SymbolId::file(FileId::from_raw(12));
        assert_eq!(id.kind, SymbolKind::File);
        assert_eq!(id.usr.to_raw(), 12);
    }
}
