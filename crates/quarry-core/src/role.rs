//! Role flags attached to a symbol occurrence.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitset describing how a symbol occurs at a use site.
///
/// Roles combine bitwise: a definition site is typically
/// `Role::DECLARATION | Role::DEFINITION`.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Role(u16);

impl Role {
    pub const NONE: Role = Role(0);
    pub const DECLARATION: Role = Role(1 << 0);
    pub const DEFINITION: Role = Role(1 << 1);
    pub const REFERENCE: Role = Role(1 << 2);
    pub const READ: Role = Role(1 << 3);
    pub const WRITE: Role = Role(1 << 4);
    pub const CALL: Role = Role(1 << 5);
    pub const DYNAMIC: Role = Role(1 << 6);
    pub const ADDRESS: Role = Role(1 << 7);
    /// Compiler-synthesized occurrence, e.g. an implicit constructor call.
    /// Triggers column widening when building a file's symbol list.
    pub const IMPLICIT: Role = Role(1 << 8);

    #[inline]
    pub const fn contains(self, other: Role) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Role) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }
}

impl BitOr for Role {
    type Output = Role;

    fn bitor(self, rhs: Role) -> Role {
        Role(self.0 | rhs.0)
    }
}

impl BitOrAssign for Role {
    fn bitor_assign(&mut self, rhs: Role) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Role {
    type Output = Role;

    fn bitand(self, rhs: Role) -> Role {
        Role(self.0 & rhs.0)
    }
}

impl std::fmt::Debug for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [(Role, &str); 9] = [
            (Role::DECLARATION, "Declaration"),
            (Role::DEFINITION, "Definition"),
            (Role::REFERENCE, "Reference"),
            (Role::READ, "Read"),
            (Role::WRITE, "Write"),
            (Role::CALL, "Call"),
            (Role::DYNAMIC, "Dynamic"),
            (Role::ADDRESS, "Address"),
            (Role::IMPLICIT, "Implicit"),
        ];

        if self.0 == 0 {
            return write!(f, "Role(None)");
        }
        write!(f, "Role(")?;
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}
