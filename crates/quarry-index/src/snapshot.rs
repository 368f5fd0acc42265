//! The immutable per-file fact bundle produced by one indexer run.
//!
//! A snapshot is consumed, not produced, by the query layer: the indexer
//! hands one over per translation unit, the delta computer moves its
//! collections into an update, and the snapshot is discarded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use quarry_core::{Range, Usr, Use};

/// Source language of an indexed translation unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageId {
    #[default]
    Unknown,
    C,
    Cpp,
    ObjC,
    ObjCpp,
}

/// An `#include` directive recorded for the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInclude {
    pub line: u32,
    pub resolved_path: String,
}

/// Access to a definition's display names.
///
/// `detailed_name` holds the fully qualified rendering; the short name is a
/// slice of it described by an offset and length. Out-of-range offsets
/// degrade to the empty string rather than failing.
pub trait DefName {
    fn detailed_name(&self) -> &str;
    fn short_name_span(&self) -> (usize, usize);

    fn name(&self, qualified: bool) -> &str {
        if qualified {
            return self.detailed_name();
        }
        let (offset, len) = self.short_name_span();
        self.detailed_name().get(offset..offset + len).unwrap_or("")
    }
}

macro_rules! impl_def_name {
    ($def:ident) => {
        impl DefName for $def {
            fn detailed_name(&self) -> &str {
                &self.detailed_name
            }

            fn short_name_span(&self) -> (usize, usize) {
                (self.short_name_offset as usize, self.short_name_len as usize)
            }
        }
    };
}

/// Definition record for a function.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FuncDef {
    pub detailed_name: String,
    pub short_name_offset: u32,
    pub short_name_len: u32,
    /// The naming range of the definition.
    pub spell: Option<Use>,
    /// The full lexical extent, body included.
    pub extent: Option<Use>,
    /// Call sites inside this function's body.
    pub callees: Vec<Use>,
}

/// Definition record for a type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub detailed_name: String,
    pub short_name_offset: u32,
    pub short_name_len: u32,
    pub spell: Option<Use>,
    pub extent: Option<Use>,
    /// Direct base types.
    pub bases: Vec<Usr>,
}

/// Definition record for a variable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VarDef {
    pub detailed_name: String,
    pub short_name_offset: u32,
    pub short_name_len: u32,
    pub spell: Option<Use>,
    pub extent: Option<Use>,
    /// The variable's type, when resolved.
    pub ty: Option<Usr>,
}

impl_def_name!(FuncDef);
impl_def_name!(TypeDef);
impl_def_name!(VarDef);

/// Per-function facts contributed by one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexFunc {
    pub usr: Usr,
    pub def: Option<FuncDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
    /// Functions overriding this one.
    pub derived: Vec<Usr>,
}

/// Per-type facts contributed by one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexType {
    pub usr: Usr,
    pub def: Option<TypeDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
    /// Types deriving from this one.
    pub derived: Vec<Usr>,
    /// Variables whose type this is.
    pub instances: Vec<Usr>,
}

/// Per-variable facts contributed by one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexVar {
    pub usr: Usr,
    pub def: Option<VarDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
}

/// Values stored in a USR-keyed snapshot collection.
pub trait HasUsr {
    fn usr(&self) -> Usr;
}

macro_rules! impl_has_usr {
    ($ty:ident) => {
        impl HasUsr for $ty {
            fn usr(&self) -> Usr {
                self.usr
            }
        }
    };
}

impl_has_usr!(IndexFunc);
impl_has_usr!(IndexType);
impl_has_usr!(IndexVar);

/// Everything one indexer run learned about one translation unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub path: String,
    /// Compile arguments the file was indexed with.
    pub args: Vec<String>,
    pub language: LanguageId,
    pub includes: Vec<IndexInclude>,
    /// `(path, last-write-time)` of files this translation unit depends on.
    pub dependencies: Vec<(String, i64)>,
    /// Regions disabled by the preprocessor.
    pub skipped_by_preprocessor: Vec<Range>,
    #[serde(with = "usr_keyed")]
    pub usr2type: HashMap<Usr, IndexType>,
    #[serde(with = "usr_keyed")]
    pub usr2func: HashMap<Usr, IndexFunc>,
    #[serde(with = "usr_keyed")]
    pub usr2var: HashMap<Usr, IndexVar>,
    pub file_contents: String,
}

impl IndexSnapshot {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn put_type(&mut self, ty: IndexType) {
        self.usr2type.insert(ty.usr, ty);
    }

    pub fn put_func(&mut self, func: IndexFunc) {
        self.usr2func.insert(func.usr, func);
    }

    pub fn put_var(&mut self, var: IndexVar) {
        self.usr2var.insert(var.usr, var);
    }
}

/// Serde adapter for the USR-keyed collections.
///
/// Every record already carries its USR, so the wire shape is a plain array
/// of records (sorted by USR so output is deterministic); decoding rebuilds
/// the map from the embedded keys.
mod usr_keyed {
    use std::collections::HashMap;

    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use quarry_core::Usr;

    use super::HasUsr;

    pub fn serialize<S, T>(map: &HashMap<Usr, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize + HasUsr,
    {
        let mut entries: Vec<&T> = map.values().collect();
        entries.sort_by_key(|entry| entry.usr());

        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for entry in entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<HashMap<Usr, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + HasUsr,
    {
        let entries = Vec::<T>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|entry| (entry.usr(), entry)).collect())
    }
}
