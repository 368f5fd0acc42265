//! Dense records held by the query database.
//!
//! Entity slots are allocated once and never move (erasure is logical: the
//! def list empties, the slot stays), so integer handles held by other
//! subsystems stay valid across updates.

use quarry_core::{FileId, Range, SymbolRef, Usr, Use};
use quarry_index::{FuncDef, IndexInclude, LanguageId, TypeDef, VarDef};

/// Per-file presentation record, rebuilt wholesale on every reindex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileDef {
    pub path: String,
    pub args: Vec<String>,
    pub language: LanguageId,
    pub includes: Vec<IndexInclude>,
    /// Symbols shown by document-symbol requests, sorted by `range.start`.
    pub outline: Vec<SymbolRef>,
    /// Every symbol occurrence in the file, sorted by `range.start`.
    pub all_symbols: Vec<SymbolRef>,
    /// Regions disabled by the preprocessor.
    pub inactive_regions: Vec<Range>,
    pub dependencies: Vec<String>,
}

/// A freshly built [`FileDef`] plus the file content it was built from.
///
/// The content is captured so semantic-token and position-to-text mapping
/// see exactly the text the indexer saw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileDefUpdate {
    pub def: FileDef,
    pub file_content: String,
}

#[derive(Clone, Debug, Default)]
pub struct QueryFile {
    pub id: FileId,
    /// `None` after the file is removed from the project; the slot remains.
    pub def: Option<FileDef>,
    pub content: String,
}

impl QueryFile {
    pub(crate) fn new(id: FileId) -> Self {
        Self {
            id,
            def: None,
            content: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QueryFunc {
    pub usr: Usr,
    /// At most one def per defining file.
    pub def: Vec<FuncDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
    pub derived: Vec<Usr>,
}

#[derive(Clone, Debug, Default)]
pub struct QueryType {
    pub usr: Usr,
    pub def: Vec<TypeDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
    pub derived: Vec<Usr>,
    pub instances: Vec<Usr>,
}

#[derive(Clone, Debug, Default)]
pub struct QueryVar {
    pub usr: Usr,
    pub def: Vec<VarDef>,
    pub declarations: Vec<Use>,
    pub uses: Vec<Use>,
}

macro_rules! impl_any_def {
    ($entity:ident, $def:ty) => {
        impl $entity {
            /// The preferred def for display purposes: the last def carrying
            /// a spell, else the last def. Names resolve to the definition
            /// when one exists, not to a bare declaration.
            pub fn any_def(&self) -> Option<&$def> {
                self.def
                    .iter()
                    .rev()
                    .find(|def| def.spell.is_some())
                    .or_else(|| self.def.last())
            }
        }
    };
}

impl_any_def!(QueryFunc, FuncDef);
impl_any_def!(QueryType, TypeDef);
impl_any_def!(QueryVar, VarDef);
