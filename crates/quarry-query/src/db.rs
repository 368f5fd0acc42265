//! The query database and its apply path.
//!
//! Writes are not internally synchronized: the surrounding runtime applies
//! updates from a single thread and shields readers with a reader-writer
//! lock (see [`crate::pipeline`]). All operations here are CPU-bound and
//! deterministic.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use quarry_core::{path_key, platform_case_sensitive, FileId, SymbolId, SymbolKind, Usr, Use};
use quarry_index::{DefName, FuncDef, TypeDef, VarDef};

use crate::records::{FileDefUpdate, QueryFile, QueryFunc, QueryType, QueryVar};
use crate::update::IndexUpdate;

/// Stamps the containing file onto a use site. File-kind references are
/// re-pointed at the file slot so they index `files` directly.
fn stamp_use(use_site: &mut Use, file_id: FileId) {
    if use_site.kind == SymbolKind::File {
        use_site.usr = Usr::new(file_id.to_raw() as u64);
    }
    use_site.file_id = file_id;
}

/// A definition record stored in an entity's def list.
trait EntityDef: DefName {
    fn spell(&self) -> Option<&Use>;
    fn stamp_file_id(&mut self, file_id: FileId);

    fn spell_file_id(&self) -> Option<FileId> {
        self.spell().map(|spell| spell.file_id)
    }
}

impl EntityDef for FuncDef {
    fn spell(&self) -> Option<&Use> {
        self.spell.as_ref()
    }

    fn stamp_file_id(&mut self, file_id: FileId) {
        if let Some(spell) = &mut self.spell {
            stamp_use(spell, file_id);
        }
        if let Some(extent) = &mut self.extent {
            stamp_use(extent, file_id);
        }
        for callee in &mut self.callees {
            stamp_use(callee, file_id);
        }
    }
}

impl EntityDef for TypeDef {
    fn spell(&self) -> Option<&Use> {
        self.spell.as_ref()
    }

    fn stamp_file_id(&mut self, file_id: FileId) {
        if let Some(spell) = &mut self.spell {
            stamp_use(spell, file_id);
        }
        if let Some(extent) = &mut self.extent {
            stamp_use(extent, file_id);
        }
    }
}

impl EntityDef for VarDef {
    fn spell(&self) -> Option<&Use> {
        self.spell.as_ref()
    }

    fn stamp_file_id(&mut self, file_id: FileId) {
        if let Some(spell) = &mut self.spell {
            stamp_use(spell, file_id);
        }
        if let Some(extent) = &mut self.extent {
            stamp_use(extent, file_id);
        }
    }
}

/// An entity record living in one of the dense vectors.
trait Entity: Default {
    type Def: EntityDef;

    fn set_usr(&mut self, usr: Usr);
    fn defs_mut(&mut self) -> &mut Vec<Self::Def>;
}

macro_rules! impl_entity {
    ($entity:ident, $def:ident) => {
        impl Entity for $entity {
            type Def = $def;

            fn set_usr(&mut self, usr: Usr) {
                self.usr = usr;
            }

            fn defs_mut(&mut self) -> &mut Vec<$def> {
                &mut self.def
            }
        }
    };
}

impl_entity!(QueryFunc, FuncDef);
impl_entity!(QueryType, TypeDef);
impl_entity!(QueryVar, VarDef);

/// An element of a per-entity contribution list.
trait MergeItem: Copy + Eq + Hash {
    fn stamp_file_id(&mut self, file_id: FileId);
}

impl MergeItem for Use {
    fn stamp_file_id(&mut self, file_id: FileId) {
        stamp_use(self, file_id);
    }
}

impl MergeItem for Usr {
    fn stamp_file_id(&mut self, _file_id: FileId) {}
}

/// Resolves the slot for `usr`, allocating a fresh entry at the end of the
/// vector on first contribution.
fn slot_for<Q: Entity>(
    usr_to_slot: &mut HashMap<Usr, usize>,
    entities: &mut Vec<Q>,
    usr: Usr,
) -> usize {
    let slot = match usr_to_slot.entry(usr) {
        Entry::Occupied(entry) => *entry.get(),
        Entry::Vacant(entry) => {
            let slot = entities.len();
            let mut entity = Q::default();
            entity.set_usr(usr);
            entities.push(entity);
            entry.insert(slot);
            slot
        }
    };
    // Slot allocation and the entity vector advance together; divergence is
    // a programming error, not recoverable data corruption.
    assert_eq!(
        usr_to_slot.len(),
        entities.len(),
        "entity slot map out of sync with entity vector"
    );
    slot
}

/// Removes from `list` every element whose identity matches one in
/// `to_remove`. For use lists the identity is `(range, file_id)`.
fn remove_range<T: MergeItem>(list: &mut Vec<T>, to_remove: &[T]) {
    if to_remove.is_empty() {
        return;
    }
    let removals: HashSet<T> = to_remove.iter().copied().collect();
    list.retain(|item| !removals.contains(item));
}

/// Merges one per-entity contribution list: subtract what the file
/// contributed before, then append what it contributes now.
///
/// The new contribution is subtracted too before appending, so re-applying
/// the same update (an indexer retry, a re-delivered queue entry) cannot
/// duplicate entries.
fn handle_mergeable<Q: Entity, T: MergeItem>(
    file_id: Option<FileId>,
    update: &mut HashMap<Usr, (Vec<T>, Vec<T>)>,
    usr_to_slot: &mut HashMap<Usr, usize>,
    entities: &mut Vec<Q>,
    list: fn(&mut Q) -> &mut Vec<T>,
) {
    for (usr, (mut previous, mut new)) in update.drain() {
        if usr.is_reserved() {
            continue;
        }
        if let Some(file_id) = file_id {
            for item in &mut previous {
                item.stamp_file_id(file_id);
            }
            for item in &mut new {
                item.stamp_file_id(file_id);
            }
        }

        let slot = slot_for(usr_to_slot, entities, usr);
        let target = list(&mut entities[slot]);
        remove_range(target, &previous);
        remove_range(target, &new);
        target.extend_from_slice(&new);
    }
}

/// Erases, for each listed USR, the def contributed by `file_id`. Unknown
/// USRs are tolerated: an earlier update may already have dropped them.
fn remove_file_defs<Q: Entity>(
    file_id: Option<FileId>,
    usr_to_slot: &HashMap<Usr, usize>,
    entities: &mut Vec<Q>,
    to_remove: &[Usr],
) {
    let Some(file_id) = file_id else {
        return;
    };
    for usr in to_remove {
        let Some(&slot) = usr_to_slot.get(usr) else {
            continue;
        };
        let defs = entities[slot].defs_mut();
        if let Some(pos) = defs
            .iter()
            .position(|def| def.spell_file_id() == Some(file_id))
        {
            defs.remove(pos);
        }
    }
}

/// Inserts or replaces defs contributed by `file_id`, keeping at most one
/// def per defining file on each entity.
fn update_defs<Q: Entity>(
    file_id: Option<FileId>,
    usr_to_slot: &mut HashMap<Usr, usize>,
    entities: &mut Vec<Q>,
    updates: Vec<(Usr, Q::Def)>,
) {
    for (usr, mut def) in updates {
        if usr.is_reserved() {
            continue;
        }
        debug_assert!(
            !def.detailed_name().is_empty(),
            "delta computation drops unnamed defs"
        );
        if let Some(file_id) = file_id {
            def.stamp_file_id(file_id);
        }

        let slot = slot_for(usr_to_slot, entities, usr);
        let entity = &mut entities[slot];
        entity.set_usr(usr);

        let target_file = def.spell_file_id();
        let defs = entity.defs_mut();
        match defs
            .iter_mut()
            .find(|existing| existing.spell_file_id() == target_file)
        {
            Some(existing) => *existing = def,
            None => defs.push(def),
        }
    }
}

/// The in-memory symbol query database.
///
/// Heavily optimized for reads: entities live in dense vectors indexed by
/// stable integer slots, with `USR → slot` maps alongside. Cross-references
/// between entities go through USRs, never through references into the
/// vectors.
pub struct QueryDb {
    files: Vec<QueryFile>,
    name2file_id: HashMap<String, FileId>,

    funcs: Vec<QueryFunc>,
    types: Vec<QueryType>,
    vars: Vec<QueryVar>,
    func_usr: HashMap<Usr, usize>,
    type_usr: HashMap<Usr, usize>,
    var_usr: HashMap<Usr, usize>,

    case_sensitive: bool,
}

impl Default for QueryDb {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryDb {
    pub fn new() -> Self {
        Self::with_case_sensitivity(platform_case_sensitive())
    }

    /// Overrides the platform default for path lookup, mainly for tests.
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            files: Vec::new(),
            name2file_id: HashMap::new(),
            funcs: Vec::new(),
            types: Vec::new(),
            vars: Vec::new(),
            func_usr: HashMap::new(),
            type_usr: HashMap::new(),
            var_usr: HashMap::new(),
            case_sensitive,
        }
    }

    /// Merges `update` into the database and returns the file slot the
    /// update was bound to (`None` for a removal of an unknown path).
    ///
    /// Readers must not observe the database mid-call; the caller serializes
    /// writes and holds the write side of the surrounding lock.
    pub fn apply(&mut self, update: IndexUpdate) -> Option<FileId> {
        let IndexUpdate {
            files_removed,
            files_def_update,
            funcs_removed,
            funcs_def_update,
            mut funcs_declarations,
            mut funcs_uses,
            mut funcs_derived,
            types_removed,
            types_def_update,
            mut types_declarations,
            mut types_uses,
            mut types_derived,
            mut types_instances,
            vars_removed,
            vars_def_update,
            mut vars_declarations,
            mut vars_uses,
        } = update;

        tracing::debug!(
            updated = files_def_update.as_ref().map(|u| u.def.path.as_str()),
            removed = files_removed.as_deref(),
            "applying index update"
        );

        // A pure removal binds to the removed path's slot so the per-kind
        // removals below erase that file's defs.
        let mut file_id = files_removed
            .as_deref()
            .and_then(|path| self.clear_file(path));
        if let Some(def_update) = files_def_update {
            file_id = Some(self.update_file(def_update));
        }

        remove_file_defs(file_id, &self.func_usr, &mut self.funcs, &funcs_removed);
        update_defs(file_id, &mut self.func_usr, &mut self.funcs, funcs_def_update);
        handle_mergeable(
            file_id,
            &mut funcs_declarations,
            &mut self.func_usr,
            &mut self.funcs,
            |func| &mut func.declarations,
        );
        handle_mergeable(
            file_id,
            &mut funcs_derived,
            &mut self.func_usr,
            &mut self.funcs,
            |func| &mut func.derived,
        );
        handle_mergeable(
            file_id,
            &mut funcs_uses,
            &mut self.func_usr,
            &mut self.funcs,
            |func| &mut func.uses,
        );

        remove_file_defs(file_id, &self.type_usr, &mut self.types, &types_removed);
        update_defs(file_id, &mut self.type_usr, &mut self.types, types_def_update);
        handle_mergeable(
            file_id,
            &mut types_declarations,
            &mut self.type_usr,
            &mut self.types,
            |ty| &mut ty.declarations,
        );
        handle_mergeable(
            file_id,
            &mut types_derived,
            &mut self.type_usr,
            &mut self.types,
            |ty| &mut ty.derived,
        );
        handle_mergeable(
            file_id,
            &mut types_instances,
            &mut self.type_usr,
            &mut self.types,
            |ty| &mut ty.instances,
        );
        handle_mergeable(
            file_id,
            &mut types_uses,
            &mut self.type_usr,
            &mut self.types,
            |ty| &mut ty.uses,
        );

        remove_file_defs(file_id, &self.var_usr, &mut self.vars, &vars_removed);
        update_defs(file_id, &mut self.var_usr, &mut self.vars, vars_def_update);
        handle_mergeable(
            file_id,
            &mut vars_declarations,
            &mut self.var_usr,
            &mut self.vars,
            |var| &mut var.declarations,
        );
        handle_mergeable(
            file_id,
            &mut vars_uses,
            &mut self.var_usr,
            &mut self.vars,
            |var| &mut var.uses,
        );

        file_id
    }

    /// Clears the file record for `path`, keeping the slot. Unknown paths
    /// are tolerated.
    fn clear_file(&mut self, path: &str) -> Option<FileId> {
        let key = path_key(path, self.case_sensitive);
        let file_id = self.name2file_id.get(&key).copied()?;
        let file = &mut self.files[file_id.index()];
        file.def = None;
        file.content.clear();
        Some(file_id)
    }

    fn update_file(&mut self, update: FileDefUpdate) -> FileId {
        let key = path_key(&update.def.path, self.case_sensitive);
        let file_id = match self.name2file_id.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let file_id = FileId::from_raw(self.files.len() as u32);
                self.files.push(QueryFile::new(file_id));
                *entry.insert(file_id)
            }
        };
        let file = &mut self.files[file_id.index()];
        file.def = Some(update.def);
        file.content = update.file_content;
        file_id
    }

    // --- read path -------------------------------------------------------

    pub fn has_func(&self, usr: Usr) -> bool {
        self.func_usr.contains_key(&usr)
    }

    pub fn has_type(&self, usr: Usr) -> bool {
        self.type_usr.contains_key(&usr)
    }

    pub fn has_var(&self, usr: Usr) -> bool {
        self.var_usr.contains_key(&usr)
    }

    /// Panics when `usr` has no slot; check with [`QueryDb::has_func`] first.
    pub fn func(&self, usr: Usr) -> &QueryFunc {
        &self.funcs[self.func_usr[&usr]]
    }

    /// Panics when `usr` has no slot; check with [`QueryDb::has_type`] first.
    pub fn ty(&self, usr: Usr) -> &QueryType {
        &self.types[self.type_usr[&usr]]
    }

    /// Panics when `usr` has no slot; check with [`QueryDb::has_var`] first.
    pub fn var(&self, usr: Usr) -> &QueryVar {
        &self.vars[self.var_usr[&usr]]
    }

    pub fn file(&self, file_id: FileId) -> &QueryFile {
        &self.files[file_id.index()]
    }

    pub fn file_id_of(&self, path: &str) -> Option<FileId> {
        self.name2file_id
            .get(&path_key(path, self.case_sensitive))
            .copied()
    }

    pub fn files(&self) -> &[QueryFile] {
        &self.files
    }

    pub fn funcs(&self) -> &[QueryFunc] {
        &self.funcs
    }

    pub fn types(&self) -> &[QueryType] {
        &self.types
    }

    pub fn vars(&self) -> &[QueryVar] {
        &self.vars
    }

    /// Displayable name of a symbol, borrowed from the backing def.
    ///
    /// Empty when the symbol has no def (e.g. a removed file, or an entity
    /// known only through uses). The slice is invalidated by the next apply.
    pub fn symbol_name(&self, sym: SymbolId, qualified: bool) -> &str {
        match sym.kind {
            SymbolKind::File => self.files[sym.usr.to_raw() as usize]
                .def
                .as_ref()
                .map(|def| def.path.as_str())
                .unwrap_or(""),
            SymbolKind::Func => self
                .func(sym.usr)
                .any_def()
                .map(|def| def.name(qualified))
                .unwrap_or(""),
            SymbolKind::Type => self
                .ty(sym.usr)
                .any_def()
                .map(|def| def.name(qualified))
                .unwrap_or(""),
            SymbolKind::Var => self
                .var(sym.usr)
                .any_def()
                .map(|def| def.name(qualified))
                .unwrap_or(""),
            SymbolKind::Invalid => "",
        }
    }
}
