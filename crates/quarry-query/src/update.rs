//! Deltas between successive snapshots of one file.

use std::collections::HashMap;

use quarry_core::{Usr, Use};
use quarry_index::{FuncDef, IndexFunc, IndexSnapshot, IndexType, IndexVar, TypeDef, VarDef};

use crate::file_def::build_file_def_update;
use crate::records::FileDefUpdate;

/// Per-entity `(previous contribution, new contribution)` pairs for a list
/// of use sites. Each side is the complete list the snapshot contributed.
pub type UseUpdate = HashMap<Usr, (Vec<Use>, Vec<Use>)>;

/// Same shape for USR-valued relation lists (`derived`, `instances`).
pub type UsrUpdate = HashMap<Usr, (Vec<Usr>, Vec<Usr>)>;

/// The difference between two snapshots of one file, structured so the
/// query database can subtract the old contribution and add the new one in
/// a single pass. Self-contained: the snapshots are consumed.
#[derive(Clone, Debug, Default)]
pub struct IndexUpdate {
    /// Path whose file record should be cleared, for file deletion.
    pub files_removed: Option<String>,
    pub files_def_update: Option<FileDefUpdate>,

    pub funcs_removed: Vec<Usr>,
    pub funcs_def_update: Vec<(Usr, FuncDef)>,
    pub funcs_declarations: UseUpdate,
    pub funcs_uses: UseUpdate,
    pub funcs_derived: UsrUpdate,

    pub types_removed: Vec<Usr>,
    pub types_def_update: Vec<(Usr, TypeDef)>,
    pub types_declarations: UseUpdate,
    pub types_uses: UseUpdate,
    pub types_derived: UsrUpdate,
    pub types_instances: UsrUpdate,

    pub vars_removed: Vec<Usr>,
    pub vars_def_update: Vec<(Usr, VarDef)>,
    pub vars_declarations: UseUpdate,
    pub vars_uses: UseUpdate,
}

impl IndexUpdate {
    /// Computes the delta between `previous` and `current` snapshots of the
    /// same file. Pass `None` for a file indexed for the first time (or when
    /// the cached snapshot failed to load).
    pub fn delta(previous: Option<IndexSnapshot>, current: IndexSnapshot) -> IndexUpdate {
        let mut update = IndexUpdate {
            files_def_update: Some(build_file_def_update(&current)),
            ..IndexUpdate::default()
        };

        let previous = previous.unwrap_or_else(|| IndexSnapshot::new(current.path.clone()));
        update.collect_previous(previous);
        update.collect_current(current);
        update
    }

    /// Builds the update applied when a file disappears from the project:
    /// clear its file record and subtract everything its last snapshot
    /// contributed.
    pub fn remove_file(previous: IndexSnapshot) -> IndexUpdate {
        let mut update = IndexUpdate {
            files_removed: Some(previous.path.clone()),
            ..IndexUpdate::default()
        };
        update.collect_previous(previous);
        update
    }

    fn collect_previous(&mut self, previous: IndexSnapshot) {
        let IndexSnapshot {
            usr2type,
            usr2func,
            usr2var,
            ..
        } = previous;

        for (usr, func) in usr2func {
            if usr.is_reserved() {
                continue;
            }
            let IndexFunc {
                def,
                declarations,
                uses,
                derived,
                ..
            } = func;
            if def.is_some_and(|def| def.spell.is_some()) {
                self.funcs_removed.push(usr);
            }
            self.funcs_declarations.entry(usr).or_default().0 = declarations;
            self.funcs_uses.entry(usr).or_default().0 = uses;
            self.funcs_derived.entry(usr).or_default().0 = derived;
        }

        for (usr, ty) in usr2type {
            if usr.is_reserved() {
                continue;
            }
            let IndexType {
                def,
                declarations,
                uses,
                derived,
                instances,
                ..
            } = ty;
            if def.is_some_and(|def| def.spell.is_some()) {
                self.types_removed.push(usr);
            }
            self.types_declarations.entry(usr).or_default().0 = declarations;
            self.types_uses.entry(usr).or_default().0 = uses;
            self.types_derived.entry(usr).or_default().0 = derived;
            self.types_instances.entry(usr).or_default().0 = instances;
        }

        for (usr, var) in usr2var {
            if usr.is_reserved() {
                continue;
            }
            let IndexVar {
                def,
                declarations,
                uses,
                ..
            } = var;
            if def.is_some_and(|def| def.spell.is_some()) {
                self.vars_removed.push(usr);
            }
            self.vars_declarations.entry(usr).or_default().0 = declarations;
            self.vars_uses.entry(usr).or_default().0 = uses;
        }
    }

    fn collect_current(&mut self, current: IndexSnapshot) {
        let IndexSnapshot {
            usr2type,
            usr2func,
            usr2var,
            ..
        } = current;

        for (usr, func) in usr2func {
            if usr.is_reserved() {
                continue;
            }
            let IndexFunc {
                def,
                declarations,
                uses,
                derived,
                ..
            } = func;
            if let Some(def) = def {
                // Defs with no rendered name are useless to readers; drop
                // them and let the declarations stand in.
                if def.spell.is_some() && !def.detailed_name.is_empty() {
                    self.funcs_def_update.push((usr, def));
                }
            }
            self.funcs_declarations.entry(usr).or_default().1 = declarations;
            self.funcs_uses.entry(usr).or_default().1 = uses;
            self.funcs_derived.entry(usr).or_default().1 = derived;
        }

        for (usr, ty) in usr2type {
            if usr.is_reserved() {
                continue;
            }
            let IndexType {
                def,
                declarations,
                uses,
                derived,
                instances,
                ..
            } = ty;
            if let Some(def) = def {
                if def.spell.is_some() && !def.detailed_name.is_empty() {
                    self.types_def_update.push((usr, def));
                }
            }
            self.types_declarations.entry(usr).or_default().1 = declarations;
            self.types_uses.entry(usr).or_default().1 = uses;
            self.types_derived.entry(usr).or_default().1 = derived;
            self.types_instances.entry(usr).or_default().1 = instances;
        }

        for (usr, var) in usr2var {
            if usr.is_reserved() {
                continue;
            }
            let IndexVar {
                def,
                declarations,
                uses,
                ..
            } = var;
            if let Some(def) = def {
                if def.spell.is_some() && !def.detailed_name.is_empty() {
                    self.vars_def_update.push((usr, def));
                }
            }
            self.vars_declarations.entry(usr).or_default().1 = declarations;
            self.vars_uses.entry(usr).or_default().1 = uses;
        }
    }
}
