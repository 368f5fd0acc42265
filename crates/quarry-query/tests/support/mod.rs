//! Snapshot fixtures shared by the integration tests.
#![allow(dead_code)]

use quarry_core::{Range, Role, SymbolKind, Usr, Use};
use quarry_index::{FuncDef, IndexFunc, IndexSnapshot, IndexType, IndexVar, TypeDef, VarDef};

pub fn def_use(range: Range, usr: u64, kind: SymbolKind) -> Use {
    Use::new(
        range,
        Usr::new(usr),
        kind,
        Role::DECLARATION | Role::DEFINITION,
    )
}

pub fn ref_use(range: Range, usr: u64, kind: SymbolKind) -> Use {
    Use::new(range, Usr::new(usr), kind, Role::REFERENCE)
}

pub fn type_def(usr: u64, name: &str, spell: Range) -> TypeDef {
    TypeDef {
        detailed_name: name.to_string(),
        short_name_offset: 0,
        short_name_len: name.len() as u32,
        spell: Some(def_use(spell, usr, SymbolKind::Type)),
        ..TypeDef::default()
    }
}

pub fn func_def(usr: u64, name: &str, spell: Range) -> FuncDef {
    FuncDef {
        detailed_name: name.to_string(),
        short_name_offset: 0,
        short_name_len: name.len() as u32,
        spell: Some(def_use(spell, usr, SymbolKind::Func)),
        ..FuncDef::default()
    }
}

pub fn var_def(usr: u64, name: &str, spell: Range) -> VarDef {
    VarDef {
        detailed_name: name.to_string(),
        short_name_offset: 0,
        short_name_len: name.len() as u32,
        spell: Some(def_use(spell, usr, SymbolKind::Var)),
        ..VarDef::default()
    }
}

pub fn spelled_type(usr: u64, name: &str, spell: Range) -> IndexType {
    IndexType {
        usr: Usr::new(usr),
        def: Some(type_def(usr, name, spell)),
        ..IndexType::default()
    }
}

pub fn spelled_func(usr: u64, name: &str, spell: Range) -> IndexFunc {
    IndexFunc {
        usr: Usr::new(usr),
        def: Some(func_def(usr, name, spell)),
        ..IndexFunc::default()
    }
}

pub fn spelled_var(usr: u64, name: &str, spell: Range) -> IndexVar {
    IndexVar {
        usr: Usr::new(usr),
        def: Some(var_def(usr, name, spell)),
        ..IndexVar::default()
    }
}

/// Snapshot of `/a.cc` used by the first-index scenarios: type `T` (USR 7)
/// with a def at 3:5-3:6, func `f` (USR 9) with a def at 8:0-8:1 and one
/// reference at 10:0-10:1.
pub fn snapshot_a() -> IndexSnapshot {
    let mut snapshot = IndexSnapshot::new("/a.cc");
    snapshot.put_type(spelled_type(7, "T", Range::on_line(3, 5, 6)));

    let mut func = spelled_func(9, "f", Range::on_line(8, 0, 1));
    func.uses
        .push(ref_use(Range::on_line(10, 0, 1), 9, SymbolKind::Func));
    snapshot.put_func(func);
    snapshot
}
