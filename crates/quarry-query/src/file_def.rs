//! Builds the per-file presentation record from a snapshot.

use quarry_core::{Role, SymbolKind, SymbolRef, Usr, Use};
use quarry_index::IndexSnapshot;

use crate::records::{FileDef, FileDefUpdate};

/// Transforms one snapshot into a [`FileDefUpdate`].
///
/// The snapshot is read, not consumed: the delta computer still needs its
/// entity collections afterwards.
pub fn build_file_def_update(snapshot: &IndexSnapshot) -> FileDefUpdate {
    let mut def = FileDef {
        path: snapshot.path.clone(),
        args: snapshot.args.clone(),
        language: snapshot.language,
        includes: snapshot.includes.clone(),
        inactive_regions: snapshot.skipped_by_preprocessor.clone(),
        dependencies: snapshot
            .dependencies
            .iter()
            .map(|(path, _)| path.clone())
            .collect(),
        ..FileDef::default()
    };

    for ty in snapshot.usr2type.values() {
        let (spell, extent) = match &ty.def {
            Some(d) => (d.spell.as_ref(), d.extent.as_ref()),
            None => (None, None),
        };
        collect_symbols(
            &mut def,
            ty.usr,
            SymbolKind::Type,
            spell,
            extent,
            &ty.declarations,
            &ty.uses,
        );
    }
    for func in snapshot.usr2func.values() {
        let (spell, extent) = match &func.def {
            Some(d) => (d.spell.as_ref(), d.extent.as_ref()),
            None => (None, None),
        };
        collect_symbols(
            &mut def,
            func.usr,
            SymbolKind::Func,
            spell,
            extent,
            &func.declarations,
            &func.uses,
        );
    }
    for var in snapshot.usr2var.values() {
        let (spell, extent) = match &var.def {
            Some(d) => (d.spell.as_ref(), d.extent.as_ref()),
            None => (None, None),
        };
        collect_symbols(
            &mut def,
            var.usr,
            SymbolKind::Var,
            spell,
            extent,
            &var.declarations,
            &var.uses,
        );
    }

    def.outline.sort_by_key(|sym| sym.range.start);
    def.all_symbols.sort_by_key(|sym| sym.range.start);

    FileDefUpdate {
        def,
        file_content: snapshot.file_contents.clone(),
    }
}

fn collect_symbols(
    def: &mut FileDef,
    usr: Usr,
    kind: SymbolKind,
    spell: Option<&Use>,
    extent: Option<&Use>,
    declarations: &[Use],
    uses: &[Use],
) {
    if let Some(spell) = spell {
        def.all_symbols
            .push(SymbolRef::new(spell.range, usr, kind, spell.role));
    }
    if let Some(extent) = extent {
        def.outline
            .push(SymbolRef::new(extent.range, usr, kind, extent.role));
    }
    for decl in declarations {
        def.all_symbols
            .push(SymbolRef::new(decl.range, usr, kind, decl.role));
        // Constructor positions carry Reference-role declarations of the
        // class; those stay out of the document outline.
        if !decl.role.contains(Role::REFERENCE) {
            def.outline
                .push(SymbolRef::new(decl.range, usr, kind, decl.role));
        }
    }
    for use_site in uses {
        let mut range = use_site.range;
        // Widen implicit ranges one column on each side so go-to-definition
        // on the adjacent space or semicolon of `A a;` still resolves to the
        // implicit constructor call. Implicit uses never reach the outline.
        if use_site.role.contains(Role::IMPLICIT) {
            if range.start.column > 0 {
                range.start.column -= 1;
            }
            range.end.column += 1;
        }
        def.all_symbols
            .push(SymbolRef::new(range, usr, kind, use_site.role));
    }
}
