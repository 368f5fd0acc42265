//! Snapshot serialization round-trips, both formats, plus the version gate.

use pretty_assertions::assert_eq;

use quarry_core::{Range, Role, SymbolKind, Usr, Use};
use quarry_index::{
    read_snapshot, write_snapshot, DefName, FuncDef, IndexFunc, IndexInclude, IndexSnapshot,
    IndexType, LanguageId, SnapshotError, SnapshotFormat, TypeDef, SNAPSHOT_FORMAT_VERSION,
};

fn sample_snapshot() -> IndexSnapshot {
    let mut snapshot = IndexSnapshot::new("/src/widget.cc");
    snapshot.args = vec!["-xc++".to_string(), "-std=c++17".to_string()];
    snapshot.language = LanguageId::Cpp;
    snapshot.includes = vec![IndexInclude {
        line: 0,
        resolved_path: "/src/widget.h".to_string(),
    }];
    snapshot.dependencies = vec![("/src/widget.h".to_string(), 1700000000)];
    snapshot.skipped_by_preprocessor = vec![Range::on_line(40, 0, 6)];
    snapshot.file_contents = "#include \"widget.h\"\n".to_string();

    snapshot.put_type(IndexType {
        usr: Usr::new(7),
        def: Some(TypeDef {
            detailed_name: "Widget".to_string(),
            short_name_len: 6,
            spell: Some(Use::new(
                Range::on_line(3, 7, 13),
                Usr::new(7),
                SymbolKind::Type,
                Role::DECLARATION | Role::DEFINITION,
            )),
            bases: vec![Usr::new(5)],
            ..TypeDef::default()
        }),
        derived: vec![Usr::new(8)],
        instances: vec![Usr::new(21)],
        ..IndexType::default()
    });
    snapshot.put_func(IndexFunc {
        usr: Usr::new(9),
        def: Some(FuncDef {
            detailed_name: "void Widget::draw()".to_string(),
            short_name_offset: 13,
            short_name_len: 4,
            spell: Some(Use::new(
                Range::on_line(10, 13, 17),
                Usr::new(9),
                SymbolKind::Func,
                Role::DECLARATION | Role::DEFINITION,
            )),
            callees: vec![Use::new(
                Range::on_line(12, 4, 8),
                Usr::new(11),
                SymbolKind::Func,
                Role::CALL,
            )],
            ..FuncDef::default()
        }),
        uses: vec![Use::new(
            Range::on_line(30, 2, 6),
            Usr::new(9),
            SymbolKind::Func,
            Role::CALL,
        )],
        ..IndexFunc::default()
    });
    snapshot
}

fn assert_semantically_identical(decoded: &IndexSnapshot, original: &IndexSnapshot) {
    assert_eq!(decoded.path, original.path);
    assert_eq!(decoded.args, original.args);
    assert_eq!(decoded.language, original.language);
    assert_eq!(decoded.includes, original.includes);
    assert_eq!(decoded.dependencies, original.dependencies);
    assert_eq!(decoded.file_contents, original.file_contents);

    assert_eq!(decoded.usr2type.len(), original.usr2type.len());
    let ty = &decoded.usr2type[&Usr::new(7)];
    let ty_orig = &original.usr2type[&Usr::new(7)];
    assert_eq!(ty.derived, ty_orig.derived);
    assert_eq!(ty.instances, ty_orig.instances);
    let def = ty.def.as_ref().unwrap();
    assert_eq!(def.detailed_name, "Widget");
    assert_eq!(def.bases, vec![Usr::new(5)]);
    let spell = def.spell.unwrap();
    assert_eq!(spell.range, Range::on_line(3, 7, 13));
    assert_eq!(spell.role, Role::DECLARATION | Role::DEFINITION);
    assert_eq!(spell.usr, Usr::new(7));
    assert_eq!(spell.kind, SymbolKind::Type);

    let func = &decoded.usr2func[&Usr::new(9)];
    let def = func.def.as_ref().unwrap();
    assert_eq!(def.name(false), "draw");
    assert_eq!(def.callees.len(), 1);
    assert_eq!(def.callees[0].role, Role::CALL);
    assert_eq!(func.uses.len(), 1);
    assert_eq!(func.uses[0].range, Range::on_line(30, 2, 6));
}

#[test]
fn json_round_trip_preserves_semantics() {
    let original = sample_snapshot();
    let bytes = write_snapshot(SnapshotFormat::Json, &original).unwrap();
    let decoded = read_snapshot(SnapshotFormat::Json, &bytes, None)
        .unwrap()
        .unwrap();
    assert_semantically_identical(&decoded, &original);
}

#[test]
fn binary_round_trip_preserves_semantics() {
    let original = sample_snapshot();
    let bytes = write_snapshot(SnapshotFormat::Binary, &original).unwrap();
    let decoded = read_snapshot(SnapshotFormat::Binary, &bytes, None)
        .unwrap()
        .unwrap();
    assert_semantically_identical(&decoded, &original);
}

#[test]
fn binary_is_more_compact_than_json() {
    let original = sample_snapshot();
    let json = write_snapshot(SnapshotFormat::Json, &original).unwrap();
    let binary = write_snapshot(SnapshotFormat::Binary, &original).unwrap();
    assert!(binary.len() < json.len());
}

#[test]
fn version_mismatch_reads_as_absent() {
    let original = sample_snapshot();
    for format in [SnapshotFormat::Json, SnapshotFormat::Binary] {
        let bytes = write_snapshot(format, &original).unwrap();
        let decoded = read_snapshot(format, &bytes, Some(SNAPSHOT_FORMAT_VERSION + 1)).unwrap();
        assert!(decoded.is_none(), "{format:?} ignored the version gate");
    }
}

#[test]
fn truncated_binary_header_is_an_error() {
    let err = read_snapshot(SnapshotFormat::Binary, &[0x01, 0x02], None).unwrap_err();
    assert!(matches!(err, SnapshotError::Truncated { len: 2 }));
}

#[test]
fn garbage_json_is_an_error() {
    let err = read_snapshot(SnapshotFormat::Json, b"not json at all", None).unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget.cc.qidx");

    let original = sample_snapshot();
    let bytes = write_snapshot(SnapshotFormat::Binary, &original).unwrap();
    std::fs::write(&path, &bytes).unwrap();

    let loaded = std::fs::read(&path).unwrap();
    let decoded = read_snapshot(SnapshotFormat::Binary, &loaded, None)
        .unwrap()
        .unwrap();
    assert_semantically_identical(&decoded, &original);
}

#[test]
fn json_output_is_deterministic() {
    let original = sample_snapshot();
    let first = write_snapshot(SnapshotFormat::Json, &original).unwrap();
    let second = write_snapshot(SnapshotFormat::Json, &original).unwrap();
    assert_eq!(first, second);
}
