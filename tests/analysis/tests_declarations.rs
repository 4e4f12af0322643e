//! Declaration edits and the semantic edits they resolve to.

use encore::analysis::{SemanticEditKind, SourceLineUpdate};
use encore::{AnalysisStatus, RudeEditKind, SymbolKey};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::analysis_helpers::*;

fn edit(kind: SemanticEditKind, key: &str) -> (SemanticEditKind, String) {
    (kind, key.to_string())
}

// =============================================================================
// UPDATES
// =============================================================================

#[test]
fn test_method_body_update() {
    let results = EditSession::new("class C { fn M() { } }", "class C { fn M() { F(); } }").analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Update, "C.M()")]);
    assert!(results.semantic_edits[0].syntax_map.is_none());
    assert!(results.has_significant_valid_changes());
}

#[test]
fn test_field_initializer_update_recompiles_instance_constructors() {
    let results = EditSession::new(
        "class C { var x: int = 1; new() { } new(a: int) { } }",
        "class C { var x: int = 2; new() { } new(a: int) { } }",
    )
    .analyze();

    let mut edits = semantic_edits(&results);
    edits.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        edits,
        vec![
            edit(SemanticEditKind::Update, "C..ctor()"),
            edit(SemanticEditKind::Update, "C..ctor(int)"),
        ]
    );
    assert!(results.semantic_edits.iter().all(|e| e.syntax_map.is_some()));
}

#[test]
fn test_field_initializer_update_with_implicit_constructor() {
    let results = EditSession::new("class C { var x: int = 1; }", "class C { var x: int = 2; }").analyze();

    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Update, "C..ctor()")]);
}

#[test]
fn test_type_marked_for_replacement_is_replaced() {
    let results = EditSession::new(
        "[CreateNewOnMetadataUpdate] class C { fn M() { } fn N() { } }",
        "[CreateNewOnMetadataUpdate] class C { fn M() { F(); } fn N() { G(); } }",
    )
    .analyze();

    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Replace, "C")]);
}

// =============================================================================
// DELETES
// =============================================================================

#[test]
fn test_method_delete_updates_with_deleted_container() {
    let results = EditSession::new(
        "class C {\n    fn M() { }\n    fn N() { }\n}",
        "class C {\n    fn N() { }\n}",
    )
    .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Update, "C.M()")]);
    assert_eq!(results.semantic_edits[0].deleted_symbol_container, Some(SymbolKey::new("C")));
    assert!(results.semantic_edits[0].is_deletion());
}

#[rstest]
#[case("class C { virtual fn M() { } }", "class C { }")]
#[case("abstract class C { abstract fn M(); }", "abstract class C { }")]
fn test_virtual_member_delete_is_rude(#[case] old: &str, #[case] new: &str) {
    let results = EditSession::new(old, new).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::Delete]);
    assert!(results.semantic_edits.is_empty());
}

#[test]
fn test_type_delete_is_rude() {
    let results = EditSession::new("class A { } class B { }", "class A { }").analyze();
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::Delete]);
}

// =============================================================================
// INSERTS
// =============================================================================

#[test]
fn test_method_insert() {
    let results = EditSession::new("class C { }", "class C { fn M() { } }").analyze();
    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Insert, "C.M()")]);
}

#[rstest]
#[case("class C { virtual fn M() { } }", RudeEditKind::InsertVirtual)]
#[case("class C { operator +(a: C, b: C) -> C { return a; } }", RudeEditKind::InsertOperator)]
#[case(r#"class C { [Import("lib", "entry")] static extern fn M(); }"#, RudeEditKind::InsertExtern)]
fn test_rude_member_inserts(#[case] new: &str, #[case] expected: RudeEditKind) {
    let results = EditSession::new("class C { }", new).analyze();
    assert_eq!(rude_kinds(&results), vec![expected]);
}

#[test]
fn test_type_insert_brings_its_members() {
    let results = EditSession::new("class A { }", "class A { } class B { var x: int = 1; fn M() { } }").analyze();
    assert_eq!(semantic_edits(&results), vec![edit(SemanticEditKind::Insert, "B")]);
}

// =============================================================================
// MOVES AND REORDERS
// =============================================================================

#[test]
fn test_type_moved_into_namespace_is_rude() {
    let results = EditSession::new("class A { }", "namespace N { class A { } }").analyze();
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::ChangingNamespace]);
}

#[test]
fn test_reordered_methods_only_shift_lines() {
    let results = EditSession::new(
        "class C {\n    fn M() { }\n    fn N() { }\n}",
        "class C {\n    fn N() { }\n    fn M() { }\n}",
    )
    .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.rude_edits.is_empty());
    assert!(results.semantic_edits.is_empty());
    assert_eq!(
        results.line_edits[0].line_updates,
        vec![SourceLineUpdate::new(1, 2), SourceLineUpdate::new(2, 1)]
    );
}

// =============================================================================
// TOP-LEVEL CODE
// =============================================================================

#[test]
fn test_global_statement_edit_updates_entry_point() {
    let results = EditSession::new("F();", "F();\nG();").analyze();
    assert_eq!(
        semantic_edits(&results),
        vec![edit(SemanticEditKind::Update, encore::mini::ENTRY_POINT_KEY)]
    );
}
