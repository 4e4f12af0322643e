//! Document-level outcomes of an analysis.

use encore::analysis::{SemanticEditKind, SequencePointUpdates, SourceLineUpdate};
use encore::mini::Project;
use encore::{ActiveStatementFlags, AnalysisStatus, Cancelled, EditCapabilities, SymbolKey};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use crate::helpers::analysis_helpers::*;

const METHOD: &str = "class C {\n    fn M() {\n        F();\n    }\n}";

// =============================================================================
// UNCHANGED AND INVALID DOCUMENTS
// =============================================================================

#[test]
fn test_unchanged_document_keeps_active_statement() {
    let results = EditSession::new(METHOD, METHOD)
        .active(active_at(METHOD, "F();", ActiveStatementFlags::NON_LEAF_FRAME))
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Unchanged);
    assert!(results.rude_edits.is_empty());
    assert!(results.semantic_edits.is_empty());
    assert_eq!(results.active_statements.len(), 1);
    assert_eq!(results.active_statements[0].span, span_of(METHOD, "F();"));
    assert!(!results.has_changes());
}

#[test]
fn test_syntax_errors_stop_the_analysis() {
    let results = EditSession::new(METHOD, "class C {\n    fn M( {\n    }\n}").analyze();

    assert_eq!(results.status, AnalysisStatus::SyntaxErrors);
    assert!(results.semantic_edits.is_empty());
    assert!(results.rude_edits.is_empty());
}

#[test]
fn test_semantic_errors_produce_no_edits() {
    let results = EditSession::new("class C { fn M() { } }", "class C { fn M() { } fn M() { } }").analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.has_semantic_errors);
    assert!(results.semantic_edits.is_empty());
    assert!(results.has_changes_and_errors());
}

#[test]
fn test_cancelled_analysis_returns_error() {
    let id = encore::DocumentId::new(0);
    let old = Project::from_sources([(PATH, METHOD)]);
    let new = old.with_text(id, "class C { }").unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = try_analyze_projects(&old, &new, id, &[], EditCapabilities::all(), None, &token);
    assert!(matches!(result, Err(Cancelled)));
}

// =============================================================================
// DOCUMENT SETS
// =============================================================================

#[test]
fn test_added_document_inserts_its_types() {
    let old = Project::from_sources([(PATH, "class A { }")]);
    let (new, id) = old.with_document("b.mini", "class B { fn M() { } }");

    let results = analyze_projects(&old, &new, id, &[], EditCapabilities::all(), None);
    assert_eq!(results.status, AnalysisStatus::Changed);
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Insert, "B".to_string())]);
}

#[test]
fn test_edit_of_partial_type_names_the_type() {
    let old = Project::from_sources([
        (PATH, "partial class C { fn M() { } }"),
        ("other.mini", "partial class C { fn N() { } }"),
    ]);
    let id = encore::DocumentId::new(0);
    let new = old.with_text(id, "partial class C { fn M() { F(); } }").unwrap();

    let results = analyze_projects(&old, &new, id, &[], EditCapabilities::all(), None);
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
    assert_eq!(results.semantic_edits[0].partial_type, Some(SymbolKey::new("C")));
}

// =============================================================================
// LINE EDITS
// =============================================================================

#[test]
fn test_member_moved_by_whole_lines_produces_line_edit() {
    let new = "class C {\n\n    fn M() {\n        F();\n    }\n}";
    let results = EditSession::new(METHOD, new)
        .active(active_at(METHOD, "F();", ActiveStatementFlags::empty()))
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.semantic_edits.is_empty());
    assert_eq!(
        results.line_edits,
        vec![SequencePointUpdates {
            file: PATH.into(),
            line_updates: vec![SourceLineUpdate::new(1, 2)],
        }]
    );
    assert_eq!(results.active_statements[0].span, span_of(new, "F();"));
}

#[test]
fn test_member_moved_within_line_is_recompiled() {
    let new = "class C {\n    fn M() {\n            F();\n    }\n}";
    let results = EditSession::new(METHOD, new).analyze();

    assert!(results.line_edits.is_empty());
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
    assert!(results.semantic_edits[0].syntax_map.is_none());
}
