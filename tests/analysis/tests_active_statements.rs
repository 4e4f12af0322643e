//! Active statement relocation and the rude edits around active statements.

use encore::analysis::{ActiveStatementTracking, InMemoryTracking, SemanticEditKind};
use encore::{ActiveStatementFlags, AnalysisStatus, DocumentId, LinePositionSpan, RudeEditKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::analysis_helpers::*;

const OLD: &str = "class C {\n    fn M() {\n        F(1);\n        G();\n    }\n}";

fn non_leaf() -> ActiveStatementFlags {
    ActiveStatementFlags::NON_LEAF_FRAME
}

fn leaf() -> ActiveStatementFlags {
    ActiveStatementFlags::empty()
}

// =============================================================================
// DELETED STATEMENTS
// =============================================================================

#[test]
fn test_deleting_non_leaf_active_statement_is_rude() {
    let new = "class C {\n    fn M() {\n        F(1);\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "G();", non_leaf())).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::DeleteActiveStatement]);
    assert_eq!(results.active_statements[0].span, span_of(OLD, "G();"));
}

#[test]
fn test_deleting_leaf_active_statement_moves_to_closing_brace() {
    let new = "class C {\n    fn M() {\n        F(1);\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "G();", leaf())).analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.rude_edits.is_empty());
    // closing brace of M
    assert_eq!(results.active_statements[0].span, LinePositionSpan::from_coords(3, 4, 3, 5));

    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
    assert!(results.semantic_edits[0].syntax_map.is_some());
}

#[rstest]
#[case(ActiveStatementFlags::NON_LEAF_FRAME)]
#[case(ActiveStatementFlags::empty())]
fn test_deleting_member_with_active_statement_is_rude(#[case] flags: ActiveStatementFlags) {
    let old = "class C {\n    fn M() {\n        F(1);\n    }\n    fn N() { }\n}";
    let new = "class C {\n    fn N() { }\n}";
    let results = EditSession::new(old, new).active(active_at(old, "F(1);", flags)).analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::DeleteActiveStatement]);
}

// =============================================================================
// UPDATED STATEMENTS
// =============================================================================

#[rstest]
#[case(ActiveStatementFlags::NON_LEAF_FRAME, vec![RudeEditKind::ActiveStatementUpdate])]
#[case(
    ActiveStatementFlags::PARTIALLY_EXECUTED,
    vec![RudeEditKind::PartiallyExecutedActiveStatementUpdate]
)]
#[case(ActiveStatementFlags::empty(), vec![])]
fn test_updating_active_statement(#[case] flags: ActiveStatementFlags, #[case] expected: Vec<RudeEditKind>) {
    let new = "class C {\n    fn M() {\n        F(2);\n        G();\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "F(1);", flags)).analyze();

    assert_eq!(rude_kinds(&results), expected);
}

#[test]
fn test_leaf_active_statement_follows_its_statement() {
    let new = "class C {\n    fn M() {\n        H();\n        F(1);\n        G();\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "G();", leaf())).analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(results.active_statements[0].span, span_of(new, "G();"));
}

#[test]
fn test_active_statement_in_unchanged_member_is_relocated() {
    let old = "class C {\n    fn M() { }\n    fn N() {\n        G();\n    }\n}";
    let new = "class C {\n    fn M() { F(); }\n\n    fn N() {\n        G();\n    }\n}";
    let results = EditSession::new(old, new).active(active_at(old, "G();", non_leaf())).analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(results.active_statements[0].span, span_of(new, "G();"));
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
}

#[rstest]
#[case(
    "class C {\n    fn M();\n}",
    "fn M();",
    "class C {\n    fn M() { }\n}",
    RudeEditKind::MethodBodyAdd
)]
#[case(
    "class C {\n    fn M() {\n        F(1);\n    }\n}",
    "F(1);",
    "class C {\n    fn M();\n}",
    RudeEditKind::MethodBodyDelete
)]
fn test_body_presence_change_around_active_statement_is_rude(
    #[case] old: &str,
    #[case] active: &str,
    #[case] new: &str,
    #[case] expected: RudeEditKind,
) {
    let results = EditSession::new(old, new).active(active_at(old, active, non_leaf())).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![expected]);
}

#[test]
fn test_removing_lambda_with_active_statement_is_rude() {
    let old = "class C {\n    fn M() {\n        let f = fn() { G(); };\n    }\n}";
    let new = "class C {\n    fn M() {\n    }\n}";
    let results = EditSession::new(old, new).active(active_at(old, "G();", non_leaf())).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::ActiveStatementLambdaRemoved]);
}

// =============================================================================
// STATE MACHINES
// =============================================================================

#[rstest]
#[case(
    "class C {\n    async fn M() {\n        await F();\n        G();\n    }\n}",
    "class C {\n    async fn M() {\n        await F();\n        G();\n        await H();\n    }\n}",
    RudeEditKind::ChangingStateMachineShape
)]
#[case(
    "class C {\n    async fn M() {\n        await F();\n        G();\n        await H();\n    }\n}",
    "class C {\n    async fn M() {\n        await F();\n        G();\n    }\n}",
    RudeEditKind::ChangingStateMachineShape
)]
#[case(
    "class C {\n    fn M() {\n        G();\n    }\n}",
    "class C {\n    async fn M() {\n        G();\n    }\n}",
    RudeEditKind::UpdatingStateMachineMethodAroundActiveStatement
)]
fn test_state_machine_change_around_active_statement_is_rude(
    #[case] old: &str,
    #[case] new: &str,
    #[case] expected: RudeEditKind,
) {
    let results = EditSession::new(old, new).active(active_at(old, "G();", leaf())).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![expected]);
}

// =============================================================================
// EXCEPTION HANDLERS
// =============================================================================

#[test]
fn test_try_inserted_around_non_leaf_active_statement_is_rude() {
    let new = "class C {\n    fn M() {\n        try { F(1); } catch { }\n        G();\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "F(1);", non_leaf())).analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InsertAroundActiveStatement]);
}

#[test]
fn test_try_inserted_around_leaf_active_statement() {
    let new = "class C {\n    fn M() {\n        try { F(1); } catch { }\n        G();\n    }\n}";
    let results = EditSession::new(OLD, new).active(active_at(OLD, "F(1);", leaf())).analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(results.active_statements[0].span, span_of(new, "F(1);"));
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
}

#[test]
fn test_exception_regions_of_statement_in_catch() {
    let source = "class C {\n    fn M() {\n        try { } catch { F(1); }\n    }\n}";
    let results = EditSession::new(source, source)
        .active(active_at(source, "F(1);", leaf()))
        .analyze();

    assert_eq!(results.exception_regions.len(), 1);
    assert_eq!(results.exception_regions[0].spans.len(), 1);
}

// =============================================================================
// TRACKING
// =============================================================================

#[test]
fn test_tracking_receives_relocated_spans() {
    let tracking = InMemoryTracking::new();
    let new = "class C {\n    fn M() {\n        H();\n        F(1);\n        G();\n    }\n}";
    let results = EditSession::new(OLD, new)
        .active(active_at(OLD, "G();", leaf()))
        .tracking(&tracking)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert_eq!(tracking.tracked_span(DocumentId::new(0), 0), Some(span_of(new, "G();")));
}

#[test]
fn test_tracked_span_designates_new_statement() {
    let tracking = InMemoryTracking::new();
    let new = "class C {\n    fn M() {\n        G();\n        F(1);\n        G();\n    }\n}";
    // Without tracking the second G() would be chosen.
    let tracked = span_of(new, "G();");
    tracking.set_span(DocumentId::new(0), 0, tracked);

    let results = EditSession::new(OLD, new)
        .active(active_at(OLD, "G();", leaf()))
        .tracking(&tracking)
        .analyze();

    assert_eq!(results.active_statements[0].span, tracked);
}

struct FailingTracking;

impl ActiveStatementTracking for FailingTracking {
    fn tracked_span(&self, _document: DocumentId, _ordinal: usize) -> Option<LinePositionSpan> {
        panic!("tracking store is gone")
    }

    fn update_spans(&self, _document: DocumentId, _spans: &[(usize, LinePositionSpan)]) {}
}

#[test]
fn test_panic_during_analysis_becomes_internal_error() {
    let new = "class C {\n    fn M() {\n        H();\n        F(1);\n        G();\n    }\n}";
    let active = active_at(OLD, "G();", leaf());
    let results = EditSession::new(OLD, new)
        .active(active.clone())
        .tracking(&FailingTracking)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InternalError]);
    assert_eq!(results.rude_edits[0].arguments, vec![PATH.to_string(), "tracking store is gone".to_string()]);
    assert_eq!(results.active_statements, vec![active]);
}
