use super::*;
use crate::base::{TextRange, TextSize};
use rstest::rstest;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn test_message_substitutes_arguments() {
    let diag = RudeEditDiagnostic::with_arguments(
        RudeEditKind::RenamingCapturedVariable,
        range(0, 1),
        ["x", "y"],
    );
    assert_eq!(
        diag.message(),
        "Renaming captured variable 'x' to 'y' requires restarting the application."
    );
}

#[test]
fn test_message_keeps_missing_placeholders() {
    let diag = RudeEditDiagnostic::new(RudeEditKind::Insert, range(0, 1));
    assert_eq!(diag.message(), "Adding {0} requires restarting the application.");
}

#[rstest]
#[case(RudeEditKind::DeleteActiveStatement, RudeEditCategory::ActiveStatement)]
#[case(RudeEditKind::InsertAroundActiveStatement, RudeEditCategory::ActiveStatement)]
#[case(RudeEditKind::InsertIntoStruct, RudeEditCategory::Structural)]
#[case(RudeEditKind::CapturingVariable, RudeEditCategory::Capture)]
#[case(RudeEditKind::InsertNotSupportedByRuntime, RudeEditCategory::Capability)]
#[case(RudeEditKind::InternalError, RudeEditCategory::Fatal)]
fn test_category(#[case] kind: RudeEditKind, #[case] expected: RudeEditCategory) {
    assert_eq!(kind.category(), expected);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_sort_puts_active_statement_edits_first() {
    let mut diags = vec![
        RudeEditDiagnostic::new(RudeEditKind::Update, range(1, 2)),
        RudeEditDiagnostic::new(RudeEditKind::DeleteActiveStatement, range(40, 41)),
        RudeEditDiagnostic::new(RudeEditKind::Insert, range(0, 3)),
        RudeEditDiagnostic::new(RudeEditKind::Update, range(1, 2)),
    ];

    sort_diagnostics(&mut diags);

    let kinds: Vec<_> = diags.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RudeEditKind::DeleteActiveStatement,
            RudeEditKind::Insert,
            RudeEditKind::Update,
        ]
    );
}
