//! End-to-end edit scenarios: renames, constants, layout and captures.

use encore::analysis::{SemanticEditKind, SequencePointUpdates, SourceLineUpdate};
use encore::{ActiveStatementFlags, AnalysisStatus, AnalyzerOptions, EditCapabilities, RudeEditKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::analysis_helpers::*;

// =============================================================================
// RENAMES
// =============================================================================

const BEFORE_RENAME: &str = "class C {\n    fn M() { F(); }\n}";
const AFTER_RENAME: &str = "class C {\n    fn N() { F(); }\n}";

#[test]
fn test_rename_with_capability_deletes_and_inserts() {
    let results = EditSession::new(BEFORE_RENAME, AFTER_RENAME).analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.rude_edits.is_empty());
    assert_eq!(
        semantic_edits(&results),
        vec![
            (SemanticEditKind::Delete, "C.M()".to_string()),
            (SemanticEditKind::Insert, "C.N()".to_string()),
        ]
    );
}

#[test]
fn test_rename_without_capability_is_rude() {
    let results = EditSession::new(BEFORE_RENAME, AFTER_RENAME)
        .capabilities(EditCapabilities::BASELINE)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::RenamingNotSupportedByRuntime]);
    assert!(results.semantic_edits.is_empty());
}

// =============================================================================
// CONSTANTS AND LAYOUT
// =============================================================================

#[test]
fn test_const_value_change_is_rude() {
    let results = EditSession::new(
        "class C { const var K: int = 1; }",
        "class C { const var K: int = 2; }",
    )
    .analyze();

    let initializer_updates = rude_kinds(&results)
        .into_iter()
        .filter(|k| *k == RudeEditKind::InitializerUpdate)
        .count();
    assert_eq!(initializer_updates, 1);
    assert_eq!(results.status, AnalysisStatus::Blocked);
}

#[rstest]
#[case(EditCapabilities::all())]
#[case(EditCapabilities::BASELINE)]
fn test_field_insert_into_struct_is_rude(#[case] capabilities: EditCapabilities) {
    let results = EditSession::new("struct S { var x: int; }", "struct S { var x: int; var y: int; }")
        .capabilities(capabilities)
        .analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InsertIntoStruct]);
}

// =============================================================================
// TRIVIA
// =============================================================================

#[test]
fn test_lines_shifted_by_three_only_update_sequence_points() {
    let old = "class C {\n    fn M() {\n        F();\n    }\n}";
    let new = "class C {\n\n\n\n    fn M() {\n        F();\n    }\n}";
    let results = EditSession::new(old, new)
        .active(active_at(old, "F();", ActiveStatementFlags::NON_LEAF_FRAME))
        .analyze();

    assert!(results.rude_edits.is_empty());
    assert!(results.semantic_edits.is_empty());
    assert_eq!(
        results.line_edits,
        vec![SequencePointUpdates {
            file: PATH.into(),
            line_updates: vec![SourceLineUpdate::new(1, 4)],
        }]
    );
    assert_eq!(results.active_statements[0].span, span_of(new, "F();"));
}

// =============================================================================
// CAPTURES
// =============================================================================

#[test]
fn test_unchanged_lambda_reports_no_capture_edits() {
    let results = EditSession::new(
        "class C { fn M() { let a = 1; let f = fn() => a; } }",
        "class C { fn M() { let a = 1; let f = fn() => a; G(); } }",
    )
    .analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
    assert!(results.semantic_edits[0].syntax_map.is_some());
}

#[test]
fn test_new_capture_in_lambda_is_rude() {
    let results = EditSession::new(
        "class C { fn M() { let a = 1; let b = 2; let f = fn() => a; } }",
        "class C { fn M() { let a = 1; let b = 2; let f = fn() => a + b; } }",
    )
    .analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::CapturingVariable]);
}

#[test]
fn test_lambda_linking_two_scopes_cannot_be_inserted() {
    let old = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let g = fn() => b;\n        }\n    }\n}";
    let new = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let g = fn() => b;\n            let h = fn() => a + b;\n        }\n    }\n}";
    let results = EditSession::new(old, new).analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InsertLambdaWithMultiScopeCapture]);
}

#[rstest]
#[case(
    "class C { fn M() { let a = 1; let f = fn() => a; } }",
    "class C { fn M() { let b = 1; let f = fn() => b; } }",
    RudeEditKind::RenamingCapturedVariable
)]
#[case(
    "class C { fn M() { let a: int = 1; let f = fn() => a; } }",
    "class C { fn M() { let a: long = 1; let f = fn() => a; } }",
    RudeEditKind::ChangingCapturedVariableType
)]
#[case(
    "class C { fn M() { let a = 1; let f = fn() => a; } }",
    "class C { fn M() { { let a = 1; let f = fn() => a; } } }",
    RudeEditKind::ChangingCapturedVariableScope
)]
#[case(
    "class C { fn M() { let a = 1; let f = fn() => a; } }",
    "class C { fn M() { let a = 1; let f = fn() => 1; } }",
    RudeEditKind::NotCapturingVariable
)]
#[case(
    "class C { fn M() { let a = 1; let f = fn() => a; } }",
    "class C { fn M() { F(); } }",
    RudeEditKind::DeletingCapturedVariable
)]
fn test_captured_variable_edits(#[case] old: &str, #[case] new: &str, #[case] expected: RudeEditKind) {
    let results = EditSession::new(old, new).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![expected]);
}

#[test]
fn test_lambda_linking_two_scopes_cannot_be_deleted() {
    let old = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let g = fn() => b;\n            let h = fn() => a + b;\n        }\n    }\n}";
    let new = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let g = fn() => b;\n        }\n    }\n}";
    let results = EditSession::new(old, new).analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::DeleteLambdaWithMultiScopeCapture]);
}

#[test]
fn test_lambda_linking_scopes_already_linked_can_be_inserted() {
    let old = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let h = fn() => a + b;\n        }\n    }\n}";
    let new = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        {\n            let b = 2;\n            let h = fn() => a + b;\n            let k = fn() => a + b;\n        }\n    }\n}";
    let results = EditSession::new(old, new).analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
}

// A parameter and `this` live in the scope of the method body, like its
// top-level locals.
#[rstest]
#[case(
    "class C { fn M(p: int) { let a = 1; let f = fn() => a + p; } }",
    "class C { fn M(p: int) { let a = 1; let f = fn() => a + p; let g = fn() => a + p; } }",
    "C.M(int)"
)]
#[case(
    "class C { var x: int; fn M() { let a = 1; let f = fn() => a + this.x; } }",
    "class C { var x: int; fn M() { let a = 1; let f = fn() => a + this.x; let g = fn() => a + this.x; } }",
    "C.M()"
)]
fn test_lambda_capturing_method_scope_variables_can_be_inserted(
    #[case] old: &str,
    #[case] new: &str,
    #[case] member: &str,
) {
    let results = EditSession::new(old, new).analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, member.to_string())]);
}

// =============================================================================
// PRIMARY CONSTRUCTOR CAPTURES
// =============================================================================

#[rstest]
#[case("class C(p: int)", EditCapabilities::all(), vec![])]
#[case("class C(p: int)", EditCapabilities::BASELINE, vec![RudeEditKind::CapturingPrimaryConstructorParameter])]
#[case(
    "[Layout(Sequential)] class C(p: int)",
    EditCapabilities::all(),
    vec![RudeEditKind::CapturingPrimaryConstructorParameter]
)]
fn test_capturing_primary_constructor_parameter(
    #[case] header: &str,
    #[case] capabilities: EditCapabilities,
    #[case] expected: Vec<RudeEditKind>,
) {
    let old = format!("{header} {{ fn M() {{ }} }}");
    let new = format!("{header} {{ fn M() {{ F(p); }} }}");
    let results = EditSession::new(&old, &new).capabilities(capabilities).analyze();

    assert_eq!(rude_kinds(&results), expected);
}

#[rstest]
#[case(EditCapabilities::all())]
#[case(EditCapabilities::BASELINE)]
fn test_no_longer_capturing_primary_constructor_parameter_is_rude(#[case] capabilities: EditCapabilities) {
    let results = EditSession::new("class C(p: int) { fn M() { F(p); } }", "class C(p: int) { fn M() { } }")
        .capabilities(capabilities)
        .analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::NotCapturingPrimaryConstructorParameter]);
}

// =============================================================================
// LAMBDAS
// =============================================================================

#[rstest]
#[case(
    "class C { fn M() { let f = fn(a: int) => a; } }",
    "class C { fn M() { let f = fn(a: long) => a; } }",
    RudeEditKind::ChangingLambdaParameters
)]
#[case(
    "class C { fn M() { let f = fn() -> int { return 1; }; } }",
    "class C { fn M() { let f = fn() -> long { return 1; }; } }",
    RudeEditKind::ChangingLambdaReturnType
)]
fn test_lambda_signature_change_is_rude(#[case] old: &str, #[case] new: &str, #[case] expected: RudeEditKind) {
    let results = EditSession::new(old, new).analyze();

    assert_eq!(rude_kinds(&results), vec![expected]);
}

#[rstest]
#[case("class C { fn M() { let f = fn() => 1; } }", "class C { fn M() { fn f() { } } }")]
#[case("class C { fn M() { fn f() { } } }", "class C { fn M() { let f = fn() => 1; } }")]
fn test_switch_between_lambda_and_local_function_is_rude(#[case] old: &str, #[case] new: &str) {
    let results = EditSession::new(old, new).analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::SwitchBetweenLambdaAndLocalFunction]);
}

// =============================================================================
// INITIALIZERS
// =============================================================================

#[test]
fn test_constructor_insert_into_type_with_lambda_initializers_is_rude() {
    let results = EditSession::new(
        "class C { var f: int = fn() => 1; new() { } }",
        "class C { var f: int = fn() => 1; new() { } new(x: int) { } }",
    )
    .analyze();

    assert_eq!(
        rude_kinds(&results),
        vec![RudeEditKind::InsertConstructorToTypeWithInitializersWithLambdas]
    );
}

// =============================================================================
// STATE MACHINES
// =============================================================================

#[test]
fn test_async_method_update_carries_syntax_map() {
    let results = EditSession::new(
        "class C { async fn M() { await F(); } }",
        "class C { async fn M() { await F(); G(); } }",
    )
    .analyze();

    assert!(results.rude_edits.is_empty());
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Update, "C.M()".to_string())]);
    assert!(results.semantic_edits[0].syntax_map.is_some());
}

// =============================================================================
// LIMITS AND FAILURES
// =============================================================================

#[rstest]
#[case(
    AnalyzerOptions { max_top_level_edits: 0, ..AnalyzerOptions::default() },
    RudeEditKind::SourceFileTooBig
)]
#[case(
    AnalyzerOptions { max_body_nodes: 1, ..AnalyzerOptions::default() },
    RudeEditKind::MemberBodyTooBig
)]
fn test_analysis_over_limit_is_blocked(#[case] options: AnalyzerOptions, #[case] expected: RudeEditKind) {
    let results = EditSession::new("class C { fn M() { F(); } }", "class C { fn M() { G(); } }")
        .options(options)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![expected]);
    assert!(results.semantic_edits.is_empty());
}

#[test]
fn test_analysis_is_deterministic() {
    let old = "class C {\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        F();\n    }\n    fn N() { }\n}";
    let new = "class C {\n\n    fn M() {\n        let a = 1;\n        let f = fn() => a;\n        G();\n    }\n    fn K() { }\n}";
    let first = EditSession::new(old, new).analyze();
    let second = EditSession::new(old, new).analyze();

    assert_eq!(first.status, second.status);
    assert_eq!(first.rude_edits, second.rude_edits);
    assert_eq!(semantic_edits(&first), semantic_edits(&second));
    assert_eq!(first.line_edits, second.line_edits);
    assert_eq!(first.active_statements, second.active_statements);
}
