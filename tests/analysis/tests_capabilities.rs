//! Edits gated by runtime capabilities.

use encore::analysis::SemanticEditKind;
use encore::{AnalysisStatus, EditCapabilities, RudeEditKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::helpers::analysis_helpers::*;

const NO_METHOD: &str = "class C { }";
const WITH_METHOD: &str = "class C { fn M() { } }";

#[test]
fn test_method_insert_without_capability_is_rude() {
    let results = EditSession::new(NO_METHOD, WITH_METHOD)
        .capabilities(EditCapabilities::BASELINE)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Blocked);
    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InsertNotSupportedByRuntime]);
    assert!(
        results
            .required_capabilities
            .contains(EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE)
    );
}

#[test]
fn test_method_insert_with_capability() {
    let results = EditSession::new(NO_METHOD, WITH_METHOD)
        .capabilities(EditCapabilities::BASELINE | EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert_eq!(semantic_edits(&results), vec![(SemanticEditKind::Insert, "C.M()".to_string())]);
    assert!(
        results
            .required_capabilities
            .contains(EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE)
    );
}

#[rstest]
#[case(EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE, RudeEditKind::InsertGenericMethod)]
#[case(EditCapabilities::BASELINE, RudeEditKind::InsertNotSupportedByRuntime)]
fn test_generic_method_insert(#[case] capabilities: EditCapabilities, #[case] expected: RudeEditKind) {
    let results = EditSession::new(NO_METHOD, "class C { fn M<T>() { } }")
        .capabilities(capabilities)
        .analyze();
    assert_eq!(rude_kinds(&results), vec![expected]);
}

#[test]
fn test_type_insert_requires_new_type_definition() {
    let results = EditSession::new(NO_METHOD, "class C { } class D { }")
        .capabilities(EditCapabilities::BASELINE)
        .analyze();

    assert_eq!(rude_kinds(&results), vec![RudeEditKind::InsertNotSupportedByRuntime]);
    assert!(
        results
            .required_capabilities
            .contains(EditCapabilities::NEW_TYPE_DEFINITION)
    );
}

#[test]
fn test_replacing_type_requires_new_type_definition() {
    let results = EditSession::new(
        "[CreateNewOnMetadataUpdate] class C { fn M() { } }",
        "[CreateNewOnMetadataUpdate] class C { fn M() { F(); } }",
    )
    .capabilities(EditCapabilities::BASELINE)
    .analyze();

    assert_eq!(
        rude_kinds(&results),
        vec![RudeEditKind::ChangingReloadableTypeNotSupportedByRuntime]
    );
}

#[test]
fn test_body_update_requests_no_capabilities() {
    let results = EditSession::new(WITH_METHOD, "class C { fn M() { F(); } }")
        .capabilities(EditCapabilities::BASELINE)
        .analyze();

    assert_eq!(results.status, AnalysisStatus::Changed);
    assert!(results.rude_edits.is_empty());
    assert!(
        !results
            .required_capabilities
            .intersects(EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE | EditCapabilities::NEW_TYPE_DEFINITION)
    );
}
