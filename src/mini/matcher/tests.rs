#![allow(clippy::unwrap_used)]

use super::*;
use crate::mini::parse;
use crate::syntax::{EditKind, EditScript};
use crate::mini::MiniLanguage;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn root(source: &str) -> SyntaxNode {
    parse(source).syntax()
}

fn top_level(old: &str, new: &str) -> EditScript<MiniLanguage> {
    match_top_level(&root(old), &root(new))
}

fn summary(script: &EditScript<MiniLanguage>) -> Vec<(EditKind, SyntaxKind)> {
    script
        .edits
        .iter()
        .map(|e| {
            let node = e.new_node.as_ref().or(e.old_node.as_ref()).unwrap();
            (e.kind, node.kind())
        })
        .collect()
}

fn nodes(root: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    root.descendants().filter(|n| n.kind() == kind).collect()
}

fn body(root: &SyntaxNode) -> SyntaxNode {
    nodes(root, SyntaxKind::METHOD_DECL)[0]
        .children()
        .find(|c| c.kind() == SyntaxKind::BLOCK)
        .unwrap()
}

// ============================================================================
// Top-level edits
// ============================================================================

#[rstest]
#[case("class A { fn M() { F(); } }")]
#[case("namespace N { class A<T> : B { var x: int = 1; prop P: int { get; } } }")]
#[case("F(); class A { } G();")]
fn test_identical_documents_have_no_edits(#[case] source: &str) {
    assert!(top_level(source, source).is_empty());
}

#[test]
fn test_trivia_only_change_has_no_edits() {
    let script = top_level("class A { fn M() { F(); } }", "class A {\n  fn M() {\n    F(); // call\n  }\n}");
    assert!(script.is_empty());
}

#[rstest]
#[case(
    "class A { fn M() { } }",
    "class A { fn M() { F(); } }",
    vec![(EditKind::Update, SyntaxKind::METHOD_DECL)]
)]
#[case(
    "class A { }",
    "class A { fn M() { } }",
    vec![(EditKind::Insert, SyntaxKind::METHOD_DECL)]
)]
#[case(
    "class A { fn M() { } var x: int; }",
    "class A { var x: int; }",
    vec![(EditKind::Delete, SyntaxKind::METHOD_DECL)]
)]
#[case(
    "class A { fn M(a: int) { } }",
    "class A { fn M(a: long) { } }",
    vec![(EditKind::Update, SyntaxKind::METHOD_DECL)]
)]
#[case(
    "class A { fn Foo() { Alpha(); Beta(); } }",
    "class A { fn Bar() { Alpha(); Beta(); } }",
    vec![(EditKind::Update, SyntaxKind::METHOD_DECL)]
)]
#[case(
    "class A { }",
    "public class A { }",
    vec![(EditKind::Update, SyntaxKind::CLASS_DECL)]
)]
fn test_member_edits(
    #[case] old: &str,
    #[case] new: &str,
    #[case] expected: Vec<(EditKind, SyntaxKind)>,
) {
    assert_eq!(summary(&top_level(old, new)), expected);
}

#[test]
fn test_unrelated_rename_is_insert_and_delete() {
    let script = top_level(
        "class A { fn Foo() { Alpha(); Beta(); Gamma(); Delta(); } }",
        "class A { fn Bar() { return 1; } }",
    );
    assert_eq!(
        summary(&script),
        vec![
            (EditKind::Insert, SyntaxKind::METHOD_DECL),
            (EditKind::Delete, SyntaxKind::METHOD_DECL),
        ]
    );
}

#[test]
fn test_overloads_pair_by_signature() {
    let old = root("class A { fn M(a: int) { } fn M(a: string) { F(); } }");
    let new = root("class A { fn M(a: string) { F(); } fn M(a: int) { } fn M() { } }");
    let script = match_top_level(&old, &new);

    let old_methods = nodes(&old, SyntaxKind::METHOD_DECL);
    let new_methods = nodes(&new, SyntaxKind::METHOD_DECL);
    assert!(script.top_match.contains(&old_methods[0], &new_methods[1]));
    assert!(script.top_match.contains(&old_methods[1], &new_methods[0]));
    assert!(summary(&script).contains(&(EditKind::Insert, SyntaxKind::METHOD_DECL)));
}

#[test]
fn test_reordered_members() {
    let script = top_level("class A { fn M() { } fn N() { } }", "class A { fn N() { } fn M() { } }");
    assert_eq!(summary(&script), vec![(EditKind::Reorder, SyntaxKind::METHOD_DECL)]);
}

#[test]
fn test_type_moved_into_namespace() {
    let script = top_level("class A { fn M() { } }", "namespace N { class A { fn M() { } } }");
    assert_eq!(summary(&script), vec![(EditKind::Move, SyntaxKind::CLASS_DECL)]);
}

#[test]
fn test_removed_namespace_is_not_an_edit() {
    let script = top_level("namespace N { class A { } }", "class A { }");
    assert_eq!(summary(&script), vec![(EditKind::Move, SyntaxKind::CLASS_DECL)]);
}

#[test]
fn test_global_statements_as_sequence() {
    let old = root("F(); G();");
    let new = root("F(); H(); G();");
    let script = match_top_level(&old, &new);
    assert_eq!(summary(&script), vec![(EditKind::Insert, SyntaxKind::GLOBAL_STATEMENT)]);

    let old_statements = nodes(&old, SyntaxKind::GLOBAL_STATEMENT);
    let new_statements = nodes(&new, SyntaxKind::GLOBAL_STATEMENT);
    assert!(script.top_match.contains(&old_statements[1], &new_statements[2]));
}

#[test]
fn test_changed_global_statement_is_updated() {
    let script = top_level("F(1);", "F(2);");
    assert_eq!(summary(&script), vec![(EditKind::Update, SyntaxKind::GLOBAL_STATEMENT)]);
}

#[test]
fn test_edits_list_inserts_before_deletes() {
    let script = top_level("class A { fn Old() { X(); } }", "class A { var y: int; }");
    assert_eq!(
        summary(&script),
        vec![
            (EditKind::Insert, SyntaxKind::FIELD_DECL),
            (EditKind::Delete, SyntaxKind::METHOD_DECL),
        ]
    );
}

// ============================================================================
// Body matching
// ============================================================================

#[test]
fn test_body_match_pairs_unchanged_statements() {
    let old = root("class A { fn M() { F(); if (a) { G(); } } }");
    let new = root("class A { fn M() { F(); if (a) { G(); } } }");
    let m = match_body(&body(&old), &body(&new), &[]);

    let old_calls = nodes(&old, SyntaxKind::EXPR_STMT);
    let new_calls = nodes(&new, SyntaxKind::EXPR_STMT);
    assert!(m.contains(&old_calls[0], &new_calls[0]));
    assert!(m.contains(&old_calls[1], &new_calls[1]));
}

#[test]
fn test_body_match_pairs_changed_statement_by_kind() {
    let old = root("class A { fn M() { F(1); return; } }");
    let new = root("class A { fn M() { F(2); return; } }");
    let m = match_body(&body(&old), &body(&new), &[]);

    let old_call = &nodes(&old, SyntaxKind::EXPR_STMT)[0];
    let new_call = &nodes(&new, SyntaxKind::EXPR_STMT)[0];
    assert!(m.contains(old_call, new_call));
}

#[test]
fn test_body_match_follows_statement_into_try() {
    let old = root("class A { fn M() { F(); G(); } }");
    let new = root("class A { fn M() { try { F(); } catch { } G(); } }");
    let m = match_body(&body(&old), &body(&new), &[]);

    let old_calls = nodes(&old, SyntaxKind::EXPR_STMT);
    let new_calls = nodes(&new, SyntaxKind::EXPR_STMT);
    assert!(m.contains(&old_calls[0], &new_calls[0]));
    assert!(m.contains(&old_calls[1], &new_calls[1]));
    assert_eq!(m.old_node(&nodes(&new, SyntaxKind::TRY_STMT)[0]), None);
}

#[test]
fn test_body_match_honours_known_matches() {
    let old = root("class A { fn M() { while (a) { await F(); } } }");
    let new = root("class A { fn M() { while (b) { G(); await F(); } } }");
    let old_await = nodes(&old, SyntaxKind::AWAIT_EXPR)[0].clone();
    let new_await = nodes(&new, SyntaxKind::AWAIT_EXPR)[0].clone();

    let m = match_body(&body(&old), &body(&new), &[(old_await.clone(), new_await.clone())]);
    assert!(m.contains(&old_await, &new_await));
    assert!(m.contains(
        &nodes(&old, SyntaxKind::WHILE_STMT)[0],
        &nodes(&new, SyntaxKind::WHILE_STMT)[0]
    ));
}

#[test]
fn test_body_match_roots_are_paired() {
    let old = root("class A { fn M() { } }");
    let new = root("class A { fn M() { F(); } }");
    let (old_body, new_body) = (body(&old), body(&new));
    let m = match_body(&old_body, &new_body, &[]);
    assert!(m.contains(&old_body, &new_body));
    assert_eq!(m.old_node(&nodes(&new, SyntaxKind::EXPR_STMT)[0]), None);
}

#[rstest]
#[case("let f = fn() => 1;", "fn f() { }", SyntaxKind::LAMBDA_EXPR, SyntaxKind::LOCAL_FUNCTION_STMT)]
#[case("fn f() { }", "let f = fn() => 1;", SyntaxKind::LOCAL_FUNCTION_STMT, SyntaxKind::LAMBDA_EXPR)]
fn test_body_match_pairs_lambda_with_local_function_of_same_name(
    #[case] old_statement: &str,
    #[case] new_statement: &str,
    #[case] old_kind: SyntaxKind,
    #[case] new_kind: SyntaxKind,
) {
    let old = root(&format!("class A {{ fn M() {{ {old_statement} }} }}"));
    let new = root(&format!("class A {{ fn M() {{ {new_statement} }} }}"));
    let m = match_body(&body(&old), &body(&new), &[]);

    assert!(m.contains(&nodes(&old, old_kind)[0], &nodes(&new, new_kind)[0]));
}

#[test]
fn test_body_match_keeps_differently_named_functions_apart() {
    let old = root("class A { fn M() { let f = fn() => 1; } }");
    let new = root("class A { fn M() { fn g() { } } }");
    let m = match_body(&body(&old), &body(&new), &[]);

    assert_eq!(m.old_node(&nodes(&new, SyntaxKind::LOCAL_FUNCTION_STMT)[0]), None);
}
