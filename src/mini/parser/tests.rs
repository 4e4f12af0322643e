#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn tree(source: &str) -> SyntaxNode {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected errors: {:?}", parse.errors);
    parse.syntax()
}

fn child_kinds(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.children().map(|c| c.kind()).collect()
}

fn first(node: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    node.descendants().find(|n| n.kind() == kind).unwrap()
}

fn count(node: &SyntaxNode, kind: SyntaxKind) -> usize {
    node.descendants().filter(|n| n.kind() == kind).count()
}

// ============================================================================
// Losslessness
// ============================================================================

#[rstest]
#[case("")]
#[case("class A { }")]
#[case("  // leading\nnamespace N.M { class A<T> : B where T: C { } }\n")]
#[case("class A { fn M(a: int) -> int { return a + 1; } }")]
#[case("F(); let x = 1;")]
#[case("class A { fn M( }")]
#[case("}}} garbage ((")]
fn test_round_trip(#[case] source: &str) {
    assert_eq!(parse(source).syntax().text().to_string(), source);
}

#[test]
fn test_node_ranges_exclude_surrounding_trivia() {
    let root = tree("class A {\n    fn M() { }  // trailing\n}");
    let method = first(&root, SyntaxKind::METHOD_DECL);
    assert_eq!(method.text().to_string(), "fn M() { }");
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_namespace_with_types() {
    let root = tree("namespace N { class A { } struct B { } }");
    let namespace = first(&root, SyntaxKind::NAMESPACE_DECL);
    assert_eq!(child_kinds(&namespace), vec![SyntaxKind::NAME, SyntaxKind::MEMBER_LIST]);
    let members = first(&namespace, SyntaxKind::MEMBER_LIST);
    assert_eq!(child_kinds(&members), vec![SyntaxKind::CLASS_DECL, SyntaxKind::STRUCT_DECL]);
}

#[test]
fn test_type_header_parts() {
    let root = tree("[Layout(Sequential)] public sealed record R<in T>(a: int) : B, I where T: C { }");
    let record = first(&root, SyntaxKind::RECORD_DECL);
    assert_eq!(
        child_kinds(&record),
        vec![
            SyntaxKind::ATTRIBUTE_LIST,
            SyntaxKind::MODIFIER_LIST,
            SyntaxKind::NAME,
            SyntaxKind::TYPE_PARAM_LIST,
            SyntaxKind::PARAM_LIST,
            SyntaxKind::BASE_LIST,
            SyntaxKind::WHERE_CLAUSE,
            SyntaxKind::MEMBER_LIST,
        ]
    );
}

#[rstest]
#[case("class A { var x: int = 1, y: int; }", SyntaxKind::FIELD_DECL)]
#[case("class A { prop P: int { get; set; } = 0; }", SyntaxKind::PROPERTY_DECL)]
#[case("class A { prop P: int => 1; }", SyntaxKind::PROPERTY_DECL)]
#[case("class A { event E: Handler; }", SyntaxKind::EVENT_DECL)]
#[case("class A { fn M<T>(a: int) -> int where T: C { } }", SyntaxKind::METHOD_DECL)]
#[case("class A : I { fn I.M() { } }", SyntaxKind::METHOD_DECL)]
#[case("class A { abstract fn M(); }", SyntaxKind::METHOD_DECL)]
#[case("class A { fn M() => 1; }", SyntaxKind::METHOD_DECL)]
#[case("class A { new(a: int) : this() { } }", SyntaxKind::CTOR_DECL)]
#[case("class A { static new() { } }", SyntaxKind::CTOR_DECL)]
#[case("class A { operator +(a: A, b: A) -> A { } }", SyntaxKind::OPERATOR_DECL)]
#[case("class A { class Nested { } }", SyntaxKind::CLASS_DECL)]
fn test_member_kinds(#[case] source: &str, #[case] kind: SyntaxKind) {
    let root = tree(source);
    let members = first(&root, SyntaxKind::MEMBER_LIST);
    assert_eq!(child_kinds(&members).last(), Some(&kind));
}

#[test]
fn test_field_declarators() {
    let root = tree("class A { var x: int = 1, y: int; }");
    assert_eq!(count(&root, SyntaxKind::VARIABLE_DECLARATOR), 2);
    assert_eq!(count(&root, SyntaxKind::INITIALIZER), 1);
}

#[test]
fn test_property_accessors() {
    let root = tree("class A { prop P: int { get { return 1; } private set; } }");
    assert_eq!(count(&root, SyntaxKind::ACCESSOR), 2);
    let setter = root.descendants().filter(|n| n.kind() == SyntaxKind::ACCESSOR).nth(1).unwrap();
    assert_eq!(child_kinds(&setter), vec![SyntaxKind::MODIFIER_LIST]);
}

#[test]
fn test_constructor_initializer() {
    let root = tree("class A : B { new(x: int) : base(x) { F(); } }");
    let ctor = first(&root, SyntaxKind::CTOR_DECL);
    assert_eq!(
        child_kinds(&ctor),
        vec![SyntaxKind::PARAM_LIST, SyntaxKind::CTOR_INITIALIZER, SyntaxKind::BLOCK]
    );
    assert_eq!(first(&ctor, SyntaxKind::CTOR_INITIALIZER).text().to_string(), ": base(x)");
}

#[test]
fn test_enum_members() {
    let root = tree("enum E { A = 1, B, C, }");
    assert_eq!(count(&root, SyntaxKind::ENUM_MEMBER), 3);
    assert_eq!(count(&root, SyntaxKind::INITIALIZER), 1);
}

#[test]
fn test_import_attribute_arguments() {
    let root = tree(r#"class A { [Import("lib", "entry")] static extern fn F(); }"#);
    let attribute = first(&root, SyntaxKind::ATTRIBUTE);
    assert_eq!(attribute.text().to_string(), r#"Import("lib", "entry")"#);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_global_statements_and_types_mix() {
    let root = tree("F(); class A { } let x = 1;");
    assert_eq!(
        child_kinds(&root),
        vec![SyntaxKind::GLOBAL_STATEMENT, SyntaxKind::CLASS_DECL, SyntaxKind::GLOBAL_STATEMENT]
    );
    let global = root.children().last().unwrap();
    assert_eq!(child_kinds(&global), vec![SyntaxKind::LET_STMT]);
}

#[rstest]
#[case("let a = 1, b;", SyntaxKind::LET_STMT)]
#[case("return;", SyntaxKind::RETURN_STMT)]
#[case("throw e;", SyntaxKind::THROW_STMT)]
#[case("if (a) F(); else { G(); }", SyntaxKind::IF_STMT)]
#[case("while (a < 3) a = a + 1;", SyntaxKind::WHILE_STMT)]
#[case("try { } finally { }", SyntaxKind::TRY_STMT)]
#[case("yield 1;", SyntaxKind::YIELD_STMT)]
#[case("fn f(a: int) -> int => a;", SyntaxKind::LOCAL_FUNCTION_STMT)]
#[case("async fn f() { await g(); }", SyntaxKind::LOCAL_FUNCTION_STMT)]
#[case(";", SyntaxKind::EMPTY_STMT)]
#[case("{ F(); }", SyntaxKind::BLOCK)]
fn test_statement_kinds(#[case] statement: &str, #[case] kind: SyntaxKind) {
    let root = tree(&format!("class A {{ fn M() {{ {statement} }} }}"));
    let body = first(&root, SyntaxKind::BLOCK);
    assert_eq!(child_kinds(&body), vec![kind]);
}

#[test]
fn test_try_with_handlers() {
    let root = tree("try { F(); } catch (e) { G(); } catch { } finally { H(); }");
    let statement = first(&root, SyntaxKind::TRY_STMT);
    assert_eq!(
        child_kinds(&statement),
        vec![
            SyntaxKind::BLOCK,
            SyntaxKind::CATCH_CLAUSE,
            SyntaxKind::CATCH_CLAUSE,
            SyntaxKind::FINALLY_CLAUSE,
        ]
    );
}

#[test]
fn test_if_else_clause() {
    let root = tree("if (a) { } else if (b) { }");
    let statement = first(&root, SyntaxKind::IF_STMT);
    let else_clause = first(&statement, SyntaxKind::ELSE_CLAUSE);
    assert_eq!(child_kinds(&else_clause), vec![SyntaxKind::IF_STMT]);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_binary_precedence() {
    let root = tree("x = a + b * c;");
    let assignment = first(&root, SyntaxKind::BIN_EXPR);
    assert_eq!(child_kinds(&assignment), vec![SyntaxKind::NAME_REF, SyntaxKind::BIN_EXPR]);
    let sum = assignment.children().nth(1).unwrap();
    assert_eq!(child_kinds(&sum), vec![SyntaxKind::NAME_REF, SyntaxKind::BIN_EXPR]);
}

#[test]
fn test_postfix_chain() {
    let root = tree("this.a.M(1)(2);");
    let statement = first(&root, SyntaxKind::EXPR_STMT);
    let call = statement.first_child().unwrap();
    assert_eq!(call.kind(), SyntaxKind::CALL_EXPR);
    assert_eq!(child_kinds(&call), vec![SyntaxKind::CALL_EXPR, SyntaxKind::ARG_LIST]);
}

#[rstest]
#[case("let f = fn(a: int) => a + 1;")]
#[case("let f = fn() { return 1; };")]
#[case("let f = async fn() => await g();")]
fn test_lambdas(#[case] statement: &str) {
    let root = tree(&format!("class A {{ fn M() {{ {statement} }} }}"));
    assert_eq!(count(&root, SyntaxKind::LAMBDA_EXPR), 1);
}

#[test]
fn test_await_and_new() {
    let root = tree("let x = await new C<int>(1);");
    let await_expr = first(&root, SyntaxKind::AWAIT_EXPR);
    assert_eq!(child_kinds(&await_expr), vec![SyntaxKind::NEW_EXPR]);
    assert_eq!(count(&root, SyntaxKind::TYPE_ARG_LIST), 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_handler_is_reported() {
    let parse = parse("try { }");
    assert_eq!(parse.errors.len(), 1);
    assert!(parse.errors[0].message.contains("catch"));
}

#[test]
fn test_error_recovery_keeps_following_members() {
    let parse = parse("class A { ??? fn M() { } }");
    assert!(!parse.ok());
    assert_eq!(count(&parse.syntax(), SyntaxKind::METHOD_DECL), 1);
}

#[test]
fn test_missing_semicolon_error_range() {
    let source = "class A { fn M() { F() } }";
    let parse = parse(source);
    assert!(!parse.ok());
    let offset = source.find("} }").unwrap() as u32;
    assert_eq!(parse.errors[0].range.start(), TextSize::from(offset));
}
