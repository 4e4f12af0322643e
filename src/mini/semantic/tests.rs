#![allow(clippy::unwrap_used)]

use super::*;
use crate::base::DocumentId;
use crate::mini::parse;
use crate::semantic::{
    Accessibility, CapturedVariableKind, MethodKind, Modifiers, RefKind, SymbolKind, TypeKind, TypeLayout,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn compile_all(sources: &[&str]) -> (Vec<SyntaxNode>, Compilation) {
    let roots: Vec<SyntaxNode> = sources.iter().map(|s| parse(s).syntax()).collect();
    let compilation = Compilation::new(
        roots
            .iter()
            .enumerate()
            .map(|(i, root)| (DocumentId::new(i as u32), root)),
    );
    (roots, compilation)
}

fn compile(source: &str) -> (SyntaxNode, Compilation) {
    let (mut roots, compilation) = compile_all(&[source]);
    (roots.remove(0), compilation)
}

fn symbol(compilation: &Compilation, key: &str) -> Symbol {
    compilation
        .resolve(&SymbolKey::new(key))
        .unwrap_or_else(|| panic!("no symbol {key}"))
}

fn first(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants().find(|n| n.kind() == kind).unwrap()
}

fn names(captures: &[VariableCapture<MiniLanguage>]) -> Vec<SmolStr> {
    captures.iter().map(VariableCapture::name).collect()
}

// ============================================================================
// Symbol keys
// ============================================================================

#[rstest]
#[case("namespace N { class A { } }", "N.A")]
#[case("namespace N.M { class A<T> { } }", "N.M.A`1")]
#[case("class A { fn M(a: int, ref b: C) { } }", "A.M(int,ref C)")]
#[case("class A { fn M<T>() { } }", "A.M`1()")]
#[case("class A { new(a: int) { } }", "A..ctor(int)")]
#[case("class A { static new() { } }", "A..cctor()")]
#[case("class A { operator +(a: A, b: A) -> A { } }", "A.operator+(A,A)")]
#[case("class A { prop P: int { get; } }", "A.P")]
#[case("class A : I { fn I.M() { } }", "A.I.M()")]
#[case("class A { class B { var x: int; } }", "A.B.x")]
#[case("enum E { X }", "E.X")]
#[case("F();", ENTRY_POINT_KEY)]
fn test_symbol_keys(#[case] source: &str, #[case] key: &str) {
    let (_, compilation) = compile(source);
    assert!(compilation.errors().is_empty(), "{:?}", compilation.errors());
    assert!(compilation.resolve(&SymbolKey::new(key)).is_some(), "missing {key}");
}

#[test]
fn test_declared_symbols_of_field_with_two_declarators() {
    let (root, compilation) = compile("class A { var x: int, y: int; }");
    let field = first(&root, SyntaxKind::FIELD_DECL);
    let keys: Vec<_> = compilation
        .declared_symbols(&field)
        .into_iter()
        .map(|s| s.key.as_str().to_string())
        .collect();
    assert_eq!(keys, vec!["A.x", "A.y"]);
}

// ============================================================================
// Symbol shapes
// ============================================================================

#[test]
fn test_member_accessibility_defaults() {
    let (_, compilation) = compile("class A { fn M() { } public fn N() { } } interface I { fn M(); }");
    assert_eq!(symbol(&compilation, "A").accessibility, Accessibility::Internal);
    assert_eq!(symbol(&compilation, "A.M()").accessibility, Accessibility::Private);
    assert_eq!(symbol(&compilation, "A.N()").accessibility, Accessibility::Public);
    assert_eq!(symbol(&compilation, "I.M()").accessibility, Accessibility::Public);
}

#[test]
fn test_base_list_split() {
    let (_, compilation) = compile("class B { } interface J { } class A : B, J { } class C : IFoo { }");
    let a = symbol(&compilation, "A");
    assert_eq!(a.base_type.as_deref(), Some("B"));
    assert_eq!(a.interfaces, vec![SmolStr::new("J")]);

    let c = symbol(&compilation, "C");
    assert_eq!(c.base_type, None);
    assert_eq!(c.interfaces, vec![SmolStr::new("IFoo")]);
}

#[test]
fn test_enum_member_values() {
    let (_, compilation) = compile("enum E : byte { A = 4, B, C = 10 }");
    assert_eq!(symbol(&compilation, "E").enum_underlying_type.as_deref(), Some("byte"));
    let values: Vec<_> = ["E.A", "E.B", "E.C"]
        .iter()
        .map(|k| symbol(&compilation, k).constant_value.unwrap())
        .collect();
    assert_eq!(values, vec!["4", "5", "10"]);
    assert!(symbol(&compilation, "E.A").modifiers.contains(Modifiers::CONST | Modifiers::STATIC));
}

#[test]
fn test_const_field_is_static_with_value() {
    let (_, compilation) = compile("class A { const var K: int = 1 + 2; }");
    let k = symbol(&compilation, "A.K");
    assert!(k.is_static());
    assert_eq!(k.constant_value.as_deref(), Some("1+2"));
}

#[test]
fn test_state_machine_methods() {
    let (_, compilation) = compile("class A { async fn M() { await N(); } fn I() { yield 1; } }");
    let m = symbol(&compilation, "A.M()");
    assert!(m.modifiers.contains(Modifiers::ASYNC));
    assert!(m.has_attribute(crate::semantic::ASYNC_STATE_MACHINE_ATTRIBUTE));

    let i = symbol(&compilation, "A.I()");
    assert!(i.modifiers.contains(Modifiers::ITERATOR));
    assert!(i.has_attribute(crate::semantic::ITERATOR_STATE_MACHINE_ATTRIBUTE));
}

#[test]
fn test_yield_in_lambda_does_not_make_iterator() {
    let (_, compilation) = compile("class A { fn M() { let f = fn() { yield 1; }; } }");
    assert!(!symbol(&compilation, "A.M()").modifiers.contains(Modifiers::ITERATOR));
}

#[test]
fn test_import_and_layout_attributes() {
    let (_, compilation) = compile(
        r#"[Layout(Sequential)] struct S { [Import("kernel", "Beep")] static extern fn Beep(); }"#,
    );
    assert_eq!(symbol(&compilation, "S").layout, TypeLayout::Sequential);
    let import = symbol(&compilation, "S.Beep()").import_data.unwrap();
    assert_eq!(import.library, "kernel");
    assert_eq!(import.entry_point.as_deref(), Some("Beep"));
}

#[test]
fn test_generic_arity_of_nested_members() {
    let (_, compilation) = compile("class A<T> { class B { fn M() { } } }");
    assert_eq!(symbol(&compilation, "A`1.B.M()").containing_generic_arity, 1);
}

// ============================================================================
// Synthesized members
// ============================================================================

#[test]
fn test_implicit_constructor() {
    let (_, compilation) = compile("class A { } abstract class B { } class C { new(x: int) { } }");
    let a = symbol(&compilation, "A..ctor()");
    assert!(a.is_implicitly_declared());
    assert_eq!(a.accessibility, Accessibility::Public);
    assert_eq!(symbol(&compilation, "B..ctor()").accessibility, Accessibility::Protected);
    assert!(compilation.resolve(&SymbolKey::new("C..ctor()")).is_none());
}

#[test]
fn test_static_initializer_synthesizes_static_constructor() {
    let (_, compilation) = compile("class A { static var x: int = 1; } class B { static var y: int; }");
    let cctor = symbol(&compilation, "A..cctor()");
    assert_eq!(cctor.method_kind(), Some(MethodKind::StaticConstructor));
    assert!(compilation.resolve(&SymbolKey::new("B..cctor()")).is_none());
}

#[test]
fn test_record_members() {
    let (_, compilation) = compile("record R(a: int, b: string) { }");
    assert!(symbol(&compilation, "R.a").is_implicitly_declared());
    assert_eq!(symbol(&compilation, "R.b").ty.as_deref(), Some("string"));

    let deconstruct = symbol(&compilation, "R.Deconstruct(ref int,ref string)");
    assert!(deconstruct.parameters.iter().all(|p| p.ref_kind == RefKind::Ref));

    let ctor = symbol(&compilation, "R..ctor(int,string)");
    assert!(!ctor.is_implicitly_declared());
    assert!(compilation.declaration_syntax(&ctor.key).is_empty());
}

#[test]
fn test_symbols_for_edit_include_primary_constructor() {
    let (root, compilation) = compile("class C(a: int) { }");
    let ty = first(&root, SyntaxKind::CLASS_DECL);
    let keys: Vec<_> = compilation
        .symbols_for_edit(&ty, EditKind::Update)
        .into_iter()
        .map(|s| s.key.as_str().to_string())
        .collect();
    assert_eq!(keys, vec!["C", "C..ctor(int)"]);
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_partial_types_merge() {
    let (_, compilation) = compile_all(&[
        "partial class A { fn M() { } }",
        "[Serializable] partial class A : IFoo { fn N() { } }",
    ]);
    assert!(compilation.errors().is_empty());
    let a = symbol(&compilation, "A");
    assert_eq!(a.declaring_documents, vec![DocumentId::new(0), DocumentId::new(1)]);
    assert!(a.has_attribute("Serializable"));
    assert_eq!(compilation.declaration_syntax(&a.key).len(), 2);
    assert_eq!(symbol(&compilation, "A.N()").declaring_documents, vec![DocumentId::new(1)]);
}

#[rstest]
#[case(&["class A { }", "class A { }"])]
#[case(&["class A { fn M() { } fn M() { } }"])]
#[case(&["F();", "G();"])]
fn test_declaration_errors(#[case] sources: &[&str]) {
    let (_, compilation) = compile_all(sources);
    assert_eq!(compilation.errors().len(), 1);
    assert!(compilation.has_errors());
}

#[test]
fn test_entry_point() {
    let (root, compilation) = compile("let x = await F(); class A { }");
    let entry = symbol(&compilation, ENTRY_POINT_KEY);
    assert_eq!(entry.kind, SymbolKind::Method(MethodKind::EntryPoint));
    assert!(entry.modifiers.contains(Modifiers::ASYNC));
    assert_eq!(compilation.declared_symbol(&root).map(|s| s.key), Some(entry.key));
}

#[test]
fn test_has_type() {
    let (_, compilation) = compile("class A { }");
    assert!(compilation.has_type("A"));
    assert!(compilation.has_type(crate::semantic::ASYNC_STATE_MACHINE_ATTRIBUTE));
    assert!(!compilation.has_type("Missing"));

    let bare = Compilation::with_well_known_types(std::iter::empty(), std::iter::empty());
    assert!(!bare.has_type(crate::semantic::ASYNC_STATE_MACHINE_ATTRIBUTE));
}

#[test]
fn test_type_symbol_kind() {
    let (_, compilation) = compile("struct S { } interface I { } record R { }");
    assert_eq!(symbol(&compilation, "S").type_kind(), Some(TypeKind::Struct));
    assert_eq!(symbol(&compilation, "I").type_kind(), Some(TypeKind::Interface));
    assert_eq!(symbol(&compilation, "R").type_kind(), Some(TypeKind::Record));
}

// ============================================================================
// Captures
// ============================================================================

const CAPTURING: &str = "class A { var f: int; fn M(x: int) { let y = 1; let g = fn(z: int) => x + y + f + z; } }";

#[test]
fn test_member_captures_receiver_first() {
    let (root, compilation) = compile(CAPTURING);
    let method = first(&root, SyntaxKind::METHOD_DECL);
    let captures = compilation.captured_variables(&method);
    assert_eq!(names(&captures), vec!["this", "x", "y"]);

    let VariableCapture::Variable(x) = &captures[1] else {
        panic!("expected a variable");
    };
    assert_eq!(x.kind, CapturedVariableKind::Parameter { ordinal: 0 });
    assert!(x.owner.is_none());
}

#[test]
fn test_lambda_parameter_is_not_a_capture_of_the_lambda() {
    let (root, compilation) = compile(CAPTURING);
    let lambda_body = first(&root, SyntaxKind::ARROW_BODY);
    let captures = compilation.accessed_captures(&lambda_body);
    assert_eq!(names(&captures), vec!["x", "y", "this"]);
}

#[test]
fn test_capture_scopes() {
    let (root, compilation) = compile(CAPTURING);
    let method = first(&root, SyntaxKind::METHOD_DECL);
    let body = first(&method, SyntaxKind::BLOCK);
    let captures = compilation.captured_variables(&method);

    for capture in &captures {
        assert_eq!(compilation.capture_scope(capture), Some(body.clone()), "{}", capture.name());
    }
}

#[test]
fn test_capture_use_sites() {
    let (root, compilation) = compile(CAPTURING);
    let method = first(&root, SyntaxKind::METHOD_DECL);
    let captures = compilation.captured_variables(&method);
    let body = first(&method, SyntaxKind::BLOCK);

    let sites = compilation.capture_use_sites(std::slice::from_ref(&body), &captures[2]);
    assert_eq!(sites.len(), 1);
    let offset = CAPTURING.find("y + f").unwrap() as u32;
    assert_eq!(sites[0].start(), crate::base::TextSize::new(offset));
}

#[test]
fn test_locals_in_own_frame_are_not_captured() {
    let (root, compilation) = compile("class A { fn M() { let y = 1; G(y); let h = fn() { let z = 2; G(z); }; } }");
    let method = first(&root, SyntaxKind::METHOD_DECL);
    assert!(compilation.captured_variables(&method).is_empty());
}

#[test]
fn test_static_member_is_not_captured() {
    let (root, compilation) = compile("class A { static var s: int; fn M() { let g = fn() => s; } }");
    let method = first(&root, SyntaxKind::METHOD_DECL);
    assert!(compilation.captured_variables(&method).is_empty());
}

#[test]
fn test_lambda_signature() {
    let (root, compilation) = compile("let f = async fn(a: int, b) -> Task => a;");
    let lambda = first(&root, SyntaxKind::LAMBDA_EXPR);
    let signature = compilation.lambda_signature(&lambda).unwrap();
    assert_eq!(signature.parameter_types, vec![SmolStr::new("int"), SmolStr::new("var")]);
    assert_eq!(signature.return_type.as_deref(), Some("Task"));
    assert!(signature.is_async);
}

#[test]
fn test_primary_constructor_captures() {
    let (_, compilation) = compile("class C(a: int, b: int) { fn M() => a; var x: int = b; }");
    assert_eq!(
        compilation.primary_constructor_captures(&SymbolKey::new("C")),
        vec![SmolStr::new("a")]
    );
}
