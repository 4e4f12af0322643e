#![allow(clippy::unwrap_used)]

use super::*;
use crate::semantic::{Accessibility, SymbolKey, TypeLayout};
use rstest::rstest;

fn symbol(kind: SymbolKind, modifiers: Modifiers) -> Symbol {
    let mut symbol = Symbol::new(SymbolKey::new("N.C.M()"), kind, "M");
    symbol.modifiers = modifiers;
    symbol
}

fn type_symbol(kind: TypeKind, layout: TypeLayout) -> Symbol {
    let mut symbol = Symbol::new(SymbolKey::new("N.C"), SymbolKind::Type(kind), "C");
    symbol.layout = layout;
    symbol
}

// ============================================================================
// insert_capabilities
// ============================================================================

#[rstest]
#[case(SymbolKind::Method(MethodKind::Ordinary), Modifiers::empty(), EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE)]
#[case(SymbolKind::Field, Modifiers::STATIC, EditCapabilities::ADD_STATIC_FIELD_TO_EXISTING_TYPE)]
#[case(SymbolKind::Field, Modifiers::empty(), EditCapabilities::ADD_INSTANCE_FIELD_TO_EXISTING_TYPE)]
#[case(SymbolKind::Type(TypeKind::Class), Modifiers::empty(), EditCapabilities::NEW_TYPE_DEFINITION)]
#[case(
    SymbolKind::Property,
    Modifiers::HAS_BACKING_FIELD,
    EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE.union(EditCapabilities::ADD_INSTANCE_FIELD_TO_EXISTING_TYPE)
)]
fn test_insert_capabilities(
    #[case] kind: SymbolKind,
    #[case] modifiers: Modifiers,
    #[case] expected: EditCapabilities,
) {
    assert_eq!(insert_capabilities(&symbol(kind, modifiers)), Some(expected));
}

#[test]
fn test_insert_capabilities_generic_method() {
    let mut method = symbol(SymbolKind::Method(MethodKind::Ordinary), Modifiers::empty());
    method.containing_generic_arity = 1;

    assert_eq!(
        insert_capabilities(&method),
        Some(
            EditCapabilities::ADD_METHOD_TO_EXISTING_TYPE
                | EditCapabilities::GENERIC_ADD_METHOD_TO_EXISTING_TYPE
        )
    );
}

#[test]
fn test_insert_capabilities_local() {
    assert_eq!(insert_capabilities(&symbol(SymbolKind::Local, Modifiers::empty())), None);
}

// ============================================================================
// can_delete
// ============================================================================

#[rstest]
#[case(Modifiers::empty(), true)]
#[case(Modifiers::VIRTUAL, false)]
#[case(Modifiers::ABSTRACT, false)]
#[case(Modifiers::OVERRIDE, false)]
#[case(Modifiers::EXTERN, false)]
#[case(Modifiers::STATIC, true)]
fn test_can_delete_method(#[case] modifiers: Modifiers, #[case] expected: bool) {
    let class = type_symbol(TypeKind::Class, TypeLayout::Auto);
    let method = symbol(SymbolKind::Method(MethodKind::Ordinary), modifiers);

    assert_eq!(can_delete(&method, Some(&class)), expected);
}

#[test]
fn test_cannot_delete_interface_member() {
    let interface = type_symbol(TypeKind::Interface, TypeLayout::Auto);
    let method = symbol(SymbolKind::Method(MethodKind::Ordinary), Modifiers::empty());

    assert!(!can_delete(&method, Some(&interface)));
}

#[test]
fn test_cannot_delete_field_of_struct() {
    let ty = type_symbol(TypeKind::Struct, TypeLayout::Auto);
    let field = symbol(SymbolKind::Field, Modifiers::empty());

    let diagnostics = report_delete_rude_edits(&field, Some(&ty), TextRange::default());

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, RudeEditKind::Delete);
    assert_eq!(diagnostics[0].arguments, vec!["field 'M'"]);
}

#[test]
fn test_cannot_delete_type() {
    let ty = type_symbol(TypeKind::Class, TypeLayout::Auto);
    assert!(!can_delete(&ty, None));
}

// ============================================================================
// report_constructor_visibility
// ============================================================================

fn constructor(accessibility: Accessibility, implicit: bool) -> Symbol {
    let mut ctor = Symbol::new(
        SymbolKey::new("N.C..ctor()"),
        SymbolKind::Method(MethodKind::Constructor),
        "C",
    );
    ctor.accessibility = accessibility;
    if implicit {
        ctor.modifiers |= Modifiers::IMPLICITLY_DECLARED;
    }
    ctor
}

#[rstest]
#[case(Accessibility::Public, true, Accessibility::Private, false, true)]
#[case(Accessibility::Public, true, Accessibility::Public, false, false)]
#[case(Accessibility::Private, false, Accessibility::Public, true, true)]
#[case(Accessibility::Public, false, Accessibility::Private, false, false)]
fn test_constructor_visibility(
    #[case] old_access: Accessibility,
    #[case] old_implicit: bool,
    #[case] new_access: Accessibility,
    #[case] new_implicit: bool,
    #[case] expected: bool,
) {
    let old = constructor(old_access, old_implicit);
    let new = constructor(new_access, new_implicit);

    let diagnostic = report_constructor_visibility(&old, &new, TextRange::default());

    assert_eq!(diagnostic.is_some(), expected);
    if let Some(diagnostic) = diagnostic {
        assert_eq!(diagnostic.kind, RudeEditKind::ChangingConstructorVisibility);
    }
}

#[test]
fn test_namespace_change() {
    let mut old = type_symbol(TypeKind::Class, TypeLayout::Auto);
    old.containing_namespace = "A".into();
    let mut new = old.clone();
    new.containing_namespace = "B".into();

    assert_eq!(containing_namespace_changed(&old, &new), Some("B".into()));
    assert_eq!(containing_namespace_changed(&old, &old), None);
}
