//! Language-neutral symbol data.

use std::fmt;

use bitflags::bitflags;
use smol_str::SmolStr;

use crate::base::{DocumentId, TextRange};

/// Stable identity of a symbol across two compilations.
///
/// Keys are built from the containing symbol, the name, the generic arity
/// and the parameter types. Return types are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolKey(SmolStr);

impl SymbolKey {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    StaticConstructor,
    Operator,
    PropertyGet,
    PropertySet,
    EventAdd,
    EventRemove,
    /// Synthesized entry point holding top-level statements.
    EntryPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Type(TypeKind),
    Method(MethodKind),
    Field,
    Property,
    Event,
    Parameter,
    TypeParameter,
    Local,
}

impl SymbolKind {
    /// Display name used in diagnostic messages.
    pub fn display_name(self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::Type(TypeKind::Class) => "class",
            SymbolKind::Type(TypeKind::Struct) => "struct",
            SymbolKind::Type(TypeKind::Interface) => "interface",
            SymbolKind::Type(TypeKind::Enum) => "enum",
            SymbolKind::Type(TypeKind::Record) => "record",
            SymbolKind::Method(MethodKind::Constructor) => "constructor",
            SymbolKind::Method(MethodKind::StaticConstructor) => "static constructor",
            SymbolKind::Method(MethodKind::Operator) => "operator",
            SymbolKind::Method(MethodKind::PropertyGet | MethodKind::PropertySet) => {
                "property accessor"
            }
            SymbolKind::Method(MethodKind::EventAdd | MethodKind::EventRemove) => "event accessor",
            SymbolKind::Method(MethodKind::EntryPoint) => "top-level code",
            SymbolKind::Method(MethodKind::Ordinary) => "method",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
            SymbolKind::Event => "event",
            SymbolKind::Parameter => "parameter",
            SymbolKind::TypeParameter => "type parameter",
            SymbolKind::Local => "local variable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    #[default]
    NotApplicable,
    Private,
    Protected,
    Internal,
    Public,
}

impl Accessibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Accessibility::NotApplicable => "",
            Accessibility::Private => "private",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::Public => "public",
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u32 {
        const STATIC = 1 << 0;
        const VIRTUAL = 1 << 1;
        const ABSTRACT = 1 << 2;
        const OVERRIDE = 1 << 3;
        const SEALED = 1 << 4;
        const EXTERN = 1 << 5;
        const CONST = 1 << 6;
        const READONLY = 1 << 7;
        const VOLATILE = 1 << 8;
        const ASYNC = 1 << 9;
        const ITERATOR = 1 << 10;
        const PARTIAL = 1 << 11;
        const IMPLICITLY_DECLARED = 1 << 12;
        const HAS_BACKING_FIELD = 1 << 13;
        const EXPLICIT_INTERFACE = 1 << 14;
    }
}

impl Modifiers {
    /// Modifiers whose change alters how a member is dispatched or stored.
    pub const DECLARATION: Modifiers = Modifiers::STATIC
        .union(Modifiers::VIRTUAL)
        .union(Modifiers::ABSTRACT)
        .union(Modifiers::OVERRIDE)
        .union(Modifiers::SEALED)
        .union(Modifiers::EXTERN)
        .union(Modifiers::CONST)
        .union(Modifiers::READONLY)
        .union(Modifiers::VOLATILE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameterData {
    pub name: SmolStr,
    pub variance: Variance,
    pub constraints: Vec<SmolStr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    #[default]
    Value,
    Ref,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterData {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub ref_kind: RefKind,
}

/// Platform invoke data of an extern method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportData {
    pub library: SmolStr,
    pub entry_point: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeData {
    pub name: SmolStr,
    pub arguments: Vec<SmolStr>,
    /// Emitted by the compiler rather than written in source.
    pub synthesized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeLayout {
    #[default]
    Auto,
    Sequential,
    Explicit,
}

/// A declared symbol as seen by one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub key: SymbolKey,
    pub kind: SymbolKind,
    pub name: SmolStr,
    pub accessibility: Accessibility,
    pub modifiers: Modifiers,
    pub containing_type: Option<SymbolKey>,
    pub containing_symbol: Option<SymbolKey>,
    pub containing_namespace: SmolStr,
    pub type_parameters: Vec<TypeParameterData>,
    pub parameters: Vec<ParameterData>,
    /// Return, field, property or event type.
    pub ty: Option<SmolStr>,
    pub base_type: Option<SmolStr>,
    pub interfaces: Vec<SmolStr>,
    pub enum_underlying_type: Option<SmolStr>,
    pub explicit_interface_implementations: Vec<SmolStr>,
    pub import_data: Option<ImportData>,
    pub attributes: Vec<AttributeData>,
    pub layout: TypeLayout,
    pub constant_value: Option<SmolStr>,
    pub declaring_documents: Vec<DocumentId>,
    pub name_span: Option<TextRange>,
    /// Generic arity of the containing types.
    pub containing_generic_arity: usize,
}

impl Symbol {
    pub fn new(key: SymbolKey, kind: SymbolKind, name: impl Into<SmolStr>) -> Self {
        Self {
            key,
            kind,
            name: name.into(),
            accessibility: Accessibility::NotApplicable,
            modifiers: Modifiers::empty(),
            containing_type: None,
            containing_symbol: None,
            containing_namespace: SmolStr::default(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            ty: None,
            base_type: None,
            interfaces: Vec::new(),
            enum_underlying_type: None,
            explicit_interface_implementations: Vec::new(),
            import_data: None,
            attributes: Vec::new(),
            layout: TypeLayout::Auto,
            constant_value: None,
            declaring_documents: Vec::new(),
            name_span: None,
            containing_generic_arity: 0,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_virtual_like(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::VIRTUAL | Modifiers::ABSTRACT | Modifiers::OVERRIDE)
    }

    pub fn is_extern(&self) -> bool {
        self.modifiers.contains(Modifiers::EXTERN) || self.import_data.is_some()
    }

    pub fn is_implicitly_declared(&self) -> bool {
        self.modifiers.contains(Modifiers::IMPLICITLY_DECLARED)
    }

    pub fn has_backing_field(&self) -> bool {
        self.modifiers.contains(Modifiers::HAS_BACKING_FIELD)
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(Modifiers::PARTIAL)
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Type(_))
    }

    pub fn type_kind(&self) -> Option<TypeKind> {
        match self.kind {
            SymbolKind::Type(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn method_kind(&self) -> Option<MethodKind> {
        match self.kind {
            SymbolKind::Method(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method(MethodKind::Constructor | MethodKind::StaticConstructor)
        )
    }

    pub fn is_parameterless_constructor(&self) -> bool {
        self.is_constructor() && self.parameters.is_empty()
    }

    /// Methods, properties and events: members that carry code.
    pub fn is_method_like(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Method(_) | SymbolKind::Property | SymbolKind::Event
        )
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty() || self.containing_generic_arity > 0
    }

    pub fn is_explicit_interface_implementation(&self) -> bool {
        self.modifiers.contains(Modifiers::EXPLICIT_INTERFACE)
            || !self.explicit_interface_implementations.is_empty()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Attributes written in source, in declaration order.
    pub fn source_attributes(&self) -> impl Iterator<Item = &AttributeData> {
        self.attributes.iter().filter(|a| !a.synthesized)
    }

    pub fn synthesized_attributes(&self) -> impl Iterator<Item = &AttributeData> {
        self.attributes.iter().filter(|a| a.synthesized)
    }

    pub fn parameter_types(&self) -> Vec<(SmolStr, RefKind)> {
        self.parameters
            .iter()
            .map(|p| (p.ty.clone(), p.ref_kind))
            .collect()
    }

    pub fn display_kind(&self) -> &'static str {
        self.kind.display_name()
    }

    /// `kind 'Name'`, e.g. `method 'Run'`.
    pub fn display(&self) -> String {
        format!("{} '{}'", self.display_kind(), self.name)
    }
}
