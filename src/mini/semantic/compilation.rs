//! Declaration tables of a mini compilation.
//!
//! A compilation is built from the syntax trees of every document of a
//! project. Declarations are collected document by document; partial types
//! merge across documents. Members the compiler would synthesize (implicit
//! constructors, record properties) are added once all documents are in.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::{SmolStr, format_smolstr};
use tracing::{debug, trace};

use crate::base::{DocumentId, TextRange};
use crate::mini::ast::{
    AstNode, CtorDecl, EnumMember, EventDecl, FieldDecl, HasAttributes, HasModifiers, HasName,
    HasParams, HasTypeParams, MethodDecl, NamespaceDecl, OperatorDecl, Param, PropertyDecl,
    SourceFile, TypeDecl, compact_text, namespace_members,
};
use crate::mini::syntax_kind::{SyntaxKind, SyntaxNode};
use crate::semantic::{
    ASYNC_STATE_MACHINE_ATTRIBUTE, Accessibility, AttributeData, IMPORT_ATTRIBUTE,
    ITERATOR_STATE_MACHINE_ATTRIBUTE, ImportData, LAYOUT_ATTRIBUTE, MethodKind, Modifiers,
    ParameterData, RefKind, Symbol, SymbolKey, SymbolKind, TypeKind, TypeLayout,
    TypeParameterData, Variance,
};

/// Key of the method synthesized for top-level statements.
pub const ENTRY_POINT_KEY: &str = "<Program>$.<Main>$()";
const ENTRY_POINT_NAME: &str = "<Main>$";

/// Type of a parameter written without one.
const IMPLICIT_PARAMETER_TYPE: &str = "object";

/// A declaration error that makes the compilation unusable for emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub document: DocumentId,
    pub message: String,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub(super) struct SymbolEntry {
    pub symbol: Symbol,
    pub declarations: Vec<SyntaxNode>,
}

/// Where a declaration sits.
#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: SmolStr,
    containing_type: Option<SymbolKey>,
    containing_type_kind: Option<TypeKind>,
    generic_arity: usize,
}

impl Scope {
    fn prefix(&self) -> SmolStr {
        match &self.containing_type {
            Some(key) => SmolStr::new(key.as_str()),
            None => self.namespace.clone(),
        }
    }

    fn qualify(&self, name: &str) -> SmolStr {
        let prefix = self.prefix();
        if prefix.is_empty() {
            SmolStr::new(name)
        } else {
            format_smolstr!("{prefix}.{name}")
        }
    }

    fn default_member_accessibility(&self) -> Accessibility {
        match self.containing_type_kind {
            Some(TypeKind::Interface | TypeKind::Enum) => Accessibility::Public,
            _ => Accessibility::Private,
        }
    }
}

/// Symbols of all documents of a project.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub(super) symbols: IndexMap<SymbolKey, SymbolEntry>,
    pub(super) by_node: FxHashMap<SyntaxNode, Vec<SymbolKey>>,
    pub(super) members: FxHashMap<SymbolKey, Vec<SymbolKey>>,
    well_known_types: FxHashSet<SmolStr>,
    errors: Vec<SemanticError>,
}

impl Compilation {
    /// Build a compilation in which the state machine attribute types exist.
    pub fn new<'a>(documents: impl IntoIterator<Item = (DocumentId, &'a SyntaxNode)>) -> Self {
        Self::with_well_known_types(
            documents,
            [ASYNC_STATE_MACHINE_ATTRIBUTE, ITERATOR_STATE_MACHINE_ATTRIBUTE],
        )
    }

    /// Build a compilation whose referenced libraries define `well_known_types`.
    pub fn with_well_known_types<'a>(
        documents: impl IntoIterator<Item = (DocumentId, &'a SyntaxNode)>,
        well_known_types: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut compilation = Self {
            symbols: IndexMap::new(),
            by_node: FxHashMap::default(),
            members: FxHashMap::default(),
            well_known_types: well_known_types.into_iter().map(SmolStr::new).collect(),
            errors: Vec::new(),
        };

        let mut entry_point_documents = Vec::new();
        for (document, root) in documents {
            trace!("[COMPILATION] collecting {}", document);
            compilation.collect_document(document, root, &mut entry_point_documents);
        }

        if entry_point_documents.len() > 1 {
            for (document, root) in entry_point_documents.iter().skip(1) {
                compilation.errors.push(SemanticError {
                    document: *document,
                    message: "top-level statements may only appear in one document".to_string(),
                    range: root.text_range(),
                });
            }
        }

        compilation.resolve_base_types();
        compilation.synthesize_members();

        debug!(
            "[COMPILATION] {} symbols, {} errors",
            compilation.symbols.len(),
            compilation.errors.len()
        );
        compilation
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn symbol(&self, key: &SymbolKey) -> Option<&Symbol> {
        self.symbols.get(key).map(|e| &e.symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().map(|e| &e.symbol)
    }

    pub fn declarations(&self, key: &SymbolKey) -> &[SyntaxNode] {
        self.symbols.get(key).map_or(&[], |e| e.declarations.as_slice())
    }

    pub fn keys_of(&self, node: &SyntaxNode) -> &[SymbolKey] {
        self.by_node.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn member_keys(&self, type_key: &SymbolKey) -> &[SymbolKey] {
        self.members.get(type_key).map_or(&[], Vec::as_slice)
    }

    pub fn is_well_known_type(&self, name: &str) -> bool {
        self.well_known_types.contains(name)
    }

    // ========================================================================
    // Collection
    // ========================================================================

    fn collect_document(
        &mut self,
        document: DocumentId,
        root: &SyntaxNode,
        entry_point_documents: &mut Vec<(DocumentId, SyntaxNode)>,
    ) {
        let scope = Scope::default();
        for member in namespace_members(root) {
            self.collect_namespace_member(document, &member, &scope);
        }

        let Some(file) = SourceFile::cast(root.clone()) else {
            return;
        };
        if file.has_global_statements() {
            entry_point_documents.push((document, root.clone()));
            if entry_point_documents.len() == 1 {
                self.declare_entry_point(document, root, &file);
            }
        }
    }

    fn collect_namespace_member(&mut self, document: DocumentId, node: &SyntaxNode, scope: &Scope) {
        if let Some(namespace) = NamespaceDecl::cast(node.clone()) {
            let Some(name) = namespace.name() else {
                return;
            };
            let inner = Scope {
                namespace: scope.qualify(&name),
                ..Scope::default()
            };
            for member in namespace_members(node) {
                self.collect_namespace_member(document, &member, &inner);
            }
        } else if let Some(ty) = TypeDecl::cast(node.clone()) {
            self.collect_type(document, &ty, scope);
        }
    }

    fn collect_type(&mut self, document: DocumentId, ty: &TypeDecl, scope: &Scope) {
        let Some(name) = ty.name() else {
            return;
        };
        let type_kind = type_kind(ty.kind());
        let type_params = type_parameters(ty.type_params(), ty.constraints());
        let arity = type_params.len();
        let key = SymbolKey::new(arity_suffixed(&scope.qualify(&name), arity));
        let node = ty.syntax().clone();
        let modifiers = modifiers_of(&ty.modifiers());
        let attributes = source_attributes(ty);

        if let Some(existing) = self.symbols.get_mut(&key) {
            if existing.symbol.is_partial() && modifiers.contains(Modifiers::PARTIAL) {
                trace!("[COMPILATION] merging partial declaration of {}", key);
                let symbol = &mut existing.symbol;
                if !symbol.declaring_documents.contains(&document) {
                    symbol.declaring_documents.push(document);
                }
                for attribute in attributes {
                    if !symbol.attributes.contains(&attribute) {
                        symbol.attributes.push(attribute);
                    }
                }
                for base in ty.base_types() {
                    if !symbol.interfaces.contains(&base) {
                        symbol.interfaces.push(base);
                    }
                }
                existing.declarations.push(node.clone());
            } else {
                self.errors.push(SemanticError {
                    document,
                    message: format!("duplicate declaration of '{name}'"),
                    range: name_range(ty.syntax()),
                });
                return;
            }
        } else {
            let mut symbol = Symbol::new(key.clone(), SymbolKind::Type(type_kind), name.clone());
            symbol.accessibility = accessibility_of(&ty.modifiers()).unwrap_or(if scope.containing_type.is_some() {
                Accessibility::Private
            } else {
                Accessibility::Internal
            });
            symbol.modifiers = modifiers;
            symbol.containing_type = scope.containing_type.clone();
            symbol.containing_symbol = scope.containing_type.clone();
            symbol.containing_namespace = scope.namespace.clone();
            symbol.type_parameters = type_params;
            // Base list is split into base type and interfaces once every type is known.
            symbol.interfaces = ty.base_types();
            symbol.layout = layout_of(&attributes);
            symbol.attributes = attributes;
            symbol.declaring_documents = vec![document];
            symbol.name_span = Some(name_range(ty.syntax()));
            symbol.containing_generic_arity = scope.generic_arity;
            self.insert(symbol, Some(node.clone()));
            if let Some(containing) = &scope.containing_type {
                self.add_member(containing, &key);
            }
        }
        self.by_node.entry(node).or_default().push(key.clone());

        let inner = Scope {
            namespace: scope.namespace.clone(),
            containing_type: Some(key.clone()),
            containing_type_kind: Some(type_kind),
            generic_arity: scope.generic_arity + arity,
        };

        if type_kind == TypeKind::Enum {
            self.collect_enum_members(document, ty, &inner);
            return;
        }
        for member in ty.members() {
            if let Some(nested) = TypeDecl::cast(member.clone()) {
                self.collect_type(document, &nested, &inner);
            } else {
                self.collect_member(document, &member, &inner);
            }
        }
    }

    fn collect_enum_members(&mut self, document: DocumentId, ty: &TypeDecl, scope: &Scope) {
        let Some(type_key) = scope.containing_type.clone() else {
            return;
        };
        let type_name = self.symbol(&type_key).map(|s| s.name.clone()).unwrap_or_default();
        let mut next_value: i64 = 0;

        let members = ty
            .syntax()
            .children()
            .filter(|c| c.kind() == SyntaxKind::MEMBER_LIST)
            .flat_map(|list| list.children().filter_map(EnumMember::cast).collect::<Vec<_>>());

        for member in members {
            let Some(name) = member.name() else {
                continue;
            };
            let value = match member.value() {
                Some(expr) => {
                    let text = compact_text(&expr);
                    if let Ok(parsed) = text.parse::<i64>() {
                        next_value = parsed;
                    }
                    text
                }
                None => format_smolstr!("{next_value}"),
            };
            next_value += 1;

            let mut symbol = Symbol::new(SymbolKey::new(scope.qualify(&name)), SymbolKind::Field, name);
            symbol.accessibility = Accessibility::Public;
            symbol.modifiers = Modifiers::CONST | Modifiers::STATIC;
            symbol.ty = Some(type_name.clone());
            symbol.constant_value = Some(value);
            symbol.attributes = source_attributes(&member);
            self.declare_member(document, symbol, member.syntax(), scope);
        }
    }

    fn collect_member(&mut self, document: DocumentId, node: &SyntaxNode, scope: &Scope) {
        match node.kind() {
            SyntaxKind::FIELD_DECL => {
                let Some(field) = FieldDecl::cast(node.clone()) else {
                    return;
                };
                let modifiers = modifiers_of(&field.modifiers());
                let attributes = source_attributes(&field);
                for declarator in field.declarators() {
                    let Some(name) = declarator.name() else {
                        continue;
                    };
                    let mut symbol = Symbol::new(SymbolKey::new(scope.qualify(&name)), SymbolKind::Field, name);
                    symbol.accessibility = self.member_accessibility(&field.modifiers(), scope);
                    symbol.modifiers = modifiers;
                    if modifiers.contains(Modifiers::CONST) {
                        symbol.modifiers |= Modifiers::STATIC;
                        symbol.constant_value = declarator
                            .initializer()
                            .and_then(|i| i.expr())
                            .map(|e| compact_text(&e));
                    }
                    symbol.ty = declarator.ty();
                    symbol.attributes = attributes.clone();
                    symbol.name_span = declarator.name_node().map(|n| n.text_range());
                    self.declare_member(document, symbol, node, scope);
                }
            }
            SyntaxKind::PROPERTY_DECL => {
                let Some(property) = PropertyDecl::cast(node.clone()) else {
                    return;
                };
                let Some(name) = property.name() else {
                    return;
                };
                let explicit = property.explicit_interface();
                let key = match &explicit {
                    Some(iface) => scope.qualify(&format_smolstr!("{iface}.{name}")),
                    None => scope.qualify(&name),
                };
                let mut symbol = Symbol::new(SymbolKey::new(key), SymbolKind::Property, name);
                symbol.accessibility = self.member_accessibility(&property.modifiers(), scope);
                symbol.modifiers = modifiers_of(&property.modifiers());
                if property.is_auto() || property.initializer().is_some() {
                    symbol.modifiers |= Modifiers::HAS_BACKING_FIELD;
                }
                if let Some(iface) = explicit {
                    symbol.modifiers |= Modifiers::EXPLICIT_INTERFACE;
                    symbol.explicit_interface_implementations = vec![format_smolstr!("{iface}.{}", symbol.name)];
                }
                symbol.ty = property.ty();
                symbol.attributes = source_attributes(&property);
                self.declare_member(document, symbol, node, scope);
            }
            SyntaxKind::EVENT_DECL => {
                let Some(event) = EventDecl::cast(node.clone()) else {
                    return;
                };
                let Some(name) = event.name() else {
                    return;
                };
                let mut symbol = Symbol::new(SymbolKey::new(scope.qualify(&name)), SymbolKind::Event, name);
                symbol.accessibility = self.member_accessibility(&event.modifiers(), scope);
                symbol.modifiers = modifiers_of(&event.modifiers()) | Modifiers::HAS_BACKING_FIELD;
                symbol.ty = event.ty();
                symbol.attributes = source_attributes(&event);
                self.declare_member(document, symbol, node, scope);
            }
            SyntaxKind::METHOD_DECL => {
                let Some(method) = MethodDecl::cast(node.clone()) else {
                    return;
                };
                self.collect_method(document, &method, scope);
            }
            SyntaxKind::CTOR_DECL => {
                let Some(ctor) = CtorDecl::cast(node.clone()) else {
                    return;
                };
                let modifiers = modifiers_of(&ctor.modifiers());
                let parameters = parameters_of(&ctor.params());
                let (key, kind) = if modifiers.contains(Modifiers::STATIC) {
                    (scope.qualify(".cctor()"), MethodKind::StaticConstructor)
                } else {
                    (
                        scope.qualify(&format_smolstr!(".ctor({})", signature(&parameters))),
                        MethodKind::Constructor,
                    )
                };
                let name = if kind == MethodKind::StaticConstructor { ".cctor" } else { ".ctor" };
                let mut symbol = Symbol::new(SymbolKey::new(key), SymbolKind::Method(kind), name);
                symbol.accessibility = if kind == MethodKind::StaticConstructor {
                    Accessibility::Private
                } else {
                    self.member_accessibility(&ctor.modifiers(), scope)
                };
                symbol.modifiers = modifiers;
                symbol.parameters = parameters;
                symbol.attributes = source_attributes(&ctor);
                self.declare_member(document, symbol, node, scope);
            }
            SyntaxKind::OPERATOR_DECL => {
                let Some(operator) = OperatorDecl::cast(node.clone()) else {
                    return;
                };
                let Some(token) = operator.operator() else {
                    return;
                };
                let parameters = parameters_of(&operator.params());
                let name = format_smolstr!("operator{token}");
                let key = scope.qualify(&format_smolstr!("{name}({})", signature(&parameters)));
                let mut symbol = Symbol::new(SymbolKey::new(key), SymbolKind::Method(MethodKind::Operator), name);
                symbol.accessibility = self.member_accessibility(&operator.modifiers(), scope);
                symbol.modifiers = modifiers_of(&operator.modifiers()) | Modifiers::STATIC;
                symbol.parameters = parameters;
                symbol.ty = operator.ret_type();
                symbol.attributes = source_attributes(&operator);
                self.declare_member(document, symbol, node, scope);
            }
            _ => {}
        }
    }

    fn collect_method(&mut self, document: DocumentId, method: &MethodDecl, scope: &Scope) {
        let Some(name) = method.name() else {
            return;
        };
        let parameters = parameters_of(&method.params());
        let type_params = type_parameters(method.type_params(), method.constraints());
        let explicit = method.explicit_interface();
        let qualified_name = match &explicit {
            Some(iface) => format_smolstr!("{iface}.{name}"),
            None => name.clone(),
        };
        let key = scope.qualify(&format_smolstr!(
            "{}({})",
            arity_suffixed(&qualified_name, type_params.len()),
            signature(&parameters)
        ));

        let mut symbol = Symbol::new(SymbolKey::new(key), SymbolKind::Method(MethodKind::Ordinary), name);
        symbol.accessibility = self.member_accessibility(&method.modifiers(), scope);
        symbol.modifiers = modifiers_of(&method.modifiers());
        symbol.parameters = parameters;
        symbol.type_parameters = type_params;
        symbol.ty = Some(method.ret_type().unwrap_or_else(|| SmolStr::new_static("void")));
        symbol.attributes = source_attributes(method);

        if explicit.is_some() {
            symbol.modifiers |= Modifiers::EXPLICIT_INTERFACE;
            symbol.explicit_interface_implementations = vec![qualified_name.clone()];
        }
        if symbol.modifiers.contains(Modifiers::ASYNC) {
            symbol.attributes.push(synthesized(ASYNC_STATE_MACHINE_ATTRIBUTE));
        }
        if method.body().is_some_and(|body| contains_yield(&body)) {
            symbol.modifiers |= Modifiers::ITERATOR;
            symbol.attributes.push(synthesized(ITERATOR_STATE_MACHINE_ATTRIBUTE));
        }
        symbol.import_data = symbol
            .attributes
            .iter()
            .find(|a| a.name == IMPORT_ATTRIBUTE)
            .map(|a| ImportData {
                library: a.arguments.first().map(|s| unquote(s)).unwrap_or_default(),
                entry_point: a.arguments.get(1).map(|s| unquote(s)),
            });

        self.declare_member(document, symbol, method.syntax(), scope);
    }

    fn declare_entry_point(&mut self, document: DocumentId, root: &SyntaxNode, file: &SourceFile) {
        let mut symbol = Symbol::new(
            SymbolKey::new(ENTRY_POINT_KEY),
            SymbolKind::Method(MethodKind::EntryPoint),
            ENTRY_POINT_NAME,
        );
        symbol.accessibility = Accessibility::Private;
        symbol.modifiers = Modifiers::STATIC;
        symbol.ty = Some(SmolStr::new_static("void"));
        symbol.declaring_documents = vec![document];

        let statements = file.global_statements();
        if statements.iter().any(|s| contains_await(s)) {
            symbol.modifiers |= Modifiers::ASYNC;
            symbol.attributes.push(synthesized(ASYNC_STATE_MACHINE_ATTRIBUTE));
        }
        symbol.name_span = statements.first().map(|s| s.text_range());

        self.by_node.entry(root.clone()).or_default().push(symbol.key.clone());
        self.insert(symbol, Some(root.clone()));
    }

    fn member_accessibility(&self, modifiers: &[SyntaxKind], scope: &Scope) -> Accessibility {
        accessibility_of(modifiers).unwrap_or_else(|| scope.default_member_accessibility())
    }

    fn declare_member(&mut self, document: DocumentId, mut symbol: Symbol, node: &SyntaxNode, scope: &Scope) {
        let Some(type_key) = scope.containing_type.clone() else {
            return;
        };
        if self.symbols.contains_key(&symbol.key) {
            self.errors.push(SemanticError {
                document,
                message: format!("duplicate member '{}'", symbol.name),
                range: symbol.name_span.unwrap_or_else(|| name_range(node)),
            });
            return;
        }

        symbol.containing_type = Some(type_key.clone());
        symbol.containing_symbol = Some(type_key.clone());
        symbol.containing_namespace = scope.namespace.clone();
        symbol.containing_generic_arity = scope.generic_arity;
        symbol.declaring_documents = vec![document];
        if symbol.name_span.is_none() {
            symbol.name_span = Some(name_range(node));
        }

        let key = symbol.key.clone();
        self.by_node.entry(node.clone()).or_default().push(key.clone());
        self.insert(symbol, Some(node.clone()));
        self.add_member(&type_key, &key);
    }

    fn insert(&mut self, symbol: Symbol, declaration: Option<SyntaxNode>) {
        self.symbols.insert(
            symbol.key.clone(),
            SymbolEntry {
                symbol,
                declarations: declaration.into_iter().collect(),
            },
        );
    }

    fn add_member(&mut self, type_key: &SymbolKey, member: &SymbolKey) {
        let members = self.members.entry(type_key.clone()).or_default();
        if !members.contains(member) {
            members.push(member.clone());
        }
    }

    // ========================================================================
    // Whole-compilation passes
    // ========================================================================

    /// Split base lists: the first entry of a class or record is its base
    /// type unless it names an interface.
    fn resolve_base_types(&mut self) {
        let interfaces: FxHashSet<SmolStr> = self
            .symbols()
            .filter(|s| s.type_kind() == Some(TypeKind::Interface))
            .map(|s| s.name.clone())
            .collect();
        let classes: FxHashSet<SmolStr> = self
            .symbols()
            .filter(|s| s.is_type() && s.type_kind() != Some(TypeKind::Interface))
            .map(|s| s.name.clone())
            .collect();

        for entry in self.symbols.values_mut() {
            let symbol = &mut entry.symbol;
            match symbol.type_kind() {
                Some(TypeKind::Class | TypeKind::Record) => {
                    let Some(first) = symbol.interfaces.first() else {
                        continue;
                    };
                    let simple = simple_type_name(first);
                    let is_interface = interfaces.contains(simple)
                        || (!classes.contains(simple) && looks_like_interface(simple));
                    if !is_interface {
                        symbol.base_type = Some(symbol.interfaces.remove(0));
                    }
                }
                Some(TypeKind::Enum) => {
                    if !symbol.interfaces.is_empty() {
                        symbol.enum_underlying_type = Some(symbol.interfaces.remove(0));
                    }
                    symbol.interfaces.clear();
                }
                _ => {}
            }
        }
    }

    fn synthesize_members(&mut self) {
        let types: Vec<SymbolKey> = self
            .symbols()
            .filter(|s| {
                matches!(
                    s.type_kind(),
                    Some(TypeKind::Class | TypeKind::Struct | TypeKind::Record)
                )
            })
            .map(|s| s.key.clone())
            .collect();

        for type_key in types {
            self.synthesize_type_members(&type_key);
        }
    }

    fn synthesize_type_members(&mut self, type_key: &SymbolKey) {
        let Some(ty) = self.symbol(type_key).cloned() else {
            return;
        };
        let declarations: Vec<TypeDecl> = self
            .declarations(type_key)
            .iter()
            .filter_map(|d| TypeDecl::cast(d.clone()))
            .collect();
        let members: Vec<Symbol> = self
            .member_keys(type_key)
            .iter()
            .filter_map(|k| self.symbol(k).cloned())
            .collect();

        let primary_params: Vec<Param> = declarations
            .iter()
            .find(|d| d.has_primary_constructor())
            .map(|d| d.params())
            .unwrap_or_default();
        let has_primary = declarations.iter().any(|d| d.has_primary_constructor());
        let primary_parameters = parameters_of(&primary_params);

        let template = |key: SmolStr, kind: MethodKind, name: &'static str| {
            let mut symbol = Symbol::new(SymbolKey::new(key), SymbolKind::Method(kind), name);
            symbol.containing_type = Some(type_key.clone());
            symbol.containing_symbol = Some(type_key.clone());
            symbol.containing_namespace = ty.containing_namespace.clone();
            symbol.containing_generic_arity = ty.containing_generic_arity + ty.type_parameters.len();
            symbol.declaring_documents = ty.declaring_documents.clone();
            symbol.name_span = ty.name_span;
            symbol
        };

        let mut synthesized_members = Vec::new();

        if has_primary {
            let key = format_smolstr!("{}..ctor({})", type_key, signature(&primary_parameters));
            if self.symbol(&SymbolKey::new(key.clone())).is_none() {
                let mut ctor = template(key, MethodKind::Constructor, ".ctor");
                ctor.accessibility = Accessibility::Public;
                ctor.parameters = primary_parameters.clone();
                synthesized_members.push(ctor);
            }
        } else {
            let has_instance_ctor = members
                .iter()
                .any(|m| m.method_kind() == Some(MethodKind::Constructor));
            if !has_instance_ctor {
                let mut ctor = template(format_smolstr!("{}..ctor()", type_key), MethodKind::Constructor, ".ctor");
                ctor.accessibility = if ty.modifiers.contains(Modifiers::ABSTRACT) {
                    Accessibility::Protected
                } else {
                    Accessibility::Public
                };
                ctor.modifiers = Modifiers::IMPLICITLY_DECLARED;
                synthesized_members.push(ctor);
            }
        }

        let has_static_ctor = members
            .iter()
            .any(|m| m.method_kind() == Some(MethodKind::StaticConstructor));
        if !has_static_ctor && self.has_static_initializers(&members) {
            let mut cctor = template(format_smolstr!("{}..cctor()", type_key), MethodKind::StaticConstructor, ".cctor");
            cctor.accessibility = Accessibility::Private;
            cctor.modifiers = Modifiers::STATIC | Modifiers::IMPLICITLY_DECLARED;
            synthesized_members.push(cctor);
        }

        if ty.type_kind() == Some(TypeKind::Record) && has_primary {
            for parameter in &primary_parameters {
                let key = SymbolKey::new(format_smolstr!("{}.{}", type_key, parameter.name));
                if self.symbol(&key).is_some() {
                    continue;
                }
                let mut property = Symbol::new(key, SymbolKind::Property, parameter.name.clone());
                property.containing_type = Some(type_key.clone());
                property.containing_symbol = Some(type_key.clone());
                property.containing_namespace = ty.containing_namespace.clone();
                property.containing_generic_arity = ty.containing_generic_arity + ty.type_parameters.len();
                property.declaring_documents = ty.declaring_documents.clone();
                property.name_span = ty.name_span;
                property.accessibility = Accessibility::Public;
                property.modifiers = Modifiers::IMPLICITLY_DECLARED | Modifiers::HAS_BACKING_FIELD;
                property.ty = Some(parameter.ty.clone());
                synthesized_members.push(property);
            }

            let out_parameters: Vec<ParameterData> = primary_parameters
                .iter()
                .map(|p| ParameterData {
                    ref_kind: RefKind::Ref,
                    ..p.clone()
                })
                .collect();
            let key = format_smolstr!("{}.Deconstruct({})", type_key, signature(&out_parameters));
            if self.symbol(&SymbolKey::new(key.clone())).is_none() {
                let mut deconstruct = template(key, MethodKind::Ordinary, "Deconstruct");
                deconstruct.accessibility = Accessibility::Public;
                deconstruct.modifiers = Modifiers::IMPLICITLY_DECLARED;
                deconstruct.parameters = out_parameters;
                deconstruct.ty = Some(SmolStr::new_static("void"));
                synthesized_members.push(deconstruct);
            }
        }

        for symbol in synthesized_members {
            trace!("[COMPILATION] synthesized {}", symbol.key);
            let key = symbol.key.clone();
            self.insert(symbol, None);
            self.add_member(type_key, &key);
        }
    }

    fn has_static_initializers(&self, members: &[Symbol]) -> bool {
        members
            .iter()
            .filter(|m| m.is_static() && !m.modifiers.contains(Modifiers::CONST))
            .flat_map(|m| self.declarations(&m.key))
            .any(has_initializer)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn type_kind(kind: SyntaxKind) -> TypeKind {
    match kind {
        SyntaxKind::STRUCT_DECL => TypeKind::Struct,
        SyntaxKind::INTERFACE_DECL => TypeKind::Interface,
        SyntaxKind::ENUM_DECL => TypeKind::Enum,
        SyntaxKind::RECORD_DECL => TypeKind::Record,
        _ => TypeKind::Class,
    }
}

fn arity_suffixed(name: &str, arity: usize) -> SmolStr {
    if arity == 0 {
        SmolStr::new(name)
    } else {
        format_smolstr!("{name}`{arity}")
    }
}

fn signature(parameters: &[ParameterData]) -> String {
    parameters
        .iter()
        .map(|p| match p.ref_kind {
            RefKind::Ref => format!("ref {}", p.ty),
            RefKind::Value => p.ty.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub(super) fn parameters_of(params: &[Param]) -> Vec<ParameterData> {
    params
        .iter()
        .map(|p| ParameterData {
            name: p.name().unwrap_or_default(),
            ty: p.ty().unwrap_or_else(|| SmolStr::new_static(IMPLICIT_PARAMETER_TYPE)),
            ref_kind: if p.is_ref() { RefKind::Ref } else { RefKind::Value },
        })
        .collect()
}

fn type_parameters(
    params: Vec<crate::mini::ast::TypeParam>,
    constraints: Vec<(SmolStr, Vec<SmolStr>)>,
) -> Vec<TypeParameterData> {
    params
        .into_iter()
        .map(|p| {
            let name = p.name().unwrap_or_default();
            let variance = match p.variance() {
                Some(SyntaxKind::IN_KW) => Variance::In,
                Some(SyntaxKind::OUT_KW) => Variance::Out,
                _ => Variance::Invariant,
            };
            let constraints = constraints
                .iter()
                .filter(|(n, _)| *n == name)
                .flat_map(|(_, types)| types.iter().cloned())
                .collect();
            TypeParameterData {
                name,
                variance,
                constraints,
            }
        })
        .collect()
}

fn modifiers_of(kinds: &[SyntaxKind]) -> Modifiers {
    kinds.iter().fold(Modifiers::empty(), |acc, kind| {
        acc | match kind {
            SyntaxKind::STATIC_KW => Modifiers::STATIC,
            SyntaxKind::VIRTUAL_KW => Modifiers::VIRTUAL,
            SyntaxKind::ABSTRACT_KW => Modifiers::ABSTRACT,
            SyntaxKind::OVERRIDE_KW => Modifiers::OVERRIDE,
            SyntaxKind::SEALED_KW => Modifiers::SEALED,
            SyntaxKind::EXTERN_KW => Modifiers::EXTERN,
            SyntaxKind::CONST_KW => Modifiers::CONST,
            SyntaxKind::READONLY_KW => Modifiers::READONLY,
            SyntaxKind::VOLATILE_KW => Modifiers::VOLATILE,
            SyntaxKind::ASYNC_KW => Modifiers::ASYNC,
            SyntaxKind::PARTIAL_KW => Modifiers::PARTIAL,
            _ => Modifiers::empty(),
        }
    })
}

fn accessibility_of(kinds: &[SyntaxKind]) -> Option<Accessibility> {
    kinds.iter().find_map(|kind| match kind {
        SyntaxKind::PUBLIC_KW => Some(Accessibility::Public),
        SyntaxKind::PRIVATE_KW => Some(Accessibility::Private),
        SyntaxKind::PROTECTED_KW => Some(Accessibility::Protected),
        SyntaxKind::INTERNAL_KW => Some(Accessibility::Internal),
        _ => None,
    })
}

fn source_attributes(node: &impl HasAttributes) -> Vec<AttributeData> {
    node.attributes()
        .into_iter()
        .filter_map(|a| {
            Some(AttributeData {
                name: a.name()?,
                arguments: a.arguments(),
                synthesized: false,
            })
        })
        .collect()
}

fn synthesized(name: &str) -> AttributeData {
    AttributeData {
        name: SmolStr::new(name),
        arguments: Vec::new(),
        synthesized: true,
    }
}

fn layout_of(attributes: &[AttributeData]) -> TypeLayout {
    attributes
        .iter()
        .find(|a| a.name == LAYOUT_ATTRIBUTE)
        .and_then(|a| a.arguments.first())
        .map_or(TypeLayout::Auto, |argument| match argument.as_str() {
            "Sequential" => TypeLayout::Sequential,
            "Explicit" => TypeLayout::Explicit,
            _ => TypeLayout::Auto,
        })
}

fn unquote(text: &str) -> SmolStr {
    SmolStr::new(text.trim_matches('"'))
}

/// `List<int>` → `List`, `N.IFoo` → `IFoo`.
fn simple_type_name(name: &str) -> &str {
    let without_args = name.split('<').next().unwrap_or(name);
    without_args.rsplit('.').next().unwrap_or(without_args)
}

fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}

/// Range of the declaration's name, or of the whole node without one.
fn name_range(node: &SyntaxNode) -> TextRange {
    node.children()
        .find(|c| c.kind() == SyntaxKind::NAME)
        .or_else(|| {
            node.children()
                .find(|c| c.kind() == SyntaxKind::VARIABLE_DECLARATOR)
                .and_then(|d| d.children().find(|c| c.kind() == SyntaxKind::NAME))
        })
        .map_or_else(|| node.text_range(), |n| n.text_range())
}

fn has_initializer(declaration: &SyntaxNode) -> bool {
    match declaration.kind() {
        SyntaxKind::FIELD_DECL => declaration
            .children()
            .filter(|c| c.kind() == SyntaxKind::VARIABLE_DECLARATOR)
            .any(|d| d.children().any(|c| c.kind() == SyntaxKind::INITIALIZER)),
        SyntaxKind::PROPERTY_DECL => declaration.children().any(|c| c.kind() == SyntaxKind::INITIALIZER),
        _ => false,
    }
}

/// Nodes of `root` that are not inside a nested lambda or local function.
pub(crate) fn own_descendants(root: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    let mut preorder = root.preorder();
    std::iter::from_fn(move || {
        while let Some(event) = preorder.next() {
            if let rowan::WalkEvent::Enter(node) = event {
                if &node != root && matches!(node.kind(), SyntaxKind::LAMBDA_EXPR | SyntaxKind::LOCAL_FUNCTION_STMT) {
                    preorder.skip_subtree();
                    continue;
                }
                return Some(node);
            }
        }
        None
    })
}

fn contains_yield(body: &SyntaxNode) -> bool {
    own_descendants(body).any(|n| n.kind() == SyntaxKind::YIELD_STMT)
}

fn contains_await(node: &SyntaxNode) -> bool {
    own_descendants(node).any(|n| n.kind() == SyntaxKind::AWAIT_EXPR)
}

