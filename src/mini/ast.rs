//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides accessors for its children.
//! Shared shapes (names, modifiers, attributes, parameters) are exposed
//! through the `Has*` traits.

use smol_str::SmolStr;

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// ============================================================================
// Free helpers
// ============================================================================

/// Concatenated text of the significant tokens of `node`.
///
/// `List < int >` and `List<int>` have the same compact text.
pub fn compact_text(node: &SyntaxNode) -> SmolStr {
    let text: String = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_owned())
        .collect();
    SmolStr::new(text)
}

pub fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|c| c.kind() == kind)
}

pub fn token_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Body of a function-like node: its block or its arrow body.
pub fn function_body(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children()
        .find(|c| matches!(c.kind(), SyntaxKind::BLOCK | SyntaxKind::ARROW_BODY))
}

// ============================================================================
// Shared shapes
// ============================================================================

pub trait HasName: AstNode {
    fn name_node(&self) -> Option<SyntaxNode> {
        child_of_kind(self.syntax(), SyntaxKind::NAME)
    }

    fn name(&self) -> Option<SmolStr> {
        self.name_node().map(|n| compact_text(&n)).filter(|n| !n.is_empty())
    }
}

pub trait HasModifiers: AstNode {
    fn modifiers(&self) -> Vec<SyntaxKind> {
        child_of_kind(self.syntax(), SyntaxKind::MODIFIER_LIST)
            .map(|list| {
                list.children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .map(|t| t.kind())
                    .filter(|k| k.is_modifier())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_modifier(&self, kind: SyntaxKind) -> bool {
        self.modifiers().contains(&kind)
    }
}

pub trait HasAttributes: AstNode {
    fn attributes(&self) -> Vec<Attribute> {
        self.syntax()
            .children()
            .filter(|c| c.kind() == SyntaxKind::ATTRIBUTE_LIST)
            .flat_map(|list| list.children().filter_map(Attribute::cast))
            .collect()
    }
}

pub trait HasParams: AstNode {
    fn param_list(&self) -> Option<SyntaxNode> {
        child_of_kind(self.syntax(), SyntaxKind::PARAM_LIST)
    }

    fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.children().filter_map(Param::cast).collect())
            .unwrap_or_default()
    }

    fn ret_type(&self) -> Option<SmolStr> {
        child_of_kind(self.syntax(), SyntaxKind::RET_TYPE)
            .and_then(|r| child_of_kind(&r, SyntaxKind::TYPE_REF))
            .map(|t| compact_text(&t))
    }

    fn body(&self) -> Option<SyntaxNode> {
        function_body(self.syntax())
    }
}

pub trait HasTypeParams: AstNode {
    fn type_params(&self) -> Vec<TypeParam> {
        child_of_kind(self.syntax(), SyntaxKind::TYPE_PARAM_LIST)
            .map(|list| list.children().filter_map(TypeParam::cast).collect())
            .unwrap_or_default()
    }

    /// `where` constraints as (parameter name, constraint types).
    fn constraints(&self) -> Vec<(SmolStr, Vec<SmolStr>)> {
        self.syntax()
            .children()
            .filter(|c| c.kind() == SyntaxKind::WHERE_CLAUSE)
            .filter_map(|clause| {
                let name = child_of_kind(&clause, SyntaxKind::NAME_REF).map(|n| compact_text(&n))?;
                let types = clause
                    .children()
                    .filter(|c| c.kind() == SyntaxKind::TYPE_REF)
                    .map(|t| compact_text(&t))
                    .collect();
                Some((name, types))
            })
            .collect()
    }
}

/// Type written after the `:` of a declarator, property, event or parameter.
fn declared_type(node: &SyntaxNode) -> Option<SmolStr> {
    child_of_kind(node, SyntaxKind::TYPE_REF).map(|t| compact_text(&t))
}

fn explicit_interface(node: &SyntaxNode) -> Option<SmolStr> {
    child_of_kind(node, SyntaxKind::EXPLICIT_INTERFACE)
        .and_then(|e| child_of_kind(&e, SyntaxKind::TYPE_REF))
        .map(|t| compact_text(&t))
}

// ============================================================================
// Root and namespaces
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn global_statements(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .filter(|c| c.kind() == SyntaxKind::GLOBAL_STATEMENT)
            .collect()
    }

    pub fn has_global_statements(&self) -> bool {
        self.0.children().any(|c| c.kind() == SyntaxKind::GLOBAL_STATEMENT)
    }
}

ast_node!(NamespaceDecl, NAMESPACE_DECL);
impl HasName for NamespaceDecl {}

/// Namespace and type declarations directly under a source file or namespace.
pub fn namespace_members(node: &SyntaxNode) -> Vec<SyntaxNode> {
    let container = match node.kind() {
        SyntaxKind::SOURCE_FILE => Some(node.clone()),
        _ => child_of_kind(node, SyntaxKind::MEMBER_LIST),
    };
    container
        .map(|c| {
            c.children()
                .filter(|n| n.kind() == SyntaxKind::NAMESPACE_DECL || n.kind().is_type_declaration())
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Types
// ============================================================================

ast_node!(TypeDecl, CLASS_DECL | STRUCT_DECL | INTERFACE_DECL | ENUM_DECL | RECORD_DECL);
impl HasName for TypeDecl {}
impl HasModifiers for TypeDecl {}
impl HasAttributes for TypeDecl {}
impl HasParams for TypeDecl {}
impl HasTypeParams for TypeDecl {}

impl TypeDecl {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    pub fn base_types(&self) -> Vec<SmolStr> {
        child_of_kind(&self.0, SyntaxKind::BASE_LIST)
            .map(|list| {
                list.children()
                    .filter(|c| c.kind() == SyntaxKind::TYPE_REF)
                    .map(|t| compact_text(&t))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Member declarations (and nested types), in source order.
    pub fn members(&self) -> Vec<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::MEMBER_LIST)
            .map(|list| {
                list.children()
                    .filter(|c| c.kind().is_member_declaration() || c.kind().is_type_declaration())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True if the declaration has a primary constructor parameter list.
    pub fn has_primary_constructor(&self) -> bool {
        self.param_list().is_some()
    }
}

ast_node!(EnumMember, ENUM_MEMBER);
impl HasName for EnumMember {}
impl HasAttributes for EnumMember {}

impl EnumMember {
    pub fn value(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::INITIALIZER).and_then(|i| Initializer(i).expr())
    }
}

// ============================================================================
// Members
// ============================================================================

ast_node!(FieldDecl, FIELD_DECL);
impl HasModifiers for FieldDecl {}
impl HasAttributes for FieldDecl {}

impl FieldDecl {
    pub fn declarators(&self) -> Vec<VariableDeclarator> {
        self.0.children().filter_map(VariableDeclarator::cast).collect()
    }
}

ast_node!(VariableDeclarator, VARIABLE_DECLARATOR | LOCAL_DECLARATOR);
impl HasName for VariableDeclarator {}

impl VariableDeclarator {
    pub fn ty(&self) -> Option<SmolStr> {
        declared_type(&self.0)
    }

    pub fn initializer(&self) -> Option<Initializer> {
        self.0.children().find_map(Initializer::cast)
    }
}

ast_node!(PropertyDecl, PROPERTY_DECL);
impl HasName for PropertyDecl {}
impl HasModifiers for PropertyDecl {}
impl HasAttributes for PropertyDecl {}

impl PropertyDecl {
    pub fn ty(&self) -> Option<SmolStr> {
        declared_type(&self.0)
    }

    pub fn explicit_interface(&self) -> Option<SmolStr> {
        explicit_interface(&self.0)
    }

    pub fn accessors(&self) -> Vec<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::ACCESSOR_LIST)
            .map(|list| list.children().filter(|c| c.kind() == SyntaxKind::ACCESSOR).collect())
            .unwrap_or_default()
    }

    pub fn arrow_body(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::ARROW_BODY)
    }

    pub fn initializer(&self) -> Option<Initializer> {
        self.0.children().find_map(Initializer::cast)
    }

    /// Every accessor is body-less: the compiler supplies a backing field.
    pub fn is_auto(&self) -> bool {
        let accessors = self.accessors();
        !accessors.is_empty() && accessors.iter().all(|a| function_body(a).is_none())
    }
}

ast_node!(EventDecl, EVENT_DECL);
impl HasName for EventDecl {}
impl HasModifiers for EventDecl {}
impl HasAttributes for EventDecl {}

impl EventDecl {
    pub fn ty(&self) -> Option<SmolStr> {
        declared_type(&self.0)
    }
}

ast_node!(MethodDecl, METHOD_DECL);
impl HasName for MethodDecl {}
impl HasModifiers for MethodDecl {}
impl HasAttributes for MethodDecl {}
impl HasParams for MethodDecl {}
impl HasTypeParams for MethodDecl {}

impl MethodDecl {
    pub fn explicit_interface(&self) -> Option<SmolStr> {
        explicit_interface(&self.0)
    }
}

ast_node!(CtorDecl, CTOR_DECL);
impl HasModifiers for CtorDecl {}
impl HasAttributes for CtorDecl {}
impl HasParams for CtorDecl {}

impl CtorDecl {
    pub fn initializer(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::CTOR_INITIALIZER)
    }

    /// `: this(...)` chains to a constructor of the same type.
    pub fn chains_to_this(&self) -> bool {
        self.initializer()
            .and_then(|i| token_of_kind(&i, SyntaxKind::THIS_KW))
            .is_some()
    }
}

ast_node!(OperatorDecl, OPERATOR_DECL);
impl HasModifiers for OperatorDecl {}
impl HasAttributes for OperatorDecl {}
impl HasParams for OperatorDecl {}

impl OperatorDecl {
    pub fn operator(&self) -> Option<SmolStr> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .skip_while(|t| t.kind() != SyntaxKind::OPERATOR_KW)
            .nth(1)
            .map(|t| SmolStr::new(t.text()))
    }
}

// ============================================================================
// Parts
// ============================================================================

ast_node!(Attribute, ATTRIBUTE);
impl HasName for Attribute {}

impl Attribute {
    pub fn arguments(&self) -> Vec<SmolStr> {
        child_of_kind(&self.0, SyntaxKind::ARG_LIST)
            .map(|list| list.children().map(|a| compact_text(&a)).collect())
            .unwrap_or_default()
    }
}

ast_node!(Param, PARAM);
impl HasName for Param {}

impl Param {
    pub fn ty(&self) -> Option<SmolStr> {
        declared_type(&self.0)
    }

    pub fn is_ref(&self) -> bool {
        token_of_kind(&self.0, SyntaxKind::REF_KW).is_some()
    }
}

ast_node!(TypeParam, TYPE_PARAM);
impl HasName for TypeParam {}

impl TypeParam {
    pub fn variance(&self) -> Option<SyntaxKind> {
        [SyntaxKind::IN_KW, SyntaxKind::OUT_KW]
            .into_iter()
            .find(|k| token_of_kind(&self.0, *k).is_some())
    }
}

ast_node!(Initializer, INITIALIZER);

impl Initializer {
    pub fn expr(&self) -> Option<SyntaxNode> {
        self.0.children().next()
    }
}

// ============================================================================
// Statements and expressions
// ============================================================================

ast_node!(Function, LAMBDA_EXPR | LOCAL_FUNCTION_STMT);
impl HasName for Function {}
impl HasModifiers for Function {}
impl HasParams for Function {}

impl Function {
    pub fn is_async(&self) -> bool {
        self.has_modifier(SyntaxKind::ASYNC_KW)
    }
}

ast_node!(LetStmt, LET_STMT);

impl LetStmt {
    pub fn declarators(&self) -> Vec<VariableDeclarator> {
        self.0.children().filter_map(VariableDeclarator::cast).collect()
    }
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    pub fn try_block(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::BLOCK)
    }

    pub fn catches(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .filter(|c| c.kind() == SyntaxKind::CATCH_CLAUSE)
            .collect()
    }

    pub fn finally(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::FINALLY_CLAUSE)
    }
}

ast_node!(CatchClause, CATCH_CLAUSE);
impl HasName for CatchClause {}

impl CatchClause {
    pub fn block(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::BLOCK)
    }
}
