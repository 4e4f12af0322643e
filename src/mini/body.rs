//! Where executable code lives in a declaration.

use super::ast::{AstNode, CtorDecl, FieldDecl, PropertyDecl, child_of_kind, function_body};
use super::syntax_kind::{SyntaxKind, SyntaxNode};

/// Roots of the code emitted for a declaration, and the node that contains
/// all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyLayout {
    pub roots: Vec<SyntaxNode>,
    pub match_root: SyntaxNode,
}

impl BodyLayout {
    fn single(root: SyntaxNode) -> Self {
        Self {
            roots: vec![root.clone()],
            match_root: root,
        }
    }
}

pub(crate) fn body_layout(declaration: &SyntaxNode) -> Option<BodyLayout> {
    match declaration.kind() {
        SyntaxKind::METHOD_DECL | SyntaxKind::OPERATOR_DECL | SyntaxKind::ACCESSOR => {
            function_body(declaration).map(BodyLayout::single)
        }
        SyntaxKind::CTOR_DECL => {
            let ctor = CtorDecl::cast(declaration.clone())?;
            let body = function_body(declaration);
            match ctor.initializer() {
                Some(initializer) => Some(BodyLayout {
                    roots: std::iter::once(initializer).chain(body).collect(),
                    match_root: declaration.clone(),
                }),
                None => body.map(BodyLayout::single),
            }
        }
        SyntaxKind::PROPERTY_DECL => {
            let property = PropertyDecl::cast(declaration.clone())?;
            if let Some(initializer) = property.initializer() {
                return Some(BodyLayout {
                    roots: vec![initializer.syntax().clone()],
                    match_root: declaration.clone(),
                });
            }
            if let Some(arrow) = property.arrow_body() {
                return Some(BodyLayout::single(arrow));
            }
            let bodies: Vec<SyntaxNode> = property.accessors().iter().filter_map(function_body).collect();
            if bodies.is_empty() {
                return None;
            }
            Some(BodyLayout {
                roots: bodies,
                match_root: child_of_kind(declaration, SyntaxKind::ACCESSOR_LIST)?,
            })
        }
        SyntaxKind::FIELD_DECL => {
            let field = FieldDecl::cast(declaration.clone())?;
            let roots: Vec<SyntaxNode> = field
                .declarators()
                .iter()
                .filter_map(|d| d.initializer())
                .map(|i| i.syntax().clone())
                .collect();
            if roots.is_empty() {
                return None;
            }
            Some(BodyLayout {
                roots,
                match_root: declaration.clone(),
            })
        }
        SyntaxKind::SOURCE_FILE => {
            let roots: Vec<SyntaxNode> = declaration
                .children()
                .filter(|c| c.kind() == SyntaxKind::GLOBAL_STATEMENT)
                .collect();
            if roots.is_empty() {
                return None;
            }
            Some(BodyLayout {
                roots,
                match_root: declaration.clone(),
            })
        }
        _ => None,
    }
}

/// Children of `node` that the body matcher descends into.
///
/// Declaration-level match roots only expose the parts holding code.
pub(crate) fn body_children(node: &SyntaxNode) -> Vec<SyntaxNode> {
    let code_only = matches!(
        node.kind(),
        SyntaxKind::SOURCE_FILE
            | SyntaxKind::CTOR_DECL
            | SyntaxKind::PROPERTY_DECL
            | SyntaxKind::FIELD_DECL
            | SyntaxKind::VARIABLE_DECLARATOR
            | SyntaxKind::ACCESSOR_LIST
            | SyntaxKind::ACCESSOR
    );
    node.children()
        .filter(|c| {
            !code_only
                || matches!(
                    c.kind(),
                    SyntaxKind::GLOBAL_STATEMENT
                        | SyntaxKind::CTOR_INITIALIZER
                        | SyntaxKind::BLOCK
                        | SyntaxKind::ARROW_BODY
                        | SyntaxKind::INITIALIZER
                        | SyntaxKind::VARIABLE_DECLARATOR
                        | SyntaxKind::ACCESSOR
                )
        })
        .filter(|c| node.kind() != SyntaxKind::FIELD_DECL || has_initializer(c))
        .collect()
}

fn has_initializer(declarator: &SyntaxNode) -> bool {
    declarator.kind() != SyntaxKind::VARIABLE_DECLARATOR || child_of_kind(declarator, SyntaxKind::INITIALIZER).is_some()
}

pub(crate) fn is_function(node: &SyntaxNode) -> bool {
    matches!(node.kind(), SyntaxKind::LAMBDA_EXPR | SyntaxKind::LOCAL_FUNCTION_STMT)
}

/// Innermost lambda or local function containing `node`, within its member.
pub(crate) fn enclosing_function(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors()
        .skip(1)
        .take_while(|a| !a.kind().is_member_declaration() && a.kind() != SyntaxKind::SOURCE_FILE)
        .find(is_function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mini::parse;
    use pretty_assertions::assert_eq;

    fn first(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
        root.descendants().find(|n| n.kind() == kind).unwrap()
    }

    fn root_kinds(layout: &BodyLayout) -> Vec<SyntaxKind> {
        layout.roots.iter().map(|r| r.kind()).collect()
    }

    #[test]
    fn test_ctor_with_initializer_has_two_roots() {
        let root = parse("class C { new(x: int) : base(x) { F(); } }").syntax();
        let layout = body_layout(&first(&root, SyntaxKind::CTOR_DECL)).unwrap();
        assert_eq!(root_kinds(&layout), vec![SyntaxKind::CTOR_INITIALIZER, SyntaxKind::BLOCK]);
        assert_eq!(layout.match_root.kind(), SyntaxKind::CTOR_DECL);
    }

    #[test]
    fn test_field_roots_are_initializers() {
        let root = parse("class C { var a: int = 1, b: int, c: int = 2; }").syntax();
        let field = first(&root, SyntaxKind::FIELD_DECL);
        let layout = body_layout(&field).unwrap();
        assert_eq!(root_kinds(&layout), vec![SyntaxKind::INITIALIZER, SyntaxKind::INITIALIZER]);
        assert_eq!(body_children(&field).len(), 2);
    }

    #[test]
    fn test_auto_property_has_no_body() {
        let root = parse("class C { prop P: int { get; set; } }").syntax();
        assert!(body_layout(&first(&root, SyntaxKind::PROPERTY_DECL)).is_none());
    }

    #[test]
    fn test_source_file_roots_are_global_statements() {
        let root = parse("F(); class C {} G();").syntax();
        let layout = body_layout(&root).unwrap();
        assert_eq!(layout.roots.len(), 2);
        assert_eq!(body_children(&root).len(), 2);
    }

    #[test]
    fn test_enclosing_function_stops_at_member() {
        let root = parse("class C { fn M() { let f = fn() => x; } }").syntax();
        let name_ref = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NAME_REF)
            .unwrap();
        assert_eq!(enclosing_function(&name_ref).map(|f| f.kind()), Some(SyntaxKind::LAMBDA_EXPR));
        let block = first(&root, SyntaxKind::BLOCK);
        assert!(enclosing_function(&block).is_none());
    }
}
