//! Name binding inside bodies, and the closure captures derived from it.
//!
//! Names are bound by walking outwards from the reference: block locals
//! declared before the referencing statement, catch variables, lambda and
//! member parameters, members of the containing type and finally primary
//! constructor parameters.

use smol_str::SmolStr;
use tracing::trace;

use super::Compilation;
use crate::base::{TextRange, TextSize};
use crate::mini::ast::{
    AstNode, CatchClause, Function, HasName, HasParams, LetStmt, Param, TypeDecl, VariableDeclarator,
    compact_text,
};
use crate::mini::body::{body_layout, enclosing_function};
use crate::mini::syntax_kind::{MiniLanguage, SyntaxKind, SyntaxNode};
use crate::semantic::{CapturedVariable, CapturedVariableKind, SymbolKey, VariableCapture};

type Capture = VariableCapture<MiniLanguage>;

const INFERRED_TYPE: &str = "var";
const EXCEPTION_TYPE: &str = "Exception";

/// What a name reference denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Binding {
    /// Local, catch variable or parameter.
    Variable(VariableBinding),
    /// Non-static member of the containing type, reached through the receiver.
    InstanceMember,
    /// Anything that is not captured: static members, local functions.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct VariableBinding {
    pub declaration: SyntaxNode,
    pub name: SmolStr,
    pub ty: SmolStr,
    pub kind: CapturedVariableKind,
    pub owner: Option<SyntaxNode>,
}

impl VariableBinding {
    fn local(declaration: SyntaxNode, name: SmolStr, ty: SmolStr) -> Self {
        Self {
            declaration,
            name,
            ty,
            kind: CapturedVariableKind::Local,
            owner: None,
        }
    }

    fn parameter(param: &Param, ordinal: usize, kind: CapturedVariableKind, owner: Option<SyntaxNode>) -> Self {
        let kind = match kind {
            CapturedVariableKind::PrimaryConstructorParameter { .. } => {
                CapturedVariableKind::PrimaryConstructorParameter { ordinal }
            }
            _ => CapturedVariableKind::Parameter { ordinal },
        };
        Self {
            declaration: param.syntax().clone(),
            name: param.name().unwrap_or_default(),
            ty: param.ty().unwrap_or_else(|| SmolStr::new_static("object")),
            kind,
            owner,
        }
    }

    fn into_capture(self) -> Capture {
        VariableCapture::Variable(CapturedVariable {
            name: self.name,
            ty: self.ty,
            kind: self.kind,
            declaration: self.declaration,
            owner: self.owner,
        })
    }
}

/// A reference to a captured variable.
#[derive(Debug, Clone)]
pub(super) struct CaptureSite {
    pub capture: Capture,
    pub range: TextRange,
}

impl Compilation {
    // ========================================================================
    // Binding
    // ========================================================================

    /// Bind a `NAME_REF` used as an expression.
    pub(super) fn bind(&self, name_ref: &SyntaxNode) -> Option<Binding> {
        let name = compact_text(name_ref);
        let mut child = name_ref.clone();

        for ancestor in name_ref.ancestors().skip(1) {
            let found = match ancestor.kind() {
                SyntaxKind::BLOCK => bind_in_statements(&ancestor, &child, &name),
                SyntaxKind::SOURCE_FILE => bind_in_statements(&ancestor, &child, &name),
                SyntaxKind::LET_STMT => LetStmt::cast(ancestor.clone()).and_then(|stmt| {
                    stmt.declarators()
                        .into_iter()
                        .take_while(|d| d.syntax() != &child)
                        .filter(|d| d.name().as_ref() == Some(&name))
                        .last()
                        .map(local_binding)
                }),
                SyntaxKind::CATCH_CLAUSE => CatchClause::cast(ancestor.clone()).and_then(|clause| {
                    let declaration = clause.name_node()?;
                    (clause.name().as_ref() == Some(&name) && declaration != child).then(|| {
                        Binding::Variable(VariableBinding::local(
                            declaration,
                            name.clone(),
                            SmolStr::new_static(EXCEPTION_TYPE),
                        ))
                    })
                }),
                SyntaxKind::LAMBDA_EXPR | SyntaxKind::LOCAL_FUNCTION_STMT => {
                    let function = Function::cast(ancestor.clone())?;
                    bind_parameter(&function.params(), &name, Some(ancestor.clone()))
                }
                SyntaxKind::METHOD_DECL | SyntaxKind::CTOR_DECL | SyntaxKind::OPERATOR_DECL => {
                    let params: Vec<Param> = ancestor
                        .children()
                        .filter(|c| c.kind() == SyntaxKind::PARAM_LIST)
                        .flat_map(|list| list.children().filter_map(Param::cast).collect::<Vec<_>>())
                        .collect();
                    bind_parameter(&params, &name, None)
                }
                kind if kind.is_type_declaration() => return self.bind_in_type(&ancestor, &name),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
            child = ancestor;
        }
        None
    }

    fn bind_in_type(&self, type_node: &SyntaxNode, name: &SmolStr) -> Option<Binding> {
        let type_key = self.keys_of(type_node).first()?;

        let member = self
            .member_keys(type_key)
            .iter()
            .filter_map(|k| self.symbol(k))
            .find(|s| &s.name == name && !s.is_constructor());
        if let Some(member) = member {
            return Some(if member.is_static() {
                Binding::Other
            } else {
                Binding::InstanceMember
            });
        }

        let params = self.primary_parameters(type_key);
        params
            .iter()
            .position(|p| p.name().as_ref() == Some(name))
            .map(|ordinal| {
                Binding::Variable(VariableBinding::parameter(
                    &params[ordinal],
                    ordinal,
                    CapturedVariableKind::PrimaryConstructorParameter { ordinal },
                    None,
                ))
            })
    }

    fn primary_parameters(&self, type_key: &SymbolKey) -> Vec<Param> {
        self.declarations(type_key)
            .iter()
            .filter_map(|d| TypeDecl::cast(d.clone()))
            .find(|d| d.has_primary_constructor())
            .map(|d| d.params())
            .unwrap_or_default()
    }

    // ========================================================================
    // Captures
    // ========================================================================

    /// Every reference under `roots` that makes a closure capture something.
    pub(super) fn capture_sites(&self, roots: &[SyntaxNode], member: Option<&SymbolKey>) -> Vec<CaptureSite> {
        let mut sites = Vec::new();
        for node in roots.iter().flat_map(|r| r.descendants()) {
            let capture = match node.kind() {
                SyntaxKind::THIS_EXPR => enclosing_function(&node).map(|_| this_capture(member)),
                SyntaxKind::NAME_REF if is_expression_name(&node) => self.capture_of(&node, member),
                _ => None,
            };
            if let Some(capture) = capture {
                sites.push(CaptureSite {
                    capture,
                    range: node.text_range(),
                });
            }
        }
        sites
    }

    fn capture_of(&self, name_ref: &SyntaxNode, member: Option<&SymbolKey>) -> Option<Capture> {
        let frame = enclosing_function(name_ref)?;
        match self.bind(name_ref)? {
            Binding::Variable(variable) => match variable.kind {
                CapturedVariableKind::PrimaryConstructorParameter { .. } if !in_member_initializer(name_ref) => {
                    Some(this_capture(member))
                }
                CapturedVariableKind::PrimaryConstructorParameter { .. } => Some(variable.into_capture()),
                _ => {
                    let declaring_frame = enclosing_function(&variable.declaration);
                    (declaring_frame.as_ref() != Some(&frame)).then(|| variable.into_capture())
                }
            },
            Binding::InstanceMember => Some(this_capture(member)),
            Binding::Other => None,
        }
    }

    /// Captures of the closures in a member, receiver first, then variables
    /// by declaration position.
    pub(super) fn member_captures(&self, member_declaration: &SyntaxNode) -> Vec<Capture> {
        let Some(layout) = body_layout(member_declaration) else {
            return Vec::new();
        };
        let member = self.keys_of(member_declaration).first();

        let mut captures: Vec<Capture> = Vec::new();
        for site in self.capture_sites(&layout.roots, member) {
            if !captures.contains(&site.capture) {
                captures.push(site.capture);
            }
        }
        captures.sort_by_key(|c| match c {
            VariableCapture::This { .. } => (0, TextSize::from(0)),
            VariableCapture::Variable(v) => (1, v.declaration.text_range().start()),
        });
        trace!(
            "[BINDER] {} captures in {:?}",
            captures.len(),
            member_declaration.kind()
        );
        captures
    }

    /// Captures a lambda reads or writes from outside of itself.
    pub(super) fn lambda_captures(&self, lambda_body: &SyntaxNode) -> Vec<Capture> {
        let lambda = lambda_body.parent().unwrap_or_else(|| lambda_body.clone());
        let lambda_range = lambda.text_range();

        let mut captures: Vec<Capture> = Vec::new();
        for site in self.capture_sites(std::slice::from_ref(lambda_body), None) {
            let outside = match &site.capture {
                VariableCapture::This { .. } => true,
                VariableCapture::Variable(v) => !lambda_range.contains_range(v.declaration.text_range()),
            };
            if outside && !captures.contains(&site.capture) {
                captures.push(site.capture);
            }
        }
        captures
    }

    /// Closure scope holding a captured variable.
    pub(super) fn scope_of(&self, capture: &Capture) -> Option<SyntaxNode> {
        match capture {
            VariableCapture::This { member } => {
                let declaration = self.declarations(member.as_ref()?).first()?.clone();
                body_layout(&declaration).map(|layout| layout.match_root)
            }
            VariableCapture::Variable(variable) => match variable.kind {
                CapturedVariableKind::Local => variable
                    .declaration
                    .ancestors()
                    .skip(1)
                    .find(|n| is_closure_scope_kind(n.kind())),
                CapturedVariableKind::Parameter { .. } => match &variable.owner {
                    Some(owner) => Some(owner.clone()),
                    None => variable
                        .declaration
                        .ancestors()
                        .find(|n| n.kind().is_member_declaration())
                        .and_then(|member| body_layout(&member))
                        .map(|layout| layout.match_root),
                },
                CapturedVariableKind::PrimaryConstructorParameter { .. } => None,
            },
        }
    }

    /// Primary constructor parameters referenced from member bodies, which
    /// forces them into fields.
    pub(super) fn captured_primary_parameters(&self, type_key: &SymbolKey) -> Vec<SmolStr> {
        let params = self.primary_parameters(type_key);
        if params.is_empty() {
            return Vec::new();
        }

        let mut captured = vec![false; params.len()];
        let bodies = self
            .member_keys(type_key)
            .iter()
            .flat_map(|k| self.declarations(k))
            .filter(|d| {
                !matches!(d.kind(), SyntaxKind::FIELD_DECL)
                    && !(d.kind() == SyntaxKind::PROPERTY_DECL
                        && d.children().any(|c| c.kind() == SyntaxKind::INITIALIZER))
            })
            .filter_map(body_layout)
            .flat_map(|layout| layout.roots);

        for node in bodies.flat_map(|root| root.descendants()) {
            if node.kind() != SyntaxKind::NAME_REF || !is_expression_name(&node) {
                continue;
            }
            if let Some(Binding::Variable(VariableBinding {
                kind: CapturedVariableKind::PrimaryConstructorParameter { ordinal },
                ..
            })) = self.bind(&node)
            {
                captured[ordinal] = true;
            }
        }

        params
            .iter()
            .zip(captured)
            .filter(|(_, c)| *c)
            .filter_map(|(p, _)| p.name())
            .collect()
    }
}

fn this_capture(member: Option<&SymbolKey>) -> Capture {
    VariableCapture::This {
        member: member.cloned(),
    }
}

fn local_binding(declarator: VariableDeclarator) -> Binding {
    let name = declarator.name().unwrap_or_default();
    let ty = declarator.ty().unwrap_or_else(|| SmolStr::new_static(INFERRED_TYPE));
    Binding::Variable(VariableBinding::local(declarator.syntax().clone(), name, ty))
}

fn bind_parameter(params: &[Param], name: &SmolStr, owner: Option<SyntaxNode>) -> Option<Binding> {
    let ordinal = params.iter().position(|p| p.name().as_ref() == Some(name))?;
    Some(Binding::Variable(VariableBinding::parameter(
        &params[ordinal],
        ordinal,
        CapturedVariableKind::Parameter { ordinal },
        owner,
    )))
}

/// Locals of a statement list declared before `child`; local functions are
/// visible throughout.
fn bind_in_statements(list: &SyntaxNode, child: &SyntaxNode, name: &SmolStr) -> Option<Binding> {
    let statements: Vec<SyntaxNode> = list
        .children()
        .map(|c| {
            if c.kind() == SyntaxKind::GLOBAL_STATEMENT {
                c.first_child().unwrap_or(c)
            } else {
                c
            }
        })
        .collect();

    let declares_function = statements.iter().any(|s| {
        s.kind() == SyntaxKind::LOCAL_FUNCTION_STMT
            && Function::cast(s.clone()).and_then(|f| f.name()).as_ref() == Some(name)
    });
    if declares_function {
        return Some(Binding::Other);
    }

    let child_start = child.text_range().start();
    statements
        .iter()
        .take_while(|s| s.text_range().start() < child_start)
        .filter_map(|s| LetStmt::cast(s.clone()))
        .flat_map(|stmt| stmt.declarators())
        .filter(|d| d.name().as_ref() == Some(name))
        .last()
        .map(local_binding)
}

/// True for a name in expression position; the member part of `a.b` is not.
fn is_expression_name(name_ref: &SyntaxNode) -> bool {
    match name_ref.parent() {
        Some(parent) if parent.kind() == SyntaxKind::MEMBER_EXPR => {
            parent.first_child().as_ref() == Some(name_ref)
        }
        Some(parent) => parent.kind() != SyntaxKind::WHERE_CLAUSE,
        None => false,
    }
}

fn in_member_initializer(node: &SyntaxNode) -> bool {
    node.ancestors()
        .take_while(|a| !a.kind().is_member_declaration())
        .any(|a| {
            a.kind() == SyntaxKind::INITIALIZER
                && a.parent().is_some_and(|p| {
                    matches!(p.kind(), SyntaxKind::VARIABLE_DECLARATOR | SyntaxKind::PROPERTY_DECL)
                })
        })
}

pub(crate) fn is_closure_scope_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BLOCK
            | SyntaxKind::CATCH_CLAUSE
            | SyntaxKind::LAMBDA_EXPR
            | SyntaxKind::LOCAL_FUNCTION_STMT
            | SyntaxKind::ARROW_BODY
            | SyntaxKind::SOURCE_FILE
    ) || kind.is_member_declaration()
}
