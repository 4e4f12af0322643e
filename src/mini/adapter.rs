//! [`LanguageAdapter`] for the mini language.
//!
//! Statement positions follow the usual debugger conventions:
//!
//! - `if` and `while` stop on their header, up to the closing parenthesis.
//! - A block has two stops: part 0 is `{`, part 1 is `}`.
//! - A `let` stops once per declarator with an initializer; part 0 also
//!   covers the `let` keyword.
//! - `try` and local function statements have no stop of their own.

use rowan::{Direction, NodeOrToken, WalkEvent};
use smol_str::SmolStr;

use super::ast::{
    AstNode, CtorDecl, HasModifiers, LetStmt, PropertyDecl, child_of_kind, compact_text, function_body,
    token_of_kind,
};
use super::body::{body_layout, is_function};
use super::matcher::{match_body, match_top_level};
use super::parser::parse;
use super::semantic::{is_closure_scope_kind, own_descendants};
use super::syntax_kind::{MiniLanguage, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::base::{TextRange, TextSize};
use crate::language::{DeclarationBody, LanguageAdapter, StateMachineInfo};
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::syntax::{Edit, EditKind, EditMap, EditScript, Match, token_at};

/// Language services of the mini language.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniAdapter;

impl MiniAdapter {
    pub fn new() -> Self {
        Self
    }

    fn body_state_machine(&self, owner: &SyntaxNode, roots: &[SyntaxNode]) -> StateMachineInfo<MiniLanguage> {
        let suspension_points: Vec<SyntaxNode> = roots
            .iter()
            .flat_map(|root| own_descendants(root).collect::<Vec<_>>())
            .filter(|n| matches!(n.kind(), SyntaxKind::AWAIT_EXPR | SyntaxKind::YIELD_STMT))
            .collect();

        let is_async = if owner.kind() == SyntaxKind::SOURCE_FILE {
            suspension_points.iter().any(|n| n.kind() == SyntaxKind::AWAIT_EXPR)
        } else {
            has_async_modifier(owner)
        };

        StateMachineInfo {
            is_async,
            is_iterator: suspension_points.iter().any(|n| n.kind() == SyntaxKind::YIELD_STMT),
            suspension_points,
        }
    }

    /// Significant tokens of a statement's active span, without the
    /// contents of lambdas nested in it.
    fn active_statement_tokens(&self, node: &SyntaxNode, part: usize) -> Vec<(SyntaxKind, SmolStr)> {
        let span = self.active_span(node, part).unwrap_or_else(|| node.text_range());
        let mut tokens = Vec::new();
        let mut preorder = node.preorder_with_tokens();

        while let Some(event) = preorder.next() {
            let WalkEvent::Enter(element) = event else {
                continue;
            };
            match element {
                NodeOrToken::Node(child) => {
                    if &child != node && is_lambda_body(&child) {
                        preorder.skip_subtree();
                    }
                }
                NodeOrToken::Token(token) => {
                    if !token.kind().is_trivia() && span.contains_range(token.text_range()) {
                        tokens.push((token.kind(), SmolStr::new(token.text())));
                    }
                }
            }
        }
        tokens
    }
}

impl LanguageAdapter for MiniAdapter {
    type Language = MiniLanguage;

    fn is_trivia(&self, token: &SyntaxToken) -> bool {
        token.kind().is_trivia()
    }

    fn empty_compilation_unit(&self) -> SyntaxNode {
        parse("").syntax()
    }

    fn compute_top_level_edits(&self, old_root: &SyntaxNode, new_root: &SyntaxNode) -> EditScript<MiniLanguage> {
        match_top_level(old_root, new_root)
    }

    fn compute_body_match(
        &self,
        old_root: &SyntaxNode,
        new_root: &SyntaxNode,
        known_matches: &[(SyntaxNode, SyntaxNode)],
    ) -> Match<MiniLanguage> {
        match_body(old_root, new_root, known_matches)
    }

    fn statement_label(&self, node: &SyntaxNode) -> u32 {
        u32::from(node.kind() as u16)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// The compilation unit declares the entry point holding top-level code.
    fn is_member_declaration(&self, node: &SyntaxNode) -> bool {
        node.kind().is_member_declaration() || node.kind() == SyntaxKind::SOURCE_FILE
    }

    fn is_type_declaration(&self, node: &SyntaxNode) -> bool {
        node.kind().is_type_declaration()
    }

    fn find_member_declaration(&self, root: &SyntaxNode, node: &SyntaxNode) -> Option<SyntaxNode> {
        for ancestor in node.ancestors() {
            match ancestor.kind() {
                SyntaxKind::GLOBAL_STATEMENT => return Some(root.clone()),
                kind if kind.is_member_declaration() => return Some(ancestor),
                kind if kind.is_type_declaration() || kind == SyntaxKind::NAMESPACE_DECL => return None,
                _ => {}
            }
        }
        None
    }

    fn declaration_body(&self, declaration: &SyntaxNode) -> Option<DeclarationBody<MiniLanguage>> {
        let (roots, match_root) = match body_layout(declaration) {
            Some(layout) => (layout.roots, layout.match_root),
            // A file without top-level code still owns an empty entry point body.
            None if declaration.kind() == SyntaxKind::SOURCE_FILE => (Vec::new(), declaration.clone()),
            None => return None,
        };

        let envelope = match (roots.first(), roots.last()) {
            (Some(first), Some(last)) => TextRange::new(first.text_range().start(), last.text_range().end()),
            _ => TextRange::empty(declaration.text_range().end()),
        };
        let state_machine = self.body_state_machine(declaration, &roots);

        Some(DeclarationBody {
            declaration: declaration.clone(),
            roots,
            match_root,
            envelope,
            state_machine,
        })
    }

    fn is_global_statement(&self, node: &SyntaxNode) -> bool {
        node.kind() == SyntaxKind::GLOBAL_STATEMENT
    }

    fn is_declaration_with_initializer(&self, node: &SyntaxNode) -> bool {
        match node.kind() {
            SyntaxKind::FIELD_DECL => node
                .children()
                .filter(|c| c.kind() == SyntaxKind::VARIABLE_DECLARATOR)
                .any(|d| child_of_kind(&d, SyntaxKind::INITIALIZER).is_some()),
            SyntaxKind::PROPERTY_DECL => child_of_kind(node, SyntaxKind::INITIALIZER).is_some(),
            _ => false,
        }
    }

    fn is_constructor_with_member_initializers(&self, node: &SyntaxNode) -> bool {
        CtorDecl::cast(node.clone()).is_some_and(|ctor| !ctor.chains_to_this())
    }

    fn diagnostic_span(&self, node: &SyntaxNode, _kind: EditKind) -> TextRange {
        diagnostic_span(node)
    }

    fn display_name(&self, node: &SyntaxNode, _kind: EditKind) -> String {
        display_name(node).to_string()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn find_statement(&self, body: &DeclarationBody<MiniLanguage>, span: TextRange) -> Option<(SyntaxNode, usize)> {
        let offset = span.start();
        let root = body
            .roots
            .iter()
            .find(|r| r.text_range().contains_inclusive(offset))?;
        let token = token_at(root, offset)?;

        for ancestor in token.parent()?.ancestors() {
            if is_statement_like(&ancestor) {
                let part = statement_part(&ancestor, offset);
                return Some((ancestor, part));
            }
            if &ancestor == root {
                break;
            }
        }
        None
    }

    fn active_span(&self, node: &SyntaxNode, part: usize) -> Option<TextRange> {
        let range = node.text_range();
        match node.kind() {
            SyntaxKind::BLOCK => {
                let brace = if part == 0 { SyntaxKind::L_BRACE } else { SyntaxKind::R_BRACE };
                token_of_kind(node, brace).map(|t| t.text_range())
            }
            SyntaxKind::IF_STMT | SyntaxKind::WHILE_STMT => {
                let end = token_of_kind(node, SyntaxKind::R_PAREN).map_or(range.end(), |t| t.text_range().end());
                Some(TextRange::new(range.start(), end))
            }
            SyntaxKind::TRY_STMT | SyntaxKind::LOCAL_FUNCTION_STMT | SyntaxKind::EMPTY_STMT => None,
            SyntaxKind::LET_STMT => {
                let declarators = LetStmt::cast(node.clone())?.declarators();
                let declarator = declarators.get(part)?;
                declarator.initializer()?;
                let declarator_range = declarator.syntax().text_range();
                if part == 0 {
                    Some(TextRange::new(range.start(), declarator_range.end()))
                } else {
                    Some(declarator_range)
                }
            }
            SyntaxKind::ARROW_BODY => node.children().next().map(|e| e.text_range()),
            SyntaxKind::INITIALIZER => match node.parent() {
                Some(parent) if parent.kind() == SyntaxKind::VARIABLE_DECLARATOR => Some(parent.text_range()),
                _ => node.children().next().map(|e| e.text_range()),
            },
            SyntaxKind::CTOR_INITIALIZER => {
                let start = node
                    .children_with_tokens()
                    .find(|e| matches!(e.kind(), SyntaxKind::THIS_KW | SyntaxKind::BASE_KW))
                    .map_or(range.start(), |e| e.text_range().start());
                Some(TextRange::new(start, range.end()))
            }
            SyntaxKind::GLOBAL_STATEMENT => node.children().next().and_then(|s| self.active_span(&s, part)),
            kind if kind.is_statement() => Some(range),
            _ => None,
        }
    }

    fn enclosing_breakpoint_span(&self, root: &SyntaxNode, position: TextSize) -> Option<TextRange> {
        let token = token_at(root, position)?;
        token
            .parent()?
            .ancestors()
            .filter(is_statement_like)
            .find_map(|statement| {
                let span = self.active_span(&statement, statement_part(&statement, position))?;
                span.contains_inclusive(position).then_some(span)
            })
    }

    fn near_statements(&self, statement: &SyntaxNode) -> Vec<(SyntaxNode, usize)> {
        let mut near = Vec::new();
        let mut current = statement.clone();

        while let Some(parent) = current.parent() {
            near.extend(
                current
                    .siblings(Direction::Next)
                    .skip(1)
                    .filter_map(|sibling| statement_of(&sibling))
                    .map(|s| (s, 0)),
            );
            if parent.kind() == SyntaxKind::BLOCK {
                near.push((parent.clone(), 1));
            }
            if is_function(&parent)
                || parent.kind().is_member_declaration()
                || matches!(parent.kind(), SyntaxKind::ACCESSOR | SyntaxKind::SOURCE_FILE)
            {
                break;
            }
            current = parent;
        }
        near
    }

    fn are_equivalent_active_statements(&self, old: &SyntaxNode, new: &SyntaxNode, part: usize) -> bool {
        old.kind() == new.kind() && self.active_statement_tokens(old, part) == self.active_statement_tokens(new, part)
    }

    /// Only top-level statements carry positions of the entry point.
    fn active_tokens(&self, declaration: &SyntaxNode) -> Vec<SyntaxToken> {
        let significant = |node: &SyntaxNode| {
            node.descendants_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| !t.kind().is_trivia())
                .collect::<Vec<_>>()
        };
        if declaration.kind() == SyntaxKind::SOURCE_FILE {
            return declaration
                .children()
                .filter(|c| c.kind() == SyntaxKind::GLOBAL_STATEMENT)
                .flat_map(|s| significant(&s))
                .collect();
        }
        significant(declaration)
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    fn is_lambda(&self, node: &SyntaxNode) -> bool {
        is_function(node)
    }

    fn is_local_function(&self, node: &SyntaxNode) -> bool {
        node.kind() == SyntaxKind::LOCAL_FUNCTION_STMT
    }

    fn lambda_bodies(&self, lambda: &SyntaxNode) -> Vec<SyntaxNode> {
        function_body(lambda).into_iter().collect()
    }

    fn is_closure_scope(&self, node: &SyntaxNode) -> bool {
        is_closure_scope_kind(node.kind())
    }

    // ========================================================================
    // Exception handling
    // ========================================================================

    fn exception_handling_ancestors(&self, node: &SyntaxNode, is_non_leaf: bool) -> Vec<SyntaxNode> {
        let mut ancestors = Vec::new();
        let mut child: Option<SyntaxNode> = None;

        for ancestor in node.ancestors() {
            match ancestor.kind() {
                // A handler's own try is not around the handler.
                SyntaxKind::TRY_STMT => {
                    let from_try_block = child.as_ref().is_some_and(|c| c.kind() == SyntaxKind::BLOCK);
                    if is_non_leaf && from_try_block {
                        ancestors.push(ancestor.clone());
                    }
                }
                SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE => ancestors.push(ancestor.clone()),
                SyntaxKind::SOURCE_FILE => break,
                kind if kind.is_member_declaration() => break,
                _ if is_function(&ancestor) => break,
                _ => {}
            }
            child = Some(ancestor);
        }
        ancestors
    }

    fn exception_handling_region(&self, node: &SyntaxNode) -> (TextRange, bool) {
        match node.kind() {
            SyntaxKind::TRY_STMT => {
                let handlers: Vec<SyntaxNode> = node
                    .children()
                    .filter(|c| matches!(c.kind(), SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE))
                    .collect();
                let range = match (handlers.first(), handlers.last()) {
                    (Some(first), Some(last)) => TextRange::new(first.text_range().start(), last.text_range().end()),
                    _ => node.text_range(),
                };
                (range, false)
            }
            _ => (node.text_range(), true),
        }
    }

    fn are_exception_clauses_equivalent(&self, old: &SyntaxNode, new: &SyntaxNode) -> bool {
        if old.kind() != new.kind() {
            return false;
        }
        match old.kind() {
            SyntaxKind::TRY_STMT => {
                let handlers = |node: &SyntaxNode| -> Vec<SmolStr> {
                    node.children()
                        .filter(|c| matches!(c.kind(), SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE))
                        .map(|c| compact_text(&c))
                        .collect()
                };
                handlers(old) == handlers(new)
            }
            SyntaxKind::CATCH_CLAUSE => clause_header(old) == clause_header(new),
            _ => true,
        }
    }

    // ========================================================================
    // State machines
    // ========================================================================

    fn state_machine_info(&self, body_root: &SyntaxNode) -> StateMachineInfo<MiniLanguage> {
        let owner = body_root
            .parent()
            .filter(|p| is_function(p) || p.kind().is_member_declaration())
            .unwrap_or_else(|| body_root.clone());
        self.body_state_machine(&owner, std::slice::from_ref(body_root))
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Enum members without an explicit value take their value from their
    /// position.
    fn report_syntactic_rude_edits(
        &self,
        edit: &Edit<MiniLanguage>,
        _edit_map: &EditMap<MiniLanguage>,
    ) -> Vec<RudeEditDiagnostic> {
        let (EditKind::Reorder, Some(new)) = (edit.kind, &edit.new_node) else {
            return Vec::new();
        };
        if new.kind() != SyntaxKind::ENUM_MEMBER {
            return Vec::new();
        }
        let implicit = |node: &SyntaxNode| child_of_kind(node, SyntaxKind::INITIALIZER).is_none();
        let any_implicit = new
            .parent()
            .into_iter()
            .flat_map(|list| list.children())
            .filter(|c| c.kind() == SyntaxKind::ENUM_MEMBER)
            .any(|c| implicit(&c));
        if !any_implicit {
            return Vec::new();
        }
        vec![RudeEditDiagnostic::with_arguments(
            RudeEditKind::Reorder,
            diagnostic_span(new),
            [display_name(new)],
        )]
    }

    /// The state of an await inside a compound statement (a condition, a
    /// declaration) cannot be carried over when that statement changes.
    fn report_state_machine_suspension_point_rude_edits(
        &self,
        old_point: &SyntaxNode,
        new_point: &SyntaxNode,
    ) -> Vec<RudeEditDiagnostic> {
        if new_point.kind() != SyntaxKind::AWAIT_EXPR {
            return Vec::new();
        }
        let (Some(old_statement), Some(new_statement)) = (containing_statement(old_point), containing_statement(new_point))
        else {
            return Vec::new();
        };

        let is_simple = |statement: &SyntaxNode, point: &SyntaxNode| {
            matches!(statement.kind(), SyntaxKind::EXPR_STMT | SyntaxKind::RETURN_STMT)
                && statement.children().next().as_ref() == Some(point)
        };
        if is_simple(&old_statement, old_point) && is_simple(&new_statement, new_point) {
            return Vec::new();
        }
        if old_statement.kind() == new_statement.kind()
            && self.are_equivalent(&old_statement, &new_statement)
        {
            return Vec::new();
        }

        vec![RudeEditDiagnostic::new(
            RudeEditKind::AwaitStatementUpdate,
            diagnostic_span(&new_statement),
        )]
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Nodes the debugger can stop at, or that own such stops.
fn is_statement_like(node: &SyntaxNode) -> bool {
    match node.kind() {
        kind if kind.is_statement() => true,
        SyntaxKind::ARROW_BODY | SyntaxKind::CTOR_INITIALIZER => true,
        SyntaxKind::INITIALIZER => node
            .parent()
            .is_some_and(|p| matches!(p.kind(), SyntaxKind::VARIABLE_DECLARATOR | SyntaxKind::PROPERTY_DECL)),
        _ => false,
    }
}

/// A statement-like sibling, looking through top-level statement wrappers.
fn statement_of(node: &SyntaxNode) -> Option<SyntaxNode> {
    if node.kind() == SyntaxKind::GLOBAL_STATEMENT {
        return node.children().find(is_statement_like);
    }
    is_statement_like(node).then(|| node.clone())
}

fn statement_part(statement: &SyntaxNode, offset: TextSize) -> usize {
    match statement.kind() {
        SyntaxKind::BLOCK => {
            usize::from(token_of_kind(statement, SyntaxKind::R_BRACE).is_some_and(|t| t.text_range().contains(offset)))
        }
        SyntaxKind::LET_STMT => LetStmt::cast(statement.clone())
            .and_then(|s| {
                s.declarators()
                    .iter()
                    .position(|d| d.syntax().text_range().contains_inclusive(offset))
            })
            .unwrap_or(0),
        _ => 0,
    }
}

fn containing_statement(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors().skip(1).find(is_statement_like)
}

fn is_lambda_body(node: &SyntaxNode) -> bool {
    node.parent()
        .filter(is_function)
        .and_then(|lambda| function_body(&lambda))
        .is_some_and(|body| &body == node)
}

fn has_async_modifier(node: &SyntaxNode) -> bool {
    child_of_kind(node, SyntaxKind::MODIFIER_LIST).is_some_and(|list| token_of_kind(&list, SyntaxKind::ASYNC_KW).is_some())
}

/// Text of a catch clause up to its block.
fn clause_header(node: &SyntaxNode) -> Vec<(SyntaxKind, SmolStr)> {
    node.descendants_with_tokens()
        .take_while(|e| e.kind() != SyntaxKind::BLOCK)
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| (t.kind(), SmolStr::new(t.text())))
        .collect()
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Leading part of `node` up to the first element of one of `stops`,
/// without attributes.
fn header_span(node: &SyntaxNode, stops: &[SyntaxKind]) -> TextRange {
    let mut start = None;
    let mut end = None;
    for element in node.children_with_tokens() {
        let kind = element.kind();
        if stops.contains(&kind) {
            break;
        }
        if kind.is_trivia() || kind == SyntaxKind::ATTRIBUTE_LIST {
            continue;
        }
        let range = element.text_range();
        start.get_or_insert(range.start());
        end = Some(range.end());
    }
    match (start, end) {
        (Some(start), Some(end)) => TextRange::new(start, end),
        _ => node.text_range(),
    }
}

const DECLARATION_BODY_STARTS: &[SyntaxKind] = &[
    SyntaxKind::MEMBER_LIST,
    SyntaxKind::BLOCK,
    SyntaxKind::ARROW_BODY,
    SyntaxKind::ACCESSOR_LIST,
    SyntaxKind::CTOR_INITIALIZER,
    SyntaxKind::INITIALIZER,
    SyntaxKind::SEMICOLON,
];

fn diagnostic_span(node: &SyntaxNode) -> TextRange {
    let keyword = |kind: SyntaxKind| token_of_kind(node, kind).map_or_else(|| node.text_range(), |t| t.text_range());

    match node.kind() {
        SyntaxKind::SOURCE_FILE => node
            .children()
            .find(|c| c.kind() == SyntaxKind::GLOBAL_STATEMENT)
            .map_or_else(|| TextRange::empty(TextSize::from(0)), |s| diagnostic_span(&s)),
        SyntaxKind::GLOBAL_STATEMENT => node
            .children()
            .next()
            .map_or_else(|| node.text_range(), |s| diagnostic_span(&s)),
        SyntaxKind::NAMESPACE_DECL => header_span(node, &[SyntaxKind::L_BRACE, SyntaxKind::SEMICOLON]),
        kind if kind.is_type_declaration() || kind.is_member_declaration() => header_span(node, DECLARATION_BODY_STARTS),
        SyntaxKind::ACCESSOR => header_span(node, DECLARATION_BODY_STARTS),
        SyntaxKind::LAMBDA_EXPR | SyntaxKind::LOCAL_FUNCTION_STMT => {
            header_span(node, &[SyntaxKind::BLOCK, SyntaxKind::ARROW_BODY])
        }
        SyntaxKind::IF_STMT | SyntaxKind::WHILE_STMT => {
            let end = token_of_kind(node, SyntaxKind::R_PAREN).map_or(node.text_range().end(), |t| t.text_range().end());
            TextRange::new(node.text_range().start(), end)
        }
        SyntaxKind::BLOCK => keyword(SyntaxKind::L_BRACE),
        SyntaxKind::TRY_STMT => keyword(SyntaxKind::TRY_KW),
        SyntaxKind::ELSE_CLAUSE => keyword(SyntaxKind::ELSE_KW),
        SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE => header_span(node, &[SyntaxKind::BLOCK]),
        _ => node.text_range(),
    }
}

fn display_name(node: &SyntaxNode) -> &'static str {
    match node.kind() {
        SyntaxKind::SOURCE_FILE | SyntaxKind::GLOBAL_STATEMENT => "top-level code",
        SyntaxKind::NAMESPACE_DECL => "namespace",
        SyntaxKind::CLASS_DECL => "class",
        SyntaxKind::STRUCT_DECL => "struct",
        SyntaxKind::INTERFACE_DECL => "interface",
        SyntaxKind::ENUM_DECL => "enum",
        SyntaxKind::RECORD_DECL => "record",
        SyntaxKind::ENUM_MEMBER => "enum value",
        SyntaxKind::FIELD_DECL | SyntaxKind::VARIABLE_DECLARATOR => {
            let is_const = node
                .ancestors()
                .find(|a| a.kind() == SyntaxKind::FIELD_DECL)
                .and_then(|f| child_of_kind(&f, SyntaxKind::MODIFIER_LIST))
                .is_some_and(|list| token_of_kind(&list, SyntaxKind::CONST_KW).is_some());
            if is_const { "const field" } else { "field" }
        }
        SyntaxKind::PROPERTY_DECL => match PropertyDecl::cast(node.clone()) {
            Some(property) if property.is_auto() => "auto-property",
            _ => "property",
        },
        SyntaxKind::ACCESSOR | SyntaxKind::ACCESSOR_LIST => "property accessor",
        SyntaxKind::EVENT_DECL => "event",
        SyntaxKind::METHOD_DECL => "method",
        SyntaxKind::CTOR_DECL => match CtorDecl::cast(node.clone()) {
            Some(ctor) if ctor.has_modifier(SyntaxKind::STATIC_KW) => "static constructor",
            _ => "constructor",
        },
        SyntaxKind::CTOR_INITIALIZER => "constructor initializer",
        SyntaxKind::OPERATOR_DECL => "operator",
        SyntaxKind::PARAM => "parameter",
        SyntaxKind::TYPE_PARAM => "type parameter",
        SyntaxKind::ATTRIBUTE | SyntaxKind::ATTRIBUTE_LIST => "attribute",
        SyntaxKind::LAMBDA_EXPR => "lambda",
        SyntaxKind::LOCAL_FUNCTION_STMT => "local function",
        SyntaxKind::TRY_STMT => "try block",
        SyntaxKind::CATCH_CLAUSE => "catch clause",
        SyntaxKind::FINALLY_CLAUSE => "finally clause",
        SyntaxKind::AWAIT_EXPR => "await expression",
        SyntaxKind::YIELD_STMT => "yield statement",
        SyntaxKind::LET_STMT | SyntaxKind::LOCAL_DECLARATOR => "local variable declaration",
        SyntaxKind::IF_STMT => "if statement",
        SyntaxKind::WHILE_STMT => "while loop",
        SyntaxKind::BLOCK => "block",
        SyntaxKind::INITIALIZER => "initializer",
        kind if kind.is_statement() => "statement",
        _ => "code",
    }
}
