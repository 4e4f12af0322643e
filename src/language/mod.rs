//! # Language Adapter
//!
//! The analyzer holds no knowledge of any concrete syntax. Everything it
//! needs to know about a language (what a declaration is, where a body
//! starts, which nodes are lambdas, how exception handlers nest) is asked
//! through [`LanguageAdapter`].
//!
//! Operations with a reasonable language-independent answer have default
//! implementations expressed in terms of the required ones.

mod body;

pub use body::{DeclarationBody, StateMachineInfo, direct_lambda_bodies};

use crate::base::{TextRange, TextSize};
use crate::rude::RudeEditDiagnostic;
use crate::syntax::{Edit, EditKind, EditMap, EditScript, Language, Match, SyntaxNode, SyntaxToken};

type Node<A> = SyntaxNode<<A as LanguageAdapter>::Language>;

/// Per-language services used by the document analyzer.
pub trait LanguageAdapter {
    type Language: Language;

    // ========================================================================
    // Trees
    // ========================================================================

    fn is_trivia(&self, token: &SyntaxToken<Self::Language>) -> bool;

    /// Root of an empty document, compared against when a document is added.
    fn empty_compilation_unit(&self) -> Node<Self>;

    // ========================================================================
    // Matching
    // ========================================================================

    /// Match two document roots and derive the top-level edit script.
    fn compute_top_level_edits(
        &self,
        old_root: &Node<Self>,
        new_root: &Node<Self>,
    ) -> EditScript<Self::Language>;

    /// Match two bodies. `known_matches` must be honoured.
    fn compute_body_match(
        &self,
        old_root: &Node<Self>,
        new_root: &Node<Self>,
        known_matches: &[(Node<Self>, Node<Self>)],
    ) -> Match<Self::Language>;

    /// Label used to align statements (e.g. suspension points) by kind.
    fn statement_label(&self, node: &Node<Self>) -> u32;

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Declarations that own a symbol: types, members, enum members.
    fn is_member_declaration(&self, node: &Node<Self>) -> bool;

    fn is_type_declaration(&self, node: &Node<Self>) -> bool;

    /// Nearest declaration whose body contains `node`, or the compilation
    /// unit for top-level statements.
    fn find_member_declaration(&self, root: &Node<Self>, node: &Node<Self>) -> Option<Node<Self>>;

    fn declaration_body(&self, declaration: &Node<Self>) -> Option<DeclarationBody<Self::Language>>;

    fn is_global_statement(&self, node: &Node<Self>) -> bool;

    /// Field or property declaration with an initializer.
    fn is_declaration_with_initializer(&self, node: &Node<Self>) -> bool;

    /// Constructor whose emitted body runs member initializers.
    fn is_constructor_with_member_initializers(&self, node: &Node<Self>) -> bool;

    fn diagnostic_span(&self, node: &Node<Self>, kind: EditKind) -> TextRange;

    fn display_name(&self, node: &Node<Self>, kind: EditKind) -> String;

    /// Closest ancestor-or-self that is a member or type declaration.
    fn containing_declaration(&self, node: &Node<Self>) -> Option<Node<Self>> {
        node.ancestors()
            .find(|n| self.is_member_declaration(n) || self.is_type_declaration(n))
    }

    /// Closest proper ancestor that is a type declaration.
    fn containing_type_declaration(&self, node: &Node<Self>) -> Option<Node<Self>> {
        node.ancestors().skip(1).find(|n| self.is_type_declaration(n))
    }

    fn contains_lambda(&self, body: &Node<Self>) -> bool {
        body.descendants().any(|n| self.is_lambda(&n))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Innermost statement of `body` containing the start of `span`, with
    /// the part of the statement the span designates.
    fn find_statement(
        &self,
        body: &DeclarationBody<Self::Language>,
        span: TextRange,
    ) -> Option<(Node<Self>, usize)>;

    /// Span of a steppable part of a statement, if it has one.
    fn active_span(&self, node: &Node<Self>, part: usize) -> Option<TextRange>;

    /// Span of the breakpoint location enclosing `position`.
    fn enclosing_breakpoint_span(&self, root: &Node<Self>, position: TextSize) -> Option<TextRange>;

    /// Statements following `statement` in execution order, then its
    /// enclosing statements, with the part to use for each.
    fn near_statements(&self, statement: &Node<Self>) -> Vec<(Node<Self>, usize)>;

    /// Old statement for `span`, and its partner in the new body found by
    /// structure.
    fn find_statement_and_partner(
        &self,
        old_body: &DeclarationBody<Self::Language>,
        new_body: Option<&DeclarationBody<Self::Language>>,
        span: TextRange,
    ) -> Option<(Node<Self>, Option<Node<Self>>, usize)> {
        let (old_statement, part) = self.find_statement(old_body, span)?;
        let partner = new_body.and_then(|new_body| {
            self.find_partner(&old_body.match_root, &new_body.match_root, &old_statement)
        });
        Some((old_statement, partner, part))
    }

    /// Node of `right_root` at the same child-index path as `left_node`
    /// under `left_root`.
    fn find_partner(
        &self,
        left_root: &Node<Self>,
        right_root: &Node<Self>,
        left_node: &Node<Self>,
    ) -> Option<Node<Self>> {
        let mut path = Vec::new();
        let mut current = left_node.clone();
        while &current != left_root {
            let parent = current.parent()?;
            path.push(parent.children().position(|c| c == current)?);
            current = parent;
        }

        let mut right = right_root.clone();
        for index in path.into_iter().rev() {
            right = right.children().nth(index)?;
        }
        Some(right)
    }

    /// Same kind and same non-trivia tokens.
    fn are_equivalent(&self, left: &Node<Self>, right: &Node<Self>) -> bool {
        if left.kind() != right.kind() {
            return false;
        }
        let significant = |node: &Node<Self>| {
            node.descendants_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| !self.is_trivia(t))
                .map(|t| (t.kind(), t.text().to_owned()))
                .collect::<Vec<_>>()
        };
        significant(left) == significant(right)
    }

    /// True if an active statement can be remapped from `old` to `new`
    /// without recompiling it.
    fn are_equivalent_active_statements(
        &self,
        old: &Node<Self>,
        new: &Node<Self>,
        part: usize,
    ) -> bool {
        let _ = part;
        self.are_equivalent(old, new)
    }

    /// Tokens carrying debug positions in a declaration.
    fn active_tokens(&self, declaration: &Node<Self>) -> Vec<SyntaxToken<Self::Language>> {
        declaration
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !self.is_trivia(t))
            .collect()
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    /// Lambda expressions and local functions.
    fn is_lambda(&self, node: &Node<Self>) -> bool;

    fn is_local_function(&self, node: &Node<Self>) -> bool;

    /// Body roots of a lambda.
    fn lambda_bodies(&self, lambda: &Node<Self>) -> Vec<Node<Self>>;

    /// Nodes introducing a frame for captured locals.
    fn is_closure_scope(&self, node: &Node<Self>) -> bool;

    fn lambda_of_body(&self, body: &Node<Self>) -> Option<Node<Self>> {
        body.parent().filter(|p| self.is_lambda(p))
    }

    /// Innermost lambda body containing `node`, not looking above `container`.
    fn find_enclosing_lambda_body(
        &self,
        container: &Node<Self>,
        node: &Node<Self>,
    ) -> Option<Node<Self>> {
        let mut current = node.clone();
        while &current != container {
            let parent = current.parent()?;
            if self.is_lambda(&parent) && self.lambda_bodies(&parent).contains(&current) {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// Body of `new_lambda` corresponding to `old_body`.
    fn partner_lambda_body(&self, old_body: &Node<Self>, new_lambda: &Node<Self>) -> Option<Node<Self>> {
        let old_lambda = self.lambda_of_body(old_body)?;
        let index = self
            .lambda_bodies(&old_lambda)
            .iter()
            .position(|b| b == old_body)?;
        self.lambda_bodies(new_lambda).into_iter().nth(index)
    }

    // ========================================================================
    // Exception handling
    // ========================================================================

    /// Exception handling constructs around `node`, innermost first.
    fn exception_handling_ancestors(&self, node: &Node<Self>, is_non_leaf: bool) -> Vec<Node<Self>>;

    /// Region of an exception handling construct and whether it covers all
    /// code nested in it.
    fn exception_handling_region(&self, node: &Node<Self>) -> (TextRange, bool);

    fn are_exception_clauses_equivalent(&self, old: &Node<Self>, new: &Node<Self>) -> bool;

    // ========================================================================
    // State machines
    // ========================================================================

    fn state_machine_info(&self, body_root: &Node<Self>) -> StateMachineInfo<Self::Language>;

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Language-specific rude edits visible from syntax alone.
    fn report_syntactic_rude_edits(
        &self,
        edit: &Edit<Self::Language>,
        edit_map: &EditMap<Self::Language>,
    ) -> Vec<RudeEditDiagnostic> {
        let _ = (edit, edit_map);
        Vec::new()
    }

    /// Language-specific rude edits around a matched active statement.
    fn report_other_rude_edits_around_active_statement(
        &self,
        old_statement: &Node<Self>,
        new_statement: &Node<Self>,
        is_non_leaf: bool,
    ) -> Vec<RudeEditDiagnostic> {
        let _ = (old_statement, new_statement, is_non_leaf);
        Vec::new()
    }

    /// Rude edits for a matched pair of suspension points.
    fn report_state_machine_suspension_point_rude_edits(
        &self,
        old_point: &Node<Self>,
        new_point: &Node<Self>,
    ) -> Vec<RudeEditDiagnostic> {
        let _ = (old_point, new_point);
        Vec::new()
    }
}
