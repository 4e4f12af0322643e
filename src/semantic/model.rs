//! The semantic source consumed by the analyzer.

use smol_str::SmolStr;

use super::{LambdaSignature, Symbol, SymbolKey, VariableCapture};
use crate::base::TextRange;
use crate::syntax::{EditKind, Language, SyntaxNode};

/// Read-only view of one compilation, as seen from one document.
///
/// Implementations are supplied by the language front end. All queries are
/// synchronous and must not call back into the analyzer.
pub trait SemanticModel<L: Language> {
    /// True if the compilation has errors that make emitting a delta unsafe.
    fn has_errors(&self) -> bool;

    /// Symbol declared by a declaration node, if any.
    fn declared_symbol(&self, node: &SyntaxNode<L>) -> Option<Symbol>;

    /// All symbols declared by `node`.
    ///
    /// A multi-declarator field declares one symbol per declarator.
    fn declared_symbols(&self, node: &SyntaxNode<L>) -> Vec<Symbol> {
        self.declared_symbol(node).into_iter().collect()
    }

    /// Symbols affected by an edit of `node`.
    fn symbols_for_edit(&self, node: &SyntaxNode<L>, kind: EditKind) -> Vec<Symbol> {
        let _ = kind;
        self.declared_symbols(node)
    }

    /// Resolve a key produced by either compilation.
    fn resolve(&self, key: &SymbolKey) -> Option<Symbol>;

    /// Members of a type, in declaration order.
    fn members(&self, type_key: &SymbolKey) -> Vec<Symbol>;

    /// Declaration nodes of a symbol, across all of its declaring documents.
    fn declaration_syntax(&self, key: &SymbolKey) -> Vec<SyntaxNode<L>>;

    /// True if the compilation defines a type named `name`.
    fn has_type(&self, name: &str) -> bool;

    // ========================================================================
    // Captures
    // ========================================================================

    /// Variables captured by any closure in the member declared by
    /// `member_declaration`, in a stable order.
    fn captured_variables(&self, member_declaration: &SyntaxNode<L>) -> Vec<VariableCapture<L>>;

    /// Captured variables read or written inside a lambda body, including its
    /// nested lambdas.
    fn accessed_captures(&self, lambda_body: &SyntaxNode<L>) -> Vec<VariableCapture<L>>;

    /// Spans of the references to `capture` under `roots`, in source order.
    fn capture_use_sites(
        &self,
        roots: &[SyntaxNode<L>],
        capture: &VariableCapture<L>,
    ) -> Vec<TextRange>;

    /// Closure scope of a captured local: the node whose frame holds it.
    fn capture_scope(&self, capture: &VariableCapture<L>) -> Option<SyntaxNode<L>>;

    fn lambda_signature(&self, lambda: &SyntaxNode<L>) -> Option<LambdaSignature>;

    /// Names of primary constructor parameters of `type_key` captured
    /// outside of the constructor.
    fn primary_constructor_captures(&self, type_key: &SymbolKey) -> Vec<SmolStr>;
}
