//! Semantic model of the mini language.
//!
//! [`Compilation`] collects the symbols of every document and answers the
//! [`SemanticModel`] queries of the analyzer. Bodies are bound lazily when a
//! capture query asks for them.

mod binder;
mod compilation;

#[cfg(test)]
mod tests;

pub use compilation::{Compilation, ENTRY_POINT_KEY, SemanticError};
pub(crate) use binder::is_closure_scope_kind;
pub(crate) use compilation::own_descendants;

use smol_str::SmolStr;

use super::ast::{AstNode, Function, HasParams};
use super::syntax_kind::{MiniLanguage, SyntaxKind, SyntaxNode};
use crate::base::TextRange;
use crate::semantic::{LambdaSignature, SemanticModel, Symbol, SymbolKey, VariableCapture};
use crate::syntax::EditKind;

impl SemanticModel<MiniLanguage> for Compilation {
    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    fn declared_symbol(&self, node: &SyntaxNode) -> Option<Symbol> {
        self.keys_of(node).first().and_then(|k| self.symbol(k)).cloned()
    }

    fn declared_symbols(&self, node: &SyntaxNode) -> Vec<Symbol> {
        self.keys_of(node)
            .iter()
            .filter_map(|k| self.symbol(k))
            .cloned()
            .collect()
    }

    /// An edit of a type declaration with a parameter list also edits its
    /// primary constructor.
    fn symbols_for_edit(&self, node: &SyntaxNode, kind: EditKind) -> Vec<Symbol> {
        let _ = kind;
        let mut symbols = self.declared_symbols(node);
        if node.kind().is_type_declaration() && node.children().any(|c| c.kind() == SyntaxKind::PARAM_LIST) {
            let primary = symbols
                .first()
                .map(|ty| ty.key.clone())
                .into_iter()
                .flat_map(|key| self.member_keys(&key).to_vec())
                .filter_map(|k| self.symbol(&k).cloned())
                .find(|m| m.is_constructor() && !m.is_static() && self.declarations(&m.key).is_empty() && !m.is_implicitly_declared());
            symbols.extend(primary);
        }
        symbols
    }

    fn resolve(&self, key: &SymbolKey) -> Option<Symbol> {
        self.symbol(key).cloned()
    }

    fn members(&self, type_key: &SymbolKey) -> Vec<Symbol> {
        self.member_keys(type_key)
            .iter()
            .filter_map(|k| self.symbol(k))
            .cloned()
            .collect()
    }

    fn declaration_syntax(&self, key: &SymbolKey) -> Vec<SyntaxNode> {
        self.declarations(key).to_vec()
    }

    fn has_type(&self, name: &str) -> bool {
        self.is_well_known_type(name) || self.symbols().any(|s| s.is_type() && s.name == name)
    }

    fn captured_variables(&self, member_declaration: &SyntaxNode) -> Vec<VariableCapture<MiniLanguage>> {
        self.member_captures(member_declaration)
    }

    fn accessed_captures(&self, lambda_body: &SyntaxNode) -> Vec<VariableCapture<MiniLanguage>> {
        self.lambda_captures(lambda_body)
    }

    fn capture_use_sites(&self, roots: &[SyntaxNode], capture: &VariableCapture<MiniLanguage>) -> Vec<TextRange> {
        self.capture_sites(roots, None)
            .into_iter()
            .filter(|site| &site.capture == capture)
            .map(|site| site.range)
            .collect()
    }

    fn capture_scope(&self, capture: &VariableCapture<MiniLanguage>) -> Option<SyntaxNode> {
        self.scope_of(capture)
    }

    fn lambda_signature(&self, lambda: &SyntaxNode) -> Option<LambdaSignature> {
        let function = Function::cast(lambda.clone())?;
        Some(LambdaSignature {
            parameter_types: function
                .params()
                .iter()
                .map(|p| p.ty().unwrap_or_else(|| SmolStr::new_static("var")))
                .collect(),
            return_type: function.ret_type(),
            is_async: function.is_async(),
        })
    }

    fn primary_constructor_captures(&self, type_key: &SymbolKey) -> Vec<SmolStr> {
        self.captured_primary_parameters(type_key)
    }
}
