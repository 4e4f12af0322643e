//! Executable content of declarations and closures.

use rowan::WalkEvent;

use super::LanguageAdapter;
use crate::base::TextRange;
use crate::syntax::{Language, SyntaxNode};

/// Async/iterator shape of a body.
#[derive(Debug, Clone)]
pub struct StateMachineInfo<L: Language> {
    pub is_async: bool,
    pub is_iterator: bool,
    /// Await expressions and yield statements, in source order.
    pub suspension_points: Vec<SyntaxNode<L>>,
}

impl<L: Language> Default for StateMachineInfo<L> {
    fn default() -> Self {
        Self {
            is_async: false,
            is_iterator: false,
            suspension_points: Vec::new(),
        }
    }
}

impl<L: Language> StateMachineInfo<L> {
    pub fn is_state_machine(&self) -> bool {
        self.is_async || self.is_iterator
    }

    pub fn has_suspension_points(&self) -> bool {
        !self.suspension_points.is_empty()
    }
}

/// The executable content belonging to one declaration.
///
/// A body may have several roots: a constructor's initializer and block, or
/// the shared initializer of a multi-declarator field.
#[derive(Debug, Clone)]
pub struct DeclarationBody<L: Language> {
    pub declaration: SyntaxNode<L>,
    pub roots: Vec<SyntaxNode<L>>,
    /// Node handed to the body matcher; contains every root.
    pub match_root: SyntaxNode<L>,
    /// Span within which active statements belong to this body.
    pub envelope: TextRange,
    pub state_machine: StateMachineInfo<L>,
}

impl<L: Language> DeclarationBody<L> {
    pub fn contains_span(&self, span: TextRange) -> bool {
        self.envelope.contains_range(span)
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|r| r.descendants().count()).sum()
    }

    /// Bodies of lambdas directly nested in this body (not inside another lambda).
    pub fn lambda_bodies<A>(&self, adapter: &A) -> Vec<SyntaxNode<L>>
    where
        A: LanguageAdapter<Language = L> + ?Sized,
    {
        self.roots
            .iter()
            .flat_map(|root| direct_lambda_bodies(adapter, root))
            .collect()
    }
}

/// Lambda bodies directly nested under `root`, in source order.
///
/// Does not descend into the lambdas it finds; `root` itself is never
/// treated as a lambda.
pub fn direct_lambda_bodies<A>(adapter: &A, root: &SyntaxNode<A::Language>) -> Vec<SyntaxNode<A::Language>>
where
    A: LanguageAdapter + ?Sized,
{
    let mut bodies = Vec::new();
    let mut preorder = root.preorder();

    while let Some(event) = preorder.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        if &node != root && adapter.is_lambda(&node) {
            bodies.extend(adapter.lambda_bodies(&node));
            preorder.skip_subtree();
        }
    }

    bodies
}
