//! Tree-level edit vocabulary shared by matchers and the analyzer.
//!
//! Everything here is generic over a `rowan::Language`; no node kinds are
//! inspected. Matchers produce [`EditScript`]s and [`Match`]es, the analyzer
//! consumes them through [`EditMap`] lookups and [`sequence_edits`].

mod edit;
mod matching;
mod sequence;

pub use edit::{Edit, EditKind, EditMap, EditScript};
pub use matching::{BidirectionalMap, Match};
pub use sequence::{SequenceEdit, sequence_edits};

pub use rowan::Language;

/// Type aliases for convenience
pub type SyntaxNode<L> = rowan::SyntaxNode<L>;
pub type SyntaxToken<L> = rowan::SyntaxToken<L>;

use crate::base::TextSize;

/// Nearest ancestor-or-self of `node` for which `pred` holds, stopping at `root`.
pub fn find_ancestor<L: Language>(
    root: &SyntaxNode<L>,
    node: &SyntaxNode<L>,
    mut pred: impl FnMut(&SyntaxNode<L>) -> bool,
) -> Option<SyntaxNode<L>> {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if pred(&n) {
            return Some(n);
        }
        if &n == root {
            return None;
        }
        current = n.parent();
    }
    None
}

/// True when `ancestor` is `node` or one of its ancestors.
pub fn is_ancestor_or_self<L: Language>(ancestor: &SyntaxNode<L>, node: &SyntaxNode<L>) -> bool {
    node.ancestors().any(|n| &n == ancestor)
}

/// Token at `offset` preferring the token that starts there.
///
/// Returns `None` for offsets outside the root.
pub fn token_at<L: Language>(root: &SyntaxNode<L>, offset: TextSize) -> Option<SyntaxToken<L>> {
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    root.token_at_offset(offset).right_biased()
}
