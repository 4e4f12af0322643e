//! Node correspondences between an old and a new tree.

use rustc_hash::FxHashMap;

use super::{Language, SequenceEdit, SyntaxNode, sequence_edits};

/// Injective partial map between old-tree and new-tree nodes, kept in both
/// directions.
#[derive(Debug, Clone)]
pub struct BidirectionalMap<L: Language> {
    forward: FxHashMap<SyntaxNode<L>, SyntaxNode<L>>,
    reverse: FxHashMap<SyntaxNode<L>, SyntaxNode<L>>,
}

impl<L: Language> Default for BidirectionalMap<L> {
    fn default() -> Self {
        Self {
            forward: FxHashMap::default(),
            reverse: FxHashMap::default(),
        }
    }
}

impl<L: Language> BidirectionalMap<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (SyntaxNode<L>, SyntaxNode<L>)>) -> Self {
        let mut map = Self::new();
        for (old, new) in pairs {
            map.insert(old, new);
        }
        map
    }

    /// Record a pair. A later pair for the same node replaces the earlier one.
    pub fn insert(&mut self, old: SyntaxNode<L>, new: SyntaxNode<L>) {
        if let Some(previous) = self.forward.insert(old.clone(), new.clone()) {
            if previous != new {
                self.reverse.remove(&previous);
            }
        }
        if let Some(previous) = self.reverse.insert(new, old.clone()) {
            if previous != old {
                self.forward.remove(&previous);
            }
        }
    }

    /// Add every pair of `other`.
    pub fn extend(&mut self, other: &BidirectionalMap<L>) {
        for (old, new) in &other.forward {
            self.insert(old.clone(), new.clone());
        }
    }

    pub fn forward(&self) -> &FxHashMap<SyntaxNode<L>, SyntaxNode<L>> {
        &self.forward
    }

    pub fn reverse(&self) -> &FxHashMap<SyntaxNode<L>, SyntaxNode<L>> {
        &self.reverse
    }

    pub fn new_node(&self, old: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        self.forward.get(old).cloned()
    }

    pub fn old_node(&self, new: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        self.reverse.get(new).cloned()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Match of two (sub)trees. The roots are always matched to each other.
#[derive(Debug, Clone)]
pub struct Match<L: Language> {
    old_root: SyntaxNode<L>,
    new_root: SyntaxNode<L>,
    map: BidirectionalMap<L>,
}

impl<L: Language> Match<L> {
    pub fn new(
        old_root: SyntaxNode<L>,
        new_root: SyntaxNode<L>,
        pairs: impl IntoIterator<Item = (SyntaxNode<L>, SyntaxNode<L>)>,
    ) -> Self {
        let mut map = BidirectionalMap::from_pairs(pairs);
        map.insert(old_root.clone(), new_root.clone());
        Self {
            old_root,
            new_root,
            map,
        }
    }

    pub fn old_root(&self) -> &SyntaxNode<L> {
        &self.old_root
    }

    pub fn new_root(&self) -> &SyntaxNode<L> {
        &self.new_root
    }

    pub fn map(&self) -> &BidirectionalMap<L> {
        &self.map
    }

    pub fn matches(&self) -> &FxHashMap<SyntaxNode<L>, SyntaxNode<L>> {
        self.map.forward()
    }

    pub fn reverse_matches(&self) -> &FxHashMap<SyntaxNode<L>, SyntaxNode<L>> {
        self.map.reverse()
    }

    pub fn new_node(&self, old: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        self.map.new_node(old)
    }

    pub fn old_node(&self, new: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        self.map.old_node(new)
    }

    pub fn contains(&self, old: &SyntaxNode<L>, new: &SyntaxNode<L>) -> bool {
        self.map.forward().get(old) == Some(new)
    }

    /// Matched pairs in preorder of the old tree.
    pub fn pairs_in_order(&self) -> Vec<(SyntaxNode<L>, SyntaxNode<L>)> {
        self.old_root
            .descendants()
            .filter_map(|old| self.new_node(&old).map(|new| (old, new)))
            .collect()
    }

    /// Sequence edits of two node lists where two nodes are equal iff matched.
    pub fn sequence_edits(
        &self,
        old_nodes: &[SyntaxNode<L>],
        new_nodes: &[SyntaxNode<L>],
    ) -> Vec<SequenceEdit> {
        #[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
        enum Key {
            Matched(usize),
            OldOnly(usize),
        }

        let new_keys: Vec<Key> = (0..new_nodes.len()).map(Key::Matched).collect();
        let old_keys: Vec<Key> = old_nodes
            .iter()
            .enumerate()
            .map(|(i, old)| {
                self.new_node(old)
                    .and_then(|partner| new_nodes.iter().position(|n| *n == partner))
                    .map_or(Key::OldOnly(i), Key::Matched)
            })
            .collect();

        sequence_edits(&old_keys, &new_keys)
    }

    pub fn into_map(self) -> BidirectionalMap<L> {
        self.map
    }
}
