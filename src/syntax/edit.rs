//! Edit scripts and the node → edit-kind map derived from them.

use rustc_hash::FxHashMap;

use super::{Language, Match, SyntaxNode};

/// Kind of a structural edit between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditKind {
    /// Node matched, its own content changed.
    Update,
    /// Node exists only in the new tree.
    Insert,
    /// Node exists only in the old tree.
    Delete,
    /// Node matched but its parent's partner differs.
    Move,
    /// Node matched under the same parent but at a different position.
    Reorder,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::Update => "update",
            EditKind::Insert => "insert",
            EditKind::Delete => "delete",
            EditKind::Move => "move",
            EditKind::Reorder => "reorder",
        }
    }
}

/// One edit of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit<L: Language> {
    pub kind: EditKind,
    pub old_node: Option<SyntaxNode<L>>,
    pub new_node: Option<SyntaxNode<L>>,
}

impl<L: Language> Edit<L> {
    pub fn update(old: SyntaxNode<L>, new: SyntaxNode<L>) -> Self {
        Self::paired(EditKind::Update, old, new)
    }

    pub fn insert(new: SyntaxNode<L>) -> Self {
        Self {
            kind: EditKind::Insert,
            old_node: None,
            new_node: Some(new),
        }
    }

    pub fn delete(old: SyntaxNode<L>) -> Self {
        Self {
            kind: EditKind::Delete,
            old_node: Some(old),
            new_node: None,
        }
    }

    pub fn moved(old: SyntaxNode<L>, new: SyntaxNode<L>) -> Self {
        Self::paired(EditKind::Move, old, new)
    }

    pub fn reorder(old: SyntaxNode<L>, new: SyntaxNode<L>) -> Self {
        Self::paired(EditKind::Reorder, old, new)
    }

    fn paired(kind: EditKind, old: SyntaxNode<L>, new: SyntaxNode<L>) -> Self {
        Self {
            kind,
            old_node: Some(old),
            new_node: Some(new),
        }
    }
}

/// Ordered edits of a document pair plus the whole-tree match they derive from.
#[derive(Debug, Clone)]
pub struct EditScript<L: Language> {
    pub edits: Vec<Edit<L>>,
    pub top_match: Match<L>,
}

impl<L: Language> EditScript<L> {
    pub fn new(top_match: Match<L>, edits: Vec<Edit<L>>) -> Self {
        Self { edits, top_match }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Node → edit kind lookup for Insert/Delete/Update edits.
///
/// Old-side and new-side nodes are kept in separate tables. Move and Reorder
/// edits are not recorded.
#[derive(Debug, Clone)]
pub struct EditMap<L: Language> {
    old: FxHashMap<SyntaxNode<L>, EditKind>,
    new: FxHashMap<SyntaxNode<L>, EditKind>,
}

impl<L: Language> EditMap<L> {
    /// Build the map from a script.
    ///
    /// `is_global_statement` identifies free-floating top-level statements;
    /// their container is recorded as updated on the side where they appear.
    pub fn build(
        script: &EditScript<L>,
        mut is_global_statement: impl FnMut(&SyntaxNode<L>) -> bool,
    ) -> Self {
        let mut old = FxHashMap::default();
        let mut new = FxHashMap::default();

        for edit in &script.edits {
            if matches!(edit.kind, EditKind::Delete | EditKind::Update) {
                if let Some(node) = &edit.old_node {
                    old.insert(node.clone(), edit.kind);
                }
            }

            if matches!(edit.kind, EditKind::Insert | EditKind::Update) {
                if let Some(node) = &edit.new_node {
                    new.insert(node.clone(), edit.kind);
                }
            }
        }

        for edit in &script.edits {
            if matches!(edit.kind, EditKind::Move | EditKind::Reorder) {
                continue;
            }

            if let Some(container) = edit
                .old_node
                .as_ref()
                .filter(|n| is_global_statement(*n))
                .and_then(|n| n.parent())
            {
                old.entry(container).or_insert(EditKind::Update);
            }

            if let Some(container) = edit
                .new_node
                .as_ref()
                .filter(|n| is_global_statement(*n))
                .and_then(|n| n.parent())
            {
                new.entry(container).or_insert(EditKind::Update);
            }
        }

        Self { old, new }
    }

    pub fn old_kind(&self, node: &SyntaxNode<L>) -> Option<EditKind> {
        self.old.get(node).copied()
    }

    pub fn new_kind(&self, node: &SyntaxNode<L>) -> Option<EditKind> {
        self.new.get(node).copied()
    }

    pub fn has_old_edit(&self, node: &SyntaxNode<L>, kind: EditKind) -> bool {
        self.old_kind(node) == Some(kind)
    }

    pub fn has_new_edit(&self, node: &SyntaxNode<L>, kind: EditKind) -> bool {
        self.new_kind(node) == Some(kind)
    }

    /// True if an Insert's (Delete's) node sits inside an inserted (deleted) ancestor.
    pub fn has_parent_edit(&self, edit: &Edit<L>) -> bool {
        match edit.kind {
            EditKind::Insert => edit
                .new_node
                .as_ref()
                .and_then(|n| n.parent())
                .is_some_and(|p| self.is_within_inserted(&p)),
            EditKind::Delete => edit
                .old_node
                .as_ref()
                .and_then(|n| n.parent())
                .is_some_and(|p| self.is_within_deleted(&p)),
            _ => false,
        }
    }

    /// True if the new node or one of its ancestors was inserted.
    pub fn is_within_inserted(&self, node: &SyntaxNode<L>) -> bool {
        node.ancestors()
            .any(|n| self.has_new_edit(&n, EditKind::Insert))
    }

    /// True if the old node or one of its ancestors was deleted.
    pub fn is_within_deleted(&self, node: &SyntaxNode<L>) -> bool {
        node.ancestors()
            .any(|n| self.has_old_edit(&n, EditKind::Delete))
    }
}
