//! Member-level view of a top-level edit script.
//!
//! The top-level matcher may report edits of nodes that do not declare a
//! symbol on their own (parameters, attribute lists, global statements).
//! Each of those is lifted to an update of the declaration that owns it so
//! later stages only see member and type declarations.

use indexmap::IndexSet;
use tracing::trace;

use crate::language::LanguageAdapter;
use crate::syntax::{Edit, EditKind, EditMap, EditScript, SyntaxNode};

type Node<A> = SyntaxNode<<A as LanguageAdapter>::Language>;

fn is_declaration<A: LanguageAdapter + ?Sized>(adapter: &A, node: &Node<A>) -> bool {
    adapter.is_member_declaration(node) || adapter.is_type_declaration(node)
}

/// Declaration that owns `node`: the compilation unit for global statements.
fn owning_declaration<A: LanguageAdapter + ?Sized>(adapter: &A, node: &Node<A>) -> Option<Node<A>> {
    if adapter.is_global_statement(node) {
        return node.ancestors().last();
    }
    adapter.containing_declaration(node)
}

/// Edits of member and type declarations, in script order, without
/// duplicates and without edits implied by an edit of an ancestor.
pub(crate) fn normalize_member_edits<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    script: &EditScript<A::Language>,
    edit_map: &EditMap<A::Language>,
) -> Vec<Edit<A::Language>> {
    let top_match = &script.top_match;
    let mut seen: IndexSet<(EditKind, Option<Node<A>>, Option<Node<A>>)> = IndexSet::new();
    let mut result = Vec::new();

    let mut push = |edit: Edit<A::Language>| {
        if seen.insert((edit.kind, edit.old_node.clone(), edit.new_node.clone())) {
            result.push(edit);
        }
    };

    for edit in &script.edits {
        let old_is_declaration = edit.old_node.as_ref().is_some_and(|n| is_declaration(adapter, n));
        let new_is_declaration = edit.new_node.as_ref().is_some_and(|n| is_declaration(adapter, n));

        match edit.kind {
            EditKind::Insert | EditKind::Delete if edit_map.has_parent_edit(edit) => {}

            EditKind::Insert if new_is_declaration => push(edit.clone()),
            EditKind::Delete if old_is_declaration => push(edit.clone()),
            EditKind::Update if old_is_declaration && new_is_declaration => push(edit.clone()),
            EditKind::Move | EditKind::Reorder if old_is_declaration && new_is_declaration => {
                push(edit.clone())
            }

            _ => {
                // Lift to an update of the owning declaration, found on
                // whichever side the edited node exists.
                let owner = match (&edit.old_node, &edit.new_node) {
                    (_, Some(new)) => owning_declaration(adapter, new)
                        .and_then(|new_owner| top_match.old_node(&new_owner).map(|old| (old, new_owner))),
                    (Some(old), None) => owning_declaration(adapter, old)
                        .and_then(|old_owner| top_match.new_node(&old_owner).map(|new| (old_owner, new))),
                    (None, None) => None,
                };
                match owner {
                    Some((old, new)) => push(Edit::update(old, new)),
                    None => trace!("[ANALYZE] dropping {} edit without a matched owner", edit.kind.as_str()),
                }
            }
        }
    }

    result
}
