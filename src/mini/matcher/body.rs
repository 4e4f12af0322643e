//! Statement-level matching of two bodies.

use smol_str::SmolStr;
use tracing::trace;

use super::fingerprint;
use crate::mini::ast::{AstNode, Function, HasName, LetStmt};
use crate::mini::body::{body_children, is_function};
use crate::mini::semantic::own_descendants;
use crate::mini::syntax_kind::{MiniLanguage, SyntaxKind, SyntaxNode};
use crate::syntax::{BidirectionalMap, Match, sequence_edits};

struct BodyMatcher {
    map: BidirectionalMap<MiniLanguage>,
}

impl BodyMatcher {
    fn pair(&mut self, old: &SyntaxNode, new: &SyntaxNode) {
        if self.map.new_node(old).is_none() && self.map.old_node(new).is_none() {
            self.map.insert(old.clone(), new.clone());
        }
    }

    fn match_children(&mut self, old: &SyntaxNode, new: &SyntaxNode) {
        let old_children: Vec<SyntaxNode> = body_children(old)
            .into_iter()
            .filter(|o| self.map.new_node(o).is_none())
            .collect();
        let new_children: Vec<SyntaxNode> = body_children(new)
            .into_iter()
            .filter(|n| self.map.old_node(n).is_none())
            .collect();

        let mut old_used = vec![false; old_children.len()];
        let mut new_used = vec![false; new_children.len()];

        let old_prints: Vec<_> = old_children.iter().map(fingerprint).collect();
        let new_prints: Vec<_> = new_children.iter().map(fingerprint).collect();
        for edit in sequence_edits(&old_prints, &new_prints) {
            if let (Some(o), Some(n)) = (edit.old_index, edit.new_index) {
                old_used[o] = true;
                new_used[n] = true;
                self.pair(&old_children[o], &new_children[n]);
            }
        }

        // Changed nodes: same kind, in order.
        let mut next_old = 0;
        for n in 0..new_children.len() {
            if new_used[n] {
                continue;
            }
            let kind = new_children[n].kind();
            let found = (next_old..old_children.len()).find(|&o| !old_used[o] && old_children[o].kind() == kind);
            if let Some(o) = found {
                old_used[o] = true;
                new_used[n] = true;
                next_old = o + 1;
                self.pair(&old_children[o], &new_children[n]);
            }
        }

        // A lambda bound by `let` that became a local function of the same
        // name, or the other way round.
        for n in 0..new_children.len() {
            if new_used[n] {
                continue;
            }
            let Some((name, new_function)) = bound_function(&new_children[n]) else {
                continue;
            };
            let found = (0..old_children.len()).find_map(|o| {
                if old_used[o] {
                    return None;
                }
                let (old_name, old_function) = bound_function(&old_children[o])?;
                (old_name == name && old_function.kind() != new_function.kind()).then_some((o, old_function))
            });
            if let Some((o, old_function)) = found {
                trace!("[MATCHER] {} switched between lambda and local function", name);
                old_used[o] = true;
                new_used[n] = true;
                self.pair(&old_function, &new_function);
            }
        }

        for old_child in body_children(old) {
            let Some(new_child) = self.map.new_node(&old_child) else {
                continue;
            };
            if new_child.parent().as_ref() == Some(new) {
                self.match_children(&old_child, &new_child);
            }
        }
    }

    /// Pair identical statements left over after the level-by-level pass,
    /// such as a statement wrapped into a new block or `try`.
    fn match_moved_statements(&mut self, old_root: &SyntaxNode, new_root: &SyntaxNode) {
        let new_candidates = movable_statements(new_root);
        let mut new_prints: Vec<Option<_>> = new_candidates
            .iter()
            .map(|n| self.map.old_node(n).is_none().then(|| fingerprint(n)))
            .collect();

        for old in movable_statements(old_root) {
            if self.map.new_node(&old).is_some() {
                continue;
            }
            let print = fingerprint(&old);
            let found = new_prints.iter().position(|p| p.as_ref() == Some(&print));
            if let Some(index) = found {
                new_prints[index] = None;
                let new = &new_candidates[index];
                if self.map.old_node(new).is_none() {
                    self.pair(&old, new);
                    self.match_children(&old, new);
                }
            }
        }
    }
}

/// Name and function of a statement binding one function to a name: a local
/// function, or a `let` with a single lambda initializer.
fn bound_function(statement: &SyntaxNode) -> Option<(SmolStr, SyntaxNode)> {
    match statement.kind() {
        SyntaxKind::LOCAL_FUNCTION_STMT => {
            let name = Function::cast(statement.clone())?.name()?;
            Some((name, statement.clone()))
        }
        SyntaxKind::LET_STMT => {
            let [declarator]: [_; 1] = LetStmt::cast(statement.clone())?.declarators().try_into().ok()?;
            let lambda = declarator
                .initializer()?
                .expr()
                .filter(|expr| expr.kind() == SyntaxKind::LAMBDA_EXPR)?;
            Some((declarator.name()?, lambda))
        }
        _ => None,
    }
}

/// Statements of a body outside nested functions, except blocks.
fn movable_statements(root: &SyntaxNode) -> Vec<SyntaxNode> {
    body_children(root)
        .into_iter()
        .flat_map(|child| {
            if is_function(&child) {
                vec![child]
            } else {
                own_descendants(&child).collect()
            }
        })
        .filter(|n| n.kind().is_statement() && n.kind() != SyntaxKind::BLOCK)
        .collect()
}

/// Match two bodies, honouring `known_matches`.
///
/// Known pairs are recorded first together with their ancestors up to the
/// roots, as far as the ancestor kinds agree.
pub fn match_body(
    old_root: &SyntaxNode,
    new_root: &SyntaxNode,
    known_matches: &[(SyntaxNode, SyntaxNode)],
) -> Match<MiniLanguage> {
    let mut matcher = BodyMatcher {
        map: BidirectionalMap::new(),
    };
    matcher.map.insert(old_root.clone(), new_root.clone());

    for (old, new) in known_matches {
        matcher.map.insert(old.clone(), new.clone());
    }
    for (old, new) in known_matches {
        let ancestors = old
            .ancestors()
            .skip(1)
            .take_while(|a| a != old_root)
            .zip(new.ancestors().skip(1).take_while(|a| a != new_root));
        for (old_ancestor, new_ancestor) in ancestors {
            if old_ancestor.kind() != new_ancestor.kind() {
                break;
            }
            matcher.pair(&old_ancestor, &new_ancestor);
        }
    }

    matcher.match_children(old_root, new_root);

    // Known pairs under unmatched parents are not reached from the roots.
    for (old, new) in known_matches {
        matcher.match_children(old, new);
    }
    matcher.match_moved_statements(old_root, new_root);

    trace!("[MATCHER] body match of {} pairs", matcher.map.len());
    let pairs: Vec<(SyntaxNode, SyntaxNode)> = matcher
        .map
        .forward()
        .iter()
        .map(|(o, n)| (o.clone(), n.clone()))
        .collect();
    Match::new(old_root.clone(), new_root.clone(), pairs)
}
