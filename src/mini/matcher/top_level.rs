//! Declaration-level matching and edit script construction.

use indexmap::IndexMap;
use rowan::WalkEvent;
use rustc_hash::{FxHashMap, FxHashSet};
use similar::TextDiff;
use smol_str::{SmolStr, format_smolstr};
use tracing::{debug, trace};

use super::fingerprint;
use crate::mini::ast::{
    AstNode, CtorDecl, HasModifiers, HasName, HasParams, HasTypeParams, MethodDecl, OperatorDecl, PropertyDecl,
    compact_text, namespace_members,
};
use crate::mini::syntax_kind::{MiniLanguage, SyntaxKind, SyntaxNode};
use crate::syntax::{BidirectionalMap, Edit, EditScript, Match, sequence_edits};

/// Minimum text similarity for two differently named declarations to be
/// considered a rename.
const RENAME_SIMILARITY: f32 = 0.5;

/// Coarse category of a declaration; only declarations with equal labels
/// are ever matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Label {
    Namespace,
    Type,
    Field,
    Property,
    Event,
    Method,
    Constructor,
    StaticConstructor,
    Operator,
    EnumMember,
    GlobalStatement,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DeclarationKey {
    label: Label,
    name: SmolStr,
    signature: SmolStr,
}

fn label(node: &SyntaxNode) -> Option<Label> {
    let label = match node.kind() {
        SyntaxKind::NAMESPACE_DECL => Label::Namespace,
        kind if kind.is_type_declaration() => Label::Type,
        SyntaxKind::FIELD_DECL => Label::Field,
        SyntaxKind::PROPERTY_DECL => Label::Property,
        SyntaxKind::EVENT_DECL => Label::Event,
        SyntaxKind::METHOD_DECL => Label::Method,
        SyntaxKind::CTOR_DECL => {
            let ctor = CtorDecl::cast(node.clone())?;
            if ctor.has_modifier(SyntaxKind::STATIC_KW) {
                Label::StaticConstructor
            } else {
                Label::Constructor
            }
        }
        SyntaxKind::OPERATOR_DECL => Label::Operator,
        SyntaxKind::ENUM_MEMBER => Label::EnumMember,
        SyntaxKind::GLOBAL_STATEMENT => Label::GlobalStatement,
        _ => return None,
    };
    Some(label)
}

fn is_declaration(node: &SyntaxNode) -> bool {
    label(node).is_some()
}

fn parameter_signature(params: &[crate::mini::ast::Param]) -> SmolStr {
    let types: Vec<String> = params
        .iter()
        .map(|p| {
            let ty = p.ty().unwrap_or_default();
            if p.is_ref() { format!("ref {ty}") } else { ty.to_string() }
        })
        .collect();
    SmolStr::new(types.join(","))
}

fn declaration_key(node: &SyntaxNode) -> Option<DeclarationKey> {
    let label = label(node)?;
    let (name, signature) = match node.kind() {
        SyntaxKind::METHOD_DECL => {
            let method = MethodDecl::cast(node.clone())?;
            let name = match method.explicit_interface() {
                Some(iface) => format_smolstr!("{iface}.{}", method.name().unwrap_or_default()),
                None => method.name().unwrap_or_default(),
            };
            let signature = format_smolstr!("{}({})", method.type_params().len(), parameter_signature(&method.params()));
            (name, signature)
        }
        SyntaxKind::CTOR_DECL => {
            let ctor = CtorDecl::cast(node.clone())?;
            (SmolStr::default(), parameter_signature(&ctor.params()))
        }
        SyntaxKind::OPERATOR_DECL => {
            let operator = OperatorDecl::cast(node.clone())?;
            (operator.operator().unwrap_or_default(), parameter_signature(&operator.params()))
        }
        SyntaxKind::PROPERTY_DECL => {
            let property = PropertyDecl::cast(node.clone())?;
            let name = match property.explicit_interface() {
                Some(iface) => format_smolstr!("{iface}.{}", property.name().unwrap_or_default()),
                None => property.name().unwrap_or_default(),
            };
            (name, SmolStr::default())
        }
        SyntaxKind::FIELD_DECL => {
            let names: Vec<SmolStr> = node
                .children()
                .filter(|c| c.kind() == SyntaxKind::VARIABLE_DECLARATOR)
                .filter_map(|d| d.children().find(|c| c.kind() == SyntaxKind::NAME))
                .map(|n| compact_text(&n))
                .collect();
            (SmolStr::new(names.join(",")), SmolStr::default())
        }
        SyntaxKind::GLOBAL_STATEMENT => (SmolStr::default(), compact_text(node)),
        _ => {
            let name = node
                .children()
                .find(|c| c.kind() == SyntaxKind::NAME)
                .map(|n| compact_text(&n))
                .unwrap_or_default();
            let arity = node
                .children()
                .find(|c| c.kind() == SyntaxKind::TYPE_PARAM_LIST)
                .map_or(0, |list| list.children().count());
            (name, format_smolstr!("{arity}"))
        }
    };
    Some(DeclarationKey { label, name, signature })
}

/// Declarations (and top-level statements) directly nested in `node`.
fn declaration_children(node: &SyntaxNode) -> Vec<SyntaxNode> {
    match node.kind() {
        SyntaxKind::SOURCE_FILE => node.children().filter(is_declaration).collect(),
        SyntaxKind::NAMESPACE_DECL => namespace_members(node),
        kind if kind.is_type_declaration() => node
            .children()
            .filter(|c| c.kind() == SyntaxKind::MEMBER_LIST)
            .flat_map(|list| list.children().filter(is_declaration).collect::<Vec<_>>())
            .collect(),
        _ => Vec::new(),
    }
}

/// Significant tokens of a declaration, not counting nested declarations.
fn own_tokens(node: &SyntaxNode) -> Vec<(SyntaxKind, SmolStr)> {
    let mut tokens = Vec::new();
    let mut preorder = node.preorder_with_tokens();
    while let Some(event) = preorder.next() {
        let WalkEvent::Enter(element) = event else {
            continue;
        };
        match element {
            rowan::NodeOrToken::Node(child) => {
                if &child != node && is_declaration(&child) {
                    preorder.skip_subtree();
                }
            }
            rowan::NodeOrToken::Token(token) => {
                if !token.kind().is_trivia() {
                    tokens.push((token.kind(), SmolStr::new(token.text())));
                }
            }
        }
    }
    tokens
}

struct TopLevelMatcher {
    map: BidirectionalMap<MiniLanguage>,
}

impl TopLevelMatcher {
    fn match_children(&mut self, old: &SyntaxNode, new: &SyntaxNode) {
        let old_children = declaration_children(old);
        let new_children = declaration_children(new);
        let mut old_used = vec![false; old_children.len()];
        let mut pairs = Vec::new();

        let (old_statements, old_declarations): (Vec<usize>, Vec<usize>) =
            (0..old_children.len()).partition(|i| old_children[*i].kind() == SyntaxKind::GLOBAL_STATEMENT);
        let (new_statements, new_declarations): (Vec<usize>, Vec<usize>) =
            (0..new_children.len()).partition(|i| new_children[*i].kind() == SyntaxKind::GLOBAL_STATEMENT);

        // Top-level statements are matched as a sequence.
        for (o, n) in match_statements(&old_children, &new_children, &old_statements, &new_statements) {
            old_used[o] = true;
            pairs.push((o, n));
        }

        let old_keys: Vec<Option<DeclarationKey>> = old_children.iter().map(declaration_key).collect();
        let new_keys: Vec<Option<DeclarationKey>> = new_children.iter().map(declaration_key).collect();
        let mut new_used = vec![false; new_children.len()];
        for &(_, n) in &pairs {
            new_used[n] = true;
        }

        // Same key, then same name, then a similar declaration with another name.
        let passes: [&dyn Fn(&DeclarationKey, &DeclarationKey, usize, usize) -> bool; 3] = [
            &|o, n, _, _| o == n,
            &|o, n, _, _| o.label == n.label && o.name == n.name,
            &|o, n, oi, ni| {
                o.label == n.label
                    && o.signature == n.signature
                    && o.label != Label::Namespace
                    && similarity(&old_children[oi], &new_children[ni]) >= RENAME_SIMILARITY
            },
        ];
        for pass in passes {
            for &ni in &new_declarations {
                if new_used[ni] {
                    continue;
                }
                let Some(new_key) = &new_keys[ni] else {
                    continue;
                };
                let candidate = old_declarations.iter().copied().find(|&oi| {
                    !old_used[oi] && old_keys[oi].as_ref().is_some_and(|old_key| pass(old_key, new_key, oi, ni))
                });
                if let Some(oi) = candidate {
                    old_used[oi] = true;
                    new_used[ni] = true;
                    pairs.push((oi, ni));
                }
            }
        }

        for (oi, ni) in pairs {
            let (old_child, new_child) = (&old_children[oi], &new_children[ni]);
            trace!("[MATCHER] {:?} matched", new_child.kind());
            self.map.insert(old_child.clone(), new_child.clone());
            self.match_children(old_child, new_child);
        }
    }

    /// Pair declarations left over anywhere in the two trees; a pair found
    /// here has moved to a different parent.
    fn match_moved(&mut self, old_root: &SyntaxNode, new_root: &SyntaxNode) {
        let mut unmatched_old: IndexMap<DeclarationKey, Vec<SyntaxNode>> = IndexMap::new();
        for node in old_root.descendants().filter(is_declaration) {
            if node.kind() == SyntaxKind::GLOBAL_STATEMENT || self.map.new_node(&node).is_some() {
                continue;
            }
            if let Some(key) = declaration_key(&node) {
                unmatched_old.entry(key).or_default().push(node);
            }
        }

        let candidates: Vec<SyntaxNode> = new_root
            .descendants()
            .filter(is_declaration)
            .filter(|n| n.kind() != SyntaxKind::GLOBAL_STATEMENT && self.map.old_node(n).is_none())
            .collect();
        for new in candidates {
            // An ancestor matched in this pass already carried its subtree.
            if self.map.old_node(&new).is_some() {
                continue;
            }
            let Some(key) = declaration_key(&new) else {
                continue;
            };
            let Some(old) = unmatched_old.get_mut(&key).and_then(|nodes| {
                (!nodes.is_empty()).then(|| nodes.remove(0))
            }) else {
                continue;
            };
            if self.map.new_node(&old).is_some() {
                continue;
            }
            debug!("[MATCHER] {:?} moved", new.kind());
            self.map.insert(old.clone(), new.clone());
            self.match_children(&old, &new);
        }
    }
}

fn similarity(old: &SyntaxNode, new: &SyntaxNode) -> f32 {
    let old_text = compact_text(old);
    let new_text = compact_text(new);
    TextDiff::from_chars(old_text.as_str(), new_text.as_str()).ratio()
}

/// Pair top-level statements: equal statements by LCS, then statements of
/// the same kind left between them, in order.
fn match_statements(
    old_children: &[SyntaxNode],
    new_children: &[SyntaxNode],
    old_statements: &[usize],
    new_statements: &[usize],
) -> Vec<(usize, usize)> {
    let old_prints: Vec<_> = old_statements.iter().map(|&i| fingerprint(&old_children[i])).collect();
    let new_prints: Vec<_> = new_statements.iter().map(|&i| fingerprint(&new_children[i])).collect();

    let mut pairs = Vec::new();
    let mut old_used = vec![false; old_statements.len()];
    let mut new_used = vec![false; new_statements.len()];
    for edit in sequence_edits(&old_prints, &new_prints) {
        if let (Some(o), Some(n)) = (edit.old_index, edit.new_index) {
            old_used[o] = true;
            new_used[n] = true;
            pairs.push((old_statements[o], new_statements[n]));
        }
    }

    let inner_kind =
        |node: &SyntaxNode| node.first_child().map_or(SyntaxKind::ERROR, |statement| statement.kind());
    let mut next_old = 0;
    for n in 0..new_statements.len() {
        if new_used[n] {
            continue;
        }
        let kind = inner_kind(&new_children[new_statements[n]]);
        let found = (next_old..old_statements.len())
            .find(|&o| !old_used[o] && inner_kind(&old_children[old_statements[o]]) == kind);
        if let Some(o) = found {
            old_used[o] = true;
            next_old = o + 1;
            pairs.push((old_statements[o], new_statements[n]));
        }
    }

    pairs
}

/// Match two document roots and derive the edit script.
///
/// Edits are listed in preorder of the new tree, followed by the deletes in
/// preorder of the old tree. Namespaces are containers only: adding or
/// removing one edits the types in it, not the namespace.
pub fn match_top_level(old_root: &SyntaxNode, new_root: &SyntaxNode) -> EditScript<MiniLanguage> {
    let mut matcher = TopLevelMatcher {
        map: BidirectionalMap::new(),
    };
    matcher.map.insert(old_root.clone(), new_root.clone());
    matcher.match_children(old_root, new_root);
    matcher.match_moved(old_root, new_root);

    let map = matcher.map;
    let reordered = reordered_nodes(&map, old_root);
    let mut edits = Vec::new();

    for new in new_root.descendants().filter(|n| n == new_root || is_declaration(n)) {
        let Some(old) = map.old_node(&new) else {
            if new.kind() != SyntaxKind::NAMESPACE_DECL {
                edits.push(Edit::insert(new));
            }
            continue;
        };

        if &new != new_root {
            let parents_match = match (old.parent(), new.parent()) {
                (Some(old_parent), Some(new_parent)) => {
                    map.old_node(&declaration_parent(&new_parent)).as_ref() == Some(&declaration_parent(&old_parent))
                }
                _ => false,
            };
            if !parents_match {
                edits.push(Edit::moved(old.clone(), new.clone()));
            } else if reordered.contains(&new) {
                edits.push(Edit::reorder(old.clone(), new.clone()));
            }
        }

        if own_tokens(&old) != own_tokens(&new) {
            edits.push(Edit::update(old, new));
        }
    }

    for old in old_root.descendants().filter(is_declaration) {
        if map.new_node(&old).is_none() && old.kind() != SyntaxKind::NAMESPACE_DECL {
            edits.push(Edit::delete(old));
        }
    }

    debug!("[MATCHER] {} top-level edits", edits.len());
    let pairs: Vec<(SyntaxNode, SyntaxNode)> = map.forward().iter().map(|(o, n)| (o.clone(), n.clone())).collect();
    EditScript::new(Match::new(old_root.clone(), new_root.clone(), pairs), edits)
}

/// The declaration (or root) a node is listed under; member lists are skipped.
fn declaration_parent(node: &SyntaxNode) -> SyntaxNode {
    if node.kind() == SyntaxKind::MEMBER_LIST {
        node.parent().unwrap_or_else(|| node.clone())
    } else {
        node.clone()
    }
}

/// New nodes whose position among their siblings changed.
fn reordered_nodes(map: &BidirectionalMap<MiniLanguage>, old_root: &SyntaxNode) -> FxHashSet<SyntaxNode> {
    let mut reordered = FxHashSet::default();
    let containers = std::iter::once(old_root.clone()).chain(old_root.descendants().filter(is_declaration));

    for old in containers {
        let Some(new) = map.new_node(&old) else {
            continue;
        };
        let old_children = declaration_children(&old);
        let new_children = declaration_children(&new);
        let new_index: FxHashMap<&SyntaxNode, usize> =
            new_children.iter().enumerate().map(|(i, n)| (n, i)).collect();

        let matched: Vec<(usize, SyntaxNode)> = old_children
            .iter()
            .filter_map(|o| {
                let partner = map.new_node(o)?;
                new_index.get(&partner).map(|&i| (i, partner.clone()))
            })
            .collect();
        let old_order: Vec<usize> = matched.iter().map(|(i, _)| *i).collect();
        let mut new_order = old_order.clone();
        new_order.sort_unstable();

        let kept: FxHashSet<usize> = sequence_edits(&old_order, &new_order)
            .into_iter()
            .filter_map(|e| e.old_index.zip(e.new_index).map(|(o, _)| old_order[o]))
            .collect();
        reordered.extend(
            matched
                .into_iter()
                .filter(|(i, _)| !kept.contains(i))
                .map(|(_, node)| node),
        );
    }
    reordered
}
