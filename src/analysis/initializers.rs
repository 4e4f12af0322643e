//! Aggregation of member initializer edits into constructor edits.
//!
//! Field and property initializers are emitted into the body of every
//! constructor that does not chain to another constructor of the same type.
//! Edits of initializers and of such constructors are therefore collected per
//! type and turned into one update per affected constructor, each carrying a
//! syntax map over all initializers and the constructor body.

use indexmap::IndexMap;
use tracing::trace;

use super::classifier::report_insert_rude_edits;
use super::context::{AnalysisContext, Node};
use super::error::AnalysisResult;
use super::{SemanticEditInfo, SemanticEditKind, SyntaxMap};
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::{Symbol, SymbolKey};
use crate::syntax::{EditKind, Language, Match, SyntaxNode};

/// Initializer and constructor edits of one type, static or instance side.
#[derive(Debug, Clone)]
pub(crate) struct MemberInitializationUpdates<L: Language> {
    /// Changed initializer and constructor declarations (new tree) with the
    /// syntax map of their body, if one was computed.
    pub changed_declarations: IndexMap<SyntaxNode<L>, Option<SyntaxMap<L>>>,
    /// An initializer was inserted, deleted or updated.
    pub has_initializer_updates: bool,
}

impl<L: Language> Default for MemberInitializationUpdates<L> {
    fn default() -> Self {
        Self {
            changed_declarations: IndexMap::new(),
            has_initializer_updates: false,
        }
    }
}

/// Deferred updates keyed by containing type and static-ness.
pub(crate) type InitializerUpdates<L> = IndexMap<(SymbolKey, bool), MemberInitializationUpdates<L>>;

/// Record a changed initializer or constructor for later aggregation.
///
/// `declaration` is `None` for a deleted initializer.
pub(crate) fn defer_constructor_edit<L: Language>(
    updates: &mut InitializerUpdates<L>,
    type_key: SymbolKey,
    is_static: bool,
    declaration: Option<SyntaxNode<L>>,
    syntax_map: Option<SyntaxMap<L>>,
    is_initializer: bool,
) {
    let entry = updates.entry((type_key, is_static)).or_default();
    if is_initializer {
        entry.has_initializer_updates = true;
    }
    if let Some(declaration) = declaration {
        entry.changed_declarations.insert(declaration, syntax_map);
    }
}

/// Turn deferred updates into constructor edits.
///
/// Constructors in `existing` already have an edit and are left alone.
pub(crate) fn add_constructor_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    top_match: &Match<A::Language>,
    updates: &InitializerUpdates<A::Language>,
    existing: &[SemanticEditInfo<A::Language>],
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) -> AnalysisResult<Vec<SemanticEditInfo<A::Language>>> {
    let adapter = ctx.adapter;
    let mut edits = Vec::new();

    for ((type_key, is_static), update) in updates {
        ctx.check_cancelled()?;
        let Some(new_type) = ctx.new_model.resolve(type_key) else {
            continue;
        };

        let constructors: Vec<Symbol> = ctx
            .new_model
            .members(type_key)
            .into_iter()
            .filter(|m| m.is_constructor() && m.is_static() == *is_static)
            .collect();
        trace!(
            "[ANALYZE] aggregating initializers of {} ({} constructors, static: {})",
            type_key,
            constructors.len(),
            is_static
        );

        let syntax_map = aggregate_syntax_map(ctx, top_match, type_key, *is_static, update);

        for ctor in constructors {
            ctx.check_cancelled()?;
            if existing.iter().any(|e| e.symbol == ctor.key) {
                continue;
            }

            let declaration = ctx.new_model.declaration_syntax(&ctor.key).into_iter().next();
            let old_ctor = match &declaration {
                Some(declaration) => {
                    if !adapter.is_constructor_with_member_initializers(declaration) {
                        continue;
                    }
                    if !update.has_initializer_updates && !update.changed_declarations.contains_key(declaration) {
                        continue;
                    }
                    top_match
                        .old_node(declaration)
                        .and_then(|old| ctx.old_model.declared_symbol(&old))
                        .or_else(|| ctx.old_model.resolve(&ctor.key))
                }
                None => ctx.old_model.resolve(&ctor.key),
            };

            if old_ctor.is_some() {
                edits.push(
                    SemanticEditInfo::new(SemanticEditKind::Update, ctor.key.clone())
                        .with_syntax_map(Some(syntax_map.clone())),
                );
                continue;
            }

            let span = declaration
                .as_ref()
                .map(|d| adapter.diagnostic_span(d, EditKind::Insert))
                .or(new_type.name_span)
                .unwrap_or_default();

            if old_initializers_have_lambdas(ctx, type_key, *is_static) {
                diagnostics.push(RudeEditDiagnostic::new(
                    RudeEditKind::InsertConstructorToTypeWithInitializersWithLambdas,
                    span,
                ));
                continue;
            }

            let insert_diagnostics = report_insert_rude_edits(ctx, &ctor, Some(&new_type), span);
            if insert_diagnostics.is_empty() {
                edits.push(
                    SemanticEditInfo::new(SemanticEditKind::Insert, ctor.key.clone())
                        .with_syntax_map(Some(syntax_map.clone())),
                );
            }
            diagnostics.extend(insert_diagnostics);
        }
    }

    Ok(edits)
}

/// Syntax map over the initializers and constructors of one side of a type.
///
/// Changed declarations contribute their body match; unchanged ones map to
/// their partner node by node.
fn aggregate_syntax_map<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    top_match: &Match<A::Language>,
    type_key: &SymbolKey,
    is_static: bool,
    update: &MemberInitializationUpdates<A::Language>,
) -> SyntaxMap<A::Language> {
    let adapter = ctx.adapter;
    let mut map = SyntaxMap::default();

    for body_map in update.changed_declarations.values().flatten() {
        map.extend(body_map);
    }

    for member in ctx.new_model.members(type_key) {
        if member.is_static() != is_static {
            continue;
        }
        for declaration in ctx.new_model.declaration_syntax(&member.key) {
            if update.changed_declarations.contains_key(&declaration) {
                continue;
            }
            let relevant = adapter.is_declaration_with_initializer(&declaration)
                || adapter.is_constructor_with_member_initializers(&declaration);
            if !relevant {
                continue;
            }
            if let Some(old) = top_match.old_node(&declaration) {
                map.add_equivalent_nodes(&[old], &[declaration]);
            }
        }
    }

    map
}

fn old_initializers_have_lambdas<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    type_key: &SymbolKey,
    is_static: bool,
) -> bool {
    let adapter = ctx.adapter;
    ctx.old_model
        .members(type_key)
        .iter()
        .filter(|m| m.is_static() == is_static)
        .flat_map(|m| ctx.old_model.declaration_syntax(&m.key))
        .filter(|d: &Node<A>| adapter.is_declaration_with_initializer(d))
        .any(|d| adapter.contains_lambda(&d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mini::{MiniLanguage, parse};

    #[test]
    fn test_defer_merges_by_type_and_side() {
        let tree = parse("class C { var x: int = 1; var y: int = 2; }").syntax();
        let nodes: Vec<SyntaxNode<MiniLanguage>> = tree.descendants().take(2).collect();
        let mut updates: InitializerUpdates<MiniLanguage> = IndexMap::new();

        let key = SymbolKey::new("C");
        defer_constructor_edit(&mut updates, key.clone(), false, Some(nodes[0].clone()), None, true);
        defer_constructor_edit(&mut updates, key.clone(), false, Some(nodes[1].clone()), None, false);
        defer_constructor_edit(&mut updates, key.clone(), true, None, None, true);

        assert_eq!(updates.len(), 2);
        let instance = &updates[&(key.clone(), false)];
        assert!(instance.has_initializer_updates);
        assert_eq!(instance.changed_declarations.len(), 2);
        assert!(updates[&(key, true)].changed_declarations.is_empty());
    }
}
