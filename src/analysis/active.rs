//! Active statement relocation.
//!
//! Every old active statement of the document leaves the analysis with a
//! span in the new document. Statements in changed members are mapped
//! through the member's body match, statements in unchanged members through
//! the structural partner of their statement.

use indexmap::IndexMap;
use tracing::{trace, warn};

use super::body_match::{
    ActiveNode, LambdaInfos, compute_body_match, compute_map, deleted_node_diagnostic_span,
};
use super::context::{AnalysisContext, Node};
use super::error::AnalysisResult;
use super::exception_regions::{regions_of_ancestors, report_exception_handling_edits};
use super::{ActiveStatement, ActiveStatementTracking, ExceptionRegions};
use crate::base::TextRange;
use crate::language::{DeclarationBody, LanguageAdapter};
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::syntax::{BidirectionalMap, EditKind, Language, Match, SyntaxNode, token_at};

/// Old active statements of a document and their relocated counterparts.
pub(crate) struct ActiveStatementSlots<'a> {
    pub old: &'a [ActiveStatement],
    /// Old spans as text ranges; `None` when out of sync with the old text.
    pub old_ranges: Vec<Option<TextRange>>,
    pub new: Vec<Option<ActiveStatement>>,
    pub regions: Vec<Option<ExceptionRegions>>,
}

impl<'a> ActiveStatementSlots<'a> {
    pub fn new<A: LanguageAdapter>(ctx: &AnalysisContext<'_, A>, old: &'a [ActiveStatement]) -> Self {
        Self {
            old,
            old_ranges: old.iter().map(|s| ctx.old_range(s.span)).collect(),
            new: vec![None; old.len()],
            regions: vec![None; old.len()],
        }
    }

    /// Indices of statements whose old span lies within `range`.
    pub fn indices_within(&self, range: TextRange) -> Vec<usize> {
        self.old_ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some_and(|r| range.contains_range(r)))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set<A: LanguageAdapter>(
        &mut self,
        ctx: &AnalysisContext<'_, A>,
        index: usize,
        span: TextRange,
        regions: ExceptionRegions,
    ) {
        self.new[index] = Some(self.old[index].with_span(ctx.new_line_span(span)));
        self.regions[index] = Some(regions);
    }

    /// Statements that could not be located keep their old span.
    pub fn finish(self) -> (Vec<ActiveStatement>, Vec<ExceptionRegions>) {
        let statements = self
            .new
            .into_iter()
            .zip(self.old)
            .map(|(new, old)| {
                new.unwrap_or_else(|| {
                    warn!("[ACTIVE] statement {} could not be located, keeping {}", old.ordinal, old.span);
                    old.clone()
                })
            })
            .collect();
        let regions = self.regions.into_iter().map(Option::unwrap_or_default).collect();
        (statements, regions)
    }
}

/// Everything computed for one member whose body changed.
#[derive(Debug, Clone)]
pub(crate) struct UpdatedMemberInfo<L: Language> {
    pub old_declaration: SyntaxNode<L>,
    pub new_declaration: SyntaxNode<L>,
    pub old_body: DeclarationBody<L>,
    pub new_body: DeclarationBody<L>,
    pub lambda_infos: LambdaInfos<L>,
    pub map: BidirectionalMap<L>,
    pub has_active_statement: bool,
    pub has_state_machine_suspension_point: bool,
}

/// Map the active statements of a changed member and collect its body match.
pub(crate) fn analyze_changed_member_body<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    tracking: Option<&dyn ActiveStatementTracking>,
    old_declaration: &Node<A>,
    new_declaration: &Node<A>,
    old_body: DeclarationBody<A::Language>,
    new_body: DeclarationBody<A::Language>,
    slots: &mut ActiveStatementSlots<'_>,
) -> AnalysisResult<(UpdatedMemberInfo<A::Language>, Vec<RudeEditDiagnostic>)> {
    let adapter = ctx.adapter;
    let mut diagnostics = Vec::new();
    let mut active_nodes: Vec<ActiveNode<A::Language>> = Vec::new();
    let mut lambda_infos: LambdaInfos<A::Language> = IndexMap::new();

    for index in slots.indices_within(old_body.envelope) {
        ctx.check_cancelled()?;
        let Some(old_span) = slots.old_ranges[index] else {
            continue;
        };
        let Some((old_node, part)) = adapter.find_statement(&old_body, old_span) else {
            warn!("[ACTIVE] no statement at {:?} in changed member", old_span);
            continue;
        };

        let enclosing_lambda_body = adapter.find_enclosing_lambda_body(&old_body.match_root, &old_node);
        let new_tracked_node = tracked_statement(
            ctx,
            tracking,
            &slots.old[index],
            &new_body,
            &old_node,
            enclosing_lambda_body.is_some(),
        );

        if let Some(lambda_body) = &enclosing_lambda_body {
            lambda_infos
                .entry(lambda_body.clone())
                .or_default()
                .active_nodes
                .push(active_nodes.len());
        }

        active_nodes.push(ActiveNode {
            index,
            old_node,
            enclosing_lambda_body,
            statement_part: part,
            new_tracked_node,
        });
    }

    let member_active: Vec<&ActiveNode<A::Language>> = active_nodes
        .iter()
        .filter(|n| n.enclosing_lambda_body.is_none())
        .collect();

    let outcome = compute_body_match(
        ctx,
        &old_body.match_root,
        &new_body.match_root,
        &old_body.state_machine,
        &new_body.state_machine,
        &member_active,
        new_declaration,
    )?;
    diagnostics.extend(outcome.diagnostics);

    let (map, lambda_diagnostics) = compute_map(ctx, &outcome.body_match, &active_nodes, &mut lambda_infos)?;
    diagnostics.extend(lambda_diagnostics);

    for active in &active_nodes {
        ctx.check_cancelled()?;
        let statement = &slots.old[active.index];
        let is_non_leaf = statement.is_non_leaf();
        let is_partially_executed = statement.is_partially_executed();

        let body_match = match &active.enclosing_lambda_body {
            None => &outcome.body_match,
            Some(lambda_body) => match lambda_infos.get(lambda_body).and_then(|i| i.body_match.as_ref()) {
                Some(lambda_match) => lambda_match,
                None => {
                    let old_lambda = adapter
                        .lambda_of_body(lambda_body)
                        .unwrap_or_else(|| lambda_body.clone());
                    let span = deleted_node_diagnostic_span(adapter, &outcome.body_match, &old_lambda);
                    diagnostics.push(RudeEditDiagnostic::with_arguments(
                        RudeEditKind::ActiveStatementLambdaRemoved,
                        span,
                        [adapter.display_name(&old_lambda, EditKind::Delete)],
                    ));
                    slots.set(ctx, active.index, span, ExceptionRegions::default());
                    continue;
                }
            },
        };

        let new_node = active
            .new_tracked_node
            .clone()
            .or_else(|| body_match.new_node(&active.old_node));

        match new_node {
            Some(new_node) => {
                let new_span = find_closest_active_span(adapter, &new_node, active.statement_part);
                trace!("[ACTIVE] statement {} mapped to {:?}", statement.ordinal, new_span);

                if (is_non_leaf || is_partially_executed)
                    && !adapter.are_equivalent_active_statements(
                        &active.old_node,
                        &new_node,
                        active.statement_part,
                    )
                {
                    let kind = if is_non_leaf {
                        RudeEditKind::ActiveStatementUpdate
                    } else {
                        RudeEditKind::PartiallyExecutedActiveStatementUpdate
                    };
                    diagnostics.push(RudeEditDiagnostic::new(kind, new_span));
                }

                let old_ancestors = adapter.exception_handling_ancestors(&active.old_node, is_non_leaf);
                let new_ancestors = adapter.exception_handling_ancestors(&new_node, is_non_leaf);
                if !old_ancestors.is_empty() || !new_ancestors.is_empty() {
                    diagnostics.extend(report_exception_handling_edits(
                        adapter,
                        body_match,
                        &old_ancestors,
                        &new_ancestors,
                        new_span,
                    ));
                }

                diagnostics.extend(adapter.report_other_rude_edits_around_active_statement(
                    &active.old_node,
                    &new_node,
                    is_non_leaf,
                ));

                let regions = regions_of_ancestors(adapter, ctx.new_text.lines(), &new_ancestors);
                slots.set(ctx, active.index, new_span, regions);
            }
            None => {
                let new_span = deleted_node_active_span(adapter, body_match, &active.old_node);
                trace!("[ACTIVE] statement {} deleted, relocated to {:?}", statement.ordinal, new_span);

                if is_non_leaf || is_partially_executed {
                    let kind = if is_non_leaf {
                        RudeEditKind::DeleteActiveStatement
                    } else {
                        RudeEditKind::PartiallyExecutedActiveStatementDelete
                    };
                    diagnostics.push(RudeEditDiagnostic::with_arguments(
                        kind,
                        deleted_node_diagnostic_span(adapter, body_match, &active.old_node),
                        [adapter.display_name(&active.old_node, EditKind::Delete)],
                    ));
                }

                slots.set(ctx, active.index, new_span, ExceptionRegions::default());
            }
        }
    }

    let info = UpdatedMemberInfo {
        old_declaration: old_declaration.clone(),
        new_declaration: new_declaration.clone(),
        old_body,
        new_body,
        lambda_infos,
        map,
        has_active_statement: !active_nodes.is_empty(),
        has_state_machine_suspension_point: outcome.old_has_suspension_points
            || outcome.new_has_suspension_points,
    };

    Ok((info, diagnostics))
}

/// Active statements of a deleted member.
pub(crate) fn analyze_deleted_member<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    top_match: &Match<A::Language>,
    old_declaration: &Node<A>,
    old_body: &DeclarationBody<A::Language>,
    slots: &mut ActiveStatementSlots<'_>,
) -> Vec<RudeEditDiagnostic> {
    let adapter = ctx.adapter;
    let indices = slots.indices_within(old_body.envelope);
    if indices.is_empty() {
        return Vec::new();
    }

    let diagnostic_span = deleted_node_diagnostic_span(adapter, top_match, old_declaration);
    let new_span = if adapter.is_declaration_with_initializer(old_declaration) {
        deleted_node_active_span(adapter, top_match, old_declaration)
    } else {
        diagnostic_span
    };

    for index in indices {
        slots.set(ctx, index, new_span, ExceptionRegions::default());
    }

    vec![RudeEditDiagnostic::with_arguments(
        RudeEditKind::DeleteActiveStatement,
        diagnostic_span,
        [adapter.display_name(old_declaration, EditKind::Delete)],
    )]
}

/// A member gained or lost its body while its old declaration held active
/// statements.
pub(crate) fn analyze_body_presence_change<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old_declaration: &Node<A>,
    new_declaration: &Node<A>,
    kind: RudeEditKind,
    slots: &mut ActiveStatementSlots<'_>,
) -> Vec<RudeEditDiagnostic> {
    let adapter = ctx.adapter;
    let indices = slots.indices_within(old_declaration.text_range());
    if indices.is_empty() {
        return Vec::new();
    }

    let span = adapter.diagnostic_span(new_declaration, EditKind::Update);
    for index in indices {
        slots.set(ctx, index, span, ExceptionRegions::default());
    }

    vec![RudeEditDiagnostic::with_arguments(
        kind,
        span,
        [adapter.display_name(new_declaration, EditKind::Update)],
    )]
}

/// Relocate active statements of members that were not changed.
///
/// Only their position may differ, so the statement partner is found by
/// tree structure.
pub(crate) fn update_unedited_spans<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    tracking: Option<&dyn ActiveStatementTracking>,
    top_match: &Match<A::Language>,
    slots: &mut ActiveStatementSlots<'_>,
) -> AnalysisResult<()> {
    let adapter = ctx.adapter;
    let old_root = top_match.old_root();

    for index in 0..slots.old.len() {
        ctx.check_cancelled()?;
        if slots.new[index].is_some() {
            continue;
        }
        let Some(old_span) = slots.old_ranges[index] else {
            warn!("[ACTIVE] statement {} is outside of the old text", slots.old[index].ordinal);
            continue;
        };
        let Some(node) = token_at(old_root, old_span.start()).and_then(|t| t.parent()) else {
            continue;
        };
        let Some(old_member) = adapter.find_member_declaration(old_root, &node) else {
            warn!("[ACTIVE] statement {} is not within a member", slots.old[index].ordinal);
            continue;
        };
        let Some(new_member) = top_match.new_node(&old_member) else {
            continue;
        };
        let (Some(old_body), Some(new_body)) = (
            adapter.declaration_body(&old_member),
            adapter.declaration_body(&new_member),
        ) else {
            continue;
        };

        let Some((old_statement, partner, part)) =
            adapter.find_statement_and_partner(&old_body, Some(&new_body), old_span)
        else {
            continue;
        };

        let is_lambda = adapter
            .find_enclosing_lambda_body(&old_body.match_root, &old_statement)
            .is_some();
        let tracked = tracked_statement(
            ctx,
            tracking,
            &slots.old[index],
            &new_body,
            &old_statement,
            is_lambda,
        );

        let Some(new_statement) = tracked.or(partner) else {
            continue;
        };

        let is_non_leaf = slots.old[index].is_non_leaf();
        let ancestors = adapter.exception_handling_ancestors(&new_statement, is_non_leaf);
        let regions = regions_of_ancestors(adapter, ctx.new_text.lines(), &ancestors);
        let span = find_closest_active_span(adapter, &new_statement, part);
        slots.set(ctx, index, span, regions);
    }

    Ok(())
}

/// Relocate active statements of a document whose text did not change.
pub(crate) fn map_unchanged_document<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    new_root: &Node<A>,
    slots: &mut ActiveStatementSlots<'_>,
) -> AnalysisResult<()> {
    let adapter = ctx.adapter;

    for index in 0..slots.old.len() {
        ctx.check_cancelled()?;
        let Some(old_span) = slots.old_ranges[index] else {
            continue;
        };

        let span = adapter
            .enclosing_breakpoint_span(new_root, old_span.start())
            .unwrap_or(old_span);
        let regions = match token_at(new_root, span.start()).and_then(|t| t.parent()) {
            Some(node) => {
                let ancestors = adapter.exception_handling_ancestors(&node, slots.old[index].is_non_leaf());
                regions_of_ancestors(adapter, ctx.new_text.lines(), &ancestors)
            }
            None => ExceptionRegions::default(),
        };
        slots.set(ctx, index, span, regions);
    }

    Ok(())
}

/// Statement designated by editor tracking, if it is plausible.
///
/// The tracked span must be non-empty, inside the new body, in a lambda iff
/// the old statement is, and at a statement of the same label.
fn tracked_statement<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    tracking: Option<&dyn ActiveStatementTracking>,
    statement: &ActiveStatement,
    new_body: &DeclarationBody<A::Language>,
    old_node: &Node<A>,
    in_lambda: bool,
) -> Option<Node<A>> {
    let adapter = ctx.adapter;
    let tracked = tracking?.tracked_span(ctx.document, statement.ordinal)?;
    let range = ctx.new_range(tracked)?;
    if range.is_empty() || !new_body.contains_span(range) {
        return None;
    }

    let (new_node, _) = adapter.find_statement(new_body, range)?;
    let new_in_lambda = adapter
        .find_enclosing_lambda_body(&new_body.match_root, &new_node)
        .is_some();

    (new_in_lambda == in_lambda && adapter.statement_label(&new_node) == adapter.statement_label(old_node))
        .then_some(new_node)
}

/// Span of `node`'s part, or of the nearest statement after it that has one.
pub(crate) fn find_closest_active_span<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    node: &Node<A>,
    part: usize,
) -> TextRange {
    if let Some(span) = adapter.active_span(node, part) {
        return span;
    }

    adapter
        .near_statements(node)
        .iter()
        .find_map(|(near, near_part)| adapter.active_span(near, *near_part))
        .unwrap_or_else(|| node.text_range())
}

/// New span for an active statement whose node was deleted: the next
/// statement that survived, or the enclosing construct.
pub(crate) fn deleted_node_active_span<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    body_match: &Match<A::Language>,
    deleted: &Node<A>,
) -> TextRange {
    for (near, part) in adapter.near_statements(deleted) {
        if let Some(partner) = body_match.new_node(&near) {
            return find_closest_active_span(adapter, &partner, part);
        }
    }
    deleted_node_diagnostic_span(adapter, body_match, deleted)
}
