//! Body and lambda matching glue.
//!
//! A member body is matched once; every pair of matched lambdas found in a
//! match is then matched on its own, breadth first, until no new lambda
//! pairs appear. The per-lambda matches are kept for active statement
//! mapping and flattened into one map for the whole member.

use indexmap::IndexMap;
use tracing::trace;

use super::context::{AnalysisContext, Node};
use super::error::{AnalysisError, AnalysisResult};
use crate::language::{LanguageAdapter, StateMachineInfo};
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::syntax::{BidirectionalMap, EditKind, Language, Match, SyntaxNode, sequence_edits};

/// An old active statement located in a member being analyzed.
#[derive(Debug, Clone)]
pub(crate) struct ActiveNode<L: Language> {
    /// Index into the document's active statements.
    pub index: usize,
    pub old_node: SyntaxNode<L>,
    pub enclosing_lambda_body: Option<SyntaxNode<L>>,
    pub statement_part: usize,
    /// New statement resolved from editor tracking.
    pub new_tracked_node: Option<SyntaxNode<L>>,
}

/// What is known about one old lambda body.
#[derive(Debug, Clone)]
pub(crate) struct LambdaInfo<L: Language> {
    /// Indices into the member's active nodes.
    pub active_nodes: Vec<usize>,
    pub body_match: Option<Match<L>>,
    pub new_body: Option<SyntaxNode<L>>,
}

impl<L: Language> Default for LambdaInfo<L> {
    fn default() -> Self {
        Self {
            active_nodes: Vec::new(),
            body_match: None,
            new_body: None,
        }
    }
}

impl<L: Language> LambdaInfo<L> {
    pub fn is_matched(&self) -> bool {
        self.body_match.is_some()
    }
}

pub(crate) type LambdaInfos<L> = IndexMap<SyntaxNode<L>, LambdaInfo<L>>;

pub(crate) struct BodyMatchOutcome<L: Language> {
    pub body_match: Match<L>,
    pub old_has_suspension_points: bool,
    pub new_has_suspension_points: bool,
    pub diagnostics: Vec<RudeEditDiagnostic>,
}

/// Match two bodies, seeding tracked active statements and suspension
/// points as known matches.
///
/// `new_owner` is the new declaration or lambda, used for diagnostics.
#[allow(clippy::too_many_arguments)]
pub(crate) fn compute_body_match<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old_root: &Node<A>,
    new_root: &Node<A>,
    old_state_machine: &StateMachineInfo<A::Language>,
    new_state_machine: &StateMachineInfo<A::Language>,
    active_nodes: &[&ActiveNode<A::Language>],
    new_owner: &Node<A>,
) -> AnalysisResult<BodyMatchOutcome<A::Language>> {
    let adapter = ctx.adapter;
    let limit = ctx.options.max_body_nodes;
    if old_root.descendants().count() > limit || new_root.descendants().count() > limit {
        return Err(AnalysisError::MemberBodyTooBig {
            span: adapter.diagnostic_span(new_owner, EditKind::Update),
        });
    }

    let mut known: Vec<(Node<A>, Node<A>)> = active_nodes
        .iter()
        .filter_map(|n| n.new_tracked_node.clone().map(|new| (n.old_node.clone(), new)))
        .collect();

    let old_points = &old_state_machine.suspension_points;
    let new_points = &new_state_machine.suspension_points;
    let has_active = !active_nodes.is_empty();
    let creating_state_machine = old_points.is_empty() && !new_points.is_empty() && has_active;

    let mut deleted_points = Vec::new();
    let mut inserted_points = Vec::new();

    if !old_points.is_empty() || creating_state_machine {
        if old_points.len() == new_points.len() {
            known.extend(old_points.iter().cloned().zip(new_points.iter().cloned()));
        } else {
            let old_labels: Vec<u32> = old_points.iter().map(|n| adapter.statement_label(n)).collect();
            let new_labels: Vec<u32> = new_points.iter().map(|n| adapter.statement_label(n)).collect();
            for edit in sequence_edits(&old_labels, &new_labels) {
                match (edit.kind, edit.old_index, edit.new_index) {
                    (EditKind::Update, Some(o), Some(n)) => {
                        known.push((old_points[o].clone(), new_points[n].clone()));
                    }
                    (EditKind::Delete, Some(o), _) => deleted_points.push(old_points[o].clone()),
                    (EditKind::Insert, _, Some(n)) => inserted_points.push(new_points[n].clone()),
                    _ => {}
                }
            }
        }
    }

    trace!(
        "[BODY_MATCH] {} known matches, {} deleted and {} inserted suspension points",
        known.len(),
        deleted_points.len(),
        inserted_points.len()
    );

    let body_match = adapter.compute_body_match(old_root, new_root, &known);
    let mut diagnostics = Vec::new();

    if !deleted_points.is_empty() || !inserted_points.is_empty() {
        if has_active {
            for deleted in &deleted_points {
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::ChangingStateMachineShape,
                    deleted_node_diagnostic_span(adapter, &body_match, deleted),
                    [adapter.display_name(new_owner, EditKind::Update)],
                ));
            }
            for inserted in &inserted_points {
                let kind = if creating_state_machine {
                    RudeEditKind::InsertAroundActiveStatement
                } else {
                    RudeEditKind::ChangingStateMachineShape
                };
                let argument = if creating_state_machine {
                    adapter.display_name(inserted, EditKind::Insert)
                } else {
                    adapter.display_name(new_owner, EditKind::Update)
                };
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    kind,
                    adapter.diagnostic_span(inserted, EditKind::Insert),
                    [argument],
                ));
            }
        }
    } else if !old_points.is_empty() {
        if has_active {
            for (old, new) in old_points.iter().zip(new_points) {
                diagnostics.extend(adapter.report_state_machine_suspension_point_rude_edits(old, new));
            }
        }
    } else if has_active && old_state_machine.is_state_machine() != new_state_machine.is_state_machine() {
        diagnostics.push(RudeEditDiagnostic::new(
            RudeEditKind::UpdatingStateMachineMethodAroundActiveStatement,
            adapter.diagnostic_span(new_owner, EditKind::Update),
        ));
    }

    Ok(BodyMatchOutcome {
        body_match,
        old_has_suspension_points: !old_points.is_empty(),
        new_has_suspension_points: !new_points.is_empty(),
        diagnostics,
    })
}

/// Match every lambda reachable from `body_match` and flatten all matches
/// into one map.
///
/// Lambda matches are recorded in `lambda_infos`; lambdas with active
/// statements keep their entry even when unmatched.
pub(crate) fn compute_map<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    body_match: &Match<A::Language>,
    active_nodes: &[ActiveNode<A::Language>],
    lambda_infos: &mut LambdaInfos<A::Language>,
) -> AnalysisResult<(BidirectionalMap<A::Language>, Vec<RudeEditDiagnostic>)> {
    let adapter = ctx.adapter;
    let mut diagnostics = Vec::new();
    let mut lambda_matches: Vec<Match<A::Language>> = Vec::new();
    let mut next = 0;

    loop {
        let current = if next == 0 {
            body_match
        } else {
            &lambda_matches[next - 1]
        };
        let root = current.old_root().clone();
        let pairs: Vec<_> = current
            .pairs_in_order()
            .into_iter()
            .filter(|(old, _)| *old != root)
            .collect();

        for (old, new) in pairs {
            ctx.check_cancelled()?;
            if !adapter.is_lambda(&old) {
                continue;
            }

            if adapter.is_local_function(&old) != adapter.is_local_function(&new) {
                diagnostics.push(RudeEditDiagnostic::new(
                    RudeEditKind::SwitchBetweenLambdaAndLocalFunction,
                    adapter.diagnostic_span(&new, EditKind::Update),
                ));
                continue;
            }

            for old_body in adapter.lambda_bodies(&old) {
                if lambda_infos.get(&old_body).is_some_and(LambdaInfo::is_matched) {
                    continue;
                }
                let Some(new_body) = adapter.partner_lambda_body(&old_body, &new) else {
                    continue;
                };

                let info = lambda_infos.entry(old_body.clone()).or_default();
                let lambda_active: Vec<&ActiveNode<A::Language>> = info
                    .active_nodes
                    .iter()
                    .filter_map(|i| active_nodes.get(*i))
                    .collect();

                let outcome = compute_body_match(
                    ctx,
                    &old_body,
                    &new_body,
                    &adapter.state_machine_info(&old_body),
                    &adapter.state_machine_info(&new_body),
                    &lambda_active,
                    &new,
                )?;
                diagnostics.extend(outcome.diagnostics);

                info.body_match = Some(outcome.body_match.clone());
                info.new_body = Some(new_body);
                lambda_matches.push(outcome.body_match);
            }
        }

        next += 1;
        if next > lambda_matches.len() {
            break;
        }
    }

    trace!("[BODY_MATCH] matched {} lambda bodies", lambda_matches.len());

    let mut map = body_match.map().clone();
    for lambda_match in &lambda_matches {
        for (old, new) in lambda_match.matches() {
            if map.new_node(old).is_none() && map.old_node(new).is_none() {
                map.insert(old.clone(), new.clone());
            }
        }
    }

    Ok((map, diagnostics))
}

/// Diagnostic span for a deleted node: the closest ancestor that still has a
/// partner, in the new tree.
pub(crate) fn deleted_node_diagnostic_span<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    body_match: &Match<A::Language>,
    deleted: &Node<A>,
) -> crate::base::TextRange {
    let partner = deleted
        .ancestors()
        .skip(1)
        .find_map(|old| body_match.new_node(&old))
        .unwrap_or_else(|| body_match.new_root().clone());
    adapter.diagnostic_span(&partner, EditKind::Delete)
}
