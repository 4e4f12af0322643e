//! Closure and capture validation of an updated member.
//!
//! Closures are emitted into frames whose shape is determined by the set of
//! captured variables and the scopes declaring them. A member can only be
//! updated in place if that shape is preserved.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::trace;

use super::active::UpdatedMemberInfo;
use super::context::{AnalysisContext, Node};
use super::error::AnalysisResult;
use crate::base::TextRange;
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::{CapturedVariableKind, SemanticModel, VariableCapture};
use crate::syntax::{BidirectionalMap, EditKind, Language, SyntaxNode};

/// Identity of a capture that survives an edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CaptureKey<L: Language> {
    This,
    /// `owner` is the lambda declaring the parameter, `None` for member parameters.
    Parameter {
        owner: Option<SyntaxNode<L>>,
        ordinal: usize,
    },
    Local(SyntaxNode<L>),
}

impl<L: Language> CaptureKey<L> {
    fn of(capture: &VariableCapture<L>) -> Self {
        match capture {
            VariableCapture::This { .. } => CaptureKey::This,
            VariableCapture::Variable(variable) => match variable.kind {
                CapturedVariableKind::Local => CaptureKey::Local(variable.declaration.clone()),
                CapturedVariableKind::Parameter { ordinal }
                | CapturedVariableKind::PrimaryConstructorParameter { ordinal } => CaptureKey::Parameter {
                    owner: variable.owner.clone(),
                    ordinal,
                },
            },
        }
    }

    /// The old key of a new capture, if its declaration is mapped.
    fn to_old(&self, map: &BidirectionalMap<L>) -> Option<Self> {
        match self {
            CaptureKey::This => Some(CaptureKey::This),
            CaptureKey::Parameter { owner: None, ordinal } => Some(CaptureKey::Parameter {
                owner: None,
                ordinal: *ordinal,
            }),
            CaptureKey::Parameter {
                owner: Some(lambda),
                ordinal,
            } => map.old_node(lambda).map(|old| CaptureKey::Parameter {
                owner: Some(old),
                ordinal: *ordinal,
            }),
            CaptureKey::Local(declaration) => map.old_node(declaration).map(CaptureKey::Local),
        }
    }

    fn is_local(&self) -> bool {
        matches!(self, CaptureKey::Local(_))
    }
}

/// Correspondence between old and new captures of a member.
struct CaptureMaps<L: Language> {
    /// New capture index → old capture index.
    reverse: Vec<Option<usize>>,
    new_scopes: Vec<Option<SyntaxNode<L>>>,
    old_scopes: Vec<Option<SyntaxNode<L>>>,
}

/// Rude edits caused by closures of an updated member.
///
/// Returns the diagnostics and whether the new body contains lambdas.
/// `member_span` locates diagnostics about the receiver.
pub(crate) fn report_lambda_and_closure_rude_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    member: &UpdatedMemberInfo<A::Language>,
    member_span: TextRange,
) -> AnalysisResult<(Vec<RudeEditDiagnostic>, bool)> {
    let adapter = ctx.adapter;
    let map = &member.map;
    let mut diagnostics = Vec::new();

    let matched_lambdas: Vec<(Node<A>, Node<A>)> = member
        .lambda_infos
        .iter()
        .filter_map(|(old_body, info)| info.new_body.clone().map(|new_body| (old_body.clone(), new_body)))
        .collect();

    for (old_body, new_body) in &matched_lambdas {
        ctx.check_cancelled()?;
        diagnostics.extend(report_lambda_signature_rude_edits(ctx, old_body, new_body));
    }
    if !diagnostics.is_empty() {
        return Ok((diagnostics, true));
    }

    let old_captures = ctx.old_model.captured_variables(&member.old_declaration);
    let new_captures = ctx.new_model.captured_variables(&member.new_declaration);
    trace!(
        "[CLOSURES] {} old and {} new captures",
        old_captures.len(),
        new_captures.len()
    );

    let captures = calculate_capture_maps(ctx, member, &old_captures, &new_captures, member_span, &mut diagnostics)?;
    if !diagnostics.is_empty() {
        return Ok((diagnostics, true));
    }

    for (old_body, new_body) in &matched_lambdas {
        ctx.check_cancelled()?;
        let old_accessed = accessed_indices(ctx.old_model, old_body, &old_captures);
        let new_accessed = accessed_indices(ctx.new_model, new_body, &new_captures);
        let new_lambda = adapter.lambda_of_body(new_body).unwrap_or_else(|| new_body.clone());

        for (new_index, capture) in new_captures.iter().enumerate() {
            let new_is_accessed = new_accessed[new_index];
            let old_is_accessed = captures.reverse[new_index].is_some_and(|old| old_accessed[old]);
            if new_is_accessed == old_is_accessed {
                continue;
            }

            let kind = if new_is_accessed {
                RudeEditKind::AccessingCapturedVariableInLambda
            } else {
                RudeEditKind::NotAccessingCapturedVariableInLambda
            };
            let arguments = [
                capture.name().to_string(),
                adapter.display_name(&new_lambda, EditKind::Update),
            ];

            if capture.is_this() || old_is_accessed {
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    kind,
                    adapter.diagnostic_span(&new_lambda, EditKind::Update),
                    arguments,
                ));
            } else {
                let sites = ctx.new_model.capture_use_sites(std::slice::from_ref(new_body), capture);
                for site in sites {
                    diagnostics.push(RudeEditDiagnostic::with_arguments(kind, site, arguments.clone()));
                }
            }
        }
    }
    if !diagnostics.is_empty() {
        return Ok((diagnostics, true));
    }

    // Scopes that lambdas present in both versions already tie together.
    let linked_new = linked_scopes(
        ctx.new_model,
        matched_lambdas.iter().map(|(_, new_body)| new_body),
        &new_captures,
        &captures.new_scopes,
    );
    let linked_old = linked_scopes(
        ctx.old_model,
        matched_lambdas.iter().map(|(old_body, _)| old_body),
        &old_captures,
        &captures.old_scopes,
    );

    let mut new_body_has_lambdas = false;
    for new_lambda in member.new_body.match_root.descendants().filter(|n| adapter.is_lambda(n)) {
        ctx.check_cancelled()?;
        new_body_has_lambdas = true;
        if map.old_node(&new_lambda).is_some() {
            continue;
        }
        for body in adapter.lambda_bodies(&new_lambda) {
            if let Some(diagnostic) = report_multi_scope_capture(
                ctx,
                &body,
                ctx.new_model,
                &new_captures,
                &captures.new_scopes,
                &linked_new,
                MultiScopeEdit::Insert,
            ) {
                diagnostics.push(diagnostic);
            }
        }
    }

    for old_lambda in member.old_body.match_root.descendants().filter(|n| adapter.is_lambda(n)) {
        ctx.check_cancelled()?;
        if map.new_node(&old_lambda).is_some() {
            continue;
        }
        for body in adapter.lambda_bodies(&old_lambda) {
            let delete = MultiScopeEdit::Delete {
                new_captures: &new_captures,
                reverse: &captures.reverse,
                member_span,
            };
            if let Some(diagnostic) = report_multi_scope_capture(
                ctx,
                &body,
                ctx.old_model,
                &old_captures,
                &captures.old_scopes,
                &linked_old,
                delete,
            ) {
                diagnostics.push(diagnostic);
            }
        }
    }

    Ok((diagnostics, new_body_has_lambdas))
}

fn report_lambda_signature_rude_edits<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old_body: &Node<A>,
    new_body: &Node<A>,
) -> Option<RudeEditDiagnostic> {
    let adapter = ctx.adapter;
    let old_lambda = adapter.lambda_of_body(old_body)?;
    let new_lambda = adapter.lambda_of_body(new_body)?;
    let old_signature = ctx.old_model.lambda_signature(&old_lambda)?;
    let new_signature = ctx.new_model.lambda_signature(&new_lambda)?;

    let kind = if old_signature.parameter_types != new_signature.parameter_types {
        RudeEditKind::ChangingLambdaParameters
    } else if old_signature.return_type != new_signature.return_type {
        RudeEditKind::ChangingLambdaReturnType
    } else {
        return None;
    };

    Some(ctx.node_diagnostic(kind, &new_lambda, EditKind::Update))
}

fn calculate_capture_maps<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    member: &UpdatedMemberInfo<A::Language>,
    old_captures: &[VariableCapture<A::Language>],
    new_captures: &[VariableCapture<A::Language>],
    member_span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) -> AnalysisResult<CaptureMaps<A::Language>> {
    let map = &member.map;
    let mut old_by_key: IndexMap<CaptureKey<A::Language>, usize> = old_captures
        .iter()
        .enumerate()
        .map(|(i, c)| (CaptureKey::of(c), i))
        .collect();

    let mut maps = CaptureMaps {
        reverse: vec![None; new_captures.len()],
        new_scopes: vec![None; new_captures.len()],
        old_scopes: vec![None; old_captures.len()],
    };

    for (new_index, new_capture) in new_captures.iter().enumerate() {
        ctx.check_cancelled()?;
        let new_key = CaptureKey::of(new_capture);
        let old_index = new_key
            .to_old(map)
            .and_then(|old_key| old_by_key.shift_remove(&old_key));

        let Some(old_index) = old_index else {
            diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::CapturingVariable,
                capture_span(new_capture, member_span),
                [new_capture.name().to_string()],
            ));
            continue;
        };
        maps.reverse[new_index] = Some(old_index);

        let old_scope = ctx.old_model.capture_scope(&old_captures[old_index]);
        let new_scope = ctx.new_model.capture_scope(new_capture);
        maps.new_scopes[new_index] = new_scope.clone();
        maps.old_scopes[old_index] = old_scope.clone();

        if !new_key.is_local() {
            continue;
        }
        let (Some(old_variable), Some(new_variable)) =
            (old_captures[old_index].variable(), new_capture.variable())
        else {
            continue;
        };
        let span = new_variable.declaration.text_range();

        if old_variable.name != new_variable.name {
            diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::RenamingCapturedVariable,
                span,
                [old_variable.name.to_string(), new_variable.name.to_string()],
            ));
            continue;
        }

        if old_variable.ty != new_variable.ty {
            diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::ChangingCapturedVariableType,
                span,
                [new_variable.name.to_string(), old_variable.ty.to_string()],
            ));
            continue;
        }

        if !are_equivalent_closure_scopes(old_scope.as_ref(), new_scope.as_ref(), map) {
            diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::ChangingCapturedVariableScope,
                span,
                [new_variable.name.to_string()],
            ));
        }
    }

    for (old_key, old_index) in old_by_key {
        let old_capture = &old_captures[old_index];
        let name = old_capture.name().to_string();

        match &old_key {
            CaptureKey::Local(declaration) => match map.new_node(declaration) {
                Some(new_declaration) => diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::NotCapturingVariable,
                    new_declaration.text_range(),
                    [name],
                )),
                None => diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::DeletingCapturedVariable,
                    deleted_node_span(ctx, map, declaration, &member.new_declaration),
                    [name],
                )),
            },
            CaptureKey::This => diagnostics.push(RudeEditDiagnostic::with_arguments(
                RudeEditKind::NotCapturingVariable,
                member_span,
                [name],
            )),
            CaptureKey::Parameter { owner, .. } => {
                let span = owner
                    .as_ref()
                    .and_then(|lambda| map.new_node(lambda))
                    .map(|lambda| ctx.adapter.diagnostic_span(&lambda, EditKind::Update))
                    .unwrap_or(member_span);
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::NotCapturingVariable,
                    span,
                    [name],
                ));
            }
        }
    }

    Ok(maps)
}

fn capture_span<L: Language>(capture: &VariableCapture<L>, member_span: TextRange) -> TextRange {
    match capture {
        VariableCapture::This { .. } => member_span,
        VariableCapture::Variable(variable) => variable.declaration.text_range(),
    }
}

fn are_equivalent_closure_scopes<L: Language>(
    old_scope: Option<&SyntaxNode<L>>,
    new_scope: Option<&SyntaxNode<L>>,
    map: &BidirectionalMap<L>,
) -> bool {
    match (old_scope, new_scope) {
        (None, None) => true,
        (Some(old), Some(new)) => map.old_node(new).as_ref() == Some(old),
        _ => false,
    }
}

/// Closest mapped ancestor of a deleted node, in the new member.
fn deleted_node_span<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    map: &BidirectionalMap<A::Language>,
    deleted: &Node<A>,
    new_declaration: &Node<A>,
) -> TextRange {
    let partner = deleted
        .ancestors()
        .skip(1)
        .find_map(|old| map.new_node(&old))
        .unwrap_or_else(|| new_declaration.clone());
    ctx.adapter.diagnostic_span(&partner, EditKind::Delete)
}

fn accessed_indices<L: Language>(
    model: &dyn SemanticModel<L>,
    lambda_body: &SyntaxNode<L>,
    captures: &[VariableCapture<L>],
) -> Vec<bool> {
    let accessed = model.accessed_captures(lambda_body);
    captures.iter().map(|c| accessed.contains(c)).collect()
}

/// Pairs of capture scopes accessed together by some lambda, in both orders.
type LinkedScopes<L> = FxHashSet<(Option<SyntaxNode<L>>, Option<SyntaxNode<L>>)>;

fn linked_scopes<'n, L: Language + 'n>(
    model: &dyn SemanticModel<L>,
    lambda_bodies: impl IntoIterator<Item = &'n SyntaxNode<L>>,
    captures: &[VariableCapture<L>],
    scopes: &[Option<SyntaxNode<L>>],
) -> LinkedScopes<L> {
    let mut linked = FxHashSet::default();
    for body in lambda_bodies {
        let accessed = accessed_indices(model, body, captures);
        let accessed_scopes: Vec<&Option<SyntaxNode<L>>> = accessed
            .iter()
            .zip(scopes)
            .filter(|(accessed, _)| **accessed)
            .map(|(_, scope)| scope)
            .collect();
        for first in &accessed_scopes {
            for second in &accessed_scopes {
                if first != second {
                    linked.insert(((*first).clone(), (*second).clone()));
                }
            }
        }
    }
    linked
}

enum MultiScopeEdit<'a, L: Language> {
    Insert,
    Delete {
        new_captures: &'a [VariableCapture<L>],
        reverse: &'a [Option<usize>],
        member_span: TextRange,
    },
}

/// A lambda that accesses captures declared in two different scopes links
/// their frames; it can be neither added nor removed unless another lambda
/// present in both versions links the same scopes.
fn report_multi_scope_capture<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    lambda_body: &Node<A>,
    model: &dyn SemanticModel<A::Language>,
    captures: &[VariableCapture<A::Language>],
    scopes: &[Option<Node<A>>],
    linked: &LinkedScopes<A::Language>,
    edit: MultiScopeEdit<'_, A::Language>,
) -> Option<RudeEditDiagnostic> {
    if captures.is_empty() {
        return None;
    }

    let adapter = ctx.adapter;
    let accessed = accessed_indices(model, lambda_body, captures);
    let hits: Vec<usize> = accessed.iter().enumerate().filter(|(_, a)| **a).map(|(i, _)| i).collect();
    let (first, second) = hits.iter().enumerate().find_map(|(k, &first)| {
        hits[k + 1..]
            .iter()
            .find(|&&second| {
                scopes[second] != scopes[first] && !linked.contains(&(scopes[first].clone(), scopes[second].clone()))
            })
            .map(|&second| (first, second))
    })?;

    let lambda = adapter.lambda_of_body(lambda_body).unwrap_or_else(|| lambda_body.clone());
    let (kind, span) = match edit {
        MultiScopeEdit::Insert => {
            let span = if captures[second].is_this() {
                adapter.diagnostic_span(&lambda, EditKind::Insert)
            } else {
                model
                    .capture_use_sites(std::slice::from_ref(lambda_body), &captures[second])
                    .first()
                    .copied()
                    .unwrap_or_else(|| adapter.diagnostic_span(&lambda, EditKind::Insert))
            };
            (RudeEditKind::InsertLambdaWithMultiScopeCapture, span)
        }
        MultiScopeEdit::Delete {
            new_captures,
            reverse,
            member_span,
        } => {
            let span = reverse
                .iter()
                .position(|old| *old == Some(second))
                .map(|new_index| capture_span(&new_captures[new_index], member_span))
                .unwrap_or(member_span);
            (RudeEditKind::DeleteLambdaWithMultiScopeCapture, span)
        }
    };

    Some(RudeEditDiagnostic::with_arguments(
        kind,
        span,
        [
            adapter.display_name(&lambda, EditKind::Update),
            captures[first].name().to_string(),
            captures[second].name().to_string(),
        ],
    ))
}
