//! Exception handling regions around active statements.

use crate::base::{LineIndex, LinePositionSpan, SourceText, TextRange};
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::syntax::{EditKind, Match, SyntaxNode, token_at};

use super::ExceptionRegions;

type Node<A> = SyntaxNode<<A as LanguageAdapter>::Language>;

/// Regions of an active statement at `span` in `root`.
///
/// Returns empty regions when the span does not lie within the text.
pub fn get_exception_regions<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    text: &SourceText,
    root: &Node<A>,
    span: LinePositionSpan,
    is_non_leaf: bool,
) -> ExceptionRegions {
    let Some(range) = text.lines().text_range(span) else {
        return ExceptionRegions::default();
    };
    let Some(node) = token_at(root, range.start()).and_then(|t| t.parent()) else {
        return ExceptionRegions::default();
    };

    let ancestors = adapter.exception_handling_ancestors(&node, is_non_leaf);
    regions_of_ancestors(adapter, text.lines(), &ancestors)
}

/// Walk handler ancestors innermost first; stop after the first region that
/// covers everything nested in it.
pub(crate) fn regions_of_ancestors<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    lines: &LineIndex,
    ancestors: &[Node<A>],
) -> ExceptionRegions {
    let mut regions = ExceptionRegions::default();

    for ancestor in ancestors {
        let (range, covers_all): (TextRange, bool) = adapter.exception_handling_region(ancestor);
        regions.spans.push(lines.line_span(range));
        if covers_all {
            regions.is_active_statement_covered = true;
            break;
        }
    }

    regions
}

/// Rude edits in the chain of exception handlers around an active statement.
///
/// The chains are aligned through `body_match`; an added, removed or changed
/// handler blocks the edit.
pub(crate) fn report_exception_handling_edits<A: LanguageAdapter + ?Sized>(
    adapter: &A,
    body_match: &Match<A::Language>,
    old_ancestors: &[Node<A>],
    new_ancestors: &[Node<A>],
    new_statement_span: TextRange,
) -> Vec<RudeEditDiagnostic> {
    let mut diagnostics = Vec::new();

    for edit in body_match.sequence_edits(old_ancestors, new_ancestors) {
        match edit.kind {
            EditKind::Update => {
                let (Some(old_index), Some(new_index)) = (edit.old_index, edit.new_index) else {
                    continue;
                };
                let old = &old_ancestors[old_index];
                let new = &new_ancestors[new_index];
                if !adapter.are_exception_clauses_equivalent(old, new) {
                    diagnostics.push(RudeEditDiagnostic::with_arguments(
                        RudeEditKind::UpdateAroundActiveStatement,
                        adapter.diagnostic_span(new, EditKind::Update),
                        [adapter.display_name(new, EditKind::Update)],
                    ));
                }
            }
            EditKind::Insert => {
                let Some(new_index) = edit.new_index else {
                    continue;
                };
                let new = &new_ancestors[new_index];
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::InsertAroundActiveStatement,
                    adapter.diagnostic_span(new, EditKind::Insert),
                    [adapter.display_name(new, EditKind::Insert)],
                ));
            }
            EditKind::Delete => {
                let Some(old_index) = edit.old_index else {
                    continue;
                };
                let old = &old_ancestors[old_index];
                diagnostics.push(RudeEditDiagnostic::with_arguments(
                    RudeEditKind::DeleteAroundActiveStatement,
                    new_statement_span,
                    [adapter.display_name(old, EditKind::Delete)],
                ));
            }
            EditKind::Move | EditKind::Reorder => {}
        }
    }

    diagnostics
}
