//! Line-delta analysis of members whose syntax did not change.
//!
//! A member whose tokens only moved by whole lines keeps its compiled code;
//! the debugger is told how its sequence points shifted instead. A member
//! whose tokens moved within a line, or whose breakpoint spans straddle two
//! different line shifts, has to be recompiled.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::context::{AnalysisContext, Node};
use super::error::AnalysisResult;
use super::{SequencePointUpdates, SourceLineUpdate};
use crate::language::LanguageAdapter;
use crate::syntax::{Language, Match, SyntaxNode};

/// Run of consecutive active tokens of one member moved by the same number of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    member: usize,
    old_start_line: u32,
    old_end_line: u32,
    delta: i64,
}

impl Segment {
    fn new_start_line(&self) -> u32 {
        (i64::from(self.old_start_line) + self.delta).max(0) as u32
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TriviaAnalysis<L: Language> {
    /// Unedited member pairs that still need recompilation, in tree order.
    pub requires_update: Vec<(SyntaxNode<L>, SyntaxNode<L>)>,
    pub line_edits: Vec<SequencePointUpdates>,
}

/// Compare debug positions of every matched member not in `edited`.
pub(crate) fn analyze_trivia<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    top_match: &Match<A::Language>,
    edited: &FxHashSet<Node<A>>,
) -> AnalysisResult<TriviaAnalysis<A::Language>> {
    let adapter = ctx.adapter;
    let mut members: Vec<(Node<A>, Node<A>)> = Vec::new();
    let mut requires_update = Vec::new();
    let mut segments = Vec::new();

    for (old, new) in top_match.pairs_in_order() {
        ctx.check_cancelled()?;
        if edited.contains(&new)
            || !adapter.is_member_declaration(&new)
            || adapter.is_type_declaration(&new)
            || adapter.declaration_body(&new).is_none()
        {
            continue;
        }

        let member = members.len();
        members.push((old.clone(), new.clone()));
        match member_segments(ctx, &old, &new, member)? {
            Some(member_segments) => segments.extend(member_segments),
            None => requires_update.push(member),
        }
    }

    segments.sort_by_key(|s| (s.old_start_line, s.member));

    let mut line_updates = Vec::new();
    let mut current_delta = 0;
    let mut previous: Option<Segment> = None;

    for segment in segments {
        if requires_update.contains(&segment.member) {
            continue;
        }
        if let Some(previous) = previous {
            let overlaps = segment.old_start_line <= previous.old_end_line;
            if overlaps && segment.delta != previous.delta {
                trace!(
                    "[TRIVIA] segment at line {} conflicts with line {}",
                    segment.old_start_line,
                    previous.old_start_line
                );
                requires_update.push(segment.member);
                continue;
            }
        }
        if segment.delta != current_delta {
            line_updates.push(SourceLineUpdate::new(segment.old_start_line, segment.new_start_line()));
            current_delta = segment.delta;
        }
        previous = Some(segment);
    }

    requires_update.sort_unstable();
    requires_update.dedup();

    let line_edits = if line_updates.is_empty() {
        Vec::new()
    } else {
        vec![SequencePointUpdates {
            file: ctx.new_text.path().clone(),
            line_updates,
        }]
    };

    trace!(
        "[TRIVIA] {} members need recompilation, {} line edits",
        requires_update.len(),
        line_edits.len()
    );

    Ok(TriviaAnalysis {
        requires_update: requires_update.into_iter().map(|i| members[i].clone()).collect(),
        line_edits,
    })
}

/// Segments of one member, or `None` if it must be recompiled.
fn member_segments<A: LanguageAdapter>(
    ctx: &AnalysisContext<'_, A>,
    old: &Node<A>,
    new: &Node<A>,
    member: usize,
) -> AnalysisResult<Option<Vec<Segment>>> {
    let adapter = ctx.adapter;
    let old_tokens = adapter.active_tokens(old);
    let new_tokens = adapter.active_tokens(new);
    if old_tokens.len() != new_tokens.len() {
        return Ok(None);
    }

    let old_lines = ctx.old_text.lines();
    let new_lines = ctx.new_text.lines();
    let mut segments: Vec<Segment> = Vec::new();

    for (old_token, new_token) in old_tokens.iter().zip(&new_tokens) {
        ctx.check_cancelled()?;
        let old_position = old_lines.line_position(old_token.text_range().start());
        let new_position = new_lines.line_position(new_token.text_range().start());
        if old_position.character != new_position.character {
            return Ok(None);
        }

        let delta = i64::from(new_position.line) - i64::from(old_position.line);
        match segments.last_mut() {
            Some(last) if last.delta == delta => last.old_end_line = old_position.line,
            Some(_) => {
                // The breakpoint span around the first moved token must not
                // reach back into the previous segment.
                let start = new_token.text_range().start();
                let straddles = adapter
                    .enclosing_breakpoint_span(&root_of(new), start)
                    .is_some_and(|span| span.start() < start);
                if straddles {
                    return Ok(None);
                }
                segments.push(Segment {
                    member,
                    old_start_line: old_position.line,
                    old_end_line: old_position.line,
                    delta,
                });
            }
            None => segments.push(Segment {
                member,
                old_start_line: old_position.line,
                old_end_line: old_position.line,
                delta,
            }),
        }
    }

    Ok(Some(segments))
}

fn root_of<L: Language>(node: &SyntaxNode<L>) -> SyntaxNode<L> {
    node.ancestors().last().unwrap_or_else(|| node.clone())
}
