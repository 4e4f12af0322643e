//! # Document Analysis
//!
//! Compares two versions of a document and decides whether the running
//! process can absorb the change.
//!
//! ## Phases
//!
//! ```text
//! top-level edits  → member edits (normalized)
//!   ↓
//! syntax phase     → body matches, active statements, exception regions
//!   ↓                (any rude edit blocks the document here)
//! semantic phase   → symbol shapes, captures, trivia, semantic edits
//! ```
//!
//! ## Key Types
//!
//! - [`DocumentAnalyzer`] - Entry point, one call per document
//! - [`AnalysisInput`] - Both versions of a document and their models
//! - [`DocumentAnalysisResults`] - Edits, diagnostics and relocated statements
//! - [`ActiveStatementTracking`] - Editor-tracked spans of active statements

mod active;
mod body_match;
mod classifier;
mod closures;
mod context;
mod error;
mod exception_regions;
mod initializers;
mod input;
mod layout;
mod members;
mod options;
mod results;
mod semantic_edits;
mod tracking;
mod trivia;

pub use error::{AnalysisError, AnalysisResult, Cancelled};
pub use exception_regions::get_exception_regions;
pub use input::{AnalysisInput, DocumentSnapshot};
pub use options::AnalyzerOptions;
pub use results::{
    ActiveStatement, ActiveStatementFlags, AnalysisStatus, DocumentAnalysisResults,
    ExceptionRegions, InstructionId, SemanticEditInfo, SemanticEditKind, SequencePointUpdates,
    SourceLineUpdate, SyntaxMap,
};
pub use tracking::{ActiveStatementTracking, InMemoryTracking};

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::base::{SourceText, TextRange};
use crate::capabilities::CapabilityTracker;
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind, sort_diagnostics};
use crate::syntax::{EditKind, EditMap, token_at};

use active::{
    ActiveStatementSlots, analyze_body_presence_change, analyze_changed_member_body,
    analyze_deleted_member, map_unchanged_document, update_unedited_spans,
};
use context::{AnalysisContext, Node};
use members::normalize_member_edits;
use semantic_edits::{SemanticInput, analyze_semantics};
use trivia::analyze_trivia;

/// Analyzes documents of one language.
///
/// The analyzer holds no per-document state; one instance can serve
/// concurrent analyses of independent documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer<A> {
    adapter: A,
    options: AnalyzerOptions,
}

impl<A: LanguageAdapter> DocumentAnalyzer<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            options: AnalyzerOptions::default(),
        }
    }

    pub fn with_options(adapter: A, options: AnalyzerOptions) -> Self {
        Self { adapter, options }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze one document.
    ///
    /// Internal failures become a single blocking diagnostic; only
    /// cancellation is reported as an error.
    pub fn analyze_document(
        &self,
        input: AnalysisInput<'_, A::Language>,
        cancel: &CancellationToken,
    ) -> Result<DocumentAnalysisResults<A::Language>, Cancelled> {
        let start = Instant::now();
        let document = input.new_document.id;
        debug!(
            "[ANALYZE] document {:?}: start, {} active statements",
            document,
            input.old_active_statements.len()
        );

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        if input.new_document.has_syntax_errors {
            debug!("[ANALYZE] document {:?}: syntax errors", document);
            return Ok(DocumentAnalysisResults::syntax_errors(document));
        }

        let empty_text = SourceText::empty(input.new_document.text.path().clone());
        let old_text = input.old_document.as_ref().map_or(&empty_text, |d| d.text);
        let ctx = AnalysisContext {
            adapter: &self.adapter,
            options: &self.options,
            cancel,
            document,
            old_text,
            new_text: input.new_document.text,
            old_model: input.old_model,
            new_model: input.new_model,
            capabilities: CapabilityTracker::new(input.capabilities),
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| self.analyze(&ctx, &input)));
        let outcome = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(AnalysisError::internal(message))
            }
        };

        let mut results = match outcome {
            Ok(results) => results,
            Err(AnalysisError::Cancelled) => {
                debug!("[ANALYZE] document {:?}: cancelled", document);
                return Err(Cancelled);
            }
            Err(error) => {
                warn!("[ANALYZE] document {:?}: {}", document, error);
                let diagnostic = self.failure_diagnostic(&ctx, &input, &error);
                DocumentAnalysisResults::blocked(document, vec![diagnostic], input.old_active_statements.to_vec())
            }
        };

        results.elapsed = start.elapsed();
        results.required_capabilities = ctx.capabilities.requested();
        debug!(
            "[ANALYZE] document {:?}: {:?}, {} rude edits, {} semantic edits, {} line edits in {:?}",
            document,
            results.status,
            results.rude_edits.len(),
            results.semantic_edits.len(),
            results.line_edits.len(),
            results.elapsed
        );
        Ok(results)
    }

    fn failure_diagnostic(
        &self,
        ctx: &AnalysisContext<'_, A>,
        input: &AnalysisInput<'_, A::Language>,
        error: &AnalysisError,
    ) -> RudeEditDiagnostic {
        let path = ctx.new_text.path().to_string();
        match error {
            AnalysisError::SourceFileTooBig { span } => {
                RudeEditDiagnostic::with_arguments(RudeEditKind::SourceFileTooBig, *span, [path])
            }
            AnalysisError::MemberBodyTooBig { span } => {
                let root = &input.new_document.root;
                let name = token_at(root, span.start())
                    .and_then(|t| t.parent())
                    .and_then(|n| self.adapter.containing_declaration(&n))
                    .map_or(path, |d| self.adapter.display_name(&d, EditKind::Update));
                RudeEditDiagnostic::with_arguments(RudeEditKind::MemberBodyTooBig, *span, [name])
            }
            AnalysisError::Internal { message } => RudeEditDiagnostic::with_arguments(
                RudeEditKind::InternalError,
                TextRange::default(),
                [path, message.clone()],
            ),
            AnalysisError::Cancelled => RudeEditDiagnostic::new(RudeEditKind::InternalError, TextRange::default()),
        }
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_, A>,
        input: &AnalysisInput<'_, A::Language>,
    ) -> AnalysisResult<DocumentAnalysisResults<A::Language>> {
        let adapter = &self.adapter;
        let document = input.new_document.id;
        let new_root = &input.new_document.root;
        let old_root = match &input.old_document {
            Some(old) => old.root.clone(),
            None => adapter.empty_compilation_unit(),
        };
        let mut slots = ActiveStatementSlots::new(ctx, input.old_active_statements);

        if let Some(old) = &input.old_document {
            if old.text.content_equals(input.new_document.text) {
                map_unchanged_document(ctx, new_root, &mut slots)?;
                let (statements, regions) = slots.finish();
                debug!("[ANALYZE] document {:?}: text unchanged", document);
                return Ok(DocumentAnalysisResults::unchanged(document, statements, regions));
            }
        }

        // ====================================================================
        // Syntax phase
        // ====================================================================

        ctx.check_cancelled()?;
        let script = adapter.compute_top_level_edits(&old_root, new_root);
        if script.len() > ctx.options.max_top_level_edits {
            return Err(AnalysisError::SourceFileTooBig {
                span: new_root.text_range(),
            });
        }

        let edit_map = EditMap::build(&script, |n| adapter.is_global_statement(n));
        let member_edits = normalize_member_edits(adapter, &script, &edit_map);
        debug!(
            "[ANALYZE] document {:?}: {} top-level edits, {} member edits",
            document,
            script.len(),
            member_edits.len()
        );

        let mut diagnostics = Vec::new();
        for edit in &script.edits {
            ctx.check_cancelled()?;
            diagnostics.extend(adapter.report_syntactic_rude_edits(edit, &edit_map));
        }

        let mut updated_members = IndexMap::new();
        for edit in &member_edits {
            ctx.check_cancelled()?;
            match (edit.kind, &edit.old_node, &edit.new_node) {
                (EditKind::Update, Some(old), Some(new)) if !adapter.is_type_declaration(new) => {
                    match (adapter.declaration_body(old), adapter.declaration_body(new)) {
                        (Some(old_body), Some(new_body)) => {
                            let (info, member_diagnostics) = analyze_changed_member_body(
                                ctx,
                                input.tracking,
                                old,
                                new,
                                old_body,
                                new_body,
                                &mut slots,
                            )?;
                            diagnostics.extend(member_diagnostics);
                            updated_members.insert(new.clone(), info);
                        }
                        (None, Some(_)) if !adapter.is_declaration_with_initializer(new) => {
                            diagnostics.extend(analyze_body_presence_change(
                                ctx,
                                old,
                                new,
                                RudeEditKind::MethodBodyAdd,
                                &mut slots,
                            ));
                        }
                        (Some(old_body), None) => {
                            if adapter.is_declaration_with_initializer(old) {
                                diagnostics.extend(analyze_deleted_member(
                                    ctx,
                                    &script.top_match,
                                    old,
                                    &old_body,
                                    &mut slots,
                                ));
                            } else {
                                diagnostics.extend(analyze_body_presence_change(
                                    ctx,
                                    old,
                                    new,
                                    RudeEditKind::MethodBodyDelete,
                                    &mut slots,
                                ));
                            }
                        }
                        _ => {}
                    }
                }
                (EditKind::Delete, Some(old), _) => {
                    for declaration in deleted_bodies(adapter, old) {
                        if let Some(old_body) = adapter.declaration_body(&declaration) {
                            diagnostics.extend(analyze_deleted_member(
                                ctx,
                                &script.top_match,
                                &declaration,
                                &old_body,
                                &mut slots,
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        update_unedited_spans(ctx, input.tracking, &script.top_match, &mut slots)?;

        if !diagnostics.is_empty() {
            sort_diagnostics(&mut diagnostics);
            debug!(
                "[ANALYZE] document {:?}: {} syntactic rude edits",
                document,
                diagnostics.len()
            );
            return Ok(DocumentAnalysisResults::blocked(
                document,
                diagnostics,
                input.old_active_statements.to_vec(),
            ));
        }

        // ====================================================================
        // Semantic phase
        // ====================================================================

        if input.new_model.has_errors() {
            debug!("[ANALYZE] document {:?}: semantic errors", document);
            let (active_statements, exception_regions) = slots.finish();
            return Ok(DocumentAnalysisResults {
                active_statements,
                exception_regions,
                has_semantic_errors: true,
                ..DocumentAnalysisResults::empty(document, AnalysisStatus::Changed)
            });
        }

        // Moved and reordered members keep their code; only their lines shift.
        let edited: FxHashSet<Node<A>> = member_edits
            .iter()
            .filter(|e| !matches!(e.kind, EditKind::Move | EditKind::Reorder))
            .filter_map(|e| e.new_node.clone())
            .chain(updated_members.keys().cloned())
            .collect();
        let trivia = analyze_trivia(ctx, &script.top_match, &edited)?;

        let semantic = analyze_semantics(
            ctx,
            &SemanticInput {
                top_match: &script.top_match,
                edit_map: &edit_map,
                member_edits: &member_edits,
                updated_members: &updated_members,
                trivia_updates: &trivia.requires_update,
                slots: &slots,
            },
        )?;

        if !semantic.diagnostics.is_empty() {
            let mut diagnostics = semantic.diagnostics;
            sort_diagnostics(&mut diagnostics);
            return Ok(DocumentAnalysisResults::blocked(
                document,
                diagnostics,
                input.old_active_statements.to_vec(),
            ));
        }

        let (active_statements, exception_regions) = slots.finish();
        if let Some(tracking) = input.tracking {
            let spans: Vec<_> = active_statements.iter().map(|s| (s.ordinal, s.span)).collect();
            tracking.update_spans(document, &spans);
        }

        Ok(DocumentAnalysisResults {
            active_statements,
            exception_regions,
            semantic_edits: semantic.edits,
            line_edits: trivia.line_edits,
            ..DocumentAnalysisResults::empty(document, AnalysisStatus::Changed)
        })
    }
}

/// Declarations with bodies removed by deleting `old`.
fn deleted_bodies<A: LanguageAdapter>(adapter: &A, old: &Node<A>) -> Vec<Node<A>> {
    old.descendants()
        .filter(|n| adapter.is_member_declaration(n) && !adapter.is_type_declaration(n))
        .collect()
}
