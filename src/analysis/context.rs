//! State shared by the stages of one document analysis.

use tokio_util::sync::CancellationToken;

use super::error::{AnalysisResult, check_cancelled};
use super::AnalyzerOptions;
use crate::base::{DocumentId, LinePositionSpan, SourceText, TextRange};
use crate::capabilities::{CapabilityTracker, EditCapabilities};
use crate::language::LanguageAdapter;
use crate::rude::{RudeEditDiagnostic, RudeEditKind};
use crate::semantic::SemanticModel;
use crate::syntax::{EditKind, SyntaxNode};

pub(crate) type Node<A> = SyntaxNode<<A as LanguageAdapter>::Language>;

pub(crate) struct AnalysisContext<'a, A: LanguageAdapter> {
    pub adapter: &'a A,
    pub options: &'a AnalyzerOptions,
    pub cancel: &'a CancellationToken,
    pub document: DocumentId,
    pub old_text: &'a SourceText,
    pub new_text: &'a SourceText,
    pub old_model: &'a dyn SemanticModel<A::Language>,
    pub new_model: &'a dyn SemanticModel<A::Language>,
    pub capabilities: CapabilityTracker<'a>,
}

impl<A: LanguageAdapter> AnalysisContext<'_, A> {
    pub fn check_cancelled(&self) -> AnalysisResult<()> {
        check_cancelled(self.cancel)
    }

    pub fn grant(&self, capabilities: EditCapabilities) -> bool {
        self.capabilities.grant(capabilities)
    }

    pub fn new_line_span(&self, range: TextRange) -> LinePositionSpan {
        self.new_text.lines().line_span(range)
    }

    pub fn old_range(&self, span: LinePositionSpan) -> Option<TextRange> {
        self.old_text.lines().text_range(span)
    }

    pub fn new_range(&self, span: LinePositionSpan) -> Option<TextRange> {
        self.new_text.lines().text_range(span)
    }

    /// Diagnostic at `node` with its display name as the only argument.
    pub fn node_diagnostic(
        &self,
        kind: RudeEditKind,
        node: &Node<A>,
        edit_kind: EditKind,
    ) -> RudeEditDiagnostic {
        RudeEditDiagnostic::with_arguments(
            kind,
            self.adapter.diagnostic_span(node, edit_kind),
            [self.adapter.display_name(node, edit_kind)],
        )
    }
}
