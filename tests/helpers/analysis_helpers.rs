//! Helpers that run the analyzer over two versions of mini sources.

use encore::analysis::{ActiveStatementTracking, SemanticEditKind};
use encore::mini::{MiniAdapter, MiniLanguage, Project};
use encore::{
    ActiveStatement, ActiveStatementFlags, AnalysisInput, DocumentAnalysisResults, DocumentAnalyzer, DocumentId,
    AnalyzerOptions, EditCapabilities, LinePositionSpan, RudeEditKind, SourceText, TextRange, TextSize,
};
use tokio_util::sync::CancellationToken;

pub const PATH: &str = "test.mini";

/// Line span of the first occurrence of `needle` in `source`.
pub fn span_of(source: &str, needle: &str) -> LinePositionSpan {
    let start = source
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{source}"));
    let range = TextRange::at(TextSize::from(start as u32), TextSize::from(needle.len() as u32));
    SourceText::new(PATH, source).lines().line_span(range)
}

/// Active statement 0 at `needle`.
pub fn active_at(source: &str, needle: &str, flags: ActiveStatementFlags) -> ActiveStatement {
    ActiveStatement::new(0, span_of(source, needle), flags)
}

/// Configures one analysis of document 0 edited from `old` to `new`.
pub struct EditSession<'a> {
    pub old: &'a str,
    pub new: &'a str,
    pub active: Vec<ActiveStatement>,
    pub capabilities: EditCapabilities,
    pub tracking: Option<&'a dyn ActiveStatementTracking>,
    pub options: AnalyzerOptions,
}

impl<'a> EditSession<'a> {
    pub fn new(old: &'a str, new: &'a str) -> Self {
        Self {
            old,
            new,
            active: Vec::new(),
            capabilities: EditCapabilities::all(),
            tracking: None,
            options: AnalyzerOptions::default(),
        }
    }

    pub fn active(mut self, statement: ActiveStatement) -> Self {
        self.active.push(statement);
        self
    }

    pub fn capabilities(mut self, capabilities: EditCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn tracking(mut self, tracking: &'a dyn ActiveStatementTracking) -> Self {
        self.tracking = Some(tracking);
        self
    }

    pub fn options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn analyze(self) -> DocumentAnalysisResults<MiniLanguage> {
        let id = DocumentId::new(0);
        let old = Project::from_sources([(PATH, self.old)]);
        let new = old.with_text(id, self.new).expect("document 0 exists");
        let analyzer = DocumentAnalyzer::with_options(MiniAdapter::new(), self.options);
        let cancel = CancellationToken::new();
        run_analyzer(&analyzer, &old, &new, id, &self.active, self.capabilities, self.tracking, &cancel)
            .expect("analysis was not cancelled")
    }
}

/// Analyze document `id` between two projects with a fresh token.
pub fn analyze_projects(
    old: &Project,
    new: &Project,
    id: DocumentId,
    active: &[ActiveStatement],
    capabilities: EditCapabilities,
    tracking: Option<&dyn ActiveStatementTracking>,
) -> DocumentAnalysisResults<MiniLanguage> {
    try_analyze_projects(old, new, id, active, capabilities, tracking, &CancellationToken::new())
        .expect("analysis was not cancelled")
}

pub fn try_analyze_projects(
    old: &Project,
    new: &Project,
    id: DocumentId,
    active: &[ActiveStatement],
    capabilities: EditCapabilities,
    tracking: Option<&dyn ActiveStatementTracking>,
    cancel: &CancellationToken,
) -> Result<DocumentAnalysisResults<MiniLanguage>, encore::Cancelled> {
    let analyzer = DocumentAnalyzer::new(MiniAdapter::new());
    run_analyzer(&analyzer, old, new, id, active, capabilities, tracking, cancel)
}

#[allow(clippy::too_many_arguments)]
fn run_analyzer(
    analyzer: &DocumentAnalyzer<MiniAdapter>,
    old: &Project,
    new: &Project,
    id: DocumentId,
    active: &[ActiveStatement],
    capabilities: EditCapabilities,
    tracking: Option<&dyn ActiveStatementTracking>,
    cancel: &CancellationToken,
) -> Result<DocumentAnalysisResults<MiniLanguage>, encore::Cancelled> {
    let input = AnalysisInput {
        old_document: old.snapshot(id),
        old_model: old.compilation(),
        new_document: new.snapshot(id).expect("document in new project"),
        new_model: new.compilation(),
        old_active_statements: active,
        tracking,
        capabilities: &capabilities,
    };
    analyzer.analyze_document(input, cancel)
}

/// `(kind, symbol key)` of every semantic edit, in order.
pub fn semantic_edits(results: &DocumentAnalysisResults<MiniLanguage>) -> Vec<(SemanticEditKind, String)> {
    results
        .semantic_edits
        .iter()
        .map(|e| (e.kind, e.symbol.to_string()))
        .collect()
}

pub fn rude_kinds(results: &DocumentAnalysisResults<MiniLanguage>) -> Vec<RudeEditKind> {
    results.rude_edits.iter().map(|d| d.kind).collect()
}
