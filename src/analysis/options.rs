//! Analyzer limits.

/// Resource limits of a document analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// An edit script longer than this makes the document too big to analyze.
    pub max_top_level_edits: usize,
    /// A member body with more nodes than this is too big to match.
    pub max_body_nodes: usize,
    /// Upper bound on symbols sharing one declaration body.
    pub max_co_declared_symbols: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_top_level_edits: 10_000,
            max_body_nodes: 50_000,
            max_co_declared_symbols: 8,
        }
    }
}
