//! # encore-base
//!
//! Edit-and-continue analysis: decides whether a change to a running
//! program's source can be applied in place, and where its active
//! statements land in the new source.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! mini          → Reference language: lexer, parser, compilation, adapter
//!   ↓
//! analysis      → Document analyzer, active statements, semantic edits
//!   ↓
//! language      → LanguageAdapter trait, declaration bodies
//!   ↓
//! rude          → Rude edit kinds and diagnostics
//! capabilities  → Runtime edit capabilities
//!   ↓
//! semantic      → Symbols and the SemanticModel trait
//!   ↓
//! syntax        → Edit scripts, matches, sequence edits over rowan trees
//!   ↓
//! base          → Primitives (DocumentId, TextRange, SourceText, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → semantic → language → analysis)
// ============================================================================

/// Foundation types: DocumentId, TextRange, SourceText, line positions
pub mod base;

/// Edit scripts and tree matches, generic over a rowan language
pub mod syntax;

/// Symbols and the semantic model queried by the analyzer
pub mod semantic;

/// Capabilities of the runtime applying the edits
pub mod capabilities;

/// Rude edits: kinds, categories and diagnostics
pub mod rude;

/// The per-language adapter the analyzer is parameterized over
pub mod language;

/// Document analysis: the entry point of the crate
pub mod analysis;

/// The reference language wired through the analyzer
pub mod mini;

// Re-export the entry points
pub use analysis::{
    ActiveStatement, ActiveStatementFlags, AnalysisInput, AnalysisStatus, AnalyzerOptions, Cancelled,
    DocumentAnalysisResults, DocumentAnalyzer, DocumentSnapshot,
};
pub use capabilities::{CapabilityGrantor, EditCapabilities};
pub use language::LanguageAdapter;
pub use rude::{RudeEditDiagnostic, RudeEditKind};
pub use semantic::{SemanticModel, Symbol, SymbolKey};

// Re-export foundation types
pub use base::{DocumentId, LineIndex, LinePosition, LinePositionSpan, SourceText, TextRange, TextSize};
