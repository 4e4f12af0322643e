//! Inputs of a document analysis.

use super::{ActiveStatement, ActiveStatementTracking};
use crate::base::{DocumentId, SourceText};
use crate::capabilities::CapabilityGrantor;
use crate::semantic::SemanticModel;
use crate::syntax::{Language, SyntaxNode};

/// One version of a document.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot<'a, L: Language> {
    pub id: DocumentId,
    pub text: &'a SourceText,
    pub root: SyntaxNode<L>,
    pub has_syntax_errors: bool,
}

/// Everything the analyzer needs to compare two versions of a document.
pub struct AnalysisInput<'a, L: Language> {
    /// `None` when the document was added.
    pub old_document: Option<DocumentSnapshot<'a, L>>,
    pub old_model: &'a dyn SemanticModel<L>,
    pub new_document: DocumentSnapshot<'a, L>,
    pub new_model: &'a dyn SemanticModel<L>,
    /// Active statements of this document, as reported against the old version.
    pub old_active_statements: &'a [ActiveStatement],
    pub tracking: Option<&'a dyn ActiveStatementTracking>,
    pub capabilities: &'a dyn CapabilityGrantor,
}
