//! Failures of a document analysis.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::base::TextRange;

/// Internal failure of an analysis stage.
///
/// Everything except [`AnalysisError::Cancelled`] is turned into a blocking
/// diagnostic at the document boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis was cancelled")]
    Cancelled,

    /// Too many top-level edits.
    #[error("source file is too big to analyze")]
    SourceFileTooBig { span: TextRange },

    /// A member body exceeds the node limit.
    #[error("member body is too big to analyze")]
    MemberBodyTooBig { span: TextRange },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AnalysisError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// The analysis was cancelled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("analysis was cancelled")]
pub struct Cancelled;

impl From<Cancelled> for AnalysisError {
    fn from(_: Cancelled) -> Self {
        AnalysisError::Cancelled
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

pub(crate) fn check_cancelled(token: &CancellationToken) -> AnalysisResult<()> {
    if token.is_cancelled() {
        Err(AnalysisError::Cancelled)
    } else {
        Ok(())
    }
}
