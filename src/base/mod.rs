//! Foundation types for the encore analyzer.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentId`] - Document identifiers assigned by the caller
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`], [`SourceText`] - Line/character conversion
//! - [`LinePosition`], [`LinePositionSpan`] - Debugger-facing positions
//!
//! This module has NO dependencies on other encore modules.

mod line_index;
mod position;

pub use line_index::{LineIndex, SourceText};
pub use position::{LinePosition, LinePositionSpan};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};

/// Identifies a document within a project snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u32);

impl DocumentId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}
