//! Tree matching for mini documents.
//!
//! Two matchers are provided:
//!
//! - [`match_top_level`] pairs declarations and top-level statements of two
//!   documents and derives the edit script the analyzer starts from.
//! - [`match_body`] pairs the nodes of two bodies of the same member.

mod body;
mod top_level;

#[cfg(test)]
mod tests;

pub use body::match_body;
pub use top_level::match_top_level;

use super::ast::compact_text;
use super::syntax_kind::{SyntaxKind, SyntaxNode};
use smol_str::SmolStr;

/// Node kind and significant text.
fn fingerprint(node: &SyntaxNode) -> (SyntaxKind, SmolStr) {
    (node.kind(), compact_text(node))
}
