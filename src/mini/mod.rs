//! # Mini
//!
//! A small C#-flavoured language wired into the analyzer end to end: a
//! `logos` lexer, a lossless `rowan` parser, a multi-document semantic model
//! and the matchers behind [`MiniAdapter`].
//!
//! ```text
//! source ─► Lexer ─► parse ─► SyntaxNode ─┬─► Compilation (SemanticModel)
//!                                         └─► MiniAdapter (LanguageAdapter)
//! ```
//!
//! [`Project`] keeps parsed documents and their compilation together so
//! two versions of a program can be handed to a
//! [`DocumentAnalyzer`](crate::analysis::DocumentAnalyzer).

mod adapter;
pub mod ast;
mod body;
mod lexer;
mod matcher;
mod parser;
mod project;
mod semantic;
mod syntax_kind;

pub use adapter::MiniAdapter;
pub use lexer::{Lexer, Token};
pub use matcher::{match_body, match_top_level};
pub use parser::{Parse, SyntaxError, parse};
pub use project::{MiniDocument, Project};
pub use semantic::{Compilation, ENTRY_POINT_KEY, SemanticError};
pub use syntax_kind::{MiniLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
