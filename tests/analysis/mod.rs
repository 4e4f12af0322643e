//! End-to-end analyzer tests over the mini language
//!
//! - Document-level outcomes: unchanged, syntax and semantic errors,
//!   cancellation, added documents, line edits
//! - Declaration edits and the semantic edits they produce
//! - Runtime capabilities
//! - Active statement relocation and the rude edits around them
//! - Scenarios: renames, constants, struct layout, trivia, captures

pub mod tests_active_statements;
pub mod tests_capabilities;
pub mod tests_declarations;
pub mod tests_documents;
pub mod tests_scenarios;
