//! Rude edits: the edits a running process cannot absorb.

mod diagnostic;
mod kind;

pub use diagnostic::{RudeEditDiagnostic, sort_diagnostics};
pub use kind::{RudeEditCategory, RudeEditKind};

#[cfg(test)]
mod tests;
