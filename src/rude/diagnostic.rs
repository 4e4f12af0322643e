//! Rude edit diagnostics and their canonical ordering.

use std::fmt;

use super::{RudeEditCategory, RudeEditKind};
use crate::base::TextRange;

/// A rude edit found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RudeEditDiagnostic {
    pub kind: RudeEditKind,
    pub span: TextRange,
    pub arguments: Vec<String>,
}

impl RudeEditDiagnostic {
    pub fn new(kind: RudeEditKind, span: TextRange) -> Self {
        Self {
            kind,
            span,
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments<I, S>(kind: RudeEditKind, span: TextRange, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            span,
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn category(&self) -> RudeEditCategory {
        self.kind.category()
    }

    /// Render the kind's message template with this diagnostic's arguments.
    ///
    /// Placeholders without a matching argument are left in place.
    pub fn message(&self) -> String {
        let template = self.kind.message_template();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };

            match after[..close]
                .parse::<usize>()
                .ok()
                .and_then(|i| self.arguments.get(i))
            {
                Some(arg) => out.push_str(arg),
                None => out.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}

impl fmt::Display for RudeEditDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}..{}: {}",
            self.kind,
            u32::from(self.span.start()),
            u32::from(self.span.end()),
            self.message()
        )
    }
}

/// Sort into canonical order and drop exact duplicates.
///
/// Active statement diagnostics come first, then by span start, then kind.
pub fn sort_diagnostics(diagnostics: &mut Vec<RudeEditDiagnostic>) {
    diagnostics.sort_by(|a, b| {
        let a_active = a.category() != RudeEditCategory::ActiveStatement;
        let b_active = b.category() != RudeEditCategory::ActiveStatement;
        a_active
            .cmp(&b_active)
            .then(a.span.start().cmp(&b.span.start()))
            .then(a.kind.cmp(&b.kind))
            .then(a.span.end().cmp(&b.span.end()))
            .then_with(|| a.arguments.cmp(&b.arguments))
    });
    diagnostics.dedup();
}
