//! Editor tracking of active statement spans.
//!
//! While the user types, the editor keeps tracking spans that follow each
//! active statement. A tracked span is more precise than structural matching,
//! so the analyzer prefers it when it is plausible.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::{DocumentId, LinePositionSpan};

/// Source of tracked active statement spans, keyed by statement ordinal.
pub trait ActiveStatementTracking: Send + Sync {
    fn tracked_span(&self, document: DocumentId, ordinal: usize) -> Option<LinePositionSpan>;

    /// Record the relocated spans of a document after a successful analysis.
    fn update_spans(&self, document: DocumentId, spans: &[(usize, LinePositionSpan)]);
}

/// Tracking spans held in memory, shareable across concurrent analyses.
#[derive(Debug, Default)]
pub struct InMemoryTracking {
    spans: RwLock<FxHashMap<(DocumentId, usize), LinePositionSpan>>,
}

impl InMemoryTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_span(&self, document: DocumentId, ordinal: usize, span: LinePositionSpan) {
        self.spans.write().insert((document, ordinal), span);
    }

    /// Tracked spans of a document, ordered by ordinal.
    pub fn spans(&self, document: DocumentId) -> Vec<(usize, LinePositionSpan)> {
        let mut spans: Vec<_> = self
            .spans
            .read()
            .iter()
            .filter(|((doc, _), _)| *doc == document)
            .map(|((_, ordinal), span)| (*ordinal, *span))
            .collect();
        spans.sort_by_key(|(ordinal, _)| *ordinal);
        spans
    }

    pub fn clear(&self) {
        self.spans.write().clear();
    }
}

impl ActiveStatementTracking for InMemoryTracking {
    fn tracked_span(&self, document: DocumentId, ordinal: usize) -> Option<LinePositionSpan> {
        self.spans.read().get(&(document, ordinal)).copied()
    }

    fn update_spans(&self, document: DocumentId, spans: &[(usize, LinePositionSpan)]) {
        let mut map = self.spans.write();
        for (ordinal, span) in spans {
            map.insert((document, *ordinal), *span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_spans_overwrites() {
        let tracking = InMemoryTracking::new();
        let doc = DocumentId(1);
        tracking.set_span(doc, 0, LinePositionSpan::from_coords(1, 0, 1, 5));

        tracking.update_spans(
            doc,
            &[
                (0, LinePositionSpan::from_coords(2, 0, 2, 5)),
                (3, LinePositionSpan::from_coords(7, 1, 7, 2)),
            ],
        );

        assert_eq!(
            tracking.tracked_span(doc, 0),
            Some(LinePositionSpan::from_coords(2, 0, 2, 5))
        );
        assert_eq!(tracking.spans(doc).len(), 2);
        assert_eq!(tracking.tracked_span(DocumentId(2), 0), None);
    }
}
