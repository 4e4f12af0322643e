//! Longest-common-subsequence edits of two sequences.

use std::hash::Hash;

use similar::{Algorithm, DiffTag, capture_diff_slices};

use super::EditKind;

/// One step of a sequence diff.
///
/// `Update` pairs equal elements; `Insert` only carries a new index and
/// `Delete` only an old index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEdit {
    pub kind: EditKind,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
}

impl SequenceEdit {
    fn update(old_index: usize, new_index: usize) -> Self {
        Self {
            kind: EditKind::Update,
            old_index: Some(old_index),
            new_index: Some(new_index),
        }
    }

    fn insert(new_index: usize) -> Self {
        Self {
            kind: EditKind::Insert,
            old_index: None,
            new_index: Some(new_index),
        }
    }

    fn delete(old_index: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            old_index: Some(old_index),
            new_index: None,
        }
    }
}

/// Compute LCS edits between `old` and `new`, in sequence order.
pub fn sequence_edits<T: Hash + Eq + Ord>(old: &[T], new: &[T]) -> Vec<SequenceEdit> {
    let mut edits = Vec::new();

    for op in capture_diff_slices(Algorithm::Lcs, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                edits.extend(old_range.zip(new_range).map(|(o, n)| SequenceEdit::update(o, n)));
            }
            DiffTag::Delete => edits.extend(old_range.map(SequenceEdit::delete)),
            DiffTag::Insert => edits.extend(new_range.map(SequenceEdit::insert)),
            DiffTag::Replace => {
                edits.extend(old_range.map(SequenceEdit::delete));
                edits.extend(new_range.map(SequenceEdit::insert));
            }
        }
    }

    edits
}
