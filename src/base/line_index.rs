//! Offset ↔ line/character conversion.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::position::{LinePosition, LinePositionSpan};

/// Start offsets of every line in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line/character of an offset. Offsets past the end clamp to the end.
    pub fn line_position(&self, offset: TextSize) -> LinePosition {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let character = offset - self.line_starts[line];
        LinePosition::new(line as u32, u32::from(character))
    }

    pub fn line_span(&self, range: TextRange) -> LinePositionSpan {
        LinePositionSpan::new(
            self.line_position(range.start()),
            self.line_position(range.end()),
        )
    }

    /// Offset of a line position, or `None` when the line is out of range.
    pub fn offset(&self, position: LinePosition) -> Option<TextSize> {
        let start = *self.line_starts.get(position.line as usize)?;
        Some((start + TextSize::from(position.character)).min(self.len))
    }

    /// Text range of a line span, or `None` when it lies outside the text.
    pub fn text_range(&self, span: LinePositionSpan) -> Option<TextRange> {
        let start = self.offset(span.start)?;
        let end = self.offset(span.end)?;
        (start <= end).then(|| TextRange::new(start, end))
    }
}

/// A document's text with its line index and the file it maps to.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    lines: LineIndex,
    path: SmolStr,
}

impl SourceText {
    pub fn new(path: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineIndex::new(&text);
        Self {
            text,
            lines,
            path: path.into(),
        }
    }

    pub fn empty(path: impl Into<SmolStr>) -> Self {
        Self::new(path, String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn path(&self) -> &SmolStr {
        &self.path
    }

    pub fn content_equals(&self, other: &SourceText) -> bool {
        self.text == other.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(3, 0, 3)]
    #[case(4, 1, 0)]
    #[case(6, 1, 2)]
    #[case(9, 2, 0)]
    fn test_line_position(#[case] offset: u32, #[case] line: u32, #[case] character: u32) {
        let index = LineIndex::new("abc\nde\n\nx");
        assert_eq!(
            index.line_position(TextSize::from(offset)),
            LinePosition::new(line, character)
        );
    }

    #[test]
    fn test_text_range_round_trip() {
        let index = LineIndex::new("fn f() {\n    g();\n}\n");
        let span = LinePositionSpan::from_coords(1, 4, 1, 7);
        let range = index.text_range(span).unwrap();
        assert_eq!(range, TextRange::new(13.into(), 16.into()));
        assert_eq!(index.line_span(range), span);
    }

    #[test]
    fn test_out_of_range_line() {
        let index = LineIndex::new("a\nb");
        assert_eq!(index.offset(LinePosition::new(5, 0)), None);
    }
}
