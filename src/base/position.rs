//! Line/column positions of active statements and exception regions.
//!
//! Debuggers report execution points as line spans, so every span that
//! leaves the analyzer is expressed in these terms. Lines and characters are
//! zero-based.

/// A position in source text (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinePosition {
    pub line: u32,
    pub character: u32,
}

/// A span between two line positions (end exclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinePositionSpan {
    pub start: LinePosition,
    pub end: LinePosition,
}

impl LinePosition {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl LinePositionSpan {
    pub const fn new(start: LinePosition, end: LinePosition) -> Self {
        Self { start, end }
    }

    /// Create a span from line/character coordinates
    pub const fn from_coords(
        start_line: u32,
        start_character: u32,
        end_line: u32,
        end_character: u32,
    ) -> Self {
        Self {
            start: LinePosition::new(start_line, start_character),
            end: LinePosition::new(end_line, end_character),
        }
    }

    /// The default span marks an active statement that could not be mapped.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: LinePosition) -> bool {
        self.start <= position && position <= self.end
    }

    /// Shift both ends by a number of lines.
    pub fn shift_lines(&self, delta: i64) -> Self {
        let shift = |line: u32| (i64::from(line) + delta).max(0) as u32;
        Self {
            start: LinePosition::new(shift(self.start.line), self.start.character),
            end: LinePosition::new(shift(self.end.line), self.end.character),
        }
    }
}

impl std::fmt::Display for LinePositionSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}
