//! Source coordinates and the line/token primitives every parser builds on.
//!
//! Lines and columns are zero-based; columns are byte offsets into the line.

use serde::Serialize;

/// A zero-based line/column location in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A span between two positions; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering `start..end` columns of a single line.
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `position` falls inside the range, end inclusive (cursor semantics).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A contiguous run of non-whitespace text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestToken {
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl QuestToken {
    pub fn new(value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            value: value.into(),
            line,
            column,
        }
    }

    pub fn range(&self) -> Range {
        Range::on_line(self.line, self.column, self.column + self.value.len())
    }
}

/// One line of a document together with its zero-based line number.
#[derive(Debug, Clone, Copy)]
pub struct TextLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> TextLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }

    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.trimmed().starts_with('-')
    }

    /// Byte offset of the first non-whitespace character (line length when blank).
    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }

    /// Range of the line without its leading and trailing whitespace.
    pub fn trimmed_range(&self) -> Range {
        let start = self.indent();
        Range::on_line(self.number, start, start + self.trimmed().len())
    }

    pub fn full_range(&self) -> Range {
        Range::on_line(self.number, 0, self.text.len())
    }

    /// Token for the trimmed text of the whole line.
    pub fn trimmed_token(&self) -> QuestToken {
        QuestToken::new(self.trimmed(), self.number, self.indent())
    }

    /// Token for `slice`, which must be a sub-slice of this line's text.
    pub fn token_for(&self, slice: &str) -> QuestToken {
        let column = slice.as_ptr() as usize - self.text.as_ptr() as usize;
        QuestToken::new(slice, self.number, column)
    }

    /// Whitespace-delimited words with their columns.
    pub fn words(&self) -> Vec<QuestToken> {
        let mut words = Vec::new();
        let mut start = None;
        for (idx, ch) in self.text.char_indices() {
            match (ch.is_whitespace(), start) {
                (true, Some(begin)) => {
                    words.push(QuestToken::new(&self.text[begin..idx], self.number, begin));
                    start = None;
                },
                (false, None) => start = Some(idx),
                _ => {},
            }
        }
        if let Some(begin) = start {
            words.push(QuestToken::new(&self.text[begin..], self.number, begin));
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_carry_their_columns() {
        let line = TextLine::new(3, "  start timer\t_clock_ ");
        let words = line.words();
        let found: Vec<(&str, usize)> = words.iter().map(|w| (w.value.as_str(), w.column)).collect();
        assert_eq!(found, vec![("start", 2), ("timer", 8), ("_clock_", 14)]);
        assert_eq!(words[2].range(), Range::on_line(3, 14, 21));
    }

    #[test]
    fn trimmed_range_skips_surrounding_whitespace() {
        let line = TextLine::new(0, "   end quest   ");
        assert_eq!(line.trimmed_range(), Range::on_line(0, 3, 12));
        assert_eq!(line.trimmed_token().value, "end quest");
    }

    #[test]
    fn comment_and_blank_detection() {
        assert!(TextLine::new(0, "   ").is_blank());
        assert!(TextLine::new(0, "  -- note").is_comment());
        assert!(!TextLine::new(0, "Message: 10").is_comment());
    }

    #[test]
    fn range_containment_and_union() {
        let outer = Range::new(Position::new(1, 0), Position::new(4, 3));
        let inner = Range::on_line(2, 5, 9);
        assert!(outer.contains_range(&inner));
        assert!(!inner.contains_range(&outer));
        assert!(outer.contains(Position::new(4, 3)));
        assert_eq!(inner.union(&Range::on_line(2, 1, 4)), Range::on_line(2, 1, 9));
    }
}
