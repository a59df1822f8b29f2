use std::fmt;

/// A span of source text.
///
/// `start` and `end` are character offsets into the source, `line` and `col`
/// point at the first character of the span. Tokens which are not backed by
/// source text (the end-of-file marker) use [`Position::EOF`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    start: isize,
    end: isize,
    line: isize,
    col: isize,
}

impl Position {
    pub const EOF: Position = Position::new(-1, -1, -1, -1);

    pub const fn new(start: isize, end: isize, line: isize, col: isize) -> Self {
        Self { start, end, line, col }
    }

    /// The span of a single character token, where `start == end`.
    pub const fn from_single(pos: isize, line: isize, col: isize) -> Self {
        Self::new(pos, pos, line, col)
    }

    /// Covers everything from the start of `first` to the end of `last`,
    /// anchored at the line and column of `first`.
    pub fn span(first: Position, last: Position) -> Self {
        Self::new(first.start, last.end, first.line, first.col)
    }

    pub fn start(&self) -> isize {
        self.start
    }

    pub fn end(&self) -> isize {
        self.end
    }

    pub fn line(&self) -> isize {
        self.line
    }

    pub fn col(&self) -> isize {
        self.col
    }

    pub fn is_eof(&self) -> bool {
        *self == Self::EOF
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::EOF
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_eof() {
            write!(f, "end of file")
        } else {
            write!(f, "line {}, column {}", self.line, self.col)
        }
    }
}
