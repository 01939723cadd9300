use std::fmt;
use std::sync::Arc;

/// Snapshot of a position in a source file.
///
/// `line` and `column` are zero-based; `index` is the byte offset into the
/// source text. The `Display` form is the one-based `file:line:col` used in
/// error messages and in the comments of the generated assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Location {
    /// Start of `file`.
    pub fn start(file: impl Into<Arc<str>>) -> Self {
        Location {
            file: file.into(),
            line: 0,
            column: 0,
            index: 0,
        }
    }

    pub fn new(file: impl Into<Arc<str>>, line: usize, column: usize, index: usize) -> Self {
        Location {
            file: file.into(),
            line,
            column,
            index,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line + 1, self.column + 1)
    }
}
