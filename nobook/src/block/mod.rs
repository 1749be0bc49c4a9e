use std::ops::Range;

/// A named block opened by a `# @block=<name>` marker.
/// Runs until the next marker or end of file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block name captured from the marker. Unique within a document.
    pub name: String,
    /// Body lines, marker excluded. Line endings other than `\n` are kept.
    pub lines: Vec<String>,
    /// 0-indexed line of the marker in the source. Only used for reporting.
    pub start_line: usize,
    /// Byte span of the marker line in source for error reporting.
    pub span: Range<usize>,
}

impl Block {
    /// True when the block has no content: no lines, or a single empty line.
    pub fn is_empty(&self) -> bool {
        match self.lines.as_slice() {
            [] => true,
            [only] => only.is_empty(),
            _ => false,
        }
    }
}
