use std::sync::LazyLock;

use regex::Regex;

/// `#`, optional whitespace, `@block=`, a name, optional trailing whitespace.
/// Nothing else may appear on the line.
static BLOCK_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*@block=(\S+)\s*$").expect("valid marker regex"));

/// The block name if `line` is a marker line.
pub fn match_marker(line: &str) -> Option<&str> {
    BLOCK_START_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_marker(line: &str) -> bool {
    match_marker(line).is_some()
}

/// True if any line of `text` opens a block.
pub fn has_block_markers(text: &str) -> bool {
    text.split('\n').any(is_marker)
}

/// The canonical marker line for `name`, without a line terminator.
pub fn marker_line(name: &str) -> String {
    format!("# @block={}", name)
}
