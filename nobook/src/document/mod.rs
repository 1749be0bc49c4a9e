use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A decoded source file: preamble plus ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Lines before the first marker. Preserved, never exposed as a block.
    pub preamble: Vec<String>,
    pub blocks: Vec<Block>,
    /// Every line of the source, kept for line-number reporting.
    pub raw_lines: Vec<String>,
}

/// The unit exchanged with a host editor: an optional name and a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub name: Option<String>,
    pub body: String,
}

impl Cell {
    pub fn named(name: impl Into<String>, body: impl Into<String>) -> Self {
        Cell {
            name: Some(name.into()),
            body: body.into(),
        }
    }

    pub fn unnamed(body: impl Into<String>) -> Self {
        Cell {
            name: None,
            body: body.into(),
        }
    }
}

impl Document {
    pub fn empty() -> Self {
        Document {
            preamble: Vec::new(),
            blocks: Vec::new(),
            raw_lines: Vec::new(),
        }
    }

    /// Look up a block by exact name.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn block_names(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.name.as_str()).collect()
    }

    /// The preamble exactly as it appears in the source, including the
    /// newline before the first marker.
    pub fn preamble_text(&self) -> String {
        region_text(&self.preamble, self.blocks.is_empty())
    }

    /// The body of the block at `index` exactly as it appears in the source.
    ///
    /// Every block but the last ends with the newline that precedes the next
    /// marker. The last block ends wherever the file does.
    pub fn block_body(&self, index: usize) -> Option<String> {
        let block = self.blocks.get(index)?;
        Some(region_text(&block.lines, index + 1 == self.blocks.len()))
    }

    /// Blocks as host cells, in order, every cell named.
    pub fn cells(&self) -> Vec<Cell> {
        let last = self.blocks.len().saturating_sub(1);
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| Cell::named(b.name.clone(), region_text(&b.lines, i == last)))
            .collect()
    }

    /// The original source text, byte for byte.
    pub fn source(&self) -> String {
        self.raw_lines.join("\n")
    }
}

/// Lines that run to end of file are joined; lines cut off by a marker each
/// keep their terminator.
fn region_text(lines: &[String], runs_to_eof: bool) -> String {
    if runs_to_eof {
        return lines.join("\n");
    }
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
