use serde::{Deserialize, Serialize};

use crate::document::{Cell, Document};
use crate::naming::{NamePolicy, NameRegistry, UnnamedStyle, marker_name, unnamed_base};
use crate::parser::marker::marker_line;

/// Naming settings for one call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Prefix for generated names of unnamed cells.
    pub prefix: String,
    pub unnamed: UnnamedStyle,
    pub policy: NamePolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            prefix: "cell".to_string(),
            unnamed: UnnamedStyle::default(),
            policy: NamePolicy::default(),
        }
    }
}

/// Serializes cells back to marker-annotated text.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Encoder { config }
    }

    /// Resolve the final, unique name of every cell in order.
    ///
    /// Names are trimmed. Cells whose name is missing or still contains
    /// whitespace get `prefix`-based names; a name already taken earlier in
    /// the list is renamed. Free names pass through untouched.
    pub fn resolve_names(&self, names: &[Option<&str>]) -> Vec<String> {
        let mut registry = NameRegistry::new(self.config.policy);
        names
            .iter()
            .enumerate()
            .map(|(i, name)| match name.and_then(marker_name) {
                Some(name) => registry.claim(name),
                None => registry.claim(&unnamed_base(&self.config.prefix, i, self.config.unnamed)),
            })
            .collect()
    }

    /// Encode cells to text. Every cell gets a marker line followed by its
    /// body; a body without a trailing newline gets one.
    pub fn encode(&self, cells: &[Cell]) -> String {
        let names: Vec<Option<&str>> = cells.iter().map(|c| c.name.as_deref()).collect();
        let resolved = self.resolve_names(&names);

        let mut out = String::new();
        for (cell, name) in cells.iter().zip(&resolved) {
            out.push_str(&marker_line(name));
            out.push('\n');
            // An empty body is a marker with nothing under it.
            if cell.body.is_empty() {
                continue;
            }
            out.push_str(&cell.body);
            if !cell.body.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    /// Encode cells after a preamble. The preamble is emitted as-is and,
    /// when cells follow, ends at a line boundary.
    pub fn encode_with_preamble(&self, preamble: &str, cells: &[Cell]) -> String {
        let mut out = String::from(preamble);
        if !cells.is_empty() && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&self.encode(cells));
        out
    }

    /// Re-encode a decoded document, keeping its preamble.
    pub fn encode_document(&self, document: &Document) -> String {
        self.encode_with_preamble(&document.preamble_text(), &document.cells())
    }
}
