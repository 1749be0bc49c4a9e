//! The cell-list view a host notebook editor works with.
//!
//! The JSON layout follows nbformat closely enough for Jupyter-style hosts:
//! `cell_type`, `source` (string or list of strings), and a per-cell
//! `metadata.nobook` object naming the block.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::NotebookError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
    #[serde(default)]
    pub cells: Vec<NotebookCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    /// Marks notebooks produced from marker-annotated source.
    #[serde(default)]
    pub nobook: bool,
    /// Anything else the host stored (kernelspec, language_info, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Raw,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "cell_type")]
    pub kind: CellKind,
    #[serde(default, deserialize_with = "source_text")]
    pub source: String,
    #[serde(default)]
    pub metadata: CellMetadata,
    /// Host fields carried through untouched (outputs, execution_count, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nobook: Option<NobookMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NobookMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preamble: bool,
}

fn default_nbformat() -> u32 {
    4
}

fn default_nbformat_minor() -> u32 {
    5
}

/// nbformat allows `source` as one string or a list of line strings.
fn source_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Source::deserialize(deserializer)? {
        Source::Text(text) => text,
        Source::Lines(lines) => lines.concat(),
    })
}

impl Notebook {
    pub fn new(cells: Vec<NotebookCell>) -> Self {
        Notebook {
            metadata: NotebookMetadata {
                nobook: true,
                extra: Map::new(),
            },
            nbformat: default_nbformat(),
            nbformat_minor: default_nbformat_minor(),
            cells,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, NotebookError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Block names of code cells that have one, in order.
    pub fn block_names(&self) -> Vec<&str> {
        self.cells.iter().filter_map(NotebookCell::block_name).collect()
    }
}

impl NotebookCell {
    /// A code cell bound to block `name`. The cell id mirrors the name.
    pub fn code(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        NotebookCell {
            id: Some(name.clone()),
            kind: CellKind::Code,
            source: source.into(),
            metadata: CellMetadata {
                nobook: Some(NobookMeta {
                    block: Some(name),
                    preamble: false,
                }),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// A code cell the host created without a block name.
    pub fn unnamed_code(source: impl Into<String>) -> Self {
        NotebookCell {
            id: None,
            kind: CellKind::Code,
            source: source.into(),
            metadata: CellMetadata::default(),
            extra: Map::new(),
        }
    }

    pub fn preamble(source: impl Into<String>) -> Self {
        NotebookCell {
            id: None,
            kind: CellKind::Raw,
            source: source.into(),
            metadata: CellMetadata {
                nobook: Some(NobookMeta {
                    block: None,
                    preamble: true,
                }),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn is_preamble(&self) -> bool {
        self.kind == CellKind::Raw
            && self.metadata.nobook.as_ref().is_some_and(|meta| meta.preamble)
    }

    /// The block name of a code cell, if it has a non-empty one.
    pub fn block_name(&self) -> Option<&str> {
        if self.kind != CellKind::Code {
            return None;
        }
        self.metadata
            .nobook
            .as_ref()
            .and_then(|meta| meta.block.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Bind the cell to block `name`. An id that mirrored the old name
    /// follows the rename.
    pub fn set_block_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let meta = self.metadata.nobook.get_or_insert_with(NobookMeta::default);
        if meta.block.is_some() && self.id == meta.block {
            self.id = Some(name.clone());
        }
        meta.block = Some(name);
    }
}
