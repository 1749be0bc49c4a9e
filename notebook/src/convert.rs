use nobook::naming::{NameRegistry, marker_name, unnamed_base};
use nobook::{Cell, Encoder, EncoderConfig, ParseError, Parser};

use crate::model::{CellKind, Notebook, NotebookCell};

/// A block name assigned while making a notebook's names unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// Position of the cell in the notebook.
    pub index: usize,
    /// The name the cell had before, if any.
    pub from: Option<String>,
    pub to: String,
}

/// Converts between source text and notebooks with one naming configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: EncoderConfig,
}

impl Converter {
    pub fn new(config: EncoderConfig) -> Self {
        Converter { config }
    }

    /// Build a notebook from source text.
    ///
    /// Decoding is lenient: repeated block names are renamed and reported as
    /// warnings instead of failing. A preamble with any non-blank content
    /// becomes a raw cell.
    pub fn to_notebook(&self, source: &str, file_id: usize) -> (Notebook, Vec<ParseError>) {
        let (document, warnings) = Parser::new(source.to_string(), file_id)
            .with_rename_policy(self.config.policy)
            .parse_lenient();

        let mut cells = Vec::with_capacity(document.blocks.len() + 1);

        let preamble = document.preamble_text();
        if !preamble.trim().is_empty() {
            cells.push(NotebookCell::preamble(strip_newline(&preamble)));
        }

        for cell in document.cells() {
            let name = cell.name.unwrap_or_default();
            cells.push(NotebookCell::code(name, strip_newline(&cell.body)));
        }

        log::debug!(
            "built notebook with {} cell(s), {} rename warning(s)",
            cells.len(),
            warnings.len()
        );
        (Notebook::new(cells), warnings)
    }

    /// Give every code cell a unique block name, in place.
    ///
    /// Names are trimmed. Cells without a name, or whose name still contains
    /// whitespace, get one built from the configured prefix and the cell's
    /// position; cells whose name is already taken by an earlier cell are
    /// renamed under the configured policy.
    pub fn ensure_unique_block_names(&self, notebook: &mut Notebook) -> Vec<Rename> {
        let mut registry = NameRegistry::new(self.config.policy);
        let mut renames = Vec::new();

        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            if cell.kind != CellKind::Code {
                continue;
            }
            let current = cell.block_name().map(str::to_string);
            let usable = current.as_deref().and_then(marker_name);
            let resolved = match usable {
                Some(name) if usable == current.as_deref() && !registry.contains(name) => {
                    registry.insert(name);
                    continue;
                }
                Some(name) => registry.claim(name),
                None => registry.claim(&unnamed_base(&self.config.prefix, index, self.config.unnamed)),
            };
            log::debug!("cell {}: block name {:?} -> '{}'", index, current, resolved);
            cell.set_block_name(resolved.clone());
            renames.push(Rename {
                index,
                from: current,
                to: resolved,
            });
        }

        renames
    }

    /// Serialize a notebook back to source text.
    ///
    /// Preamble raw cells form the preamble; code cells become blocks. Other
    /// cells have no place in the source and are dropped.
    pub fn to_source(&self, notebook: &Notebook) -> String {
        let mut named = notebook.clone();
        self.ensure_unique_block_names(&mut named);

        let mut preamble = String::new();
        let mut cells = Vec::new();
        for cell in &named.cells {
            if cell.is_preamble() {
                preamble.push_str(&restore_newline(&cell.source));
            } else if cell.kind == CellKind::Code {
                cells.push(Cell {
                    name: cell.block_name().map(str::to_string),
                    body: restore_newline(&cell.source),
                });
            }
        }

        Encoder::new(self.config.clone()).encode_with_preamble(&preamble, &cells)
    }
}

/// Cell sources are shown without the newline that ends their last line.
fn strip_newline(text: &str) -> String {
    text.strip_suffix('\n').unwrap_or(text).to_string()
}

fn restore_newline(source: &str) -> String {
    if source.is_empty() {
        String::new()
    } else {
        format!("{}\n", source)
    }
}
