use std::ops::Range;

use crate::block::Block;
use crate::document::Document;
use crate::naming::{NamePolicy, NameRegistry};
use crate::parser::error::{DecodeError, ParseError};
use crate::parser::marker::match_marker;

/// What to do when a marker reuses a name.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Duplicates {
    Reject,
    Rename(NamePolicy),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split `source` into preamble and blocks.
///
/// Lines are split on `\n` only. A trailing newline leaves a trailing empty
/// line; the empty string has no lines at all.
pub(crate) fn scan(
    source: &str,
    file_id: usize,
    duplicates: Duplicates,
) -> Result<(Document, Vec<ParseError>), DecodeError> {
    if source.is_empty() {
        return Ok((Document::empty(), Vec::new()));
    }

    let raw_lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    let mut state = ScanState::new(file_id, duplicates);

    let mut offset = 0;
    for (i, line) in raw_lines.iter().enumerate() {
        let span = offset..offset + line.len();
        offset = span.end + 1;

        match match_marker(line) {
            Some(name) => state.open_block(name, i, span)?,
            None => state.push_line(line),
        }
    }
    state.close_block();

    log::debug!(
        "decoded {} line(s): {} preamble line(s), {} block(s)",
        raw_lines.len(),
        state.preamble.len(),
        state.blocks.len()
    );

    let document = Document {
        preamble: state.preamble,
        blocks: state.blocks,
        raw_lines,
    };
    Ok((document, state.warnings))
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

struct ScanState {
    file_id: usize,
    duplicates: Duplicates,
    registry: NameRegistry,
    preamble: Vec<String>,
    blocks: Vec<Block>,
    /// The block currently collecting lines, if any marker has been seen.
    current: Option<Block>,
    warnings: Vec<ParseError>,
}

impl ScanState {
    fn new(file_id: usize, duplicates: Duplicates) -> Self {
        let policy = match duplicates {
            Duplicates::Reject => NamePolicy::default(),
            Duplicates::Rename(policy) => policy,
        };
        ScanState {
            file_id,
            duplicates,
            registry: NameRegistry::new(policy),
            preamble: Vec::new(),
            blocks: Vec::new(),
            current: None,
            warnings: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        match self.current.as_mut() {
            Some(block) => block.lines.push(line.to_string()),
            None => self.preamble.push(line.to_string()),
        }
    }

    fn close_block(&mut self) {
        if let Some(block) = self.current.take() {
            self.blocks.push(block);
        }
    }

    fn open_block(&mut self, name: &str, index: usize, span: Range<usize>) -> Result<(), DecodeError> {
        self.close_block();

        let name = if self.registry.contains(name) {
            self.resolve_duplicate(name, index, span.clone())?
        } else {
            self.registry.insert(name);
            name.to_string()
        };

        self.current = Some(Block {
            name,
            lines: Vec::new(),
            start_line: index,
            span,
        });
        Ok(())
    }

    fn resolve_duplicate(
        &mut self,
        name: &str,
        index: usize,
        span: Range<usize>,
    ) -> Result<String, DecodeError> {
        // The open block was closed before this lookup.
        let (first_line, first_span) = self
            .blocks
            .iter()
            .find(|b| b.name == name)
            .map(|b| (b.start_line + 1, b.span.clone()))
            .unwrap_or((index + 1, span.clone()));

        match self.duplicates {
            Duplicates::Reject => Err(DecodeError::DuplicateBlockName {
                name: name.to_string(),
                line: index + 1,
                span,
                first_line,
                first_span,
                file_id: self.file_id,
            }),
            Duplicates::Rename(_) => {
                let renamed = self.registry.claim(name);
                log::warn!(
                    "line {}: duplicate block name '{}' renamed to '{}'",
                    index + 1,
                    name,
                    renamed
                );
                self.warnings.push(
                    ParseError::warning(
                        format!("duplicate block name '{}' renamed to '{}'", name, renamed),
                        span,
                        self.file_id,
                    )
                    .with_related(first_span, format!("first defined here (line {})", first_line)),
                );
                Ok(renamed)
            }
        }
    }
}
