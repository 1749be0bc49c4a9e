pub mod error;
pub mod marker;
mod structural;

pub use error::{DecodeError, ParseError};
pub use marker::{has_block_markers, marker_line, match_marker};

use crate::document::Document;
use crate::naming::NamePolicy;
use structural::Duplicates;

/// Decoder entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    rename_policy: NamePolicy,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser {
            source,
            file_id,
            rename_policy: NamePolicy::default(),
        }
    }

    /// Policy used by [`Parser::parse_lenient`] to rename duplicates.
    pub fn with_rename_policy(mut self, policy: NamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }

    /// Decode the source. A repeated block name is a hard error.
    pub fn parse(&self) -> Result<Document, DecodeError> {
        let (document, _) = structural::scan(&self.source, self.file_id, Duplicates::Reject)?;
        Ok(document)
    }

    /// Decode the source, renaming repeated block names instead of failing.
    /// Each rename is reported as a warning.
    pub fn parse_lenient(&self) -> (Document, Vec<ParseError>) {
        match structural::scan(
            &self.source,
            self.file_id,
            Duplicates::Rename(self.rename_policy),
        ) {
            Ok(result) => result,
            // Rename mode resolves every duplicate, so the scan never rejects a marker.
            Err(err) => unreachable!("lenient decode rejected a marker: {}", err),
        }
    }
}
