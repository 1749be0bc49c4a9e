use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use thiserror::Error;

/// A located decode problem, ready for codespan-reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
    /// Related locations shown alongside the primary span.
    pub related: Vec<(Range<usize>, String)>,
}

impl ParseError {
    pub fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
            related: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Warning,
            notes: Vec::new(),
            related: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_related(mut self, span: Range<usize>, message: impl Into<String>) -> Self {
        self.related.push((span, message.into()));
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let mut labels = vec![Label::primary(self.file_id, self.span.clone())];
        labels.extend(
            self.related
                .iter()
                .map(|(span, msg)| Label::secondary(self.file_id, span.clone()).with_message(msg)),
        );
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

/// Hard failures of the strict decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A marker reuses a name introduced earlier in the same file.
    #[error("line {line}: duplicate block name '{name}'")]
    DuplicateBlockName {
        name: String,
        /// 1-indexed line of the second marker.
        line: usize,
        span: Range<usize>,
        /// 1-indexed line of the first marker with this name.
        first_line: usize,
        first_span: Range<usize>,
        file_id: usize,
    },
}

impl DecodeError {
    /// 1-indexed source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            DecodeError::DuplicateBlockName { line, .. } => *line,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DecodeError::DuplicateBlockName { name, .. } => name,
        }
    }

    pub fn to_parse_error(&self) -> ParseError {
        match self {
            DecodeError::DuplicateBlockName {
                name,
                span,
                first_line,
                first_span,
                file_id,
                ..
            } => ParseError::error(format!("duplicate block name '{}'", name), span.clone(), *file_id)
                .with_related(first_span.clone(), format!("first defined here (line {})", first_line))
                .with_note("block names must be unique within a file"),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        self.to_parse_error().to_diagnostic()
    }
}
