//! Diagnostics and error reporting
//!
//! This module provides utilities for reporting parse errors, scene
//! problems found by the analyzer, and runtime errors to users.

use crate::parser::ParseError;
use std::fmt;

/// Byte range into a scene source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 0-based line containing `start`, with that line's text.
    pub fn locate<'a>(&self, source: &'a str) -> Option<(usize, &'a str)> {
        let mut offset = 0;
        for (index, line) in source.split_inclusive('\n').enumerate() {
            if self.start < offset + line.len() {
                return Some((index, line.trim_end_matches(['\n', '\r'])));
            }
            offset += line.len();
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| !d.is_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Format a parse error with context from the source code
pub fn format_parse_error(error: &ParseError, source: &str) -> String {
    let mut msg = format!("Parse error: {}", error);

    if let Some((line, text)) = error.span().and_then(|span| span.locate(source)) {
        msg.push_str(&format!("\n  at line {}: {}", line + 1, text));
    }

    msg
}

/// Format a runtime error with context
pub fn format_runtime_error(error: &dyn std::error::Error) -> String {
    format!("Runtime error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_locates_line() {
        let source = "gravity 9.8\nground 500 0.1\n";
        assert_eq!(Span::new(12, 26).locate(source), Some((1, "ground 500 0.1")));
        assert_eq!(Span::new(0, 3).locate(source), Some((0, "gravity 9.8")));
        assert_eq!(Span::new(99, 100).locate(source), None);
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning("particle below ground", None));
        assert!(!diagnostics.has_errors());
        diagnostics.push(Diagnostic::error("incomplete spring", None));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.errors().count(), 1);
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
