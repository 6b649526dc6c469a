//! Validation Engine
//!
//! Distribution validation separated from scanning and LSP concerns.
//! Pure: text in, ordered diagnostics out.

use crate::parser::{DistributionMatch, format_probability, scan_distributions};

/// Severity of a diagnostic message; every distribution problem is an error
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
}

/// What is wrong with a distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticKind {
    /// The argument parsed but lies outside [0, 1]
    OutOfRange,
    /// The argument has no numeric prefix at all
    Unparseable,
}

impl DiagnosticKind {
    /// Stable code reported to clients
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::OutOfRange => "probability-out-of-range",
            DiagnosticKind::Unparseable => "probability-unparseable",
        }
    }
}

/// A diagnostic message for a validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Byte offset where the offending declaration starts
    pub start: usize,
    /// Byte offset just past the offending declaration
    pub end: usize,
    pub message: String,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

/// Result of validating a document
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add_error(&mut self, span: &DistributionMatch, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic {
            start: span.start,
            end: span.end,
            message,
            severity: Severity::Error,
            kind,
        });
    }

    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Message for a distribution that fails validation, `None` if it is fine
pub fn problem_message(distribution: &DistributionMatch) -> Option<(DiagnosticKind, String)> {
    if distribution.is_valid() {
        return None;
    }

    match distribution.value {
        Some(p) => Some((
            DiagnosticKind::OutOfRange,
            format!(
                "Invalid probability: {}. Must be between 0 and 1.",
                format_probability(p)
            ),
        )),
        None => Some((
            DiagnosticKind::Unparseable,
            format!(
                "Invalid probability: '{}' is not a number. Must be between 0 and 1.",
                distribution.raw.trim()
            ),
        )),
    }
}

/// Validate every probability distribution declared in `content`
pub fn validate_distributions(content: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    for distribution in scan_distributions(content) {
        if let Some((kind, message)) = problem_message(&distribution) {
            result.add_error(&distribution, kind, message);
        }
    }

    result
}
