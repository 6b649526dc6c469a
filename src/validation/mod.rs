//! Validation Engine
//!
//! Clean separation of validation logic from parsing and LSP concerns.

pub mod engine;

pub use engine::{
    Diagnostic, DiagnosticKind, Severity, ValidationResult, problem_message,
    validate_distributions,
};
