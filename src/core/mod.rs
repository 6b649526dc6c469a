//! Core Business Logic
//!
//! Document management, position mapping and diagnostic bookkeeping.

pub mod diagnostics;
pub mod document;
pub mod line_index;

pub use diagnostics::{
    DiagnosticCollection, DiagnosticProvider, DiagnosticSink, LanguageFilter, create_lsp_diagnostic,
    refresh_document,
};
pub use document::{DocumentManager, DocumentState};
pub use line_index::{LineIndex, PositionEncoder};
