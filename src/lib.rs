//! C-ADL Language Server
//!
//! A Language Server Protocol implementation for C-ADL causal architecture
//! models.
//!
//! This library provides:
//! - `Bernoulli(p)` distribution scanning and validation
//! - Per-document diagnostics with an explicit lifecycle
//! - LSP protocol implementation (diagnostics, hover, compile command)
//! - Configuration management

pub mod config;
pub mod core;
pub mod lsp;
pub mod parser;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use parser::{DistributionMatch, scan_distributions};
pub use validation::{Diagnostic, validate_distributions};
