//! LSP Protocol Implementation
//!
//! Backend focused only on protocol handling; validation lives elsewhere.

pub mod backend;
pub mod handlers;
pub mod server;

pub use backend::Backend;
pub use handlers::{ACTIVE_DOCUMENT_METHOD, ActiveDocumentParams, COMPILE_COMMAND};
