//! Diagnostic Provider
//!
//! Turns validation results into LSP diagnostics and keeps track of what has
//! been published for each document.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tower_lsp::Client;
use tower_lsp::lsp_types::{
    Diagnostic as LspDiagnostic, DiagnosticSeverity, NumberOrString, Range, Url,
};

use crate::core::document::{DocumentManager, DocumentState};
use crate::core::line_index::{LineIndex, PositionEncoder};
use crate::validation::{Diagnostic, Severity, validate_distributions};

/// Language ids validated when nothing else is configured
pub const DEFAULT_LANGUAGES: &[&str] = &["yaml", "cadl"];

/// Source tag attached to every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "cadl-ls";

/// The set of language ids whose documents get validated
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageFilter {
    languages: Vec<String>,
}

impl Default for LanguageFilter {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES.iter().copied())
    }
}

impl LanguageFilter {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, language_id: &str) -> bool {
        self.languages.iter().any(|l| l == language_id)
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

/// Produces LSP diagnostics for documents in recognized languages
#[derive(Debug, Clone, Default)]
pub struct DiagnosticProvider {
    filter: LanguageFilter,
}

impl DiagnosticProvider {
    pub fn new(filter: LanguageFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &LanguageFilter {
        &self.filter
    }

    /// Validate a document
    ///
    /// `None` means the document's language is not one we validate and its
    /// diagnostics should be cleared; the validator is not run at all.
    pub fn diagnostics_for(&self, document: &DocumentState) -> Option<Vec<LspDiagnostic>> {
        if !self.filter.matches(&document.language_id) {
            return None;
        }

        let index = LineIndex::new(&document.content);
        let result = validate_distributions(&document.content);
        Some(
            result
                .diagnostics
                .into_iter()
                .map(|d| create_lsp_diagnostic(&index, d))
                .collect(),
        )
    }
}

/// Convert a validation diagnostic, resolving its byte span to a range
pub fn create_lsp_diagnostic(
    encoder: &impl PositionEncoder,
    validation_diagnostic: Diagnostic,
) -> LspDiagnostic {
    let severity = match validation_diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
    };

    LspDiagnostic::new(
        Range::new(
            encoder.position_at(validation_diagnostic.start),
            encoder.position_at(validation_diagnostic.end),
        ),
        Some(severity),
        Some(NumberOrString::String(
            validation_diagnostic.kind.code().to_string(),
        )),
        Some(DIAGNOSTIC_SOURCE.to_string()),
        validation_diagnostic.message,
        None,
        None,
    )
}

/// Where diagnostics end up once computed
#[tower_lsp::async_trait]
pub trait DiagnosticSink: Send + Sync {
    async fn publish(&self, uri: Url, diagnostics: Vec<LspDiagnostic>, version: Option<i32>);
}

#[tower_lsp::async_trait]
impl DiagnosticSink for Client {
    async fn publish(&self, uri: Url, diagnostics: Vec<LspDiagnostic>, version: Option<i32>) {
        self.publish_diagnostics(uri, diagnostics, version).await;
    }
}

/// Per-document diagnostics, replaced wholesale on every update
///
/// Created when the server starts and disposed on shutdown. Once disposed,
/// further updates are dropped.
#[derive(Debug)]
pub struct DiagnosticCollection<S> {
    name: String,
    sink: S,
    entries: HashMap<Url, Vec<LspDiagnostic>>,
    disposed: bool,
}

impl<S: DiagnosticSink> DiagnosticCollection<S> {
    pub fn new(name: impl Into<String>, sink: S) -> Self {
        Self {
            name: name.into(),
            sink,
            entries: HashMap::new(),
            disposed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Diagnostics last published for `uri`
    pub fn get(&self, uri: &Url) -> Option<&[LspDiagnostic]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    /// Replace the diagnostics of one document
    pub async fn set(&mut self, uri: Url, diagnostics: Vec<LspDiagnostic>, version: Option<i32>) {
        if self.disposed {
            log::warn!("{}: dropping diagnostics for {} after dispose", self.name, uri);
            return;
        }

        log::debug!("{}: {} diagnostic(s) for {}", self.name, diagnostics.len(), uri);
        self.entries.insert(uri.clone(), diagnostics.clone());
        self.sink.publish(uri, diagnostics, version).await;
    }

    /// Remove every diagnostic of one document
    pub async fn clear_document(&mut self, uri: &Url) {
        if self.disposed {
            return;
        }

        self.entries.remove(uri);
        self.sink.publish(uri.clone(), Vec::new(), None).await;
    }

    /// Remove every diagnostic of every document
    pub async fn clear(&mut self) {
        let uris: Vec<Url> = self.entries.drain().map(|(uri, _)| uri).collect();
        for uri in uris {
            self.sink.publish(uri, Vec::new(), None).await;
        }
    }

    pub async fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.clear().await;
        self.disposed = true;
        log::debug!("{}: disposed", self.name);
    }
}

/// Re-validate one open document and replace its published diagnostics
///
/// Lock order is documents, then diagnostics. The document lock is held until
/// the collection lock is taken, so publishes for a document happen in the
/// order its versions were read.
pub async fn refresh_document<S: DiagnosticSink>(
    documents: &Mutex<DocumentManager>,
    diagnostics: &Mutex<DiagnosticCollection<S>>,
    provider: &DiagnosticProvider,
    uri: Url,
) {
    let docs = documents.lock().await;
    let doc_state = match docs.get(&uri) {
        Some(state) => state,
        None => return,
    };

    let version = doc_state.version;
    let computed = provider.diagnostics_for(doc_state);
    if computed.is_none() {
        log::debug!(
            "not validating {} with language '{}'",
            uri,
            doc_state.language_id
        );
    }

    let mut collection = diagnostics.lock().await;
    drop(docs);

    match computed {
        Some(found) => collection.set(uri, found, version).await,
        None => collection.clear_document(&uri).await,
    }
}
