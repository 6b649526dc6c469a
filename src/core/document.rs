//! Document Management
//!
//! Text and language id for every document the client has open.

use std::collections::HashMap;

use tower_lsp::lsp_types::Url;

/// State for each open document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub content: String,
    pub language_id: String,
    pub version: Option<i32>,
}

impl DocumentState {
    pub fn new(content: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language_id: language_id.into(),
            version: None,
        }
    }
}

/// Open documents keyed by URI
#[derive(Debug, Default)]
pub struct DocumentManager {
    documents: HashMap<Url, DocumentState>,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, uri: Url, language_id: String, version: i32, content: String) {
        log::debug!("open {} ({}, v{})", uri, language_id, version);
        self.documents.insert(
            uri,
            DocumentState {
                content,
                language_id,
                version: Some(version),
            },
        );
    }

    /// Replace the full text of an open document
    ///
    /// Returns `false` when the document was never opened.
    pub fn change(&mut self, uri: &Url, version: i32, content: String) -> bool {
        match self.documents.get_mut(uri) {
            Some(state) => {
                state.content = content;
                state.version = Some(version);
                true
            }
            None => {
                log::warn!("change for unknown document {}", uri);
                false
            }
        }
    }

    /// Retag an open document with a new language id
    pub fn set_language(&mut self, uri: &Url, language_id: &str) -> bool {
        match self.documents.get_mut(uri) {
            Some(state) => {
                state.language_id = language_id.to_string();
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, uri: &Url) -> Option<DocumentState> {
        self.documents.remove(uri)
    }

    pub fn get(&self, uri: &Url) -> Option<&DocumentState> {
        self.documents.get(uri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///models/{}", name)).expect("valid uri")
    }

    #[test]
    fn test_open_and_get() {
        let mut docs = DocumentManager::new();
        assert!(docs.is_empty());

        docs.open(uri("a.cadl"), "cadl".into(), 1, "p: Bernoulli(0.5)".into());

        let state = docs.get(&uri("a.cadl")).expect("document is open");
        assert_eq!(state.language_id, "cadl");
        assert_eq!(state.version, Some(1));
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_change_replaces_text() {
        let mut docs = DocumentManager::new();
        docs.open(uri("a.cadl"), "cadl".into(), 1, "old".into());

        assert!(docs.change(&uri("a.cadl"), 2, "new".into()));
        let state = docs.get(&uri("a.cadl")).expect("document is open");
        assert_eq!(state.content, "new");
        assert_eq!(state.version, Some(2));

        assert!(!docs.change(&uri("missing.cadl"), 1, "text".into()));
        assert!(docs.get(&uri("missing.cadl")).is_none());
    }

    #[test]
    fn test_set_language_and_close() {
        let mut docs = DocumentManager::new();
        docs.open(uri("m.yaml"), "yaml".into(), 1, "text".into());

        assert!(docs.set_language(&uri("m.yaml"), "python"));
        assert_eq!(docs.get(&uri("m.yaml")).map(|d| d.language_id.as_str()), Some("python"));

        let closed = docs.close(&uri("m.yaml")).expect("was open");
        assert_eq!(closed.content, "text");
        assert!(docs.is_empty());
        assert!(!docs.set_language(&uri("m.yaml"), "yaml"));
    }
}
