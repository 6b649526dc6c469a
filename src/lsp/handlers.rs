use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result as LspResult};
use tower_lsp::lsp_types::*;

use crate::core::{LineIndex, PositionEncoder, refresh_document};
use crate::lsp::backend::Backend;
use crate::parser::{DistributionMatch, distribution_at, format_probability};
use crate::validation::problem_message;

/// Command id of the compile action
pub const COMPILE_COMMAND: &str = "cadl.compile";

/// Message shown when the compile action runs
pub const COMPILE_MESSAGE: &str = "Compiling C-ADL model to SCM and Alloy...";

/// Notification sent by the client when the focused editor changes
pub const ACTIVE_DOCUMENT_METHOD: &str = "cadl/didChangeActiveDocument";

/// Params of [`ACTIVE_DOCUMENT_METHOD`]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDocumentParams {
    pub text_document: TextDocumentIdentifier,
    /// New language id, when the switch also retagged the document
    #[serde(default)]
    pub language_id: Option<String>,
}

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling workspace commands
#[tower_lsp::async_trait]
pub trait HandleExecuteCommand {
    async fn handle_execute_command(&self, params: ExecuteCommandParams)
    -> LspResult<Option<Value>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    /// Re-validate a document and replace its published diagnostics
    async fn refresh_diagnostics(&self, uri: Url);
    async fn handle_active_document(&self, params: ActiveDocumentParams);
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        if !self.provider.filter().matches(&doc_state.language_id) {
            return Ok(None);
        }

        let index = LineIndex::new(&doc_state.content);
        let offset = index.offset_at(tdpp.position);
        let distribution = match distribution_at(&doc_state.content, offset) {
            Some(distribution) => distribution,
            None => return Ok(None),
        };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: hover_text(&distribution),
            }),
            range: Some(Range::new(
                index.position_at(distribution.start),
                index.position_at(distribution.end),
            )),
        }))
    }
}

/// Markdown shown when hovering a distribution
pub fn hover_text(distribution: &DistributionMatch) -> String {
    let title = format!("**Bernoulli({})**", distribution.raw.trim());

    if let Some((_, message)) = problem_message(distribution) {
        return format!("{}\n\n{}", title, message);
    }

    let p = distribution.value.unwrap_or_default();
    format!(
        "{}\n\nBinary outcome distribution\n\n- P(true) = {}\n- P(false) = {}",
        title,
        format_probability(p),
        format_probability(complement(p))
    )
}

// 1 - p without the binary floating point tail (1 - 0.7 = 0.30000000000000004)
fn complement(p: f64) -> f64 {
    ((1.0 - p) * 1e12).round() / 1e12
}

#[tower_lsp::async_trait]
impl HandleExecuteCommand for Backend {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<Value>> {
        match params.command.as_str() {
            COMPILE_COMMAND => {
                match params.arguments.first().and_then(Value::as_str) {
                    Some(target) => log::info!("compile requested for {}", target),
                    None => log::info!("compile requested"),
                }
                // Translation to SCM/Alloy is not implemented; only acknowledge
                self.client
                    .show_message(MessageType::INFO, COMPILE_MESSAGE)
                    .await;
                Ok(None)
            }
            other => Err(Error::invalid_params(format!("Unknown command '{}'", other))),
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    async fn refresh_diagnostics(&self, uri: Url) {
        refresh_document(&self.documents, &self.diagnostics, &self.provider, uri).await;
    }

    async fn handle_active_document(&self, params: ActiveDocumentParams) {
        let uri = params.text_document.uri;

        if let Some(language_id) = params.language_id {
            let mut docs = self.documents.lock().await;
            if !docs.set_language(&uri, &language_id) {
                log::debug!("active document {} is not open", uri);
                return;
            }
        }

        self.refresh_diagnostics(uri).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan_distributions;

    fn first_distribution(text: &str) -> DistributionMatch {
        scan_distributions(text)
            .into_iter()
            .next()
            .expect("text has a distribution")
    }

    #[test]
    fn test_hover_text_for_valid_probability() {
        let text = hover_text(&first_distribution("failure_rate: Bernoulli(0.7)"));

        assert!(text.starts_with("**Bernoulli(0.7)**"));
        assert!(text.contains("P(true) = 0.7"));
        assert!(text.contains("P(false) = 0.3"));
    }

    #[test]
    fn test_hover_text_for_invalid_probability() {
        let text = hover_text(&first_distribution("failure_rate: Bernoulli(1.2)"));
        assert!(text.contains("Invalid probability: 1.2. Must be between 0 and 1."));
        assert!(!text.contains("P(true)"));

        let text = hover_text(&first_distribution("failure_rate: Bernoulli(high)"));
        assert!(text.contains("'high' is not a number"));
    }

    #[test]
    fn test_complement_is_clean() {
        assert_eq!(complement(0.7), 0.3);
        assert_eq!(complement(0.0), 1.0);
        assert_eq!(complement(1.0), 0.0);
        assert_eq!(complement(0.02), 0.98);
    }

    #[test]
    fn test_active_document_params_shape() {
        let params: ActiveDocumentParams = serde_json::from_value(serde_json::json!({
            "textDocument": { "uri": "file:///models/a.cadl" },
            "languageId": "python"
        }))
        .expect("valid params");

        assert_eq!(params.text_document.uri.path(), "/models/a.cadl");
        assert_eq!(params.language_id.as_deref(), Some("python"));

        let params: ActiveDocumentParams = serde_json::from_value(serde_json::json!({
            "textDocument": { "uri": "file:///models/a.cadl" }
        }))
        .expect("language id is optional");
        assert!(params.language_id.is_none());
    }
}
