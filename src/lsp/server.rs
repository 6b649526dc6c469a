use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::Config;
use crate::lsp::backend::Backend;
use crate::lsp::handlers::ACTIVE_DOCUMENT_METHOD;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // stdout carries the protocol, env_logger writes to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.settings_path {
        log::info!("Loaded settings from {}", path.display());
    }
    log::info!(
        "Validating languages: {}",
        config.languages.languages().join(", ")
    );

    let (service, socket) = LspService::build(move |client| Backend::new(client, config.clone()))
        .custom_method(ACTIVE_DOCUMENT_METHOD, Backend::did_change_active_document)
        .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
