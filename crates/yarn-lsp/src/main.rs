use std::fs::OpenOptions;
use tower_lsp_server::{LspService, Server};
use tracing_subscriber::EnvFilter;
use yarn_lsp::server::Backend;

/// Set to any value to log to `~/.yarn-lsp.log` instead of stderr.
const LOG_FILE_ENV: &str = "YARN_LSP_LOG_FILE";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() {
    let log_file = std::env::var_os(LOG_FILE_ENV)
        .and_then(|_| dirs::home_dir())
        .map(|h| h.join(".yarn-lsp.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
        });

    // stdout carries the protocol, so logs never go there.
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);

    Server::new(stdin, stdout, socket).serve(service).await;
}
