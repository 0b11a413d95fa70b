use anyhow::Result;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use jsthis_language_server::backend::JsThisBackend;
use jsthis_language_server::logging;

/// LSP server offering this-member completion for JavaScript.
#[derive(Debug, Parser)]
#[command(name = "jsthis-language-server", version, about)]
struct Cli {
    /// Log level for stderr output (otherwise RUST_LOG or "info")
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Disable session logging to the user cache directory
    #[arg(long)]
    disable_file_logging: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init_logger(
        cli.no_color,
        cli.log_level.as_deref(),
        !cli.disable_file_logging,
    )?;

    info!(
        "Starting jsthis-language-server v{} on stdio",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(JsThisBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
