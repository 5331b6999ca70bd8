//! Chat Widget Server
//!
//! Entry point: serves the chat page and endpoint, or runs the widget in the
//! terminal against a configured endpoint.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use chat_widget::config::{AppConfig, Cli, Command};
use chat_widget::console::{ConsoleView, run_console};
use chat_widget::widget::{ChatWidget, HttpChatEndpoint};
use chat_widget::{server, telemetry, ui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env fallbacks
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_cli(&cli).context("Configuration error")?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(config).await,
        Command::Console => console(&config).await,
    }
}

async fn console(config: &AppConfig) -> anyhow::Result<()> {
    let endpoint = HttpChatEndpoint::new(config.widget.endpoint()?);
    info!(
        name: "console.started",
        endpoint = %endpoint.url(),
        "Console chat started (Enter sends, trailing \\ continues the line, /quit exits)"
    );

    let view = ConsoleView::new(std::io::stdout()).with_greeting(ui::chat::GREETING);
    let widget = ChatWidget::new(view, endpoint, config.widget.options());
    widget.mount();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_console(&widget, stdin).await?;
    Ok(())
}
