use std::sync::Arc;

use anyhow::Context;
use booklist_db::MemoryBookStore;
use booklist_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "booklist-cli", version, about = "BookList catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load settings and serve the HTTP API until interrupted
    Serve,
    /// Print the merged OpenAPI document
    Openapi {
        /// Emit a single line instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Serve => {
            let settings = Settings::load().with_context(|| "failed to load BookList settings")?;
            booklist_telemetry::init(&settings.telemetry)?;

            tracing::info!(
                env = ?settings.environment,
                address = %settings.server.bind_address(),
                "booklist-cli serve starting"
            );

            booklist_app::run(settings).await
        }
        Command::Openapi { compact } => {
            let registry = booklist_app::build_registry(Arc::new(MemoryBookStore::new()))?;
            let spec = booklist_http::openapi::merged_spec(&registry);

            let rendered = if compact {
                serde_json::to_string(&spec)?
            } else {
                serde_json::to_string_pretty(&spec)?
            };
            println!("{}", rendered);
            Ok(())
        }
    }
}
