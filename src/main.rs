use anyhow::Context;
use booklist_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load BookList settings")?;
    booklist_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        "booklist bootstrap starting"
    );

    booklist_app::run(settings).await
}
