//! BookList application library
//!
//! Wires the books module to a store and runs it behind the HTTP facade.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use booklist_db::{BookStore, MemoryBookStore};
use booklist_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry holding every application module, backed by `store`
pub fn build_registry(store: Arc<dyn BookStore>) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store: Arc<dyn BookStore> = Arc::new(MemoryBookStore::new());
    let registry = build_registry(store)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = booklist_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
