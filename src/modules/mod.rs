pub mod books;

use std::sync::Arc;

use booklist_db::BookStore;
use booklist_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: Arc<dyn BookStore>,
) -> anyhow::Result<()> {
    registry.register(books::create_module(store))?;
    Ok(())
}
