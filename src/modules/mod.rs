pub mod books;

use biblio_db::Database;
use biblio_kernel::ModuleRegistry;

/// Register all resource modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    registry.register(books::create_module(db));
}
