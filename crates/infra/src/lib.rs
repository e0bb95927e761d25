//! Infrastructure layer: in-memory implementations of the catalog, category,
//! and product persistence ports.
//!
//! Intended for tests/dev. Not optimized for performance.

pub mod attr_store;
pub mod category_store;
pub mod product_store;

pub use attr_store::InMemoryAttributeCatalog;
pub use category_store::InMemoryCategoryStore;
pub use product_store::InMemoryProductStore;
