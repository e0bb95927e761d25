//! In-memory category store.

use std::collections::HashMap;
use std::sync::RwLock;

use mallkit_catalog::{CatalogError, Category, CategoryStore};
use mallkit_core::{CategoryId, DomainError, DomainResult};

#[derive(Debug, Default)]
struct CategoryState {
    categories: HashMap<CategoryId, Category>,
    outage: Option<String>,
}

/// In-memory category store.
///
/// Intended for tests/dev. `set_unavailable` simulates a transient backend
/// outage.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    state: RwLock<CategoryState>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. A non-root category's parent must already exist.
    pub fn insert_category(&self, category: Category) -> DomainResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::invariant("lock poisoned"))?;
        if let Some(parent_id) = category.parent_id {
            if !state.categories.contains_key(&parent_id) {
                return Err(DomainError::invariant(format!(
                    "category {} references unknown parent {}",
                    category.id, parent_id
                )));
            }
        }
        state.categories.insert(category.id, category);
        Ok(())
    }

    pub fn set_unavailable(&self, reason: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.outage = Some(reason.into());
        }
    }

    pub fn set_available(&self) {
        if let Ok(mut state) = self.state.write() {
            state.outage = None;
        }
    }
}

impl CategoryStore for InMemoryCategoryStore {
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        let state = self
            .state
            .read()
            .map_err(|_| CatalogError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(CatalogError::unavailable(reason.clone()));
        }
        Ok(state.categories.get(&id).cloned())
    }
}
