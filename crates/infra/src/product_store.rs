//! In-memory product store with atomic batch commits.

use std::collections::HashMap;
use std::sync::RwLock;

use mallkit_core::{PageResult, SkuId, SpuId};
use mallkit_product::{
    ProductSku, ProductSpu, ProductStore, ProductWrite, SpuPageQuery, StoreError, WriteBatch,
};

#[derive(Debug, Default)]
struct ProductState {
    spus: HashMap<SpuId, ProductSpu>,
    skus: HashMap<SkuId, ProductSku>,
    outage: Option<String>,
}

/// In-memory product store.
///
/// Commits stage every write against a copy of the current state and swap it
/// in only when the whole batch checks out, so a failed commit leaves the
/// store untouched. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<ProductState>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a transient backend outage: every call fails retryably until
    /// `set_available` is called.
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

    pub fn spu_count(&self) -> usize {
        self.state.read().map(|s| s.spus.len()).unwrap_or(0)
    }

    pub fn sku_count(&self) -> usize {
        self.state.read().map(|s| s.skus.len()).unwrap_or(0)
    }
}

impl ProductStore for InMemoryProductStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(StoreError::unavailable(reason.clone()));
        }

        // Stage against a copy; later writes in the batch see earlier ones.
        let mut spus = state.spus.clone();
        let mut skus = state.skus.clone();
        let writes = batch.len();

        for write in batch {
            match write {
                ProductWrite::InsertSpu(spu) => {
                    if spus.contains_key(&spu.id) {
                        return Err(StoreError::conflict(format!(
                            "spu {} already exists",
                            spu.id
                        )));
                    }
                    spus.insert(spu.id, spu);
                }
                ProductWrite::UpdateSpu(spu) => {
                    if !spus.contains_key(&spu.id) {
                        return Err(StoreError::not_found(format!("spu {}", spu.id)));
                    }
                    spus.insert(spu.id, spu);
                }
                ProductWrite::InsertSku(sku) => {
                    if skus.contains_key(&sku.id) {
                        return Err(StoreError::conflict(format!(
                            "sku {} already exists",
                            sku.id
                        )));
                    }
                    if !spus.contains_key(&sku.spu_id) {
                        return Err(StoreError::not_found(format!(
                            "spu {} for sku {}",
                            sku.spu_id, sku.id
                        )));
                    }
                    skus.insert(sku.id, sku);
                }
                ProductWrite::UpdateSku(sku) => {
                    if !skus.contains_key(&sku.id) {
                        return Err(StoreError::not_found(format!("sku {}", sku.id)));
                    }
                    skus.insert(sku.id, sku);
                }
                ProductWrite::DeleteSku(sku_id) => {
                    if skus.remove(&sku_id).is_none() {
                        return Err(StoreError::not_found(format!("sku {sku_id}")));
                    }
                }
            }
        }

        state.spus = spus;
        state.skus = skus;
        tracing::debug!("committed {} product writes", writes);
        Ok(())
    }

    fn get_spu(&self, id: SpuId) -> Result<Option<ProductSpu>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(StoreError::unavailable(reason.clone()));
        }
        Ok(state.spus.get(&id).cloned())
    }

    fn list_spus(&self, ids: &[SpuId]) -> Result<Vec<ProductSpu>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(StoreError::unavailable(reason.clone()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| state.spus.get(id).cloned())
            .collect())
    }

    fn page_spus(&self, query: &SpuPageQuery) -> Result<PageResult<ProductSpu>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(StoreError::unavailable(reason.clone()));
        }

        let mut matches: Vec<ProductSpu> = state
            .spus
            .values()
            .filter(|spu| {
                query
                    .name
                    .as_deref()
                    .is_none_or(|name| spu.name.contains(name))
            })
            .filter(|spu| query.cid.is_none_or(|cid| spu.cid == cid))
            .cloned()
            .collect();
        // UUIDv7 ids are time-ordered, so this is insertion order.
        matches.sort_by_key(|spu| spu.id);

        Ok(PageResult::paginate(matches, query.page, query.size))
    }

    fn list_skus(&self, spu_id: SpuId) -> Result<Vec<ProductSku>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(StoreError::unavailable(reason.clone()));
        }
        let mut skus: Vec<ProductSku> = state
            .skus
            .values()
            .filter(|sku| sku.spu_id == spu_id)
            .cloned()
            .collect();
        skus.sort_by_key(|sku| sku.id);
        Ok(skus)
    }
}
