//! Product persistence port.
//!
//! Writes go through an explicit [`WriteBatch`]: the manager assembles every
//! record change for one operation, then hands the whole batch to the store.
//! A store either applies the complete batch or none of it.

use thiserror::Error;

use mallkit_core::{CategoryId, PageResult, SkuId, SpuId};

use crate::sku::ProductSku;
use crate::spu::ProductSpu;

/// One record change inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductWrite {
    InsertSpu(ProductSpu),
    UpdateSpu(ProductSpu),
    InsertSku(ProductSku),
    UpdateSku(ProductSku),
    DeleteSku(SkuId),
}

/// An ordered, all-or-nothing set of writes for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<ProductWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_spu(&mut self, spu: ProductSpu) -> &mut Self {
        self.writes.push(ProductWrite::InsertSpu(spu));
        self
    }

    pub fn update_spu(&mut self, spu: ProductSpu) -> &mut Self {
        self.writes.push(ProductWrite::UpdateSpu(spu));
        self
    }

    pub fn insert_sku(&mut self, sku: ProductSku) -> &mut Self {
        self.writes.push(ProductWrite::InsertSku(sku));
        self
    }

    pub fn update_sku(&mut self, sku: ProductSku) -> &mut Self {
        self.writes.push(ProductWrite::UpdateSku(sku));
        self
    }

    pub fn delete_sku(&mut self, sku_id: SkuId) -> &mut Self {
        self.writes.push(ProductWrite::DeleteSku(sku_id));
        self
    }

    pub fn writes(&self) -> &[ProductWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = ProductWrite;
    type IntoIter = std::vec::IntoIter<ProductWrite>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Store operation error.
///
/// Infrastructure taxonomy, kept apart from the domain error model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write conflicted with existing state (e.g. inserting a duplicate id).
    #[error("store conflict: {0}")]
    Conflict(String),

    /// A write referenced a record that does not exist.
    #[error("store record not found: {0}")]
    NotFound(String),

    /// The backend could not be reached; the operation may be retried.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Page query over SPUs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpuPageQuery {
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
    /// Substring match on the SPU name.
    pub name: Option<String>,
    pub cid: Option<CategoryId>,
}

/// Product persistence port.
pub trait ProductStore {
    /// Apply every write in the batch, or none of them.
    ///
    /// Implementations must validate the whole batch before mutating
    /// anything, so a failed commit leaves the store untouched.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    fn get_spu(&self, id: SpuId) -> Result<Option<ProductSpu>, StoreError>;

    /// Fetch the SPUs for the given ids; unknown ids are skipped.
    fn list_spus(&self, ids: &[SpuId]) -> Result<Vec<ProductSpu>, StoreError>;

    fn page_spus(&self, query: &SpuPageQuery) -> Result<PageResult<ProductSpu>, StoreError>;

    fn list_skus(&self, spu_id: SpuId) -> Result<Vec<ProductSku>, StoreError>;
}

impl<T: ProductStore + ?Sized> ProductStore for &T {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn get_spu(&self, id: SpuId) -> Result<Option<ProductSpu>, StoreError> {
        (**self).get_spu(id)
    }

    fn list_spus(&self, ids: &[SpuId]) -> Result<Vec<ProductSpu>, StoreError> {
        (**self).list_spus(ids)
    }

    fn page_spus(&self, query: &SpuPageQuery) -> Result<PageResult<ProductSpu>, StoreError> {
        (**self).page_spus(query)
    }

    fn list_skus(&self, spu_id: SpuId) -> Result<Vec<ProductSku>, StoreError> {
        (**self).list_skus(spu_id)
    }
}
