//! SPU manager: orchestrates create/update/read flows for products.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mallkit_catalog::{
    AttributeCatalog, CatalogError, CategoryStore, CommonStatus, Resolution, SkuCandidate, SkuSet,
    SkuValidationError,
};
use mallkit_core::{CategoryId, DomainError, PageResult, SkuId, SpuId};

use crate::sku::{ProductSku, SkuInput, find_sku_by_attrs};
use crate::spu::{ProductSpu, aggregate_skus};
use crate::store::{ProductStore, SpuPageQuery, StoreError, WriteBatch};

/// Create a product: the SPU fields plus the full SKU set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductSpu {
    pub cid: CategoryId,
    pub name: String,
    pub sell_point: String,
    pub description: String,
    pub pic_urls: Vec<String>,
    pub visible: bool,
    pub skus: Vec<SkuInput>,
}

impl CreateProductSpu {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_spu_fields(&self.name, &self.sell_point, &self.skus)
    }
}

/// Update a product: same shape as a create, addressed by SPU id. The SKU
/// set replaces the stored one (reconciled by attribute signature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductSpu {
    pub id: SpuId,
    pub cid: CategoryId,
    pub name: String,
    pub sell_point: String,
    pub description: String,
    pub pic_urls: Vec<String>,
    pub visible: bool,
    pub skus: Vec<SkuInput>,
}

impl UpdateProductSpu {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_spu_fields(&self.name, &self.sell_point, &self.skus)
    }
}

fn validate_spu_fields(name: &str, sell_point: &str, skus: &[SkuInput]) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if sell_point.trim().is_empty() {
        return Err(DomainError::validation("sell point cannot be empty"));
    }
    for sku in skus {
        sku.validate()?;
    }
    Ok(())
}

/// Why a product operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductSpuError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sku(#[from] SkuValidationError),

    #[error("product category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("products can only be attached to a non-root category: {0}")]
    CategoryNotLeaf(CategoryId),

    #[error("product spu not found: {0}")]
    SpuNotFound(SpuId),

    /// Category lookup transport failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProductSpuError {
    /// True only for transient collaborator failures; everything else is a
    /// request-shape error that must not be retried unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProductSpuError::Sku(e) => e.is_retryable(),
            ProductSpuError::Catalog(e) => e.is_retryable(),
            ProductSpuError::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Orchestrates product create/update/read flows.
///
/// Collaborators are passed in at construction: the attribute catalog, the
/// category store, and the product store. The manager holds no state of its
/// own and is safe to share across threads.
#[derive(Debug)]
pub struct ProductSpuManager<C, G, S> {
    catalog: C,
    categories: G,
    store: S,
}

impl<C, G, S> ProductSpuManager<C, G, S>
where
    C: AttributeCatalog,
    G: CategoryStore,
    S: ProductStore,
{
    pub fn new(catalog: C, categories: G, store: S) -> Self {
        Self {
            catalog,
            categories,
            store,
        }
    }

    /// Create an SPU together with its SKUs.
    ///
    /// Checks run in order: field validation, category check, SKU attribute
    /// validation (one catalog lookup), price/quantity aggregation; then the
    /// SPU and every SKU are committed in one atomic batch.
    pub fn create_product_spu(&self, input: CreateProductSpu) -> Result<SpuId, ProductSpuError> {
        input.validate()?;
        self.check_category(input.cid)?;
        let resolution = self.validate_skus(&input.skus)?;
        let aggregates =
            aggregate_skus(&input.skus).ok_or(SkuValidationError::EmptySkuSet)?;

        let now = Utc::now();
        let spu_id = SpuId::new();
        let spu = ProductSpu {
            id: spu_id,
            cid: input.cid,
            name: input.name,
            sell_point: input.sell_point,
            description: input.description,
            pic_urls: input.pic_urls,
            visible: input.visible,
            sort: 0,
            price: aggregates.price,
            quantity: aggregates.quantity,
            created_at: now,
            updated_at: now,
        };

        let mut batch = WriteBatch::new();
        batch.insert_spu(spu);
        for sku in &input.skus {
            batch.insert_sku(ProductSku {
                id: SkuId::new(),
                spu_id,
                attr_value_ids: sku.signature(),
                price: sku.price,
                quantity: sku.quantity,
                status: CommonStatus::Enabled,
            });
        }
        self.store.commit(batch)?;

        tracing::info!(
            "created product spu {} with {} skus over {} attribute values",
            spu_id,
            input.skus.len(),
            resolution.len()
        );
        Ok(spu_id)
    }

    /// Update an SPU and reconcile its SKU set.
    ///
    /// Incoming SKUs are matched against stored ones by attribute-set
    /// signature: matches are updated in place (price/stock), new
    /// combinations are inserted, stored SKUs with no incoming match are
    /// deleted. Everything lands in one atomic batch with the SPU update.
    pub fn update_product_spu(&self, input: UpdateProductSpu) -> Result<(), ProductSpuError> {
        input.validate()?;
        self.check_category(input.cid)?;
        self.validate_skus(&input.skus)?;
        let aggregates =
            aggregate_skus(&input.skus).ok_or(SkuValidationError::EmptySkuSet)?;

        let existing = self
            .store
            .get_spu(input.id)?
            .ok_or(ProductSpuError::SpuNotFound(input.id))?;
        let existing_skus = self.store.list_skus(input.id)?;

        let spu = ProductSpu {
            id: existing.id,
            cid: input.cid,
            name: input.name,
            sell_point: input.sell_point,
            description: input.description,
            pic_urls: input.pic_urls,
            visible: input.visible,
            sort: existing.sort,
            price: aggregates.price,
            quantity: aggregates.quantity,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let mut batch = WriteBatch::new();
        batch.update_spu(spu);

        let mut matched: HashSet<SkuId> = HashSet::new();
        let mut inserted = 0usize;
        let mut updated = 0usize;
        for sku in &input.skus {
            let signature = sku.signature();
            match find_sku_by_attrs(&existing_skus, &signature) {
                Some(current) => {
                    matched.insert(current.id);
                    updated += 1;
                    batch.update_sku(ProductSku {
                        id: current.id,
                        spu_id: existing.id,
                        attr_value_ids: signature,
                        price: sku.price,
                        quantity: sku.quantity,
                        status: CommonStatus::Enabled,
                    });
                }
                None => {
                    inserted += 1;
                    batch.insert_sku(ProductSku {
                        id: SkuId::new(),
                        spu_id: existing.id,
                        attr_value_ids: signature,
                        price: sku.price,
                        quantity: sku.quantity,
                        status: CommonStatus::Enabled,
                    });
                }
            }
        }
        let mut deleted = 0usize;
        for current in &existing_skus {
            if !matched.contains(&current.id) {
                deleted += 1;
                batch.delete_sku(current.id);
            }
        }

        self.store.commit(batch)?;

        tracing::info!(
            "updated product spu {}: {} skus updated, {} inserted, {} deleted",
            input.id,
            updated,
            inserted,
            deleted
        );
        Ok(())
    }

    pub fn get_product_spu(&self, id: SpuId) -> Result<ProductSpu, ProductSpuError> {
        self.store
            .get_spu(id)?
            .ok_or(ProductSpuError::SpuNotFound(id))
    }

    /// Fetch SPUs by id; unknown ids are skipped.
    pub fn list_product_spus(&self, ids: &[SpuId]) -> Result<Vec<ProductSpu>, ProductSpuError> {
        Ok(self.store.list_spus(ids)?)
    }

    pub fn page_product_spus(
        &self,
        query: &SpuPageQuery,
    ) -> Result<PageResult<ProductSpu>, ProductSpuError> {
        Ok(self.store.page_spus(query)?)
    }

    pub fn list_product_skus(&self, spu_id: SpuId) -> Result<Vec<ProductSku>, ProductSpuError> {
        Ok(self.store.list_skus(spu_id)?)
    }

    /// A product attaches only to an existing, non-root category.
    fn check_category(&self, cid: CategoryId) -> Result<(), ProductSpuError> {
        let category = self
            .categories
            .get_category(cid)?
            .ok_or(ProductSpuError::CategoryNotFound(cid))?;
        if category.is_root() {
            return Err(ProductSpuError::CategoryNotLeaf(cid));
        }
        Ok(())
    }

    fn validate_skus(&self, skus: &[SkuInput]) -> Result<Resolution, ProductSpuError> {
        let candidates = skus
            .iter()
            .map(|sku| SkuCandidate::new(sku.attr_value_ids.clone()))
            .collect();
        Ok(SkuSet::new(candidates).validate(&self.catalog)?)
    }
}
