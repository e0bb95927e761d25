//! `mallkit-product` — product SPU/SKU domain.
//!
//! The SPU is the parent product record; SKUs are its purchasable variants,
//! each identified by a combination of attribute values. The manager
//! orchestrates category checks, attribute validation, price/quantity
//! aggregation, and atomic persistence.

pub mod manager;
pub mod sku;
pub mod spu;
pub mod store;

pub use manager::{CreateProductSpu, ProductSpuError, ProductSpuManager, UpdateProductSpu};
pub use sku::{ProductSku, SkuInput, find_sku_by_attrs};
pub use spu::{ProductSpu, SpuAggregates, aggregate_skus};
pub use store::{ProductStore, ProductWrite, SpuPageQuery, StoreError, WriteBatch};
