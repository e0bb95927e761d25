//! `mallkit-catalog` — attribute catalog domain.
//!
//! Attribute keys/values, the catalog lookup port, product categories, and
//! the SKU attribute-consistency validator.

pub mod attr;
pub mod category;
pub mod validate;

pub use attr::{AttrKey, AttrKeyValue, AttrValue, AttributeCatalog, CatalogError, CommonStatus};
pub use category::{Category, CategoryStore};
pub use validate::{Resolution, SkuCandidate, SkuSet, SkuValidationError};
