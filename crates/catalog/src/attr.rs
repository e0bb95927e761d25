//! Attribute keys and values, plus the catalog lookup port.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mallkit_core::{AttrKeyId, AttrValueId, Entity, ValueObject};

/// Record status shared by catalog entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommonStatus {
    Enabled,
    Disabled,
}

impl CommonStatus {
    pub fn is_enabled(self) -> bool {
        matches!(self, CommonStatus::Enabled)
    }
}

/// An attribute key: a product dimension such as "color" or "size".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrKey {
    pub id: AttrKeyId,
    pub name: String,
    pub status: CommonStatus,
}

impl Entity for AttrKey {
    type Id = AttrKeyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An attribute value: one concrete value of a key, such as "red".
///
/// Many values map onto one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrValue {
    pub id: AttrValueId,
    pub key_id: AttrKeyId,
    pub name: String,
    pub status: CommonStatus,
}

impl Entity for AttrValue {
    type Id = AttrValueId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A resolved attribute pair: a value together with its owning key.
///
/// This is what a catalog lookup returns; callers keep it around to persist
/// SKUs without a second round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrKeyValue {
    pub attr_key_id: AttrKeyId,
    pub attr_key_name: String,
    pub attr_value_id: AttrValueId,
    pub attr_value_name: String,
}

impl ValueObject for AttrKeyValue {}

/// Catalog lookup failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// One or more requested attribute values do not exist or are disabled
    /// (either the value itself or its owning key). Permanent: the request
    /// must change before a retry can succeed.
    #[error("unknown or disabled attribute values: {attr_value_ids:?}")]
    Missing { attr_value_ids: Vec<AttrValueId> },

    /// The catalog backend could not be reached. Transient: the caller may
    /// retry the whole call unchanged.
    #[error("attribute catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    pub fn missing(mut attr_value_ids: Vec<AttrValueId>) -> Self {
        attr_value_ids.sort();
        Self::Missing { attr_value_ids }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Unavailable(_))
    }
}

/// Attribute catalog lookup port.
///
/// The single external collaborator of the SKU validator. Implementations
/// must be all-or-nothing: if any requested id is missing or disabled the
/// whole call fails with [`CatalogError::Missing`] rather than returning a
/// partial list.
pub trait AttributeCatalog {
    /// Resolve every requested attribute value to its owning key.
    ///
    /// A value counts as resolvable only when the value AND its owning key
    /// are enabled.
    fn resolve_enabled(
        &self,
        attr_value_ids: &BTreeSet<AttrValueId>,
    ) -> Result<Vec<AttrKeyValue>, CatalogError>;
}

impl<T: AttributeCatalog + ?Sized> AttributeCatalog for &T {
    fn resolve_enabled(
        &self,
        attr_value_ids: &BTreeSet<AttrValueId>,
    ) -> Result<Vec<AttrKeyValue>, CatalogError> {
        (**self).resolve_enabled(attr_value_ids)
    }
}
