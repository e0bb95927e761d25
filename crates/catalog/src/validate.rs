//! SKU attribute-consistency validation.
//!
//! Before a product's SKUs are persisted, the full set submitted for one SPU
//! must be checked as a whole: every referenced attribute value has to exist
//! and be enabled, no SKU may list two values of the same key, every SKU must
//! span the same number of keys, and no two SKUs may be the same combination.
//!
//! Validation is fail-fast and makes exactly one catalog lookup.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use mallkit_core::{AttrKeyId, AttrValueId, ValueObject};

use crate::attr::{AttrKeyValue, AttributeCatalog, CatalogError};

/// One proposed SKU: the attribute values that identify the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuCandidate {
    attr_value_ids: Vec<AttrValueId>,
}

impl SkuCandidate {
    pub fn new(attr_value_ids: Vec<AttrValueId>) -> Self {
        Self { attr_value_ids }
    }

    pub fn attr_value_ids(&self) -> &[AttrValueId] {
        &self.attr_value_ids
    }

    pub fn len(&self) -> usize {
        self.attr_value_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attr_value_ids.is_empty()
    }

    /// Order-independent membership of this candidate's attribute values.
    pub fn signature(&self) -> BTreeSet<AttrValueId> {
        self.attr_value_ids.iter().copied().collect()
    }
}

impl ValueObject for SkuCandidate {}

/// The full collection of SKU candidates submitted together for one SPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuSet {
    candidates: Vec<SkuCandidate>,
}

impl SkuSet {
    pub fn new(candidates: Vec<SkuCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[SkuCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Set-union of every attribute value referenced by any candidate.
    pub fn attr_value_union(&self) -> BTreeSet<AttrValueId> {
        self.candidates
            .iter()
            .flat_map(|sku| sku.attr_value_ids.iter().copied())
            .collect()
    }

    /// Validate this SKU set against the attribute catalog.
    ///
    /// Checks run in order and abort on the first failure:
    ///
    /// 1. resolve the union of all attribute values with one catalog call
    ///    (every value must exist and be enabled);
    /// 2. within each candidate, no two values may share an attribute key;
    /// 3. every candidate must span the same number of attribute values;
    /// 4. no two candidates may be set-equal in their values.
    ///
    /// On success the resolution from step 1 is returned so the caller can
    /// persist SKUs without a second catalog round trip. Inputs are never
    /// mutated and no state is shared across calls.
    pub fn validate(
        &self,
        catalog: &impl AttributeCatalog,
    ) -> Result<Resolution, SkuValidationError> {
        if self.candidates.is_empty() {
            return Err(SkuValidationError::EmptySkuSet);
        }
        for (index, sku) in self.candidates.iter().enumerate() {
            if sku.is_empty() {
                return Err(SkuValidationError::EmptySkuCandidate { index });
            }
        }

        // Step 1: one all-or-nothing lookup for the whole set.
        let resolution = Resolution::resolve(catalog, &self.attr_value_union())?;

        // Step 2: no duplicate attribute key within one candidate.
        for (index, sku) in self.candidates.iter().enumerate() {
            let mut keys: HashSet<AttrKeyId> = HashSet::with_capacity(sku.len());
            for value_id in sku.attr_value_ids() {
                let key_id = resolution.key_of(*value_id).ok_or_else(|| {
                    SkuValidationError::AttributeNotFound {
                        missing: vec![*value_id],
                    }
                })?;
                if !keys.insert(key_id) {
                    return Err(SkuValidationError::DuplicateAttributeWithinSku {
                        index,
                        attr_key_id: key_id,
                    });
                }
            }
        }

        // Step 3: uniform dimensionality across candidates.
        let expected = self.candidates[0].len();
        for (index, sku) in self.candidates.iter().enumerate().skip(1) {
            if sku.len() != expected {
                return Err(SkuValidationError::InconsistentAttributeCount {
                    expected,
                    index,
                    actual: sku.len(),
                });
            }
        }

        // Step 4: no two candidates with the same value membership.
        let mut signatures: HashSet<BTreeSet<AttrValueId>> =
            HashSet::with_capacity(self.candidates.len());
        for (index, sku) in self.candidates.iter().enumerate() {
            if !signatures.insert(sku.signature()) {
                return Err(SkuValidationError::DuplicateSku { index });
            }
        }

        Ok(resolution)
    }
}

/// The attribute-value → attribute-key resolution produced by a successful
/// validation, covering exactly the union of requested values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    by_value: HashMap<AttrValueId, AttrKeyValue>,
}

impl Resolution {
    fn resolve(
        catalog: &impl AttributeCatalog,
        union: &BTreeSet<AttrValueId>,
    ) -> Result<Self, SkuValidationError> {
        let resolved = catalog.resolve_enabled(union)?;
        let by_value = resolved
            .into_iter()
            .map(|kv| (kv.attr_value_id, kv))
            .collect();
        Ok(Self { by_value })
    }

    pub fn get(&self, attr_value_id: AttrValueId) -> Option<&AttrKeyValue> {
        self.by_value.get(&attr_value_id)
    }

    /// The owning key of a resolved attribute value.
    pub fn key_of(&self, attr_value_id: AttrValueId) -> Option<AttrKeyId> {
        self.by_value.get(&attr_value_id).map(|kv| kv.attr_key_id)
    }

    /// The resolved attribute values, sorted by value id.
    pub fn attr_value_ids(&self) -> BTreeSet<AttrValueId> {
        self.by_value.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}

/// Why a SKU set was rejected.
///
/// Every variant except [`SkuValidationError::CatalogUnavailable`] is a
/// request-shape error: retrying the same request can never succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkuValidationError {
    /// The submitted set contained no SKUs at all.
    #[error("sku set must contain at least one sku")]
    EmptySkuSet,

    /// One submitted SKU referenced no attribute values.
    #[error("sku {index} must reference at least one attribute value")]
    EmptySkuCandidate { index: usize },

    /// One or more referenced attribute values are unknown or disabled.
    #[error("unknown or disabled attribute values: {missing:?}")]
    AttributeNotFound { missing: Vec<AttrValueId> },

    /// A single SKU specified two values of the same attribute key.
    #[error("sku {index} lists two values of attribute key {attr_key_id}")]
    DuplicateAttributeWithinSku { index: usize, attr_key_id: AttrKeyId },

    /// SKUs within one submission span differing numbers of attribute keys.
    #[error("all skus must declare {expected} attribute values, sku {index} has {actual}")]
    InconsistentAttributeCount {
        expected: usize,
        index: usize,
        actual: usize,
    },

    /// Two SKUs within one submission are the same attribute combination.
    #[error("sku {index} repeats an earlier attribute combination")]
    DuplicateSku { index: usize },

    /// The catalog could not be reached; the whole validation may be retried.
    #[error("attribute catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl SkuValidationError {
    /// True only for transient failures; request-shape errors must not be
    /// retried without changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkuValidationError::CatalogUnavailable(_))
    }
}

impl From<CatalogError> for SkuValidationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Missing { attr_value_ids } => SkuValidationError::AttributeNotFound {
                missing: attr_value_ids,
            },
            CatalogError::Unavailable(reason) => SkuValidationError::CatalogUnavailable(reason),
        }
    }
}
