//! SKU: one purchasable variant of an SPU.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use mallkit_catalog::CommonStatus;
use mallkit_core::{AttrValueId, DomainError, DomainResult, Entity, SkuId, SpuId};

/// One incoming SKU of a create/update submission: the attribute values that
/// identify the variant plus its own price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuInput {
    pub attr_value_ids: Vec<AttrValueId>,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: u64,
    pub quantity: u32,
}

impl SkuInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.price == 0 {
            return Err(DomainError::validation("sku price must be positive"));
        }
        Ok(())
    }

    /// Order-independent membership of this SKU's attribute values.
    pub fn signature(&self) -> BTreeSet<AttrValueId> {
        self.attr_value_ids.iter().copied().collect()
    }
}

/// A stored product variant. The attribute membership is kept as a sorted
/// set, so two SKUs with the same values in a different order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSku {
    pub id: SkuId,
    pub spu_id: SpuId,
    pub attr_value_ids: BTreeSet<AttrValueId>,
    pub price: u64,
    pub quantity: u32,
    pub status: CommonStatus,
}

impl Entity for ProductSku {
    type Id = SkuId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Find the stored SKU whose attribute membership equals `attrs`, if any.
pub fn find_sku_by_attrs<'a>(
    skus: &'a [ProductSku],
    attrs: &BTreeSet<AttrValueId>,
) -> Option<&'a ProductSku> {
    skus.iter().find(|sku| &sku.attr_value_ids == attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_sku(spu_id: SpuId, ids: &[AttrValueId]) -> ProductSku {
        ProductSku {
            id: SkuId::new(),
            spu_id,
            attr_value_ids: ids.iter().copied().collect(),
            price: 100,
            quantity: 1,
            status: CommonStatus::Enabled,
        }
    }

    #[test]
    fn find_matches_on_set_membership_not_order() {
        let spu_id = SpuId::new();
        let a = AttrValueId::new();
        let b = AttrValueId::new();
        let c = AttrValueId::new();
        let skus = vec![stored_sku(spu_id, &[a, b]), stored_sku(spu_id, &[a, c])];

        let wanted: BTreeSet<AttrValueId> = [b, a].into_iter().collect();
        let found = find_sku_by_attrs(&skus, &wanted).unwrap();
        assert_eq!(found.id, skus[0].id);
    }

    #[test]
    fn find_rejects_subset_and_superset() {
        let spu_id = SpuId::new();
        let a = AttrValueId::new();
        let b = AttrValueId::new();
        let skus = vec![stored_sku(spu_id, &[a, b])];

        let subset: BTreeSet<AttrValueId> = [a].into_iter().collect();
        let superset: BTreeSet<AttrValueId> = [a, b, AttrValueId::new()].into_iter().collect();
        assert!(find_sku_by_attrs(&skus, &subset).is_none());
        assert!(find_sku_by_attrs(&skus, &superset).is_none());
    }

    #[test]
    fn sku_input_rejects_zero_price() {
        let input = SkuInput {
            attr_value_ids: vec![AttrValueId::new()],
            price: 0,
            quantity: 5,
        };
        let err = input.validate().unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for zero price"),
        }
    }
}
