//! SPU: the parent product record shared by its variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mallkit_core::{CategoryId, Entity, SpuId};

use crate::sku::SkuInput;

/// The parent product record. `price` and `quantity` are derived from the
/// SKUs: the minimum price across variants and the sum of their stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpu {
    pub id: SpuId,
    pub cid: CategoryId,
    pub name: String,
    pub sell_point: String,
    pub description: String,
    pub pic_urls: Vec<String>,
    pub visible: bool,
    pub sort: i32,
    /// Minimum SKU price, in the smallest currency unit (e.g. cents).
    pub price: u64,
    /// Total stock across all SKUs.
    pub quantity: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for ProductSpu {
    type Id = SpuId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Price/quantity aggregates derived from a SKU list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpuAggregates {
    /// Minimum SKU price.
    pub price: u64,
    /// Sum of SKU stock quantities.
    pub quantity: u64,
}

/// Fold a SKU list into the SPU-level aggregates.
///
/// Returns `None` for an empty list; callers validate non-emptiness before
/// aggregating, so `None` signals a precondition violation upstream.
pub fn aggregate_skus(skus: &[SkuInput]) -> Option<SpuAggregates> {
    let price = skus.iter().map(|sku| sku.price).min()?;
    let quantity = skus.iter().map(|sku| u64::from(sku.quantity)).sum();
    Some(SpuAggregates { price, quantity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallkit_core::AttrValueId;

    fn sku(price: u64, quantity: u32) -> SkuInput {
        SkuInput {
            attr_value_ids: vec![AttrValueId::new()],
            price,
            quantity,
        }
    }

    #[test]
    fn aggregates_take_min_price_and_sum_quantity() {
        let agg = aggregate_skus(&[sku(1999, 10), sku(1499, 3), sku(2999, 0)]).unwrap();
        assert_eq!(agg.price, 1499);
        assert_eq!(agg.quantity, 13);
    }

    #[test]
    fn single_sku_aggregates_to_itself() {
        let agg = aggregate_skus(&[sku(500, 7)]).unwrap();
        assert_eq!(agg.price, 500);
        assert_eq!(agg.quantity, 7);
    }

    #[test]
    fn empty_sku_list_has_no_aggregates() {
        assert!(aggregate_skus(&[]).is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the aggregate price is a lower bound attained by
            /// some SKU, and quantity is the exact sum.
            #[test]
            fn aggregates_are_min_and_sum(
                prices_and_quantities in proptest::collection::vec(
                    (1u64..1_000_000, 0u32..10_000),
                    1..32,
                ),
            ) {
                let skus: Vec<SkuInput> = prices_and_quantities
                    .iter()
                    .map(|(p, q)| sku(*p, *q))
                    .collect();

                let agg = aggregate_skus(&skus).unwrap();
                prop_assert!(skus.iter().all(|s| agg.price <= s.price));
                prop_assert!(skus.iter().any(|s| agg.price == s.price));
                let expected: u64 = skus.iter().map(|s| u64::from(s.quantity)).sum();
                prop_assert_eq!(agg.quantity, expected);
            }
        }
    }
}
