//! Product categories.

use serde::{Deserialize, Serialize};

use mallkit_core::{CategoryId, Entity};

use crate::attr::{CatalogError, CommonStatus};

/// A product category node.
///
/// Categories form a two-level tree: root categories have no parent, leaf
/// categories carry a `parent_id`. Products attach to leaf categories only;
/// that rule is enforced by the SPU manager, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub status: CommonStatus,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category lookup port.
///
/// Absence is `Ok(None)`; [`CatalogError::Unavailable`] signals a transient
/// backend failure.
pub trait CategoryStore {
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError>;
}

impl<T: CategoryStore + ?Sized> CategoryStore for &T {
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        (**self).get_category(id)
    }
}
