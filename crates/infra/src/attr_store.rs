//! In-memory attribute catalog.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use mallkit_catalog::{AttrKey, AttrKeyValue, AttrValue, AttributeCatalog, CatalogError};
use mallkit_core::{AttrKeyId, AttrValueId, DomainError, DomainResult};

#[derive(Debug, Default)]
struct AttrState {
    keys: HashMap<AttrKeyId, AttrKey>,
    values: HashMap<AttrValueId, AttrValue>,
    outage: Option<String>,
}

/// In-memory attribute catalog.
///
/// Intended for tests/dev. `set_unavailable` simulates a transient backend
/// outage.
#[derive(Debug, Default)]
pub struct InMemoryAttributeCatalog {
    state: RwLock<AttrState>,
}

impl InMemoryAttributeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_key(&self, key: AttrKey) -> DomainResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::invariant("lock poisoned"))?;
        state.keys.insert(key.id, key);
        Ok(())
    }

    /// Insert an attribute value. Its owning key must already exist.
    pub fn insert_value(&self, value: AttrValue) -> DomainResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| DomainError::invariant("lock poisoned"))?;
        if !state.keys.contains_key(&value.key_id) {
            return Err(DomainError::invariant(format!(
                "attr value {} references unknown key {}",
                value.id, value.key_id
            )));
        }
        state.values.insert(value.id, value);
        Ok(())
    }

    /// Simulate a transient backend outage: every lookup fails retryably
    /// until `set_available` is called.
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
}

impl AttributeCatalog for InMemoryAttributeCatalog {
    fn resolve_enabled(
        &self,
        attr_value_ids: &BTreeSet<AttrValueId>,
    ) -> Result<Vec<AttrKeyValue>, CatalogError> {
        let state = self
            .state
            .read()
            .map_err(|_| CatalogError::unavailable("lock poisoned"))?;
        if let Some(reason) = &state.outage {
            return Err(CatalogError::unavailable(reason.clone()));
        }

        // All-or-nothing: a value resolves only when it and its owning key
        // are both present and enabled.
        let mut missing = Vec::new();
        let mut resolved = Vec::with_capacity(attr_value_ids.len());
        for id in attr_value_ids {
            let hit = state.values.get(id).filter(|v| v.status.is_enabled()).and_then(|value| {
                state
                    .keys
                    .get(&value.key_id)
                    .filter(|k| k.status.is_enabled())
                    .map(|key| AttrKeyValue {
                        attr_key_id: key.id,
                        attr_key_name: key.name.clone(),
                        attr_value_id: value.id,
                        attr_value_name: value.name.clone(),
                    })
            });
            match hit {
                Some(kv) => resolved.push(kv),
                None => missing.push(*id),
            }
        }
        if !missing.is_empty() {
            return Err(CatalogError::missing(missing));
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallkit_catalog::CommonStatus;

    fn key(name: &str, status: CommonStatus) -> AttrKey {
        AttrKey {
            id: AttrKeyId::new(),
            name: name.to_string(),
            status,
        }
    }

    fn value(key_id: AttrKeyId, name: &str, status: CommonStatus) -> AttrValue {
        AttrValue {
            id: AttrValueId::new(),
            key_id,
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn resolves_enabled_values_with_owning_key() {
        let catalog = InMemoryAttributeCatalog::new();
        let color = key("color", CommonStatus::Enabled);
        let red = value(color.id, "red", CommonStatus::Enabled);
        catalog.insert_key(color.clone()).unwrap();
        catalog.insert_value(red.clone()).unwrap();

        let resolved = catalog
            .resolve_enabled(&[red.id].into_iter().collect())
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].attr_key_id, color.id);
        assert_eq!(resolved[0].attr_key_name, "color");
        assert_eq!(resolved[0].attr_value_name, "red");
    }

    #[test]
    fn disabled_value_fails_the_whole_call() {
        let catalog = InMemoryAttributeCatalog::new();
        let color = key("color", CommonStatus::Enabled);
        let red = value(color.id, "red", CommonStatus::Enabled);
        let blue = value(color.id, "blue", CommonStatus::Disabled);
        catalog.insert_key(color).unwrap();
        catalog.insert_value(red.clone()).unwrap();
        catalog.insert_value(blue.clone()).unwrap();

        let err = catalog
            .resolve_enabled(&[red.id, blue.id].into_iter().collect())
            .unwrap_err();
        match err {
            CatalogError::Missing { attr_value_ids } => {
                assert_eq!(attr_value_ids, vec![blue.id]);
            }
            other => panic!("Expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn disabled_key_disables_all_its_values() {
        let catalog = InMemoryAttributeCatalog::new();
        let color = key("color", CommonStatus::Disabled);
        let red = value(color.id, "red", CommonStatus::Enabled);
        catalog.insert_key(color).unwrap();
        catalog.insert_value(red.clone()).unwrap();

        let err = catalog
            .resolve_enabled(&[red.id].into_iter().collect())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Missing { .. }));
    }

    #[test]
    fn value_requires_existing_key() {
        let catalog = InMemoryAttributeCatalog::new();
        let err = catalog
            .insert_value(value(AttrKeyId::new(), "red", CommonStatus::Enabled))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn outage_is_reported_as_unavailable() {
        let catalog = InMemoryAttributeCatalog::new();
        catalog.set_unavailable("maintenance window");

        let err = catalog.resolve_enabled(&BTreeSet::new()).unwrap_err();
        match &err {
            CatalogError::Unavailable(reason) => assert!(reason.contains("maintenance")),
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert!(err.is_retryable());

        catalog.set_available();
        assert!(catalog.resolve_enabled(&BTreeSet::new()).is_ok());
    }
}
