//! In-process route store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::routes::{NewRouteRecord, RouteRecord};
use crate::traits::RouteStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("route not found: {0}")]
    NotFound(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A [`RouteStore`] backed by a map in memory. Ids are `route-1`, `route-2`, ...
#[derive(Debug, Default)]
pub struct MemoryRouteStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    records: BTreeMap<String, RouteRecord>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(
        &self,
        f: impl FnOnce(&mut Inner) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend("route store lock poisoned".to_string()))?;
        f(&mut *inner)
    }
}

impl RouteStore for MemoryRouteStore {
    fn insert(&self, record: NewRouteRecord) -> Result<RouteRecord, StoreError> {
        self.with_inner(|inner| {
            inner.next_id += 1;
            let stored = record.with_id(format!("route-{}", inner.next_id), inner.next_id);
            inner.records.insert(stored.id.clone(), stored.clone());
            Ok(stored)
        })
    }

    fn get(&self, id: &str) -> Result<RouteRecord, StoreError> {
        self.with_inner(|inner| {
            inner
                .records
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }

    fn update(&self, record: RouteRecord) -> Result<RouteRecord, StoreError> {
        self.with_inner(|inner| match inner.records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record)
            }
            None => Err(StoreError::NotFound(record.id)),
        })
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            inner
                .records
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })
    }

    fn list(&self) -> Result<Vec<RouteRecord>, StoreError> {
        self.with_inner(|inner| Ok(inner.records.values().cloned().collect()))
    }
}
