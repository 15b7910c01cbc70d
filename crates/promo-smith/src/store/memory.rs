use crate::{AllocationRecord, PromoStore, StoreError};
use parking_lot::Mutex;
use std::collections::HashMap;

/// An in-process [`PromoStore`] backed by a map.
///
/// Used for dry runs and tests. By default it behaves like the remote
/// backend and accepts an insert even if the key is taken (the later record
/// wins); [`MemoryStore::with_unique_key`] makes it reject those inserts with
/// [`StoreError::Duplicate`] instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, AllocationRecord>>,
    unique_key: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that enforces uniqueness of `promoCodeId` on insert.
    pub fn with_unique_key() -> Self {
        Self {
            unique_key: true,
            ..Self::default()
        }
    }

    /// Preloads records, e.g. codes issued by an earlier run.
    pub fn seed(&self, records: impl IntoIterator<Item = AllocationRecord>) {
        let mut map = self.records.lock();
        for record in records {
            map.insert(record.promo_code_id.clone(), record);
        }
    }

    pub fn get(&self, promo_code_id: &str) -> Option<AllocationRecord> {
        self.records.lock().get(promo_code_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl PromoStore for MemoryStore {
    async fn exists(&self, promo_code_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.lock().contains_key(promo_code_id))
    }

    async fn insert(&self, record: &AllocationRecord) -> Result<(), StoreError> {
        let mut map = self.records.lock();
        if self.unique_key && map.contains_key(&record.promo_code_id) {
            return Err(StoreError::Duplicate {
                code: record.promo_code_id.clone(),
            });
        }
        map.insert(record.promo_code_id.clone(), record.clone());
        Ok(())
    }
}
