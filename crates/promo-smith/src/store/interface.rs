use crate::{AllocationRecord, StoreError};
use core::future::Future;

/// The remote collection of [`AllocationRecord`]s keyed by `promoCodeId`.
///
/// The store offers only a lookup and an append. There is no atomic
/// check-and-insert, so two allocators racing on the same code between
/// [`exists`](Self::exists) and [`insert`](Self::insert) can both succeed.
/// Backends that do enforce a unique key report the loser with
/// [`StoreError::Duplicate`].
pub trait PromoStore {
    /// Returns whether any record with `promo_code_id` exists.
    fn exists(&self, promo_code_id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Appends `record` to the collection.
    fn insert(
        &self,
        record: &AllocationRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
