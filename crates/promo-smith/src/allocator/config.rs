use crate::SUFFIX_SPACE;

/// Attempts per user before giving up with
/// [`CollisionRetryExhausted`](crate::AllocationError::CollisionRetryExhausted).
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Extra tries for a faulted existence check. Zero keeps store faults fatal
/// for the user on first occurrence.
pub const DEFAULT_STORE_RETRIES: usize = 0;

/// Tunables for an [`Allocator`](crate::Allocator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    max_attempts: usize,
    store_retries: usize,
}

impl AllocatorConfig {
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            store_retries: DEFAULT_STORE_RETRIES,
        }
    }

    /// Sets the attempt bound per user.
    ///
    /// Clamped to `1..=SUFFIX_SPACE`: every user gets at least one attempt,
    /// and no prefix has more distinct codes than [`SUFFIX_SPACE`].
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = if max_attempts == 0 {
            1
        } else if (max_attempts as u64) > SUFFIX_SPACE {
            SUFFIX_SPACE as usize
        } else {
            max_attempts
        };
        self
    }

    /// Sets how many times a faulted existence check is repeated before the
    /// fault is reported. Inserts are never repeated: a faulted insert may
    /// still have been stored.
    #[must_use]
    pub const fn with_store_retries(mut self, store_retries: usize) -> Self {
        self.store_retries = store_retries;
        self
    }

    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub const fn store_retries(&self) -> usize {
        self.store_retries
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
