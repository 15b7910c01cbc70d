use crate::{
    AllocationError, AllocationRecord, AllocatorConfig, CodeSynthesizer, NamingScheme, PromoStore,
    RandSource, Result, StoreError, ThreadRandom, UserId,
};
use std::collections::HashSet;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Issues unique promo codes against a [`PromoStore`].
///
/// # Example
/// ```
/// use promo_smith::{Allocator, AllocatorConfig, MemoryStore, NamingScheme, ThreadRandom, UserId};
///
/// # tokio_test_block_on(async {
/// let allocator = Allocator::new(AllocatorConfig::default(), ThreadRandom);
/// let store = MemoryStore::new();
/// let scheme = NamingScheme::default();
///
/// let code = allocator
///     .allocate(&UserId::normalize("a@x.com"), &scheme, &store)
///     .await
///     .unwrap();
/// assert!(code.starts_with("AVZ-2DA-"));
/// assert_eq!(store.len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Allocator<R = ThreadRandom> {
    synth: CodeSynthesizer<R>,
    config: AllocatorConfig,
}

impl Default for Allocator<ThreadRandom> {
    fn default() -> Self {
        Self::new(AllocatorConfig::default(), ThreadRandom)
    }
}

impl<R> Allocator<R>
where
    R: RandSource<u64>,
{
    pub const fn new(config: AllocatorConfig, rng: R) -> Self {
        Self {
            synth: CodeSynthesizer::new(rng),
            config,
        }
    }

    pub const fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates and records one code for `user`.
    ///
    /// # Errors
    /// - [`AllocationError::CollisionRetryExhausted`] if every attempt
    ///   collided.
    /// - [`AllocationError::StoreFault`] on the first store fault that is not
    ///   retried (see [`AllocatorConfig::with_store_retries`]).
    pub async fn allocate<S>(
        &self,
        user: &UserId,
        scheme: &NamingScheme,
        store: &S,
    ) -> Result<String>
    where
        S: PromoStore,
    {
        self.allocate_excluding(user, scheme, store, &HashSet::new())
            .await
    }

    /// Like [`Self::allocate`], treating every code in `issued` as taken.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(user = %user, prefix = scheme.prefix()))
    )]
    pub(crate) async fn allocate_excluding<S>(
        &self,
        user: &UserId,
        scheme: &NamingScheme,
        store: &S,
        issued: &HashSet<String>,
    ) -> Result<String>
    where
        S: PromoStore,
    {
        let mut tried = HashSet::new();

        for _attempt in 1..=self.config.max_attempts() {
            let suffix = self.synth.synthesize(&mut tried);
            let code = format!("{}{suffix}", scheme.prefix());

            if issued.contains(&code) || self.exists(store, &code).await? {
                #[cfg(feature = "tracing")]
                tracing::trace!(attempt = _attempt, %code, "collision");
                continue;
            }

            let record = AllocationRecord::new(code.as_str(), user, scheme);
            match store.insert(&record).await {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt = _attempt, %code, "issued");
                    return Ok(code);
                }
                // Lost a race against another writer on a backend with a
                // unique key.
                Err(StoreError::Duplicate { .. }) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt = _attempt, %code, "duplicate on insert");
                }
                Err(err) => return Err(err.into()),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempts = self.config.max_attempts(),
            "giving up after repeated collisions"
        );
        Err(AllocationError::CollisionRetryExhausted {
            attempts: self.config.max_attempts(),
        })
    }

    async fn exists<S>(&self, store: &S, code: &str) -> Result<bool>
    where
        S: PromoStore,
    {
        let mut faults = 0;
        loop {
            match store.exists(code).await {
                Ok(found) => return Ok(found),
                Err(_err) if faults < self.config.store_retries() => {
                    faults += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%code, faults, "existence check failed, retrying: {_err}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
