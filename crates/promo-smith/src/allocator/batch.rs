use crate::{AllocationError, Allocator, NamingScheme, PromoStore, RandSource, UserId};
use core::fmt;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Outcome of allocating a code for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationResult {
    /// A code was issued and recorded.
    Success { user: UserId, code: String },
    /// No code was issued.
    Failure {
        user: UserId,
        reason: AllocationError,
    },
}

impl AllocationResult {
    pub fn user(&self) -> &UserId {
        match self {
            Self::Success { user, .. } | Self::Failure { user, .. } => user,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Success { code, .. } => Some(code.as_str()),
            Self::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&AllocationError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { user, code } => write!(f, "{user} -> {code}"),
            Self::Failure { user, reason } => write!(f, "{user} -> ERROR: {reason}"),
        }
    }
}

/// Ordered per-user results of one batch, one entry per input user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    scheme: NamingScheme,
    results: Vec<AllocationResult>,
}

impl BatchReport {
    pub fn scheme(&self) -> &NamingScheme {
        &self.scheme
    }

    pub fn results(&self) -> &[AllocationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<AllocationResult> {
        self.results
    }

    /// Number of users in the batch.
    pub fn processed_count(&self) -> usize {
        self.results.len()
    }

    /// Number of users that did not receive a code.
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// Issued codes, in input order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter_map(AllocationResult::code)
    }
}

impl<R> Allocator<R>
where
    R: RandSource<u64>,
{
    /// Allocates a code for every user, in order.
    ///
    /// `users` are expected to be normalized, validated and deduplicated (see
    /// [`validate_user_list`](crate::validate_user_list)). One user's failure
    /// never stops the batch.
    pub async fn allocate_batch<S>(
        &self,
        users: &[UserId],
        scheme: &NamingScheme,
        store: &S,
    ) -> BatchReport
    where
        S: PromoStore,
    {
        self.allocate_batch_until(users, scheme, store, &CancellationToken::new())
            .await
    }

    /// Like [`Self::allocate_batch`], stopping early once `cancel` fires.
    ///
    /// Cancellation is checked between users only, so an allocation in flight
    /// always runs to completion. Users not yet started are reported as
    /// [`AllocationError::Cancelled`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(users = users.len(), scheme = %scheme))
    )]
    pub async fn allocate_batch_until<S>(
        &self,
        users: &[UserId],
        scheme: &NamingScheme,
        store: &S,
        cancel: &CancellationToken,
    ) -> BatchReport
    where
        S: PromoStore,
    {
        let mut issued = HashSet::with_capacity(users.len());
        let mut results = Vec::with_capacity(users.len());

        for user in users {
            if cancel.is_cancelled() {
                results.push(AllocationResult::Failure {
                    user: user.clone(),
                    reason: AllocationError::Cancelled,
                });
                continue;
            }

            let result = match self.allocate_excluding(user, scheme, store, &issued).await {
                Ok(code) => {
                    issued.insert(code.clone());
                    AllocationResult::Success {
                        user: user.clone(),
                        code,
                    }
                }
                Err(reason) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%user, "allocation failed: {reason}");
                    AllocationResult::Failure {
                        user: user.clone(),
                        reason,
                    }
                }
            };
            results.push(result);
        }

        let report = BatchReport {
            scheme: scheme.clone(),
            results,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            processed = report.processed_count(),
            errors = report.error_count(),
            "batch finished"
        );

        report
    }
}
