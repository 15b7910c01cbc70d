use crate::{NamingScheme, UserId};
use serde::{Deserialize, Serialize};

/// Number of devices a freshly issued code may be redeemed on.
pub const DEVICE_COUNT_LIMIT: u32 = 1;

/// The row written to the remote store for every issued code.
///
/// Serializes with the store's field names (`promoCodeId`, `promoCodeUser`,
/// ...). Records are written once and never updated by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRecord {
    pub promo_code_id: String,
    pub promo_code_user: UserId,
    pub promo_code_duration: String,
    pub promo_code_distribution_partner: String,
    pub promo_code_device_count_limit: u32,
}

impl AllocationRecord {
    /// Builds the record issuing `code` to `user` under `scheme`.
    pub fn new(code: impl Into<String>, user: &UserId, scheme: &NamingScheme) -> Self {
        Self {
            promo_code_id: code.into(),
            promo_code_user: user.clone(),
            promo_code_duration: scheme.duration().to_string(),
            promo_code_distribution_partner: scheme.partner().to_string(),
            promo_code_device_count_limit: DEVICE_COUNT_LIMIT,
        }
    }
}
