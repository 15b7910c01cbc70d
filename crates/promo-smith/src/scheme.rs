use crate::ValidationError;
use core::fmt;

/// Prefix used when none is chosen.
pub const DEFAULT_PREFIX: &str = "AVZ-2DA-";

/// Duration sentinel meaning the promo never expires.
pub const LIFETIME: &str = "LIFETIME";

/// Duration used when none is chosen.
pub const DEFAULT_DURATION: &str = LIFETIME;

/// Distribution partner used when none is chosen.
pub const DEFAULT_PARTNER: &str = "AVAZ";

/// The prefix/duration/partner triple governing one allocation request.
///
/// Fields are opaque to the allocator; only `prefix` shapes the code. Each
/// field defaults independently.
///
/// # Example
/// ```
/// use promo_smith::NamingScheme;
///
/// let scheme = NamingScheme::default().with_prefix("INS-ACME-");
/// assert_eq!(scheme.prefix(), "INS-ACME-");
/// assert_eq!(scheme.duration(), "LIFETIME");
/// assert_eq!(scheme.partner(), "AVAZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamingScheme {
    prefix: String,
    duration: String,
    partner: String,
}

impl NamingScheme {
    pub fn new(
        prefix: impl Into<String>,
        duration: impl Into<String>,
        partner: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            duration: duration.into(),
            partner: partner.into(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    #[must_use]
    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = partner.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn partner(&self) -> &str {
        &self.partner
    }
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_DURATION, DEFAULT_PARTNER)
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prefix={}, duration={}, partner={}",
            self.prefix, self.duration, self.partner
        )
    }
}

/// Encodes a day count as a duration string, e.g. `45` becomes `45D`.
///
/// # Errors
/// Returns [`ValidationError::CustomDays`] unless `raw` (after trimming) is a
/// positive decimal integer.
pub fn days_duration(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let invalid = || ValidationError::CustomDays {
        raw: trimmed.to_string(),
    };
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(days) => Ok(format!("{days}D")),
    }
}

/// Unit letters a duration count may carry: days, months, years.
pub const DURATION_UNITS: [char; 3] = ['D', 'M', 'Y'];

/// `true` for [`LIFETIME`] or a positive count followed by a unit letter,
/// e.g. `30D`, `6M`, `1Y`.
///
/// ```
/// use promo_smith::is_duration;
///
/// assert!(is_duration("LIFETIME"));
/// assert!(is_duration("6M"));
/// assert!(!is_duration("0D"));
/// assert!(!is_duration("FOREVER"));
/// ```
pub fn is_duration(raw: &str) -> bool {
    raw == LIFETIME
        || raw
            .strip_suffix(DURATION_UNITS)
            .is_some_and(|count| days_duration(count).is_ok() && count == count.trim())
}
