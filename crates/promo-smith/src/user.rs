//! User identifiers: normalization, deduplication and validation.
//!
//! An identifier is either an email (anything containing `@`, trimmed and
//! lowercased) or a phone number (only digits and `+` kept). Normalization is
//! idempotent, so identifiers can be compared by their normalized form.

use crate::ValidationError;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shortest accepted phone number, in digits.
const PHONE_MIN_DIGITS: usize = 7;
/// Longest accepted phone number, in digits (E.164).
const PHONE_MAX_DIGITS: usize = 15;
/// How many offending identifiers a validation error lists.
const MAX_REPORTED_INVALID: usize = 5;

/// A normalized email or phone identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Normalizes `raw` into an identifier.
    ///
    /// ```
    /// use promo_smith::UserId;
    ///
    /// assert_eq!(UserId::normalize("  A@X.COM ").as_str(), "a@x.com");
    /// assert_eq!(UserId::normalize("+1 (415) 555-0100").as_str(), "+14155550100");
    /// ```
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.contains('@') {
            Self(trimmed.to_lowercase())
        } else {
            Self(
                trimmed
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect(),
            )
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if the identifier looks like an email or a phone number.
    pub fn is_valid(&self) -> bool {
        is_email(&self.0) || is_phone(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain with
// text on both sides.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// `+?` followed by 7 to 15 digits.
fn is_phone(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Normalizes and deduplicates identifiers, keeping first-occurrence order.
/// Entries that are blank after trimming are dropped. Anything else is kept,
/// even if it normalizes to nothing, so validation can report it.
pub fn dedup_users<I, S>(raw: I) -> Vec<UserId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|s| {
            let s = s.as_ref().trim();
            (!s.is_empty()).then(|| UserId::normalize(s))
        })
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Splits comma-separated input into normalized, deduplicated identifiers.
pub fn parse_user_ids(raw: &str) -> Vec<UserId> {
    dedup_users(split_entries(raw))
}

fn split_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parses and validates a comma-separated user list.
///
/// # Errors
/// - [`ValidationError::LineBreakSeparated`] if the input uses line breaks
///   but no commas.
/// - [`ValidationError::Empty`] if no identifier remains.
/// - [`ValidationError::Invalid`] listing up to five invalid identifiers.
pub fn validate_user_list(raw: &str) -> Result<Vec<UserId>, ValidationError> {
    if raw.contains(['\n', '\r']) && !raw.contains(',') {
        return Err(ValidationError::LineBreakSeparated);
    }
    validate_user_entries(split_entries(raw))
}

/// Normalizes, deduplicates and validates raw entries, one identifier each.
///
/// Invalid entries are reported by their normalized form, or by the raw text
/// when nothing survives normalization (e.g. `nope`).
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::Invalid`].
pub fn validate_user_entries<I, S>(entries: I) -> Result<Vec<UserId>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut users = Vec::new();
    let mut invalid = Vec::new();

    for entry in entries {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }
        let id = UserId::normalize(entry);
        if !seen.insert(id.clone()) {
            continue;
        }
        if !id.is_valid() && invalid.len() < MAX_REPORTED_INVALID {
            invalid.push(if id.0.is_empty() {
                entry.to_string()
            } else {
                id.0.clone()
            });
        }
        users.push(id);
    }

    if users.is_empty() {
        Err(ValidationError::Empty)
    } else if !invalid.is_empty() {
        Err(ValidationError::Invalid { invalid })
    } else {
        Ok(users)
    }
}

/// Validates already-normalized identifiers.
///
/// # Errors
/// [`ValidationError::Empty`] or [`ValidationError::Invalid`].
pub fn validate_users(users: Vec<UserId>) -> Result<Vec<UserId>, ValidationError> {
    if users.is_empty() {
        return Err(ValidationError::Empty);
    }
    let invalid: Vec<String> = users
        .iter()
        .filter(|id| !id.is_valid())
        .take(MAX_REPORTED_INVALID)
        .map(|id| id.0.clone())
        .collect();
    if invalid.is_empty() {
        Ok(users)
    } else {
        Err(ValidationError::Invalid { invalid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(users: &[UserId]) -> Vec<&str> {
        users.iter().map(UserId::as_str).collect()
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  Foo@Bar.COM", "+1 415 555 0100", "(020) 7946-0958", "x"] {
            let once = UserId::normalize(raw);
            let twice = UserId::normalize(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn dedups_by_normalized_value_in_first_occurrence_order() {
        let users = parse_user_ids("a@x.com, A@X.COM,+1 415 555 0100");
        assert_eq!(ids(&users), ["a@x.com", "+14155550100"]);

        let users = parse_user_ids("b@x.com,a@x.com,B@x.com");
        assert_eq!(ids(&users), ["b@x.com", "a@x.com"]);
    }

    #[test]
    fn empty_entries_are_dropped() {
        let users = parse_user_ids(" , a@x.com ,, ");
        assert_eq!(ids(&users), ["a@x.com"]);
    }

    #[test]
    fn email_and_phone_shapes() {
        assert!(UserId::normalize("user@example.org").is_valid());
        assert!(UserId::normalize("+919876543210").is_valid());
        assert!(UserId::normalize("5550100").is_valid());

        assert!(!UserId::normalize("user@example").is_valid());
        assert!(!UserId::normalize("@example.org").is_valid());
        assert!(!UserId::normalize("a@b@c.org").is_valid());
        assert!(!UserId::normalize("123456").is_valid());
        assert!(!UserId::normalize("1234567890123456").is_valid());
        assert!(!UserId::normalize("++1234567").is_valid());
    }

    #[test]
    fn line_breaks_without_commas_are_rejected() {
        assert_eq!(
            validate_user_list("a@x.com\nb@x.com"),
            Err(ValidationError::LineBreakSeparated)
        );
        let users = validate_user_list("a@x.com,\nb@x.com").unwrap();
        assert_eq!(ids(&users), ["a@x.com", "b@x.com"]);
    }

    #[test]
    fn entries_without_identifier_characters_are_invalid() {
        assert_eq!(
            validate_user_list("a@x.com, nope"),
            Err(ValidationError::Invalid {
                invalid: vec!["nope".to_string()]
            })
        );
        assert_eq!(
            validate_user_list("hello"),
            Err(ValidationError::Invalid {
                invalid: vec!["hello".to_string()]
            })
        );
    }

    #[test]
    fn dedup_keeps_entries_that_normalize_to_nothing() {
        let users = dedup_users(["a@x.com", "nope", "  ", "hello"]);
        assert_eq!(ids(&users), ["a@x.com", ""]);
        assert!(!users[1].is_valid());
    }

    #[test]
    fn entries_are_validated_after_normalization() {
        let users =
            validate_user_entries(["A@X.COM", "a@x.com", " +1 415 555 0100 ", ""]).unwrap();
        assert_eq!(ids(&users), ["a@x.com", "+14155550100"]);
        assert_eq!(validate_user_entries(["", "  "]), Err(ValidationError::Empty));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(validate_user_list(" , "), Err(ValidationError::Empty));
    }

    #[test]
    fn reports_at_most_five_invalid_entries() {
        let raw = "bad1@x, bad2@x, ok@x.com, bad3@x, bad4@x, bad5@x, bad6@x";
        let Err(ValidationError::Invalid { invalid }) = validate_user_list(raw) else {
            panic!("expected invalid entries");
        };
        assert_eq!(invalid, ["bad1@x", "bad2@x", "bad3@x", "bad4@x", "bad5@x"]);
    }
}
