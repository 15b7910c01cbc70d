//! Random suffix synthesis.
//!
//! A promo code is `prefix + suffix`, where the suffix is [`SUFFIX_LEN`]
//! symbols drawn from [`ALPHABET`]. The [`CodeSynthesizer`] turns a
//! [`RandSource`] into suffixes that never repeat within one tried-set.

use crate::{RandSource, ThreadRandom};
use core::fmt;
use std::collections::HashSet;

/// Symbols a suffix is drawn from.
pub const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Number of symbols in a suffix.
pub const SUFFIX_LEN: usize = 4;

/// Number of distinct suffixes (`36^4`).
pub const SUFFIX_SPACE: u64 = 36 * 36 * 36 * 36;

// Largest multiple of `SUFFIX_SPACE` that fits in a `u64`. Draws at or above
// it are rejected so every suffix is equally likely.
const ACCEPT_ZONE: u64 = u64::MAX - (u64::MAX % SUFFIX_SPACE);

/// A fixed-length code suffix such as `Q7ZB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Suffix([u8; SUFFIX_LEN]);

impl Suffix {
    /// Builds the suffix at position `index` of the suffix space.
    ///
    /// `index` is reduced modulo [`SUFFIX_SPACE`].
    pub const fn from_index(index: u64) -> Self {
        let mut rem = index % SUFFIX_SPACE;
        let mut out = [0_u8; SUFFIX_LEN];
        let mut i = SUFFIX_LEN;
        while i > 0 {
            i -= 1;
            out[i] = ALPHABET[(rem % 36) as usize];
            rem /= 36;
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        // Every byte comes from `ALPHABET`, which is ASCII.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Suffix({})", self.as_str())
    }
}

/// Draws random suffixes that are unique within a caller-owned tried-set.
///
/// The synthesizer holds no state of its own besides the random source. The
/// set of suffixes already tried is passed explicitly on every call and is
/// scoped by the caller (one set per user allocation).
///
/// # Example
/// ```
/// use promo_smith::{CodeSynthesizer, ThreadRandom};
/// use std::collections::HashSet;
///
/// let synth = CodeSynthesizer::new(ThreadRandom);
/// let mut tried = HashSet::new();
/// let a = synth.synthesize(&mut tried);
/// let b = synth.synthesize(&mut tried);
/// assert_ne!(a, b);
/// assert_eq!(tried.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CodeSynthesizer<R = ThreadRandom> {
    rng: R,
}

impl<R> CodeSynthesizer<R>
where
    R: RandSource<u64>,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns a suffix not present in `tried` and records it there.
    ///
    /// Redraws until an unseen suffix comes up, so `tried` must hold fewer
    /// than [`SUFFIX_SPACE`] entries. Callers bound the number of attempts.
    pub fn synthesize(&self, tried: &mut HashSet<Suffix>) -> Suffix {
        debug_assert!((tried.len() as u64) < SUFFIX_SPACE);
        loop {
            let suffix = self.draw();
            if tried.insert(suffix) {
                return suffix;
            }
        }
    }

    fn draw(&self) -> Suffix {
        loop {
            let raw = self.rng.rand();
            if raw < ACCEPT_ZONE {
                return Suffix::from_index(raw);
            }
        }
    }
}

impl Default for CodeSynthesizer<ThreadRandom> {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}
