use crate::RandSource;
use rand::{Rng, rng};

/// Draws from `rand`'s per-thread generator.
///
/// That generator is a periodically reseeded CSPRNG, so a suffix says nothing
/// about the next one and codes cannot be guessed from issued ones. Holds no
/// state of its own.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
