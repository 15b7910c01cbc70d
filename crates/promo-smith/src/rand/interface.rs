/// Where [`CodeSynthesizer`](crate::CodeSynthesizer) gets its raw draws.
///
/// Each call yields one unbiased word. Tests swap in a scripted source to pin
/// down which suffixes are produced.
///
/// ```
/// use promo_smith::{CodeSynthesizer, RandSource, Suffix};
/// use std::collections::HashSet;
///
/// struct Zero;
/// impl RandSource<u64> for Zero {
///     fn rand(&self) -> u64 {
///         0
///     }
/// }
///
/// let mut tried = HashSet::new();
/// let suffix = CodeSynthesizer::new(Zero).synthesize(&mut tried);
/// assert_eq!(suffix, Suffix::from_index(0));
/// assert_eq!(suffix.as_str(), "AAAA");
/// ```
pub trait RandSource<T> {
    fn rand(&self) -> T;
}

impl<T, R> RandSource<T> for &R
where
    R: RandSource<T> + ?Sized,
{
    fn rand(&self) -> T {
        (**self).rand()
    }
}
