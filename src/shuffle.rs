use rand::Rng;
use rand::seq::SliceRandom;

/// Returns a uniformly random permutation of `items`, leaving them untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
