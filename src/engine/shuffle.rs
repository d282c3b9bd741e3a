use rand::Rng;
use rand::seq::SliceRandom;

/// Uniformly random permutation of `items` into a new vector. The input is
/// left untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}
