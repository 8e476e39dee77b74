use rand::Rng;

/// In-place Fisher-Yates shuffle.
///
/// Walks `m` from the back of the slice, swapping position `m - 1` with a
/// uniformly chosen index in `[0, m)`. Every permutation is equally likely.
/// The generator is whatever was bound into the caller at construction; it is
/// never looked up from a shared global here.
pub fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    let mut m = items.len();

    while m > 0 {
        let i = rng.gen_range(0..m);
        m -= 1;
        items.swap(m, i);
    }
}
