use rand::Rng;

/// How many not-overdue items to mix into an overdue subset of `overdue_len`,
/// given the configured fraction.
pub fn mix_in_count(fraction: f64, overdue_len: usize, rest_len: usize) -> usize {
    ((fraction * overdue_len as f64).ceil() as usize).min(rest_len)
}

/// Move a bounded random fraction of `rest` into `overdue`.
///
/// Items are taken from the front of `rest`, which was shuffled upstream, so
/// front order is already random. Each one is inserted at an index chosen
/// uniformly from `[0, overdue.len()]` inclusive: the slot past the current
/// tail is as likely as any existing position, and the subset grows by one
/// before the next pick. Returns the number of items moved.
pub fn mix_in<T, R: Rng>(
    overdue: &mut Vec<T>,
    rest: &mut Vec<T>,
    fraction: f64,
    rng: &mut R,
) -> usize {
    let count = mix_in_count(fraction, overdue.len(), rest.len());

    for _ in 0..count {
        let index = rng.gen_range(0..=overdue.len());
        overdue.insert(index, rest.remove(0));
    }

    count
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn count_is_capped_by_rest() {
        // ceil(1.0 * 12) = 12, but only 2 available
        assert_eq!(mix_in_count(1.0, 12, 2), 2);
        // ceil(0.25 * 12) = 3
        assert_eq!(mix_in_count(0.25, 12, 50), 3);
        assert_eq!(mix_in_count(0.0, 12, 50), 0);
        assert_eq!(mix_in_count(0.5, 0, 50), 0);
    }

    #[test]
    fn moves_from_the_front_without_loss() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut overdue: Vec<u32> = (0..12).collect();
        let mut rest: Vec<u32> = (100..150).collect();

        let moved = mix_in(&mut overdue, &mut rest, 0.25, &mut rng);

        assert_eq!(moved, 3);
        assert_eq!(overdue.len(), 15);
        assert_eq!(rest.len(), 47);
        // the first three of rest moved, the rest kept their order
        assert_eq!(rest[0], 103);
        for taken in [100, 101, 102] {
            assert!(overdue.contains(&taken));
        }

        let mut all: Vec<u32> = overdue.iter().chain(rest.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..12).chain(100..150).collect::<Vec<_>>());
    }

    #[test]
    fn drains_rest_when_fraction_is_full() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut overdue: Vec<u32> = (0..12).collect();
        let mut rest: Vec<u32> = vec![100, 101];

        let moved = mix_in(&mut overdue, &mut rest, 1.0, &mut rng);

        assert_eq!(moved, 2);
        assert_eq!(overdue.len(), 14);
        assert!(rest.is_empty());
    }

    /// One insertion into a subset of length L must hit each of the L + 1
    /// slots (including the one past the tail) with equal probability.
    #[test]
    fn insertion_slots_are_uniform() {
        const RUNS: usize = 100_000;
        const L: usize = 10;

        let mut rng = StdRng::seed_from_u64(0x1eaf);
        let mut counts = [0u32; L + 1];

        for _ in 0..RUNS {
            let mut overdue = vec!['a'; L];
            let mut rest = vec!['b'];
            mix_in(&mut overdue, &mut rest, 0.1, &mut rng);

            let slot = overdue.iter().position(|&c| c == 'b').unwrap();
            counts[slot] += 1;
        }

        let expected = RUNS as f64 / (L + 1) as f64;
        let chi2: f64 = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // df = 10; a tail-biased splice would blow way past this
        assert!(chi2 < 50.0, "insertion slots not uniform, chi2 = {chi2:.1}");
    }
}
