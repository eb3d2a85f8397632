use rand::Rng;
use rand::seq::SliceRandom;

/// Draw `count` distinct indices from `0..pool_size`, never returning `exclude`.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= pool_size.saturating_sub(1));
    // Generate a shuffled pool and take first `count` not equal to exclude
    let mut idxs: Vec<usize> = (0..pool_size).collect();
    idxs.shuffle(rng);
    idxs.into_iter().filter(|&idx| idx != exclude).take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_distinct_and_excluded() {
        let mut rng = StdRng::seed_from_u64(7);
        for exclude in 0..5 {
            for _ in 0..50 {
                let idxs = distinct_indices(exclude, 4, 5, &mut rng);
                assert_eq!(idxs.len(), 4);
                assert!(!idxs.contains(&exclude));
                let mut sorted = idxs.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), 4);
            }
        }
    }
}
