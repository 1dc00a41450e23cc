//! Sampling and distribution helpers shared by the opponents and learners

use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
    prelude::IndexedRandom,
};

/// Uniform distribution over `items`, or an empty vector when there are none
pub fn uniform_over<T: Clone>(items: &[T]) -> Vec<(T, f64)> {
    if items.is_empty() {
        return Vec::new();
    }
    let p = 1.0 / items.len() as f64;
    items.iter().map(|item| (item.clone(), p)).collect()
}

/// Draw one item with probability proportional to its weight.
///
/// Negative and NaN weights count as zero. When nothing carries weight the
/// draw is uniform over `items`; an empty slice yields `None`.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use tictactoe_mdp::utils::weighted_sample;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let pick = weighted_sample(&mut rng, &[(4usize, 0.0), (6, 1.0)]);
/// assert_eq!(pick, Some(6));
/// ```
pub fn weighted_sample<R, T, W>(rng: &mut R, items: &[(T, W)]) -> Option<T>
where
    R: Rng,
    T: Clone,
    W: Into<f64> + Copy,
{
    let weights = items.iter().map(|(_, weight)| {
        let weight: f64 = (*weight).into();
        weight.max(0.0)
    });
    match WeightedIndex::new(weights) {
        Ok(index) => items.get(index.sample(rng)).map(|(item, _)| item.clone()),
        Err(_) => items.choose(rng).map(|(item, _)| item.clone()),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_uniform_over() {
        let dist = uniform_over(&[1, 2, 3, 4]);
        assert_eq!(dist.len(), 4);
        assert!(dist.iter().all(|(_, p)| (*p - 0.25).abs() < 1e-12));
        assert!(uniform_over::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_weighted_sample_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let items: Vec<(usize, f64)> = Vec::new();
        assert_eq!(weighted_sample(&mut rng, &items), None);
    }

    #[test]
    fn test_weighted_sample_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = vec![(0usize, 0.0), (1, 1.0), (2, 0.0)];
        for _ in 0..100 {
            assert_eq!(weighted_sample(&mut rng, &items), Some(1));
        }
    }

    #[test]
    fn test_weighted_sample_all_zero_falls_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = vec![(0usize, 0.0), (1, 0.0)];
        let mut seen = [false; 2];
        for _ in 0..100 {
            let pick = weighted_sample(&mut rng, &items).unwrap();
            seen[pick] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_weighted_sample_frequencies() {
        let mut rng = StdRng::seed_from_u64(11);
        let items = vec![("a", 1.0), ("b", 3.0)];
        let trials = 4000;
        let b_count = (0..trials)
            .filter(|_| weighted_sample(&mut rng, &items) == Some("b"))
            .count();
        let ratio = b_count as f64 / trials as f64;
        assert!((ratio - 0.75).abs() < 0.05, "ratio was {ratio}");
    }

    #[test]
    fn test_weighted_sample_ignores_negative_weight() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = vec![(0usize, -2.0), (1, 0.5), (2, f64::NAN)];
        for _ in 0..100 {
            assert_eq!(weighted_sample(&mut rng, &items), Some(1));
        }
    }
}
