//! Pool ordering strategies.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use vasari_core::LoadBalancingMode;

/// Reorders a pool of backend names per the selected mode.
///
/// `counter` is the shared round-robin cursor for this pool; it is
/// bumped on every call so successive requests start at different
/// offsets. `rng` is locked only for the duration of the shuffle.
pub(crate) fn reorder(
    mode: LoadBalancingMode,
    names: &[String],
    counter: &AtomicUsize,
    rng: &Mutex<StdRng>,
) -> Vec<String> {
    if names.is_empty() {
        return Vec::new();
    }
    match mode {
        LoadBalancingMode::Sequential => names.to_vec(),
        LoadBalancingMode::Single => vec![names[0].clone()],
        LoadBalancingMode::RoundRobin => {
            let offset = counter.fetch_add(1, Ordering::Relaxed) % names.len();
            let mut out = names.to_vec();
            out.rotate_left(offset);
            out
        }
        LoadBalancingMode::Random => {
            let mut out = names.to_vec();
            out.shuffle(&mut *rng.lock().unwrap());
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn pool(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fixtures() -> (AtomicUsize, Mutex<StdRng>) {
        (AtomicUsize::new(0), Mutex::new(StdRng::seed_from_u64(42)))
    }

    #[test]
    fn sequential_is_identity() {
        let (counter, rng) = fixtures();
        let names = pool(&["a", "b", "c"]);
        assert_eq!(
            reorder(LoadBalancingMode::Sequential, &names, &counter, &rng),
            names
        );
    }

    #[test]
    fn single_truncates_to_first() {
        let (counter, rng) = fixtures();
        let names = pool(&["a", "b", "c"]);
        assert_eq!(
            reorder(LoadBalancingMode::Single, &names, &counter, &rng),
            pool(&["a"])
        );
    }

    #[test]
    fn round_robin_rotates_across_calls() {
        let (counter, rng) = fixtures();
        let names = pool(&["a", "b", "c"]);
        assert_eq!(
            reorder(LoadBalancingMode::RoundRobin, &names, &counter, &rng),
            pool(&["a", "b", "c"])
        );
        assert_eq!(
            reorder(LoadBalancingMode::RoundRobin, &names, &counter, &rng),
            pool(&["b", "c", "a"])
        );
        assert_eq!(
            reorder(LoadBalancingMode::RoundRobin, &names, &counter, &rng),
            pool(&["c", "a", "b"])
        );
        // Wraps around.
        assert_eq!(
            reorder(LoadBalancingMode::RoundRobin, &names, &counter, &rng),
            pool(&["a", "b", "c"])
        );
    }

    #[test]
    fn round_robin_is_fair_over_many_calls() {
        let (counter, rng) = fixtures();
        let names = pool(&["a", "b", "c"]);
        let mut first_counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..30 {
            let ordered = reorder(LoadBalancingMode::RoundRobin, &names, &counter, &rng);
            *first_counts.entry(ordered[0].clone()).or_default() += 1;
        }
        for name in &names {
            assert_eq!(first_counts[name], 10, "unfair rotation for {name}");
        }
    }

    #[test]
    fn random_preserves_membership() {
        let (counter, rng) = fixtures();
        let names = pool(&["a", "b", "c", "d", "e"]);
        let mut shuffled = reorder(LoadBalancingMode::Random, &names, &counter, &rng);
        shuffled.sort();
        assert_eq!(shuffled, names);
    }

    #[test]
    fn empty_pool_stays_empty() {
        let (counter, rng) = fixtures();
        assert!(reorder(LoadBalancingMode::RoundRobin, &[], &counter, &rng).is_empty());
    }
}
