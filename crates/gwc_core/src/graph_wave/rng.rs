//! Random source abstraction for graph wave collapse.
//!
//! Every random draw in a run goes through one caller-supplied `GwcRng`.
//! Nothing in this crate touches thread-local or global randomness, so a
//! run is reproducible from its seed, its nodes and its collapse order.
//!
//! - `GwcRng`: the interface used by orders, superpositions and state rules
//! - `StdRandom`: the default implementation over `rand::rngs::StdRng`
//!
//! # Example
//!
//! ```
//! use gwc_core::graph_wave::rng::{GwcRng, StdRandom};
//!
//! let mut rng = StdRandom::from_seed(42);
//! let float = rng.next_double(); // 0.0..1.0
//! let bounded = rng.next_usize_max(10); // 0..10
//! let order = rng.perm(4); // permutation of 0..4
//! assert!(float < 1.0 && bounded < 10);
//! assert_eq!(order.len(), 4);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trait for the seeded random source threaded through a collapse run.
///
/// Implementors only supply `next_double` and `next_u64`; the derived
/// helpers are built on top of them so every implementation draws the
/// same number of values for the same call.
pub trait GwcRng {
    /// Returns a random double in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Returns a random u64.
    fn next_u64(&mut self) -> u64;

    /// Returns a random usize in [0, max).
    /// Returns 0 when `max` is 0.
    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        let idx = (self.next_double() * max as f64) as usize;
        // Guard the float edge where the product rounds up to `max`.
        idx.min(max - 1)
    }

    /// Returns a random permutation of `0..n`.
    fn perm(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.next_usize_max(i + 1);
            order.swap(i, j);
        }
        order
    }
}

/// Standard Rust RNG wrapper using `rand::rngs::StdRng`.
///
/// This is the RNG used by `GraphWaveCollapse::run` and by configs.
#[derive(Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Create a new StdRandom from a u64 seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GwcRng for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }
}
