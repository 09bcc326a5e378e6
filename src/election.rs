//! Maker election.
//!
//! When a collective closes with members in it, one of them is chosen
//! uniformly at random to make the coffee. The choice is delegated to a
//! [`MakerChooser`] so tests can pin it down.
//!
//! # Implementations
//!
//! - [`RandomChooser`] - uniform choice backed by `rand` (production)
//! - [`FixedChooser`] - always picks the same index (tests)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform choice over `0..len`.
///
/// Implementations must return an index strictly below `len`. Callers never
/// pass `len == 0`.
pub trait MakerChooser: Send {
    /// Picks an index in `0..len`.
    fn choose(&mut self, len: usize) -> usize;
}

/// Uniformly random chooser.
#[derive(Debug)]
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    /// Creates a chooser seeded from the operating system's entropy source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible chooser from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MakerChooser for RandomChooser {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Deterministic chooser that always picks `index` (wrapped to `len`).
///
/// Members are ordered by [`UserId`](crate::UserId), so `FixedChooser(0)`
/// elects the alphabetically first member.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedChooser(pub usize);

impl MakerChooser for FixedChooser {
    fn choose(&mut self, len: usize) -> usize {
        self.0 % len
    }
}
