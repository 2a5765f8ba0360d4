//! The seeded random source shared by every generator.
//!
//! Same seed in, same maze out: xorshift is fast, small and fully determined by its seed, which
//! is all maze carving needs. It is not suitable for anything security related.

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

pub type MazeRng = XorShiftRng;

pub fn seeded_rng(seed: u64) -> MazeRng {
    XorShiftRng::seed_from_u64(seed)
}

/// A seed taken from the thread local entropy source, for callers that did not ask for a
/// reproducible maze.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Uniform index into a non-empty collection of `len` items.
#[inline]
pub fn random_index(rng: &mut MazeRng, len: usize) -> usize {
    debug_assert!(len > 0, "random_index on an empty collection");
    rng.gen_range(0..len)
}
