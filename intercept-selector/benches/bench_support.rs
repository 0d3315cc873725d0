//! Deterministic candidate pools for the selector benchmarks.

use geo::Coord;
use intercept_selector::ScoredCandidate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Half-width of the square holding the candidates, in degrees.
/// 0.05 degrees is roughly 5.5 km at the equator.
const AREA_HALF_WIDTH: f64 = 0.05;

/// Generate `count` scored candidates spread uniformly around the origin.
///
/// Ids are assigned from one upwards; scores lie in `[0, 1)`.
#[must_use]
pub fn generate_pool(count: usize, seed: u64) -> Vec<ScoredCandidate> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1_u64..)
        .take(count)
        .map(|id| ScoredCandidate {
            id,
            location: Coord {
                x: rng.gen_range(-AREA_HALF_WIDTH..AREA_HALF_WIDTH),
                y: rng.gen_range(-AREA_HALF_WIDTH..AREA_HALF_WIDTH),
            },
            score: rng.gen_range(0.0..1.0),
        })
        .collect()
}
