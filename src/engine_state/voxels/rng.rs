//! # Deterministic RNG
//!
//! A seeded pseudo-random source for world generation. The same seed produces the
//! same sequence on every platform, which is what makes worlds reproducible from
//! their saved parameters.

use super::chunk::ChunkCoord;

/// Seeded pseudo-random generator used by the generation pipeline.
///
/// Backed by `fastrand`'s wyrand generator, whose output depends only on the seed.
pub struct SeededRng {
    inner: fastrand::Rng,
}

impl SeededRng {
    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        SeededRng {
            inner: fastrand::Rng::with_seed(seed),
        }
    }

    /// Creates the generator used for probabilistic choices inside one chunk.
    ///
    /// The world seed is mixed with the chunk coordinate so that neighboring chunks
    /// place their trees independently, while any given chunk always draws the same
    /// sequence.
    pub fn for_chunk(seed: u64, coord: ChunkCoord) -> Self {
        let x = (coord.x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let z = (coord.z as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        Self::new(seed ^ x.rotate_left(17) ^ z)
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.f64()
    }

    /// Returns the next 32-bit value, used to seed noise fields.
    pub fn next_u32(&mut self) -> u32 {
        self.inner.u32(..)
    }
}
