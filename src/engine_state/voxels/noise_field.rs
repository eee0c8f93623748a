//! # Noise Field
//!
//! Coherent 2D/3D noise used for the height, biome, resource and cloud fields.

use noise::{NoiseFn, Simplex};

/// A seeded simplex noise field with output clamped to `[-1, 1]`.
pub struct NoiseField {
    simplex: Simplex,
}

impl NoiseField {
    /// Creates a noise field. The same seed always produces the same field.
    pub fn new(seed: u32) -> Self {
        NoiseField {
            simplex: Simplex::new(seed),
        }
    }

    /// Samples the field in two dimensions.
    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.simplex.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Samples the field in three dimensions.
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.simplex.get([x, y, z]).clamp(-1.0, 1.0)
    }
}
