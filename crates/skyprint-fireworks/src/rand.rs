//! Seeded random source for particle spawning and sparkle jitter

use skyprint_core::Vec3;

/// Attempts at rejection sampling before falling back to a fixed direction.
const MAX_SAMPLE_ATTEMPTS: usize = 32;

/// Deterministic per-instance random source.
///
/// Every firework instance owns one of these, so two instances launched with
/// the same seed produce identical particle paths.
pub struct ParticleRng {
    rng: fastrand::Rng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.f32()
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a random unit direction vector (uniformly on sphere surface)
    pub fn random_direction(&mut self) -> Vec3 {
        // Marsaglia method for uniform sphere sampling
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let x = self.range(-1.0, 1.0);
            let y = self.range(-1.0, 1.0);
            let s = x * x + y * y;
            if s < 1.0 {
                let factor = 2.0 * (1.0 - s).sqrt();
                return Vec3::new(x * factor, y * factor, 1.0 - 2.0 * s).normalized_or(Vec3::UP);
            }
        }
        Vec3::UP
    }

    /// Returns a random point inside the unit ball
    pub fn random_in_unit_sphere(&mut self) -> Vec3 {
        let dir = self.random_direction();
        dir * self.next_f32().cbrt()
    }

    /// Picks one element uniformly, or None for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.usize(..items.len()))
    }
}
