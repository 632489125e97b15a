//! # Terrain Noise
//!
//! Seeded 2D gradient (Perlin) noise and seed derivation.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`TerrainSeed`], every sample and every variant draw is
//! identical across runs and platforms. Nothing here reads global state.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Purpose tags for [`TerrainSeed::derive`].
pub mod purpose {
    /// Ground noise field.
    pub const GROUND_NOISE: u64 = 0x6E6F_6973_6500_0001;
    /// Material variant draws.
    pub const VARIANTS: u64 = 0x7661_7269_616E_0002;
}

/// Master seed for a terrain session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerrainSeed(u64);

impl TerrainSeed {
    /// Creates a seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one consumer (noise, variants, ...).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Seeded RNG for a purpose.
    #[must_use]
    pub fn rng(self, purpose: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive(purpose).value())
    }
}

impl Default for TerrainSeed {
    fn default() -> Self {
        Self(0x0B0B_B0B5_D16D_0000)
    }
}

/// 2D Perlin noise with a seeded permutation table.
#[derive(Clone)]
pub struct PerlinNoise {
    /// 256 shuffled entries, doubled so `perm[i + 1]` never wraps.
    perm: [u8; 512],
}

impl PerlinNoise {
    /// Builds the permutation table from a seed.
    #[must_use]
    pub fn new(seed: TerrainSeed) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut seed.rng(purpose::GROUND_NOISE));

        let mut perm = [0u8; 512];
        for (i, &p) in table.iter().enumerate() {
            perm[i] = p;
            perm[i + 256] = p;
        }
        Self { perm }
    }

    /// Samples noise in roughly [-1, 1]. Integer lattice points return 0.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let dx = x - xf;
        let dy = y - yf;

        let u = fade(dx);
        let v = fade(dy);

        let aa = self.perm[usize::from(self.perm[xi]) + yi];
        let ab = self.perm[usize::from(self.perm[xi]) + yi + 1];
        let ba = self.perm[usize::from(self.perm[xi + 1]) + yi];
        let bb = self.perm[usize::from(self.perm[xi + 1]) + yi + 1];

        let bottom = lerp(grad(aa, dx, dy), grad(ba, dx - 1.0, dy), u);
        let top = lerp(grad(ab, dx, dy - 1.0), grad(bb, dx - 1.0, dy - 1.0), u);
        lerp(bottom, top, v)
    }

    /// Samples noise mapped to [0, 1].
    #[inline]
    #[must_use]
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        ((self.sample(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for PerlinNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerlinNoise").finish_non_exhaustive()
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Dot product with one of 8 gradient directions.
#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_noise() {
        let a = PerlinNoise::new(TerrainSeed::new(42));
        let b = PerlinNoise::new(TerrainSeed::new(42));

        for i in 0..100 {
            let x = f64::from(i) * 0.37 + 0.11;
            let y = f64::from(i) * 0.53 - 7.29;
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PerlinNoise::new(TerrainSeed::new(1));
        let b = PerlinNoise::new(TerrainSeed::new(2));

        let differing = (0..100)
            .filter(|&i| {
                let x = f64::from(i) * 0.41 + 0.13;
                let y = f64::from(i) * 0.29 + 0.07;
                a.sample(x, y) != b.sample(x, y)
            })
            .count();
        assert!(differing > 50, "Only {differing} samples differ");
    }

    #[test]
    fn test_sample01_range() {
        let noise = PerlinNoise::new(TerrainSeed::default());
        for i in 0..1000 {
            let v = noise.sample01(f64::from(i) * 0.173, f64::from(i) * -0.311);
            assert!((0.0..=1.0).contains(&v), "Out of range: {v}");
        }
    }

    #[test]
    fn test_lattice_points_are_zero() {
        let noise = PerlinNoise::new(TerrainSeed::new(9));
        assert_eq!(noise.sample(3.0, -5.0), 0.0);
        assert_eq!(noise.sample01(0.0, 0.0), 0.5);
    }

    #[test]
    fn test_derive_is_independent() {
        let seed = TerrainSeed::new(7);
        assert_ne!(seed.derive(purpose::GROUND_NOISE), seed.derive(purpose::VARIANTS));
        assert_eq!(seed.derive(1), TerrainSeed::new(7).derive(1));
    }
}
