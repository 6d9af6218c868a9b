//! # Perlin Noise Implementation
//!
//! Classic smoothed gradient noise in three dimensions.
//!
//! ## Algorithm
//!
//! - Hash the unit cube around the sample through a seeded permutation table
//! - Ease the fractional offsets with the quintic fade curve
//! - Trilinearly blend the gradient dot products of the 8 cube corners
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation will produce
//! **exactly** the same values on any platform, any time. The permutation
//! shuffle uses integer xorshift only, and the sampling path is plain IEEE
//! `f64` arithmetic with no platform intrinsics.

use serde::{Deserialize, Serialize};

/// The one number a whole world grows from.
///
/// Zone seeds, noise tables and rule rolls are all derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Wraps a raw seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// The raw seed.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Mixes `purpose` into the seed to get an independent sub-seed,
    /// one per zone or per random stream.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        // FNV-1a style mixing
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(1024)
    }
}

/// Seeded lattice hash shared by every sample of one field.
#[derive(Clone)]
struct PermutationTable {
    /// A shuffle of 0..=255, stored twice so `perm[i + k]` never wraps.
    perm: [u8; 512],
}

impl PermutationTable {
    /// Shuffles the identity table with a seeded xorshift.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // xorshift64 is stuck at zero, so fold in a constant first
        let mut rng_state = seed.value() ^ 0x9e37_79b9_7f4a_7c15;
        if rng_state == 0 {
            rng_state = 0x2545_f491_4f6c_dd1d;
        }

        // Fisher-Yates
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        perm.copy_within(0..256, 256);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        self.perm[index & 511] as usize
    }
}

/// 3D Perlin noise generator.
///
/// Stateless after construction: every sample is a pure function of the
/// seed and the coordinates.
///
/// # Example
///
/// ```rust
/// use tessera_procedural::{PerlinNoise, WorldSeed};
///
/// let noise = PerlinNoise::new(WorldSeed::new(1024));
/// let value = noise.value_at(0.25, 1.5, 0.8);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone)]
pub struct PerlinNoise {
    perm_table: PermutationTable,
}

impl PerlinNoise {
    /// Creates a new noise field from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 3D Perlin noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1]. Integer lattice points always sample
    /// to exactly `0.0`.
    #[must_use]
    pub fn value_at(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xi, xf) = split_lattice(x);
        let (yi, yf) = split_lattice(y);
        let (zi, zf) = split_lattice(z);

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = &self.perm_table;
        let a = p.get(xi) + yi;
        let aa = p.get(a) + zi;
        let ab = p.get(a + 1) + zi;
        let b = p.get(xi + 1) + yi;
        let ba = p.get(b) + zi;
        let bb = p.get(b + 1) + zi;

        let near = lerp(
            v,
            lerp(u, grad(p.get(aa), xf, yf, zf), grad(p.get(ba), xf - 1.0, yf, zf)),
            lerp(
                u,
                grad(p.get(ab), xf, yf - 1.0, zf),
                grad(p.get(bb), xf - 1.0, yf - 1.0, zf),
            ),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad(p.get(aa + 1), xf, yf, zf - 1.0),
                grad(p.get(ba + 1), xf - 1.0, yf, zf - 1.0),
            ),
            lerp(
                u,
                grad(p.get(ab + 1), xf, yf - 1.0, zf - 1.0),
                grad(p.get(bb + 1), xf - 1.0, yf - 1.0, zf - 1.0),
            ),
        );

        lerp(w, near, far).clamp(-1.0, 1.0)
    }

    /// Samples noise remapped to [0, 1].
    ///
    /// Terrain banding thresholds are expressed against this range.
    #[inline]
    #[must_use]
    pub fn normalized(&self, x: f64, y: f64, z: f64) -> f64 {
        (self.value_at(x, y, z) + 1.0) * 0.5
    }
}

/// Splits a coordinate into its wrapped lattice cell and the offset inside it.
#[inline]
fn split_lattice(value: f64) -> (usize, f64) {
    let floor = value.floor();
    (((floor as i64) & 255) as usize, value - floor)
}

/// Quintic ease curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with one of the 12 cube-edge gradients.
#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
