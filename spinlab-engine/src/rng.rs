//! Deterministic random source (Mulberry32).
//!
//! The generator is a pure function of its 32-bit seed and the number of draws
//! taken, so every run in a batch can be replayed from `(base_seed, index)`.

use rand::{RngCore, SeedableRng};

const GOLDEN_GAMMA: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Source of uniform draws in `[0, 1)` consumed by the game models.
pub trait DrawSource {
    /// Produce the next uniform value in `[0, 1)`.
    fn draw(&mut self) -> f64;
}

impl<F> DrawSource for F
where
    F: FnMut() -> f64,
{
    fn draw(&mut self) -> f64 {
        self()
    }
}

/// Seeded Mulberry32 generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
    draws: u64,
}

impl SeededRandom {
    /// Create a generator whose first draw is fully determined by `seed`.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: seed,
            draws: 0,
        }
    }

    /// Create a generator from a wider seed, keeping only the low 32 bits.
    #[must_use]
    pub const fn from_seed_u64(seed: u64) -> Self {
        Self::new((seed & 0xFFFF_FFFF) as u32)
    }

    /// Create a generator seeded from OS entropy (non-reproducible).
    #[must_use]
    pub fn unseeded() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Advance the state and return the mixed 32-bit output word.
    pub fn next_raw(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    /// Number of draw calls performed against this generator.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl DrawSource for SeededRandom {
    fn draw(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_raw());
        let high = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRandom {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    // Truncate rather than hash so `seed_from_u64(s)` matches `new(s as u32)`.
    fn seed_from_u64(state: u64) -> Self {
        Self::from_seed_u64(state)
    }
}
