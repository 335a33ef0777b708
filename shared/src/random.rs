//! Reproducible per-entity random stream.
//!
//! Every draw is a pure function of `(seed_key, invocation index)`, so a peer
//! that only knows how many draws the host has made can rebuild a generator
//! that produces the host's next value. The invocation count is the value
//! that gets replicated.

/// A deterministic random stream keyed by entity identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateRandom {
    seed_key: u64,
    invocations: u32,
}

impl StateRandom {
    pub fn new(seed_key: u64) -> Self {
        Self::with_invocations(seed_key, 0)
    }

    /// Builds a generator positioned as if `next_*` had already been called
    /// `invocations` times on a fresh instance with the same key.
    pub fn with_invocations(seed_key: u64, invocations: u32) -> Self {
        Self {
            seed_key,
            invocations,
        }
    }

    pub fn seed_key(&self) -> u64 {
        self.seed_key
    }

    /// Number of draws made so far.
    pub fn invocations(&self) -> u32 {
        self.invocations
    }

    pub fn next_u32(&mut self) -> u32 {
        self.draw().u32(..)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.draw().f32()
    }

    /// Uniform in `[min, max)`. Returns `min` for an empty range.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let rng = self.draw();
        if max <= min {
            return min;
        }
        rng.i32(min..max)
    }

    /// Uniform in `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    fn draw(&mut self) -> fastrand::Rng {
        let rng = fastrand::Rng::with_seed(mix(self.seed_key, self.invocations));
        self.invocations = self.invocations.wrapping_add(1);
        rng
    }
}

// splitmix64 finalizer over the key and the draw index
fn mix(seed_key: u64, index: u32) -> u64 {
    let mut z = seed_key
        .wrapping_add(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(u64::from(index).wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
