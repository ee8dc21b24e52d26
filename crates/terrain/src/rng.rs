//! Deterministic random stream shared by terrain and water generation.
//!
//! Wraps `ChaCha8Rng` so identical seeds produce identical terrain on every
//! platform. Generation code never reaches for `rand::thread_rng()`; it takes
//! `&mut SandboxRng` and saves/restores the caller's stream around its own
//! reseeding so unrelated draws in the host stay reproducible.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// Snapshot of ChaCha8Rng state
// ---------------------------------------------------------------------------

/// Full internal state of a `ChaCha8Rng`: enough to resume the exact stream.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RngSnapshot {
    seed: [u8; 32],
    word_pos: u128,
    stream: u64,
}

impl RngSnapshot {
    fn from_rng(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            word_pos: rng.get_word_pos(),
            stream: rng.get_stream(),
        }
    }

    fn to_rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}

// ---------------------------------------------------------------------------
// SandboxRng resource
// ---------------------------------------------------------------------------

#[derive(Resource, Clone)]
pub struct SandboxRng(pub ChaCha8Rng);

impl Default for SandboxRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SandboxRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Reset the stream as if freshly created from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.0 = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.0.gen::<f32>()
    }

    /// Uniform float in `[-0.5, 0.5)`.
    #[inline]
    pub fn next_centered(&mut self) -> f32 {
        self.next_f32() - 0.5
    }

    pub fn snapshot(&self) -> RngSnapshot {
        RngSnapshot::from_rng(&self.0)
    }

    pub fn restore(&mut self, snapshot: &RngSnapshot) {
        self.0 = snapshot.to_rng();
    }
}

// ---------------------------------------------------------------------------
// Saveable implementation
// ---------------------------------------------------------------------------

impl crate::Saveable for SandboxRng {
    const SAVE_KEY: &'static str = "sandbox_rng";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        Some(bitcode::encode(&self.snapshot()))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        match bitcode::decode::<RngSnapshot>(bytes) {
            Ok(snapshot) => Self(snapshot.to_rng()),
            Err(e) => {
                warn!(
                    "SandboxRng: failed to decode save data, falling back to default: {}",
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Saveable;

    #[test]
    fn test_next_f32_in_unit_range() {
        let mut rng = SandboxRng::from_seed_u64(7);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "next_f32 out of range: {v}");
        }
    }

    #[test]
    fn test_reseed_replays_sequence() {
        let mut rng = SandboxRng::from_seed_u64(3);
        let first: Vec<f32> = (0..16).map(|_| rng.next_f32()).collect();
        rng.reseed(3);
        let second: Vec<f32> = (0..16).map(|_| rng.next_f32()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SandboxRng::from_seed_u64(1);
        let mut b = SandboxRng::from_seed_u64(2);
        let vals_a: Vec<f32> = (0..10).map(|_| a.next_f32()).collect();
        let vals_b: Vec<f32> = (0..10).map(|_| b.next_f32()).collect();
        assert_ne!(vals_a, vals_b);
    }

    #[test]
    fn test_snapshot_restore_resumes_stream() {
        let mut rng = SandboxRng::from_seed_u64(99);
        for _ in 0..37 {
            rng.next_f32();
        }
        let snap = rng.snapshot();
        let expected: Vec<f32> = (0..20).map(|_| rng.next_f32()).collect();

        rng.reseed(12345);
        rng.next_f32();
        rng.restore(&snap);
        let resumed: Vec<f32> = (0..20).map(|_| rng.next_f32()).collect();
        assert_eq!(expected, resumed);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut rng = SandboxRng::from_seed_u64(999);
        for _ in 0..100 {
            rng.next_f32();
        }
        let bytes = rng.save_to_bytes().expect("save should produce bytes");
        let mut restored = SandboxRng::load_from_bytes(&bytes);

        let vals_orig: Vec<f32> = (0..50).map(|_| rng.next_f32()).collect();
        let vals_rest: Vec<f32> = (0..50).map(|_| restored.next_f32()).collect();
        assert_eq!(vals_orig, vals_rest);
    }

    #[test]
    fn test_load_empty_bytes_falls_back_to_default() {
        let mut loaded = SandboxRng::load_from_bytes(&[]);
        let mut default = SandboxRng::default();
        assert_eq!(loaded.next_f32(), default.next_f32());
    }
}
