//! State Hashing for Desync Detection
//!
//! A compact digest of the key game-state fields, used to detect
//! client/server divergence without transmitting full state. SHA-256,
//! domain-separated, truncated to 128 bits.
//!
//! The field order and encodings below are a bit-exact contract: both
//! sides must hash `{score, lives, combo (rounded), streak, action_count}`
//! in exactly this order or desync detection silently breaks.

use sha2::{Digest, Sha256};

/// Hash output type (truncated to 128 bits / 16 bytes).
pub type StateHash = [u8; 16];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for the field encodings the digest uses.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create the hasher used for session state digests.
    pub fn for_session_state() -> Self {
        Self::new(b"TAPFALL_STATE_V1")
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Finalize and return the truncated hash.
    pub fn finalize(self) -> StateHash {
        let full = self.hasher.finalize();
        let mut out = [0u8; 16];
        out.copy_from_slice(&full[..16]);
        out
    }
}

/// Round a combo multiplier to centi-units for hashing.
///
/// Combo is derived from streak in 0.5 steps, so two correct
/// implementations can only differ by float noise well below 0.005;
/// rounding to hundredths removes that noise from the digest.
#[inline]
pub fn combo_to_centi(combo: f64) -> u32 {
    (combo * 100.0).round() as u32
}

/// Compute the session state digest.
///
/// Called with the current aggregate state plus the number of actions in
/// the log, so that two states that merely *look* alike but were reached
/// through different histories still diverge.
pub fn compute_state_hash(
    score: u64,
    lives: u32,
    combo: f64,
    streak: u32,
    action_count: u32,
) -> StateHash {
    let mut hasher = StateHasher::for_session_state();
    hasher.update_u64(score);
    hasher.update_u32(lives);
    hasher.update_u32(combo_to_centi(combo));
    hasher.update_u32(streak);
    hasher.update_u32(action_count);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
