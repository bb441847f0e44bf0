//! Deterministic Random Number Generator
//!
//! Uses a 32-bit xorshift generator. Given the same seed, produces an
//! identical sequence on every platform and in every process — this is the
//! guarantee the whole replay-based anti-cheat design rests on.

use serde::{Deserialize, Serialize};

/// Deterministic PRNG using the xorshift32 algorithm.
///
/// # Determinism Guarantee
///
/// Given the same non-zero seed, any two instances anywhere produce an
/// identical infinite output sequence. Server-side replay reconstructs the
/// client's entire RNG trajectory from the seed alone.
///
/// # Example
///
/// ```
/// use tapfall::core::rng::Xorshift32;
///
/// let mut rng = Xorshift32::new(12345);
/// assert_eq!(rng.next_u32(), 3336926330); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// Seed 0 is remapped to 1: xorshift has no escape from the all-zero
    /// state, so a zero seed would produce a constant sequence.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Advance the generator and return the next 32-bit value.
    ///
    /// The shift triplet (13, 17, 5) is a contract: both the live session
    /// and the server replay must use exactly this sequence.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1): `next_u32() / 2^32`.
    #[inline]
    pub fn next_float(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in [min, max).
    ///
    /// Returns `min` when the range is empty.
    #[inline]
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        min + (self.next_float() * (max - min) as f64).floor() as i64
    }

    /// Uniform float in [min, max).
    #[inline]
    pub fn next_float_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_float() * (max - min)
    }

    /// Select a random element from a slice.
    pub fn choice<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_int(0, slice.len() as i64) as usize;
            Some(&slice[idx])
        }
    }

    /// Return true with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_float() < p
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: u32) {
        self.state = if state == 0 { 1 } else { state };
    }
}

/// Derive a session seed from the session id and start timestamp.
///
/// Folds the string `"{session_id}:{start_time_ms}"` through the classic
/// polynomial string hash `seed = (seed << 5) - seed + byte` (i.e. 31x + c)
/// in wrapping 32-bit arithmetic. Knowing the session id and start time is
/// sufficient to reconstruct the entire RNG trajectory server-side, which
/// is what makes replay possible without shipping RNG state over the wire.
///
/// A zero result remaps to 1, matching [`Xorshift32::new`].
pub fn derive_session_seed(session_id: &str, start_time_ms: u64) -> u32 {
    let input = format!("{session_id}:{start_time_ms}");
    let mut seed: u32 = 0;
    for byte in input.bytes() {
        seed = (seed << 5).wrapping_sub(seed).wrapping_add(byte as u32);
    }
    if seed == 0 {
        1
    } else {
        seed
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = Xorshift32::new(12345);
        let mut rng2 = Xorshift32::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = Xorshift32::new(12345);
        let mut rng2 = Xorshift32::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_rng_known_values() {
        // Verify specific output for regression testing
        let mut rng = Xorshift32::new(12345);

        // These values must never change!
        // If they do, existing session replays will break.
        assert_eq!(rng.next_u32(), 3336926330);
        assert_eq!(rng.next_u32(), 1697253807);
        assert_eq!(rng.next_u32(), 2816511904);
        assert_eq!(rng.next_u32(), 1955480042);

        let mut rng = Xorshift32::new(42);
        assert_eq!(rng.next_u32(), 11355432);
        assert_eq!(rng.next_u32(), 2836018348);
    }

    #[test]
    fn test_seed_zero_behaves_as_one() {
        let mut zero = Xorshift32::new(0);
        let mut one = Xorshift32::new(1);

        for _ in 0..100 {
            assert_eq!(zero.next_u32(), one.next_u32());
        }
    }

    #[test]
    fn test_next_float_range_bounds() {
        let mut rng = Xorshift32::new(1234);

        for _ in 0..1000 {
            let val = rng.next_float();
            assert!((0.0..1.0).contains(&val));

            let val = rng.next_float_range(-5.0, 5.0);
            assert!((-5.0..5.0).contains(&val));
        }
    }

    #[test]
    fn test_next_int() {
        let mut rng = Xorshift32::new(5678);

        for _ in 0..1000 {
            let val = rng.next_int(0, 100);
            assert!((0..100).contains(&val));

            let val = rng.next_int(-10, 10);
            assert!((-10..10).contains(&val));
        }

        // Empty range collapses to min
        assert_eq!(rng.next_int(5, 5), 5);
        assert_eq!(rng.next_int(7, 3), 7);
    }

    #[test]
    fn test_choice() {
        let mut rng = Xorshift32::new(9999);
        let items = [10, 20, 30, 40];

        for _ in 0..100 {
            let picked = rng.choice(&items).unwrap();
            assert!(items.contains(picked));
        }

        let empty: [u8; 0] = [];
        assert!(rng.choice(&empty).is_none());
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Xorshift32::new(777);

        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_derive_session_seed_known_values() {
        // Contract values: the validator recomputes these from the
        // submission, so they must never change.
        assert_eq!(derive_session_seed("s1", 1000000), 466625557);
        assert_eq!(derive_session_seed("demo-session", 1700000000000), 4101392892);
    }

    #[test]
    fn test_derive_session_seed_distinct_inputs() {
        let a = derive_session_seed("session-a", 1000);
        let b = derive_session_seed("session-b", 1000);
        let c = derive_session_seed("session-a", 1001);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = Xorshift32::new(5555);

        for _ in 0..50 {
            rng.next_u32();
        }

        let saved = rng.state();
        let next_values: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();

        rng.set_state(saved);
        for expected in next_values {
            assert_eq!(rng.next_u32(), expected);
        }
    }

    proptest! {
        #[test]
        fn prop_sequences_match_for_any_seed(seed in any::<u32>(), len in 1usize..200) {
            let mut rng1 = Xorshift32::new(seed);
            let mut rng2 = Xorshift32::new(seed);
            for _ in 0..len {
                prop_assert_eq!(rng1.next_u32(), rng2.next_u32());
            }
        }

        #[test]
        fn prop_next_int_in_range(seed in any::<u32>(), min in -1000i64..1000, span in 1i64..1000) {
            let mut rng = Xorshift32::new(seed);
            let max = min + span;
            let val = rng.next_int(min, max);
            prop_assert!(val >= min && val < max);
        }
    }
}
