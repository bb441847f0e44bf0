//! Game-Domain RNG Sampling
//!
//! Wraps the core xorshift generator with the session's sampling
//! vocabulary: object-type bands, card choice, spawn position, fall speed
//! and spawn delay. Every method is a draw-order contract — the server
//! replay reconstructs this exact wrapper from the seed, so reordering or
//! adding draws anywhere breaks replay, not just distribution.

use serde::{Deserialize, Serialize};

use crate::core::rng::{derive_session_seed, Xorshift32};
use crate::game::object::ObjectType;
use crate::game::state::CardType;

/// Cumulative probability bands for object-type selection.
///
/// 55% logo / 25% glitch / 5% gift / 15% bomb. Band *order* and
/// boundaries are part of the replay contract: float comparisons are
/// boundary-sensitive, so both sides must test in this exact order.
pub const LOGO_BAND: f64 = 0.55;
/// Upper boundary of the glitch band.
pub const GLITCH_BAND: f64 = 0.80;
/// Upper boundary of the gift band; everything above is a bomb.
pub const GIFT_BAND: f64 = 0.85;

/// Spawn-delay jitter bounds (±30% around the base delay).
pub const SPAWN_DELAY_JITTER: (f64, f64) = (0.7, 1.3);

/// Fall-speed jitter bounds (±20% around the base speed).
pub const FALL_SPEED_JITTER: (f64, f64) = (0.8, 1.2);

/// One session's RNG. Exclusively owned by that session; never shared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    inner: Xorshift32,
}

impl GameRng {
    /// Create from a raw 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Xorshift32::new(seed),
        }
    }

    /// Create from session parameters, the way the validator does.
    pub fn from_session(session_id: &str, start_time_ms: u64) -> Self {
        Self::new(derive_session_seed(session_id, start_time_ms))
    }

    /// Draw the type of the next spawned object.
    pub fn object_type(&mut self) -> ObjectType {
        let roll = self.inner.next_float();
        if roll < LOGO_BAND {
            ObjectType::Logo
        } else if roll < GLITCH_BAND {
            ObjectType::Glitch
        } else if roll < GIFT_BAND {
            ObjectType::Gift
        } else {
            ObjectType::Bomb
        }
    }

    /// Draw the card a gift will reveal, uniform over the nine kinds.
    pub fn card_type(&mut self) -> CardType {
        // ALL is non-empty, so choice cannot return None
        *self
            .inner
            .choice(&CardType::ALL)
            .unwrap_or(&CardType::TimeFreeze)
    }

    /// Draw a spawn center-x keeping the whole hitbox on screen.
    pub fn spawn_x(&mut self, screen_width: f64, object_size: f64) -> f64 {
        let half = object_size / 2.0;
        self.inner.next_float_range(half, screen_width - half)
    }

    /// Draw a fall speed around the base value.
    pub fn fall_speed(&mut self, base: f64) -> f64 {
        base * self
            .inner
            .next_float_range(FALL_SPEED_JITTER.0, FALL_SPEED_JITTER.1)
    }

    /// Draw the delay until the next spawn, around the base delay.
    pub fn spawn_delay(&mut self, base_ms: f64) -> f64 {
        base_ms
            * self
                .inner
                .next_float_range(SPAWN_DELAY_JITTER.0, SPAWN_DELAY_JITTER.1)
    }

    /// Draw the burst size used while a monad-swarm is active (2..=4).
    pub fn burst_count(&mut self) -> u32 {
        self.inner.next_int(2, 5) as u32
    }

    /// Raw generator state, for logging and checkpoint tests.
    pub fn state(&self) -> u32 {
        self.inner.state()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_distribution() {
        // Over 10k draws the band frequencies must track the configured
        // probabilities within ±3%.
        let mut rng = GameRng::from_session("s1", 1000000);
        let mut counts = [0usize; 4];

        const DRAWS: usize = 10_000;
        for _ in 0..DRAWS {
            counts[rng.object_type() as usize] += 1;
        }

        let expect = [0.55, 0.25, 0.05, 0.15];
        for (ty, want) in ObjectType::ALL.iter().zip(expect) {
            let got = counts[*ty as usize] as f64 / DRAWS as f64;
            assert!(
                (got - want).abs() < 0.03,
                "{} band off: got {got:.3}, want {want:.3}",
                ty.label()
            );
        }
    }

    #[test]
    fn test_object_type_replay_identical() {
        let mut a = GameRng::from_session("session-x", 42);
        let mut b = GameRng::from_session("session-x", 42);

        for _ in 0..1000 {
            assert_eq!(a.object_type(), b.object_type());
        }
    }

    #[test]
    fn test_card_type_covers_all_kinds() {
        let mut rng = GameRng::new(31337);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..1000 {
            seen.insert(rng.card_type());
        }
        assert_eq!(seen.len(), CardType::ALL.len());
    }

    #[test]
    fn test_spawn_x_keeps_hitbox_on_screen() {
        let mut rng = GameRng::new(7);

        for _ in 0..1000 {
            let x = rng.spawn_x(800.0, 64.0);
            assert!(x >= 32.0 && x < 768.0);
        }
    }

    #[test]
    fn test_jitter_bounds() {
        let mut rng = GameRng::new(99);

        for _ in 0..1000 {
            let speed = rng.fall_speed(150.0);
            assert!(speed >= 120.0 && speed < 180.0);

            let delay = rng.spawn_delay(1000.0);
            assert!(delay >= 700.0 && delay < 1300.0);

            let burst = rng.burst_count();
            assert!((2..=4).contains(&burst));
        }
    }
}
