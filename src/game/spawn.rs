//! Spawn Manager
//!
//! Schedules object creation from the session RNG and the current
//! difficulty/modifier state. The per-spawn draw order is fixed by
//! contract: object type, then spawn x, then fall speed, then (gift only)
//! card type, then the next-spawn delay after the whole spawn completes.
//! Reordering the draws changes the replay sequence, not just the
//! distribution.

use serde::{Deserialize, Serialize};

use crate::core::geom::Vec2;
use crate::game::object::{GameObject, ObjectPool, ObjectType};
use crate::game::rng::GameRng;
use crate::game::state::{GameState, BASE_FALL_SPEED, BASE_SPAWN_RATE, GAME_HEIGHT, GAME_WIDTH, OBJECT_SIZE};

/// Spawn-rate multiplier threshold above which spawns arrive in bursts.
pub const BURST_THRESHOLD: f64 = 2.0;

/// Static spawn configuration for a session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Game area width.
    pub screen_width: f64,
    /// Game area height.
    pub screen_height: f64,
    /// Object hitbox side length.
    pub object_size: f64,
    /// Base fall speed before difficulty scaling (px/s).
    pub fall_speed: f64,
    /// Base spawn rate before difficulty scaling (spawns/s).
    pub spawn_rate: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            screen_width: GAME_WIDTH,
            screen_height: GAME_HEIGHT,
            object_size: OBJECT_SIZE,
            fall_speed: BASE_FALL_SPEED,
            spawn_rate: BASE_SPAWN_RATE,
        }
    }
}

/// Schedules and performs object spawns for one session.
#[derive(Clone, Debug)]
pub struct SpawnManager {
    config: SpawnConfig,
    /// Milliseconds accumulated since the last spawn (spawn clock).
    since_last_ms: f64,
    /// Randomized delay until the next spawn; drawn lazily so the first
    /// draw happens on the first running frame, not at construction.
    next_delay_ms: Option<f64>,
    /// Monotonic counter feeding object ids.
    serial: u64,
}

impl SpawnManager {
    /// Create a spawn manager with the given configuration.
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            since_last_ms: 0.0,
            next_delay_ms: None,
            serial: 0,
        }
    }

    /// The static configuration.
    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Advance the spawn clock by `dt_ms` and spawn if due.
    ///
    /// A time-freeze suppresses spawning entirely (the spawn clock does
    /// not advance while frozen). When the monad-swarm modifier pushes
    /// the spawn-rate multiplier above [`BURST_THRESHOLD`], a due spawn
    /// becomes a burst of 2–4 objects.
    ///
    /// Returns the number of objects spawned this frame.
    pub fn update(
        &mut self,
        dt_ms: f64,
        state: &GameState,
        rng: &mut GameRng,
        pool: &mut ObjectPool,
        objects: &mut Vec<GameObject>,
        now_ms: u64,
    ) -> usize {
        if state.time_frozen() {
            return 0;
        }

        let rate = state.difficulty.spawn_rate * state.spawn_rate_multiplier();
        if rate <= 0.0 {
            return 0;
        }

        self.since_last_ms += dt_ms;

        let delay = match self.next_delay_ms {
            Some(d) => d,
            None => {
                let d = rng.spawn_delay(1000.0 / rate);
                self.next_delay_ms = Some(d);
                d
            }
        };

        if self.since_last_ms < delay {
            return 0;
        }

        let count = if state.spawn_rate_multiplier() > BURST_THRESHOLD {
            rng.burst_count() as usize
        } else {
            1
        };

        for _ in 0..count {
            self.spawn_one(state, rng, pool, objects, now_ms);
        }

        self.since_last_ms = 0.0;
        self.next_delay_ms = Some(rng.spawn_delay(1000.0 / rate));

        count
    }

    /// Draw one object from the RNG and place it just above the screen.
    fn spawn_one(
        &mut self,
        state: &GameState,
        rng: &mut GameRng,
        pool: &mut ObjectPool,
        objects: &mut Vec<GameObject>,
        now_ms: u64,
    ) {
        // Fixed draw order: type, x, speed, card.
        let object_type = rng.object_type();
        let x = rng.spawn_x(self.config.screen_width, self.config.object_size);
        let speed = rng.fall_speed(state.difficulty.fall_speed);
        let card = match object_type {
            ObjectType::Gift => Some(rng.card_type()),
            _ => None,
        };

        self.serial += 1;
        let id = format!("{}-{}", object_type.label(), self.serial);

        let mut obj = pool.acquire(object_type);
        obj.respawn(
            id,
            Vec2::new(x, -self.config.object_size / 2.0),
            speed,
            self.config.object_size,
            now_ms,
            card,
        );
        objects.push(obj);
    }
}

// =============================================================================
// TESTS
// =============================================================================
