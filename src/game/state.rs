//! Game State Definitions
//!
//! The aggregate scoring state, the nine magic-card kinds, active timed
//! effects, and the difficulty curve. All values here are part of the
//! replay contract: the validator rebuilds this state from scratch and
//! must land on the same numbers.

use serde::{Deserialize, Serialize};

use crate::core::hash::{compute_state_hash, StateHash};

// =============================================================================
// TUNING CONSTANTS
// =============================================================================

/// Game area width in pixels.
pub const GAME_WIDTH: f64 = 800.0;

/// Game area height in pixels.
pub const GAME_HEIGHT: f64 = 600.0;

/// Falling object hitbox side length.
pub const OBJECT_SIZE: f64 = 64.0;

/// Session length in milliseconds.
pub const GAME_DURATION_MS: f64 = 120_000.0;

/// Lives at session start. Lives only ever decrease (bomb hits).
pub const STARTING_LIVES: u32 = 5;

/// Combo multiplier ceiling.
pub const MAX_COMBO: f64 = 5.0;

/// Base fall speed before the difficulty ramp (px/s).
pub const BASE_FALL_SPEED: f64 = 150.0;

/// Base spawn rate before the difficulty ramp (spawns/s).
pub const BASE_SPAWN_RATE: f64 = 1.2;

// =============================================================================
// MAGIC CARDS
// =============================================================================

/// The nine magic-card kinds revealed by gift taps.
///
/// A fixed enumerated set with exhaustive matching everywhere it is
/// consumed, so a new kind cannot be silently mis-typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum CardType {
    /// Timer and spawning suspended.
    TimeFreeze = 0,
    /// Objects fall at half speed.
    SlowMotion = 1,
    /// One-shot: triples the next successful logo tap, then consumed.
    GoldenMonad = 2,
    /// Instant: +10 seconds on the clock.
    ExtraTime = 3,
    /// Presentation-only highlight of logo objects.
    LogoHighlight = 4,
    /// Instant: -20 score (floor at zero applies).
    BombTrap = 5,
    /// Hitboxes at half size.
    ShrinkRay = 6,
    /// Spawn rate tripled; spawns arrive in bursts.
    MonadSwarm = 7,
    /// Instant: +5 score per glitch on screen, glitches cleared.
    GlitchPurge = 8,
}

impl CardType {
    /// All card kinds, in uniform-choice order.
    ///
    /// Index order is a replay contract: `GameRng::card_type` draws a
    /// uniform index into this array.
    pub const ALL: [CardType; 9] = [
        CardType::TimeFreeze,
        CardType::SlowMotion,
        CardType::GoldenMonad,
        CardType::ExtraTime,
        CardType::LogoHighlight,
        CardType::BombTrap,
        CardType::ShrinkRay,
        CardType::MonadSwarm,
        CardType::GlitchPurge,
    ];

    /// Effect duration in milliseconds (0 = instant or one-shot).
    pub fn duration_ms(self) -> f64 {
        match self {
            CardType::TimeFreeze => 5000.0,
            CardType::SlowMotion => 7000.0,
            CardType::GoldenMonad => 0.0,
            CardType::ExtraTime => 0.0,
            CardType::LogoHighlight => 5000.0,
            CardType::BombTrap => 0.0,
            CardType::ShrinkRay => 4000.0,
            CardType::MonadSwarm => 3000.0,
            CardType::GlitchPurge => 0.0,
        }
    }

    /// Default numeric payload carried by the effect, if any.
    pub fn default_value(self) -> Option<f64> {
        match self {
            CardType::SlowMotion => Some(0.5),     // fall-speed multiplier
            CardType::ExtraTime => Some(10_000.0), // ms added to the clock
            CardType::BombTrap => Some(-20.0),     // score delta
            CardType::ShrinkRay => Some(0.5),      // hitbox size multiplier
            CardType::MonadSwarm => Some(3.0),     // spawn-rate multiplier
            CardType::GlitchPurge => Some(0.0),    // glitches on screen, set at reveal
            CardType::TimeFreeze | CardType::GoldenMonad | CardType::LogoHighlight => None,
        }
    }

    /// Instant effects apply once at reveal and are never stored.
    pub fn is_instant(self) -> bool {
        matches!(
            self,
            CardType::ExtraTime | CardType::BombTrap | CardType::GlitchPurge
        )
    }

    /// One-shot effects have duration 0 but persist until consumed.
    pub fn is_one_shot(self) -> bool {
        matches!(self, CardType::GoldenMonad)
    }
}

// =============================================================================
// ACTIVE EFFECTS
// =============================================================================

/// A timed or one-shot modifier currently altering gameplay.
///
/// At most one effect of a given kind is active at once; activating a
/// duplicate replaces the existing one, never stacks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Which card produced this effect.
    pub kind: CardType,
    /// Remaining duration in ms (0 for one-shot effects).
    pub remaining_ms: f64,
    /// Optional numeric payload (multiplier, delta, count).
    pub value: Option<f64>,
    /// Timestamp when the effect was activated (ms).
    pub start_time: u64,
}

impl ActiveEffect {
    /// Build the effect a revealed card produces, with default payload.
    pub fn from_card(kind: CardType, now_ms: u64) -> Self {
        Self {
            kind,
            remaining_ms: kind.duration_ms(),
            value: kind.default_value(),
            start_time: now_ms,
        }
    }
}

// =============================================================================
// DIFFICULTY CURVE
// =============================================================================

/// Difficulty parameters, recomputed each frame from absolute elapsed
/// time since session start — never incremented, so replay at any frame
/// rate lands on the same curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Level, one step per 30 seconds of play.
    pub level: u32,
    /// Object fall speed (px/s) at this level.
    pub fall_speed: f64,
    /// Spawn rate (spawns/s) at this level.
    pub spawn_rate: f64,
}

impl Difficulty {
    /// Difficulty for a given elapsed play time.
    pub fn at(elapsed_ms: f64) -> Self {
        let level = (elapsed_ms / 30_000.0).floor().max(0.0) as u32;
        Self {
            level,
            fall_speed: BASE_FALL_SPEED * 1.3f64.powi(level as i32),
            spawn_rate: BASE_SPAWN_RATE * 1.2f64.powi(level as i32),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::at(0.0)
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Combo multiplier derived from streak: `1.0 + floor(streak/5) * 0.5`,
/// capped at [`MAX_COMBO`]. Combo is never settable independently.
#[inline]
pub fn combo_for_streak(streak: u32) -> f64 {
    (1.0 + (streak / 5) as f64 * 0.5).min(MAX_COMBO)
}

/// Aggregate scoring state for one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Accumulated score. Clamped at zero from below.
    pub score: u64,
    /// Remaining lives (0..=5). Only bomb hits decrease this.
    pub lives: u32,
    /// Remaining play time in ms.
    pub time_left_ms: f64,
    /// Score multiplier, derived from `streak`.
    pub combo: f64,
    /// Consecutive non-reset taps.
    pub streak: u32,
    /// Timestamp when RUNNING began (ms).
    pub game_start_time: u64,
    /// Current difficulty parameters.
    pub difficulty: Difficulty,
    /// Active timed/one-shot effects, in activation order.
    pub active_effects: Vec<ActiveEffect>,
}

impl GameState {
    /// Initial state at the moment the session enters RUNNING.
    pub fn initial(game_start_time: u64) -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            time_left_ms: GAME_DURATION_MS,
            combo: combo_for_streak(0),
            streak: 0,
            game_start_time,
            difficulty: Difficulty::default(),
            active_effects: Vec::new(),
        }
    }

    /// Look up the active effect of a given kind.
    pub fn effect(&self, kind: CardType) -> Option<&ActiveEffect> {
        self.active_effects.iter().find(|e| e.kind == kind)
    }

    /// Is an effect of this kind currently active?
    #[inline]
    pub fn has_effect(&self, kind: CardType) -> bool {
        self.effect(kind).is_some()
    }

    /// Activate an effect, replacing any existing effect of the same kind.
    pub fn activate_effect(&mut self, effect: ActiveEffect) {
        self.active_effects.retain(|e| e.kind != effect.kind);
        self.active_effects.push(effect);
    }

    /// Remove an effect of the given kind (one-shot consumption).
    pub fn remove_effect(&mut self, kind: CardType) {
        self.active_effects.retain(|e| e.kind != kind);
    }

    /// Fall-speed multiplier from active effects (slow-motion).
    pub fn speed_multiplier(&self) -> f64 {
        self.effect(CardType::SlowMotion)
            .and_then(|e| e.value)
            .unwrap_or(1.0)
    }

    /// Hitbox size multiplier from active effects (shrink-ray).
    pub fn size_multiplier(&self) -> f64 {
        self.effect(CardType::ShrinkRay)
            .and_then(|e| e.value)
            .unwrap_or(1.0)
    }

    /// Spawn-rate multiplier from active effects (monad-swarm).
    pub fn spawn_rate_multiplier(&self) -> f64 {
        self.effect(CardType::MonadSwarm)
            .and_then(|e| e.value)
            .unwrap_or(1.0)
    }

    /// Is the clock (and spawning) frozen?
    #[inline]
    pub fn time_frozen(&self) -> bool {
        self.has_effect(CardType::TimeFreeze)
    }

    /// Is a golden-monad waiting to be consumed?
    #[inline]
    pub fn golden_active(&self) -> bool {
        self.has_effect(CardType::GoldenMonad)
    }

    /// Compact digest of this state for client/server desync detection.
    pub fn state_hash(&self, action_count: u32) -> StateHash {
        compute_state_hash(self.score, self.lives, self.combo, self.streak, action_count)
    }
}

// =============================================================================
// TESTS
// =============================================================================
