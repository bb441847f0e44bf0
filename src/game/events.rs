//! Tap Events and Results
//!
//! The tap event log is the canonical replay input: the validator folds
//! these records through the scoring state machine to re-derive the
//! authoritative final score. Also hosts the transport-boundary batching
//! buffer (the core never performs the transport itself).

use serde::{Deserialize, Serialize};

use crate::core::geom::Vec2;
use crate::game::state::{ActiveEffect, CardType};

// =============================================================================
// TAP EVENTS
// =============================================================================

/// What a tap resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TapKind {
    /// A wanted logo object.
    Logo,
    /// A glitch object (streak breaker, life-neutral).
    Glitch,
    /// A gift object (reveals a magic card).
    Gift,
    /// A bomb (streak breaker, costs one life).
    Bomb,
    /// A tap that hit nothing.
    Miss,
}

/// One recorded tap. Immutable once appended to the session's action log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapEvent {
    /// Absolute timestamp of the tap (ms).
    pub timestamp: u64,
    /// Tap position in game-area coordinates.
    pub position: Vec2,
    /// Id of the consumed object, if any.
    pub target_id: Option<String>,
    /// What the tap resolved to.
    pub result: TapKind,
    /// Card a gift tap revealed; `None` for every other kind. Recorded
    /// at reveal time so the log alone suffices to replay the session.
    pub card: Option<CardType>,
    /// Combo multiplier the client claims after this tap.
    pub claimed_combo: f64,
    /// Score delta the client claims for this tap.
    pub claimed_points: i64,
}

/// Outcome of feeding one tap through the scoring state machine.
///
/// Produced by `scoring::process_tap` without mutating anything; applied
/// by `scoring::apply_tap_result`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TapResult {
    /// What the tap resolved to.
    pub outcome: TapKind,
    /// Score delta (may be negative via instant card effects).
    pub points: i64,
    /// Lives lost by this tap (0 or 1).
    pub lives_lost: u32,
    /// Streak after this tap.
    pub streak: u32,
    /// Combo after this tap (derived from the new streak).
    pub combo: f64,
    /// Effect produced by a revealed card, if the tap was a gift.
    pub effect: Option<ActiveEffect>,
    /// Whether this tap consumed a pending golden-monad.
    pub golden_consumed: bool,
}

// =============================================================================
// ACTION TRANSPORT BUFFER
// =============================================================================

/// Buffer full threshold: flush once this many events are pending.
pub const BATCH_MAX_EVENTS: usize = 20;

/// Time threshold: flush once this long has passed since the last flush.
pub const BATCH_FLUSH_INTERVAL_MS: u64 = 1500;

/// Batching buffer between the simulation and the action transport.
///
/// Pure bookkeeping: it reports *when* a flush is due and hands the
/// batch over; the actual network send belongs to an external
/// collaborator and never blocks the tick.
#[derive(Clone, Debug, Default)]
pub struct ActionBatcher {
    buffer: Vec<TapEvent>,
    last_flush_ms: u64,
}

impl ActionBatcher {
    /// Create an empty batcher; the first interval is measured from `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            buffer: Vec::new(),
            last_flush_ms: now_ms,
        }
    }

    /// Queue an event for the next flush.
    pub fn push(&mut self, event: TapEvent) {
        self.buffer.push(event);
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Is a flush due, either by buffer size or by elapsed time?
    pub fn should_flush(&self, now_ms: u64) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        self.buffer.len() >= BATCH_MAX_EVENTS
            || now_ms.saturating_sub(self.last_flush_ms) >= BATCH_FLUSH_INTERVAL_MS
    }

    /// Take the pending batch and reset the interval clock.
    pub fn drain(&mut self, now_ms: u64) -> Vec<TapEvent> {
        self.last_flush_ms = now_ms;
        std::mem::take(&mut self.buffer)
    }
}

// =============================================================================
// TESTS
// =============================================================================
