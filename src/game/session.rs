//! Session Orchestrator
//!
//! Sequences IDLE → READY → COUNTDOWN → RUNNING ⇄ PAUSED → FINISHED →
//! SUMMARY and drives the per-frame update. Single-threaded cooperative
//! model: the caller owns the tick cadence and every mutation of session
//! state happens inside one `update`/`handle_tap` call — nothing here
//! blocks or awaits.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::geom::Vec2;
use crate::core::hash::StateHash;
use crate::game::events::{ActionBatcher, TapEvent, TapResult};
use crate::game::object::{GameObject, ObjectPool};
use crate::game::physics::{count_glitches, cull_offscreen, find_tapped_object, purge_glitches, step_objects};
use crate::game::rng::GameRng;
use crate::game::scoring::{advance_state, apply_tap_result, is_game_over, process_tap};
use crate::game::spawn::{SpawnConfig, SpawnManager};
use crate::game::state::{CardType, GameState, GAME_HEIGHT, GAME_WIDTH};

/// Countdown length before RUNNING (ms).
pub const COUNTDOWN_MS: f64 = 3000.0;

// =============================================================================
// PHASES
// =============================================================================

/// Session lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    /// Created, nothing prepared yet.
    Idle,
    /// Prepared and waiting for the start call.
    Ready,
    /// Fixed 3-second countdown running.
    Countdown,
    /// Live play.
    Running,
    /// Play suspended; no time or position advances.
    Paused,
    /// Game-over predicate fired.
    Finished,
    /// Result display step; no state mutation.
    Summary,
}

/// Invalid lifecycle transition.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operator call arrived in a phase that does not accept it.
    #[error("cannot {action} while session is {phase:?}")]
    InvalidTransition {
        /// What was attempted.
        action: &'static str,
        /// Phase the session was in.
        phase: SessionPhase,
    },
}

// =============================================================================
// SESSION
// =============================================================================

/// Everything the persistence collaborator needs for a full replay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionExport {
    /// Opaque session id.
    pub session_id: String,
    /// Player/wallet id, treated as an arbitrary string.
    pub player_id: String,
    /// The 32-bit RNG seed the session ran under.
    pub seed: u32,
    /// Timestamp RUNNING began (the seed derivation input).
    pub start_time: u64,
    /// Final aggregate state.
    pub final_state: GameState,
    /// The canonical ordered action log.
    pub tap_history: Vec<TapEvent>,
    /// Digest of the final state for desync detection.
    pub state_hash: StateHash,
}

/// One player's game session.
///
/// Exclusively owns its RNG, state, object list and log; sessions share
/// nothing with each other.
pub struct GameSession {
    /// Opaque session id.
    pub session_id: String,
    /// Player/wallet id.
    pub player_id: String,
    phase: SessionPhase,
    seed: u32,
    rng: GameRng,
    state: GameState,
    objects: Vec<GameObject>,
    pool: ObjectPool,
    spawner: SpawnManager,
    tap_log: Vec<TapEvent>,
    batcher: ActionBatcher,
    state_hash: StateHash,
    countdown_remaining_ms: f64,
    last_update_ms: Option<u64>,
}

impl GameSession {
    /// Create a session with a fresh UUID session id.
    pub fn create(player_id: impl Into<String>, now_ms: u64) -> Self {
        Self::new(Uuid::new_v4().to_string(), player_id, now_ms)
    }

    /// Create a session with an explicit id (tests, replays).
    ///
    /// The RNG is provisionally seeded from `now_ms` and re-derived from
    /// the actual RUNNING timestamp when the countdown completes — the
    /// seed contract binds to `(session_id, game_start_time)`.
    pub fn new(session_id: impl Into<String>, player_id: impl Into<String>, now_ms: u64) -> Self {
        let session_id = session_id.into();
        let rng = GameRng::from_session(&session_id, now_ms);
        let state = GameState::initial(now_ms);
        let state_hash = state.state_hash(0);

        Self {
            session_id,
            player_id: player_id.into(),
            phase: SessionPhase::Idle,
            seed: 0,
            rng,
            state,
            objects: Vec::new(),
            pool: ObjectPool::default(),
            spawner: SpawnManager::new(SpawnConfig::default()),
            tap_log: Vec::new(),
            batcher: ActionBatcher::new(now_ms),
            state_hash,
            countdown_remaining_ms: 0.0,
            last_update_ms: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current aggregate state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Live objects, for rendering collaborators.
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// The recorded action log.
    pub fn tap_log(&self) -> &[TapEvent] {
        &self.tap_log
    }

    /// Latest state digest.
    pub fn state_hash(&self) -> StateHash {
        self.state_hash
    }

    /// The seed the session runs under (0 until RUNNING begins).
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// IDLE → READY.
    pub fn ready(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => {
                self.phase = SessionPhase::Ready;
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition { action: "ready", phase }),
        }
    }

    /// READY → COUNTDOWN (operator-triggered).
    pub fn start(&mut self, now_ms: u64) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Ready => {
                self.phase = SessionPhase::Countdown;
                self.countdown_remaining_ms = COUNTDOWN_MS;
                self.last_update_ms = Some(now_ms);
                info!(session_id = %self.session_id, "countdown started");
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition { action: "start", phase }),
        }
    }

    /// RUNNING → PAUSED (operator-triggered).
    pub fn pause(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Running => {
                self.phase = SessionPhase::Paused;
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition { action: "pause", phase }),
        }
    }

    /// PAUSED → RUNNING; the pause gap never reaches the clock.
    pub fn resume(&mut self, now_ms: u64) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Paused => {
                self.phase = SessionPhase::Running;
                self.last_update_ms = Some(now_ms);
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition { action: "resume", phase }),
        }
    }

    /// FINISHED → SUMMARY (display step only).
    pub fn show_summary(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Finished => {
                self.phase = SessionPhase::Summary;
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition { action: "show summary", phase }),
        }
    }

    /// Per-frame tick. `now_ms` is the caller's monotonic frame time.
    ///
    /// Delta-time based: everything this advances scales with the gap
    /// since the previous call, so the simulation is frame-rate
    /// independent. A full frame's physics and scoring happen atomically
    /// inside this call.
    pub fn update(&mut self, now_ms: u64) {
        let dt_ms = match self.last_update_ms {
            Some(last) => now_ms.saturating_sub(last) as f64,
            None => 0.0,
        };
        self.last_update_ms = Some(now_ms);

        match self.phase {
            SessionPhase::Countdown => {
                self.countdown_remaining_ms -= dt_ms;
                if self.countdown_remaining_ms <= 0.0 {
                    self.begin_running(now_ms);
                }
            }
            SessionPhase::Running => {
                self.state = advance_state(&self.state, dt_ms, now_ms);
                self.spawner.update(
                    dt_ms,
                    &self.state,
                    &mut self.rng,
                    &mut self.pool,
                    &mut self.objects,
                    now_ms,
                );
                step_objects(&mut self.objects, dt_ms, self.state.speed_multiplier());
                cull_offscreen(
                    &mut self.objects,
                    self.spawner.config().screen_height,
                    &mut self.pool,
                );

                if is_game_over(&self.state) {
                    self.phase = SessionPhase::Finished;
                    info!(
                        session_id = %self.session_id,
                        score = self.state.score,
                        lives = self.state.lives,
                        taps = self.tap_log.len(),
                        "session finished"
                    );
                }
            }
            // Idle/Ready/Paused/Finished/Summary advance nothing
            _ => {}
        }
    }

    /// COUNTDOWN reached zero: stamp the start time, derive the seed.
    fn begin_running(&mut self, now_ms: u64) {
        self.seed = crate::core::rng::derive_session_seed(&self.session_id, now_ms);
        self.rng = GameRng::from_session(&self.session_id, now_ms);
        self.state = GameState::initial(now_ms);
        self.state_hash = self.state.state_hash(0);
        self.phase = SessionPhase::Running;
        info!(
            session_id = %self.session_id,
            seed = self.seed,
            start_time = now_ms,
            "session running"
        );
    }

    /// Route a tap through hit resolution and the scoring state machine.
    ///
    /// Synchronous; a no-op (`None`) outside RUNNING or outside the game
    /// area — invalid input degrades, it never errors the tick loop.
    pub fn handle_tap(&mut self, now_ms: u64, position: Vec2) -> Option<TapResult> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        if !(0.0..GAME_WIDTH).contains(&position.x) || !(0.0..GAME_HEIGHT).contains(&position.y) {
            debug!(session_id = %self.session_id, ?position, "tap outside game area ignored");
            return None;
        }

        let hit = find_tapped_object(&self.objects, position, self.state.size_multiplier());

        let (kind, card, target_id) = match hit {
            Some(idx) => {
                let obj = self.objects.remove(idx);
                let triple = (obj.object_type.tap_kind(), obj.card_type, Some(obj.id.clone()));
                self.pool.release(obj);
                triple
            }
            None => (crate::game::events::TapKind::Miss, None, None),
        };

        let mut result = process_tap(&self.state, kind, card, now_ms);

        // Glitch-purge pays out per glitch on screen at reveal time
        if let Some(effect) = result.effect.as_mut() {
            if effect.kind == CardType::GlitchPurge {
                effect.value = Some(count_glitches(&self.objects) as f64);
                purge_glitches(&mut self.objects, &mut self.pool);
            }
        }

        self.state = apply_tap_result(&self.state, &result);

        let event = TapEvent {
            timestamp: now_ms,
            position,
            target_id,
            result: kind,
            card,
            claimed_combo: result.combo,
            claimed_points: result.points,
        };
        self.tap_log.push(event.clone());
        self.batcher.push(event);
        self.state_hash = self.state.state_hash(self.tap_log.len() as u32);

        if is_game_over(&self.state) {
            self.phase = SessionPhase::Finished;
            info!(session_id = %self.session_id, score = self.state.score, "session finished");
        }

        Some(result)
    }

    /// Hand a due batch to the action transport, if one is ready.
    ///
    /// Fire-and-forget from the simulation's perspective; the caller does
    /// the actual I/O outside the tick.
    pub fn poll_action_batch(&mut self, now_ms: u64) -> Option<Vec<TapEvent>> {
        if self.batcher.should_flush(now_ms) {
            Some(self.batcher.drain(now_ms))
        } else {
            None
        }
    }

    /// Snapshot everything a collaborator needs for persistence/replay.
    pub fn export(&self) -> SessionExport {
        SessionExport {
            session_id: self.session_id.clone(),
            player_id: self.player_id.clone(),
            seed: self.seed,
            start_time: self.state.game_start_time,
            final_state: self.state.clone(),
            tap_history: self.tap_log.clone(),
            state_hash: self.state_hash,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
