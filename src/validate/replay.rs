//! Server-Side Replay
//!
//! Reconstructs the session RNG from `(session_id, start_time)` and
//! folds the submitted tap history through the same scoring state
//! machine the client ran, yielding the authoritative final state.
//! Gift taps replay the card recorded at reveal time; a history that
//! omits the card falls back to a draw from the reconstructed stream.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hash::StateHash;
use crate::game::events::{TapEvent, TapKind};
use crate::game::rng::GameRng;
use crate::game::scoring::{advance_state, apply_tap_result, process_tap};
use crate::game::session::SessionExport;
use crate::game::state::GameState;

/// A client's claim: final score plus the action log that justifies it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreSubmission {
    /// Opaque session id.
    pub session_id: String,
    /// Player/wallet id.
    pub player_id: String,
    /// Timestamp RUNNING began; the seed derivation input.
    pub start_time: u64,
    /// Score the client claims.
    pub client_score: u64,
    /// Client's final state digest.
    pub state_hash: StateHash,
    /// The full ordered action log.
    pub tap_history: Vec<TapEvent>,
}

impl From<SessionExport> for ScoreSubmission {
    fn from(export: SessionExport) -> Self {
        Self {
            session_id: export.session_id,
            player_id: export.player_id,
            start_time: export.start_time,
            client_score: export.final_state.score,
            state_hash: export.state_hash,
            tap_history: export.tap_history,
        }
    }
}

/// Result of replaying a submission.
#[derive(Clone, Debug)]
pub struct ReplayOutcome {
    /// Authoritative state after the last recorded action.
    pub final_state: GameState,
    /// Digest of that state, comparable to the client's.
    pub state_hash: StateHash,
}

/// Fold the submitted history through the scoring state machine.
///
/// Only outcome kinds and revealed cards drive the fold; claimed combos
/// and points in the history are ignored here (the heuristic checks
/// judge those). The replayed score can still drift from the live
/// session where a card's payout depends on screen state the log does
/// not carry (glitch-purge), which the verdict's score grading absorbs.
pub fn replay_submission(submission: &ScoreSubmission) -> ReplayOutcome {
    let mut rng = GameRng::from_session(&submission.session_id, submission.start_time);
    let mut state = GameState::initial(submission.start_time);
    let mut last_ts = submission.start_time;

    for tap in &submission.tap_history {
        let dt_ms = tap.timestamp.saturating_sub(last_ts) as f64;
        state = advance_state(&state, dt_ms, tap.timestamp);
        last_ts = tap.timestamp;

        let card = match tap.result {
            TapKind::Gift => tap.card.or_else(|| Some(rng.card_type())),
            _ => None,
        };
        let result = process_tap(&state, tap.result, card, tap.timestamp);
        state = apply_tap_result(&state, &result);
    }

    let state_hash = state.state_hash(submission.tap_history.len() as u32);
    debug!(
        session_id = %submission.session_id,
        server_score = state.score,
        client_score = submission.client_score,
        "replay complete"
    );

    ReplayOutcome { final_state: state, state_hash }
}

// =============================================================================
// TESTS
// =============================================================================
