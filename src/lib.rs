//! # Tapfall
//!
//! Deterministic simulation core for a 120-second arcade tapping game:
//! falling objects, combo-driven scoring, magic-card effects, and a
//! server-side validator that replays every submitted session from its
//! seed. One shared law: identical `(seed, action log)` always produces
//! identical final state, on the client and on the server.
//!
//! ```text
//!                         ┌─────────────────┐
//!                         │   GameSession   │
//!                         │  (orchestrator) │
//!                         └────────┬────────┘
//!              ┌──────────────┬────┴─────┬──────────────┐
//!              ▼              ▼          ▼              ▼
//!       ┌────────────┐ ┌──────────┐ ┌─────────┐ ┌────────────┐
//!       │ SpawnMgr   │ │ scoring  │ │ physics │ │ ActionLog  │
//!       │ + ObjPool  │ │ (pure)   │ │ (AABB)  │ │ + Batcher  │
//!       └─────┬──────┘ └────┬─────┘ └─────────┘ └─────┬──────┘
//!             ▼             ▼                          ▼
//!       ┌──────────┐  ┌───────────┐            ┌─────────────┐
//!       │ GameRng  │  │ GameState │            │  validate   │
//!       │ xorshift │  │ + effects │◀───replay──│  (server)   │
//!       └──────────┘  └───────────┘            └─────────────┘
//! ```
//!
//! The RNG draw order is a wire-level contract: spawn draws go
//! `object type → x → fall speed → (card) → next delay`, and the
//! validator reconstructs the identical stream from
//! `(session_id, start_time)`.

pub mod core;
pub mod game;
pub mod validate;

pub use crate::core::geom::{Aabb, Vec2};
pub use crate::core::hash::{compute_state_hash, StateHash};
pub use crate::core::rng::{derive_session_seed, Xorshift32};
pub use crate::game::events::{TapEvent, TapKind, TapResult};
pub use crate::game::object::{GameObject, ObjectPool, ObjectType};
pub use crate::game::rng::GameRng;
pub use crate::game::session::{GameSession, SessionError, SessionExport, SessionPhase, COUNTDOWN_MS};
pub use crate::game::state::{ActiveEffect, CardType, Difficulty, GameState};
pub use crate::validate::{validate_submission, ScoreSubmission, ValidationReport, Verdict};

/// Crate version, for logs and exports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal client tick rate (frames per second). The simulation is
/// delta-time based and does not require this rate; it only informs
/// demo pacing.
pub const TICK_RATE: u32 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_reachable() {
        let rng = GameRng::from_session("api-test", 12345);
        let state = GameState::initial(12345);

        assert_eq!(state.lives, game::state::STARTING_LIVES);
        assert_ne!(rng.state(), 0);
        assert!(!VERSION.is_empty());
    }

    /// End-to-end: run a scripted session, export, validate.
    #[test]
    fn test_session_export_validates_cleanly() {
        let mut session = GameSession::new("e2e", "player", 1_000_000);
        session.ready().unwrap();
        session.start(1_000_000).unwrap();

        let mut now = 1_000_000u64;
        while session.phase() != SessionPhase::Running {
            now += 16;
            session.update(now);
        }

        // Tap on-screen objects at a human cadence. Gifts are skipped
        // because a glitch-purge payout depends on screen state the
        // replay cannot see, and the expectation here is an exact match.
        for _ in 0..400 {
            now += 16;
            session.update(now);
            if now % 250 < 16 {
                let target = session.objects().iter().find_map(|o| {
                    if o.position.y <= 0.0 {
                        return None;
                    }
                    let idx = game::physics::find_tapped_object(
                        session.objects(),
                        o.position,
                        session.state().size_multiplier(),
                    )?;
                    (session.objects()[idx].object_type != ObjectType::Gift)
                        .then_some(o.position)
                });
                if let Some(pos) = target {
                    session.handle_tap(now, pos);
                }
            }
        }

        let export = session.export();
        let report = validate_submission(&export.into());
        assert_eq!(report.verdict, Verdict::Accepted, "{:?}", report.findings);
        assert_eq!(report.server_score, report.client_score);
    }

    /// Honest play that taps gift boxes must never be rejected: the
    /// revealed card travels with the tap event, so the replay applies
    /// the same card the session drew.
    #[test]
    fn test_gift_tapping_sessions_never_rejected() {
        for (i, sid) in ["gifts-a", "gifts-b", "gifts-c", "gifts-d", "gifts-e"]
            .iter()
            .enumerate()
        {
            let start = 2_000_000 + 777 * i as u64;
            let mut session = GameSession::new(*sid, "player", start);
            session.ready().unwrap();
            session.start(start).unwrap();

            let mut now = start;
            while session.phase() != SessionPhase::Running {
                now += 16;
                session.update(now);
            }

            // Human cadence, bombs avoided, gifts tapped
            for _ in 0..2000 {
                now += 16;
                session.update(now);
                if session.phase() != SessionPhase::Running {
                    break;
                }
                if now % 250 < 16 {
                    let target = session.objects().iter().find_map(|o| {
                        if o.position.y <= 0.0 {
                            return None;
                        }
                        let idx = game::physics::find_tapped_object(
                            session.objects(),
                            o.position,
                            session.state().size_multiplier(),
                        )?;
                        (session.objects()[idx].object_type != ObjectType::Bomb)
                            .then_some(o.position)
                    });
                    if let Some(pos) = target {
                        session.handle_tap(now, pos);
                    }
                }
            }

            let report = validate_submission(&session.export().into());
            assert_ne!(
                report.verdict,
                Verdict::Rejected,
                "session {sid}: client={} server={} {:?}",
                report.client_score,
                report.server_score,
                report.findings
            );
            assert!(
                report
                    .findings
                    .iter()
                    .all(|f| f.severity != validate::Severity::High),
                "session {sid}: {:?}",
                report.findings
            );
        }
    }
}
