//! Scoring / Effect State Machine
//!
//! Pure functions only: `process_tap` maps (state, tap) to a result
//! without mutating anything, `apply_tap_result` folds a result into a
//! fresh state. The anti-cheat validator replays the exact same functions
//! server-side, so any behavior change here is a replay-breaking change.

use crate::game::events::{TapKind, TapResult};
use crate::game::state::{
    combo_for_streak, ActiveEffect, CardType, Difficulty, GameState, GAME_DURATION_MS,
};

/// Base points for a logo tap, before the combo multiplier.
pub const LOGO_BASE_POINTS: f64 = 10.0;

/// Score bonus per glitch cleared by glitch-purge.
pub const GLITCH_PURGE_BONUS: f64 = 5.0;

/// Resolve a tap against the current state.
///
/// Does not mutate `state`. `card` is the card revealed by a gift tap
/// (ignored for every other tap kind); `now_ms` stamps any produced
/// effect.
///
/// Per-kind policy:
/// - **logo**: streak+1, combo recomputed from the new streak, points are
///   `10 × combo`, tripled when a golden-monad is pending (which this
///   result then marks consumed).
/// - **glitch**: streak and combo reset. Life-neutral — only bombs cost a
///   life, despite what some in-game copy has claimed over time.
/// - **gift**: streak and combo untouched; produces exactly one effect.
///   No direct score change (instant card payloads land at apply time).
/// - **bomb**: streak and combo reset, one life lost.
/// - **miss**: streak and combo reset, life-neutral, no points.
pub fn process_tap(
    state: &GameState,
    tap: TapKind,
    card: Option<CardType>,
    now_ms: u64,
) -> TapResult {
    match tap {
        TapKind::Logo => {
            let streak = state.streak + 1;
            let combo = combo_for_streak(streak);
            let golden = state.golden_active();
            let base = LOGO_BASE_POINTS * combo;
            let points = if golden { base * 3.0 } else { base };

            TapResult {
                outcome: TapKind::Logo,
                points: points.round() as i64,
                lives_lost: 0,
                streak,
                combo,
                effect: None,
                golden_consumed: golden,
            }
        }
        TapKind::Glitch => reset_result(TapKind::Glitch, 0),
        TapKind::Bomb => reset_result(TapKind::Bomb, 1),
        TapKind::Miss => reset_result(TapKind::Miss, 0),
        TapKind::Gift => TapResult {
            outcome: TapKind::Gift,
            points: 0,
            lives_lost: 0,
            streak: state.streak,
            combo: state.combo,
            effect: card.map(|kind| ActiveEffect::from_card(kind, now_ms)),
            golden_consumed: false,
        },
    }
}

/// A streak-breaking result (glitch, bomb, miss).
fn reset_result(outcome: TapKind, lives_lost: u32) -> TapResult {
    TapResult {
        outcome,
        points: 0,
        lives_lost,
        streak: 0,
        combo: combo_for_streak(0),
        effect: None,
        golden_consumed: false,
    }
}

/// Fold a tap result into the state, returning the successor state.
///
/// Clamps `score` at zero and `lives` at zero, consumes a spent
/// golden-monad exactly once, and applies instant card payloads
/// (extra-time, bomb-trap, glitch-purge) immediately; timed and one-shot
/// effects are stored, replacing any active effect of the same kind.
pub fn apply_tap_result(state: &GameState, result: &TapResult) -> GameState {
    let mut next = state.clone();

    next.score = clamped_score(next.score, result.points);
    next.lives = next.lives.saturating_sub(result.lives_lost);
    next.streak = result.streak;
    next.combo = result.combo;

    if result.golden_consumed {
        next.remove_effect(CardType::GoldenMonad);
    }

    if let Some(effect) = result.effect {
        if effect.kind.is_instant() {
            apply_instant_effect(&mut next, &effect);
        } else {
            next.activate_effect(effect);
        }
    }

    next
}

/// Apply a duration-0 card payload once, at reveal time.
fn apply_instant_effect(state: &mut GameState, effect: &ActiveEffect) {
    match effect.kind {
        CardType::ExtraTime => {
            let bonus = effect.value.unwrap_or(0.0);
            state.time_left_ms = (state.time_left_ms + bonus).min(GAME_DURATION_MS);
        }
        CardType::BombTrap => {
            let delta = effect.value.unwrap_or(0.0);
            state.score = clamped_score(state.score, delta.round() as i64);
        }
        CardType::GlitchPurge => {
            // value carries the number of glitches on screen at reveal
            let cleared = effect.value.unwrap_or(0.0);
            let bonus = (cleared * GLITCH_PURGE_BONUS).round() as i64;
            state.score = clamped_score(state.score, bonus);
        }
        _ => {}
    }
}

/// `score = max(0, score + delta)`.
#[inline]
fn clamped_score(score: u64, delta: i64) -> u64 {
    (score as i64 + delta).max(0) as u64
}

/// Advance the per-frame bookkeeping by `dt_ms` of wall-clock time.
///
/// Decrements the clock unless a time-freeze is active, recomputes the
/// difficulty curve from absolute elapsed time (never incremented, so the
/// curve is frame-rate independent and replay-stable), ticks down effect
/// durations and drops expired ones. One-shot effects persist until
/// consumed regardless of elapsed time.
pub fn advance_state(state: &GameState, dt_ms: f64, now_ms: u64) -> GameState {
    let mut next = state.clone();

    if !next.time_frozen() {
        next.time_left_ms = (next.time_left_ms - dt_ms).max(0.0);
    }

    let elapsed = now_ms.saturating_sub(next.game_start_time) as f64;
    next.difficulty = Difficulty::at(elapsed);

    for effect in &mut next.active_effects {
        if !effect.kind.is_one_shot() {
            effect.remaining_ms -= dt_ms;
        }
    }
    next.active_effects
        .retain(|e| e.kind.is_one_shot() || e.remaining_ms > 0.0);

    next
}

/// Game-over predicate: time expired *or* lives exhausted, whichever
/// happens first.
#[inline]
pub fn is_game_over(state: &GameState) -> bool {
    state.time_left_ms <= 0.0 || state.lives == 0
}

// =============================================================================
// TESTS
// =============================================================================
