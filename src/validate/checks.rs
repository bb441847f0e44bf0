//! Anti-Cheat Heuristics
//!
//! Stateless checks over a submitted tap history. Each check yields zero
//! or more findings; the aggregation into a verdict lives in the parent
//! module. Heuristics flag *physically implausible* play (inhuman tap
//! cadence, out-of-area taps, out-of-window timestamps, combo claims
//! that break the combo law) — subtle cheats fall to the replay instead.

use serde::{Deserialize, Serialize};

use crate::game::events::{TapEvent, TapKind};
use crate::game::state::{combo_for_streak, GAME_DURATION_MS, GAME_HEIGHT, GAME_WIDTH};

/// Minimum believable gap between consecutive taps (ms).
pub const MIN_TAP_INTERVAL_MS: u64 = 50;

/// Maximum believable taps inside any rolling one-second window.
pub const MAX_TAPS_PER_SECOND: usize = 15;

// =============================================================================
// FINDINGS
// =============================================================================

/// How strongly a finding indicts the submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Informational; logged in the report, never moves the verdict.
    Low,
    /// Suspicious; flags on its own, several together reject.
    Medium,
    /// Physically implausible; a single one rejects.
    High,
}

/// One violation detected in a submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Which check fired.
    pub check: String,
    /// Human-readable detail for the review log.
    pub detail: String,
    /// How strongly this indicts the submission.
    pub severity: Severity,
}

impl Finding {
    fn new(check: &str, severity: Severity, detail: String) -> Self {
        Self {
            check: check.to_string(),
            detail,
            severity,
        }
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// Consecutive taps closer than the human floor.
pub fn check_tap_intervals(taps: &[TapEvent], findings: &mut Vec<Finding>) {
    for pair in taps.windows(2) {
        let gap = pair[1].timestamp.saturating_sub(pair[0].timestamp);
        if gap < MIN_TAP_INTERVAL_MS {
            findings.push(Finding::new(
                "tap-interval",
                Severity::High,
                format!("{}ms between taps at t={}", gap, pair[1].timestamp),
            ));
        }
    }
}

/// Taps outside the fixed game area.
pub fn check_tap_positions(taps: &[TapEvent], findings: &mut Vec<Finding>) {
    for tap in taps {
        let p = tap.position;
        if !(0.0..GAME_WIDTH).contains(&p.x) || !(0.0..GAME_HEIGHT).contains(&p.y) {
            findings.push(Finding::new(
                "tap-position",
                Severity::Medium,
                format!("tap at ({:.1}, {:.1}) outside game area", p.x, p.y),
            ));
        }
    }
}

/// Timestamps outside the nominal session window.
///
/// Graded medium rather than high: time-freeze cards and pauses can
/// legitimately push late taps past the nominal 120s mark.
pub fn check_time_window(taps: &[TapEvent], start_time: u64, findings: &mut Vec<Finding>) {
    let end = start_time + GAME_DURATION_MS as u64;
    for tap in taps {
        if tap.timestamp < start_time || tap.timestamp > end {
            findings.push(Finding::new(
                "time-window",
                Severity::Medium,
                format!("tap at t={} outside [{}, {}]", tap.timestamp, start_time, end),
            ));
        }
    }
}

/// More taps in any rolling one-second window than a human can produce.
pub fn check_tap_rate(taps: &[TapEvent], findings: &mut Vec<Finding>) {
    let mut window_start = 0usize;
    for (i, tap) in taps.iter().enumerate() {
        while taps[window_start].timestamp + 1000 <= tap.timestamp {
            window_start += 1;
        }
        let in_window = i - window_start + 1;
        if in_window > MAX_TAPS_PER_SECOND {
            findings.push(Finding::new(
                "tap-rate",
                Severity::High,
                format!("{} taps within 1s ending at t={}", in_window, tap.timestamp),
            ));
            // One finding per burst is enough
            window_start = i;
        }
    }
}

/// Claimed combos must follow the combo law over the recorded outcomes.
///
/// The combo is derived state: replaying only the outcome kinds fixes
/// the streak at every step, so each claimed combo is checkable without
/// a full simulation.
pub fn check_combo_law(taps: &[TapEvent], findings: &mut Vec<Finding>) {
    let mut streak = 0u32;
    for tap in taps {
        match tap.result {
            TapKind::Logo => streak += 1,
            TapKind::Gift => {}
            TapKind::Glitch | TapKind::Bomb | TapKind::Miss => streak = 0,
        }
        let lawful = combo_for_streak(streak);
        if (tap.claimed_combo - lawful).abs() > 1e-9 {
            findings.push(Finding::new(
                "combo-law",
                Severity::High,
                format!(
                    "claimed combo {:.2} at t={}, law gives {:.2} for streak {}",
                    tap.claimed_combo, tap.timestamp, lawful, streak
                ),
            ));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
