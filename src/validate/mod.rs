//! Score Validation
//!
//! The server-side source of truth for submitted scores: heuristic
//! checks over the tap history, a full deterministic replay, and a
//! three-way verdict. The client's score is a claim; the replayed score
//! is the one that stands.

pub mod checks;
pub mod replay;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use checks::{Finding, Severity, MAX_TAPS_PER_SECOND, MIN_TAP_INTERVAL_MS};
pub use replay::{replay_submission, ReplayOutcome, ScoreSubmission};

/// Score drift accepted without comment (legitimate card-timing noise).
pub const SCORE_TOLERANCE: i64 = 10;

/// Score drift logged as a low finding up to this bound; beyond it the
/// finding is medium. Score drift alone never rejects — the replayed
/// score stands either way, so an inflated claim costs the cheater
/// nothing but review.
pub const SCORE_TOLERANCE_MEDIUM: i64 = 50;

/// Medium findings tolerated before the submission is rejected.
pub const MAX_MEDIUM_FINDINGS: usize = 2;

// =============================================================================
// VERDICT
// =============================================================================

/// Final judgement on a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Clean: the replayed score stands.
    Accepted,
    /// Playable doubts: accepted but queued for review.
    Flagged,
    /// Implausible: the submission is discarded.
    Rejected,
}

/// Everything the scoring pipeline needs to act on a submission.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Opaque session id.
    pub session_id: String,
    /// Final judgement.
    pub verdict: Verdict,
    /// The authoritative replayed score.
    pub server_score: u64,
    /// What the client claimed.
    pub client_score: u64,
    /// Every violation the checks and the replay produced.
    pub findings: Vec<Finding>,
}

/// Validate a submission: heuristics, replay, verdict.
///
/// Any high-severity finding rejects outright; more than
/// [`MAX_MEDIUM_FINDINGS`] mediums reject; any medium flags. Low
/// findings are logged in the report but leave the verdict alone.
/// The reported score is always the server's replay, never the claim.
pub fn validate_submission(submission: &ScoreSubmission) -> ValidationReport {
    let mut findings = Vec::new();

    checks::check_tap_intervals(&submission.tap_history, &mut findings);
    checks::check_tap_positions(&submission.tap_history, &mut findings);
    checks::check_time_window(&submission.tap_history, submission.start_time, &mut findings);
    checks::check_tap_rate(&submission.tap_history, &mut findings);
    checks::check_combo_law(&submission.tap_history, &mut findings);

    let outcome = replay_submission(submission);
    let server_score = outcome.final_state.score;

    let delta = server_score as i64 - submission.client_score as i64;
    if delta.abs() > SCORE_TOLERANCE {
        let severity = if delta.abs() <= SCORE_TOLERANCE_MEDIUM {
            Severity::Low
        } else {
            Severity::Medium
        };
        findings.push(Finding {
            check: "score-replay".to_string(),
            detail: format!(
                "client claims {}, replay gives {} (delta {})",
                submission.client_score, server_score, delta
            ),
            severity,
        });
    } else if outcome.state_hash != submission.state_hash {
        // Score agrees but digests differ: a desync worth logging
        findings.push(Finding {
            check: "state-hash".to_string(),
            detail: format!(
                "client digest {} differs from replay digest {}",
                hex::encode(submission.state_hash),
                hex::encode(outcome.state_hash)
            ),
            severity: Severity::Low,
        });
    }

    let highs = findings.iter().filter(|f| f.severity == Severity::High).count();
    let mediums = findings.iter().filter(|f| f.severity == Severity::Medium).count();

    let verdict = if highs > 0 || mediums > MAX_MEDIUM_FINDINGS {
        Verdict::Rejected
    } else if mediums > 0 {
        Verdict::Flagged
    } else {
        // Low findings are logged but tolerated
        Verdict::Accepted
    };

    info!(
        session_id = %submission.session_id,
        ?verdict,
        server_score,
        client_score = submission.client_score,
        findings = findings.len(),
        "submission validated"
    );

    ValidationReport {
        session_id: submission.session_id.clone(),
        verdict,
        server_score,
        client_score: submission.client_score,
        findings,
    }
}

// =============================================================================
// TESTS
// =============================================================================
