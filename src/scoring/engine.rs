use serde::Serialize;

use super::classify::ClassificationResult;
use super::table::{ScaledScore, ScoreTable, Tier};

/// Performance cutoff for the hard module when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Base score for one (student, subject) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub total: u32,
    pub correct: u32,
    pub module: Tier,
    pub scaled_score: ScaledScore,
    pub classification: ClassificationResult,
}

impl ScoredResult {
    /// `correct / total`, defined as 0 for an empty attempt.
    pub fn performance(&self) -> f64 {
        if self.total > 0 {
            f64::from(self.correct) / f64::from(self.total)
        } else {
            0.0
        }
    }
}

/// Pick the adaptive tier and resolve the scaled score for `correct`.
///
/// Never fails: an empty attempt scores as `Easy` with whatever the table
/// holds for raw 0.
pub fn score(
    classification: &ClassificationResult,
    table: &ScoreTable,
    threshold: f64,
) -> ScoredResult {
    let module = Tier::select(classification.correct, classification.total, threshold);
    let scaled_score = table.lookup(module, classification.correct);

    ScoredResult {
        total: classification.total,
        correct: classification.correct,
        module,
        scaled_score,
        classification: classification.clone(),
    }
}
