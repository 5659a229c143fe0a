use thiserror::Error;

/// Errors raised by the scoring core.
///
/// A missing scaled score is not an error; see [`super::ScaledScore::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The requested subject has no table in the score table source
    #[error("score table has no entry for subject '{subject}'")]
    MalformedTable { subject: String },

    /// What-if simulation asked to fix a negative number of answers
    #[error("fix count must be non-negative, got {fix_count}")]
    InvalidSimulationInput { fix_count: i64 },
}
