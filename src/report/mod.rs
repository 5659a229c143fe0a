//! Per (student, subject) result set handed to the export and display sinks.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::scoring::{ScaledScore, ScoredResult, SimulationResult, Tier};

/// Everything a sink needs about one student's subject, with no scoring
/// logic left to redo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub student: String,
    pub subject: String,
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub incorrect_question_ids: Vec<String>,
    pub module: Tier,
    pub scaled_score: ScaledScore,
    pub topic_breakdown: BTreeMap<String, u32>,
    pub topic_errors: BTreeMap<String, u32>,
    pub simulations: BTreeMap<i64, SimulationResult>,
}

impl Report {
    /// Incorrect answers for `topic`, 0 for topics answered without mistakes.
    pub fn topic_error_count(&self, topic: &str) -> u32 {
        self.topic_errors.get(topic).copied().unwrap_or(0)
    }
}

pub fn aggregate(
    student_name: &str,
    subject: &str,
    scored: &ScoredResult,
    simulations: BTreeMap<i64, SimulationResult>,
) -> Report {
    let classification = &scored.classification;
    Report {
        student: student_name.to_string(),
        subject: subject.to_string(),
        total: scored.total,
        correct: scored.correct,
        incorrect: classification.incorrect_count(),
        incorrect_question_ids: classification.incorrect.clone(),
        module: scored.module,
        scaled_score: scored.scaled_score,
        topic_breakdown: classification.topic_breakdown.clone(),
        topic_errors: classification.topic_errors.clone(),
        simulations,
    }
}
