use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::types::QuestionRecord;

/// Per (student, subject) counts derived from attempt records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub total: u32,
    pub correct: u32,
    /// Question ids answered incorrectly, in input order
    pub incorrect: Vec<String>,
    pub topic_breakdown: BTreeMap<String, u32>,
    pub topic_errors: BTreeMap<String, u32>,
}

impl ClassificationResult {
    pub fn incorrect_count(&self) -> u32 {
        self.total.saturating_sub(self.correct)
    }
}

/// Count the records belonging to `subject` (exact, case-sensitive match).
///
/// Records for other subjects are skipped. No matching records yields an
/// empty result with `total == 0`.
pub fn classify(records: &[QuestionRecord], subject: &str) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for record in records.iter().filter(|r| r.subject_name() == subject) {
        let topic = record.topic_name();
        result.total += 1;
        *result.topic_breakdown.entry(topic.to_string()).or_insert(0) += 1;

        if record.correct {
            result.correct += 1;
        } else {
            result.incorrect.push(record.question_id.clone());
            *result.topic_errors.entry(topic.to_string()).or_insert(0) += 1;
        }
    }

    result
}
