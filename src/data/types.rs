use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Topic name used when a record carries no topic.
pub const UNKNOWN_TOPIC: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubjectRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// One answered question from an attempt file.
///
/// `correct` accepts `0`/`1` or a boolean; `question_id` accepts a string
/// or an integer. `topic` may be missing, `null`, or lack a name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "deserialize_question_id")]
    pub question_id: String,
    pub subject: SubjectRef,
    #[serde(default)]
    pub topic: Option<TopicRef>,
    #[serde(deserialize_with = "deserialize_correct")]
    pub correct: bool,
}

impl QuestionRecord {
    pub fn new(
        question_id: impl Into<String>,
        subject: impl Into<String>,
        topic: Option<&str>,
        correct: bool,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            subject: SubjectRef {
                name: subject.into(),
            },
            topic: topic.map(|t| TopicRef {
                name: Some(t.to_string()),
            }),
            correct,
        }
    }

    pub fn subject_name(&self) -> &str {
        &self.subject.name
    }

    /// Topic name, or [`UNKNOWN_TOPIC`] when absent at any level.
    pub fn topic_name(&self) -> &str {
        self.topic
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .unwrap_or(UNKNOWN_TOPIC)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorrectFlag {
    Bool(bool),
    Int(i64),
}

fn deserialize_correct<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match CorrectFlag::deserialize(deserializer)? {
        CorrectFlag::Bool(b) => Ok(b),
        CorrectFlag::Int(1) => Ok(true),
        CorrectFlag::Int(0) => Ok(false),
        CorrectFlag::Int(n) => Err(de::Error::custom(format!(
            "correct must be 0, 1, true or false, got {}",
            n
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionId {
    Text(String),
    Number(i64),
}

fn deserialize_question_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match QuestionId::deserialize(deserializer)? {
        QuestionId::Text(s) => s,
        QuestionId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "question_id": "q-17",
            "subject": {"name": "Math"},
            "topic": {"name": "Algebra"},
            "correct": 1
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.question_id, "q-17");
        assert_eq!(record.subject_name(), "Math");
        assert_eq!(record.topic_name(), "Algebra");
        assert!(record.correct);
    }

    #[test]
    fn test_parse_numeric_id_and_bool_flag() {
        let json = r#"{"question_id": 42, "subject": {"name": "Math"}, "correct": false}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.question_id, "42");
        assert!(!record.correct);
    }

    #[test]
    fn test_missing_topic_defaults_to_unknown() {
        let json = r#"{"question_id": "a", "subject": {"name": "Math"}, "correct": 0}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.topic_name(), UNKNOWN_TOPIC);

        let json = r#"{"question_id": "a", "subject": {"name": "Math"}, "topic": null, "correct": 0}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.topic_name(), UNKNOWN_TOPIC);

        let json = r#"{"question_id": "a", "subject": {"name": "Math"}, "topic": {}, "correct": 0}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.topic_name(), UNKNOWN_TOPIC);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let json = r#"{"question_id": "a", "subject": {"name": "Math", "id": 3}, "correct": 1, "time_spent": 41}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.subject_name(), "Math");
    }

    #[test]
    fn test_invalid_correct_flag_rejected() {
        let json = r#"{"question_id": "a", "subject": {"name": "Math"}, "correct": 2}"#;
        let result: Result<QuestionRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
