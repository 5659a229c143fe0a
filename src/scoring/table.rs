use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::error::ScoringError;

/// Adaptive difficulty of the second module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Hard,
}

impl Tier {
    /// Select the tier for `correct` answers out of `total`.
    ///
    /// Performance is `correct / total`. The comparison is inclusive: exactly
    /// hitting the threshold earns `Hard`. An empty attempt is always `Easy`,
    /// whatever the threshold.
    pub fn select(correct: u32, total: u32, threshold: f64) -> Self {
        if total == 0 {
            return Tier::Easy;
        }
        let performance = f64::from(correct) / f64::from(total);
        if performance >= threshold {
            Tier::Hard
        } else {
            Tier::Easy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Hard => "hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a table lookup. A missing score is data, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledScore {
    Found(u32),
    NotFound,
}

impl ScaledScore {
    pub fn value(&self) -> Option<u32> {
        match self {
            ScaledScore::Found(n) => Some(*n),
            ScaledScore::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ScaledScore::Found(_))
    }
}

impl fmt::Display for ScaledScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaledScore::Found(n) => write!(f, "{}", n),
            ScaledScore::NotFound => f.write_str("N/A"),
        }
    }
}

// Serialized as a bare number, or null when the table has no value.
impl Serialize for ScaledScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScaledScore::Found(n) => serializer.serialize_u32(*n),
            ScaledScore::NotFound => serializer.serialize_none(),
        }
    }
}

/// One row of a subject's raw -> scaled mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreTableEntry {
    pub raw: u32,
    #[serde(default)]
    pub easy: Option<u32>,
    #[serde(default)]
    pub hard: Option<u32>,
}

impl ScoreTableEntry {
    pub fn score_for(&self, tier: Tier) -> Option<u32> {
        match tier {
            Tier::Easy => self.easy,
            Tier::Hard => self.hard,
        }
    }
}

/// A subject's table exactly as it appears in the score table source file.
///
/// Example JSON:
/// ```json
/// { "key": "Math", "map": [ { "raw": 8, "easy": 650, "hard": 700 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubjectTable {
    pub key: String,
    pub map: Vec<ScoreTableEntry>,
}

/// Immutable (tier, raw) -> scaled score lookup for a single subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    subject: String,
    entries: Vec<ScoreTableEntry>,
}

impl ScoreTable {
    pub fn new(subject: impl Into<String>, entries: Vec<ScoreTableEntry>) -> Self {
        Self {
            subject: subject.into(),
            entries,
        }
    }

    /// Build the table for `subject` out of a collection of subject tables.
    ///
    /// The first table whose key matches (case-sensitive) is used.
    pub fn from_source(source: &[SubjectTable], subject: &str) -> Result<Self, ScoringError> {
        source
            .iter()
            .find(|t| t.key == subject)
            .map(|t| Self::new(t.key.clone(), t.map.clone()))
            .ok_or_else(|| ScoringError::MalformedTable {
                subject: subject.to_string(),
            })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn entries(&self) -> &[ScoreTableEntry] {
        &self.entries
    }

    /// Linear scan for `raw`; the first matching entry wins even if later
    /// entries repeat the same raw value.
    pub fn lookup(&self, tier: Tier, raw: u32) -> ScaledScore {
        self.entries
            .iter()
            .find(|e| e.raw == raw)
            .and_then(|e| e.score_for(tier))
            .map_or(ScaledScore::NotFound, ScaledScore::Found)
    }
}
