use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scoring::DEFAULT_THRESHOLD;

pub const DEFAULT_FIX_COUNTS: [i64; 3] = [1, 2, 3];
pub const DEFAULT_SUBJECTS: [&str; 2] = ["Reading and Writing", "Math"];

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// score_table: scoring_DSAT_v2.json
/// threshold: 0.5
/// fix_counts: [1, 2, 3]
/// subjects: ["Reading and Writing", "Math"]
/// students:
///   - name: Student 1
///     attempts: user_attempt_v2.json
/// export:
///   csv: dsat_summary.csv
/// ```
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON file holding every subject's raw -> scaled table
    #[serde(default)]
    pub score_table: Option<PathBuf>,

    /// Performance cutoff for the hard module (default: 0.5)
    #[serde(default)]
    pub threshold: Option<f64>,

    /// What-if fix counts to simulate (default: 1, 2, 3)
    #[serde(default)]
    pub fix_counts: Option<Vec<i64>>,

    /// Subjects to score, in report order
    #[serde(default)]
    pub subjects: Option<Vec<String>>,

    #[serde(default)]
    pub students: Vec<StudentConfig>,

    #[serde(default)]
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudentConfig {
    pub name: String,
    /// JSON file with the student's answered questions
    pub attempts: PathBuf,
}

/// Default export targets, used when `export` is run without flags.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub json: Option<PathBuf>,
}

impl Config {
    /// Config written by `init`: the two-student, two-subject layout.
    pub fn starter() -> Self {
        Self {
            score_table: Some(PathBuf::from("scoring_DSAT_v2.json")),
            threshold: Some(DEFAULT_THRESHOLD),
            fix_counts: Some(DEFAULT_FIX_COUNTS.to_vec()),
            subjects: Some(DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect()),
            students: vec![
                StudentConfig {
                    name: "Student 1".to_string(),
                    attempts: PathBuf::from("user_attempt_v2.json"),
                },
                StudentConfig {
                    name: "Student 2".to_string(),
                    attempts: PathBuf::from("user_attempt_v3.json"),
                },
            ],
            export: Some(ExportConfig {
                csv: Some(PathBuf::from("dsat_summary.csv")),
                json: None,
            }),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn fix_counts(&self) -> Vec<i64> {
        self.fix_counts
            .clone()
            .unwrap_or_else(|| DEFAULT_FIX_COUNTS.to_vec())
    }

    pub fn subjects(&self) -> Vec<String> {
        self.subjects
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect())
    }

    /// Rewrite relative paths so they point next to the config file.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(p) = self.score_table.as_mut() {
            resolve(p);
        }
        for student in &mut self.students {
            resolve(&mut student.attempts);
        }
        if let Some(export) = self.export.as_mut() {
            if let Some(p) = export.csv.as_mut() {
                resolve(p);
            }
            if let Some(p) = export.json.as_mut() {
                resolve(p);
            }
        }
    }
}
