use anyhow::Result;
use rayon::prelude::*;

use crate::config::{Config, StudentConfig};
use crate::data::{load_attempts, QuestionRecord};
use crate::report::{aggregate, Report};
use crate::scoring::{classify, score, simulate_many, ScoreTable, ScoringError, SubjectTable};

/// Scoring parameters shared by every (student, subject) pair in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub threshold: f64,
    pub fix_counts: Vec<i64>,
    pub subjects: Vec<String>,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.threshold(),
            fix_counts: config.fix_counts(),
            subjects: config.subjects(),
        }
    }
}

/// A student's name and answered questions.
#[derive(Debug, Clone)]
pub struct Student {
    pub name: String,
    pub records: Vec<QuestionRecord>,
}

/// A subject that could not be scored for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFailure {
    pub student: String,
    pub subject: String,
    pub error: ScoringError,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Reports in student order, then subject order
    pub reports: Vec<Report>,
    pub failures: Vec<SubjectFailure>,
}

/// A student whose attempt file could not be read or parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentLoadFailure {
    pub student: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadedStudents {
    pub students: Vec<Student>,
    pub failures: Vec<StudentLoadFailure>,
}

/// Load every configured student's attempt file.
///
/// A bad file only drops that student. Fails if no student could be loaded.
pub fn load_students(students: &[StudentConfig]) -> Result<LoadedStudents> {
    let mut loaded = LoadedStudents::default();

    for s in students {
        match load_attempts(&s.attempts) {
            Ok(records) => loaded.students.push(Student {
                name: s.name.clone(),
                records,
            }),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(student = %s.name, %error, "attempts not loaded");
                loaded.failures.push(StudentLoadFailure {
                    student: s.name.clone(),
                    error,
                });
            }
        }
    }

    if loaded.students.is_empty() && !students.is_empty() {
        anyhow::bail!(
            "No attempt file could be loaded ({} failed)",
            loaded.failures.len()
        );
    }
    Ok(loaded)
}

/// Score one subject for one student, including what-if simulations.
pub fn analyze_subject(
    student: &Student,
    subject: &str,
    tables: &[SubjectTable],
    settings: &RunSettings,
) -> Result<Report, ScoringError> {
    let table = ScoreTable::from_source(tables, subject)?;
    let classification = classify(&student.records, subject);
    let scored = score(&classification, &table, settings.threshold);
    let simulations = simulate_many(&scored, &table, &settings.fix_counts, settings.threshold)?;
    Ok(aggregate(&student.name, subject, &scored, simulations))
}

/// Score every student across every configured subject.
///
/// Students are scored in parallel. A subject that fails for one student
/// is recorded in `failures` and does not affect any other result.
pub fn analyze(students: &[Student], tables: &[SubjectTable], settings: &RunSettings) -> Analysis {
    let outcomes: Vec<Vec<(String, String, Result<Report, ScoringError>)>> = students
        .par_iter()
        .map(|student| {
            settings
                .subjects
                .iter()
                .map(|subject| {
                    let outcome = analyze_subject(student, subject, tables, settings);
                    (student.name.clone(), subject.clone(), outcome)
                })
                .collect()
        })
        .collect();

    let mut analysis = Analysis::default();
    for (student, subject, outcome) in outcomes.into_iter().flatten() {
        match outcome {
            Ok(report) => {
                tracing::debug!(
                    student = %student,
                    subject = %subject,
                    correct = report.correct,
                    total = report.total,
                    module = %report.module,
                    "scored subject"
                );
                analysis.reports.push(report);
            }
            Err(error) => {
                tracing::warn!(student = %student, subject = %subject, %error, "subject not scored");
                analysis.failures.push(SubjectFailure {
                    student,
                    subject,
                    error,
                });
            }
        }
    }
    analysis
}
