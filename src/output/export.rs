use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::report::Report;

/// JSON export envelope.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub reports: &'a [Report],
}

/// Header row for the CSV summary.
///
/// Scalar columns first, then four columns per fix count found in any
/// report (ascending).
pub fn csv_header(reports: &[Report]) -> Vec<String> {
    let mut header: Vec<String> = [
        "name",
        "subject",
        "total",
        "correct",
        "incorrect",
        "module",
        "scaled_score",
        "topics",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for n in fix_counts(reports) {
        header.push(format!("fix_{}_correct", n));
        header.push(format!("fix_{}_module", n));
        header.push(format!("fix_{}_score", n));
        header.push(format!("fix_{}_gain", n));
    }
    header
}

fn fix_counts(reports: &[Report]) -> BTreeSet<i64> {
    reports
        .iter()
        .flat_map(|r| r.simulations.keys().copied())
        .collect()
}

// "Algebra 2/6; Geometry 0/4" (incorrect/total per topic)
fn format_topics(report: &Report) -> String {
    report
        .topic_breakdown
        .iter()
        .map(|(topic, total)| format!("{} {}/{}", topic, report.topic_error_count(topic), total))
        .collect::<Vec<_>>()
        .join("; ")
}

fn csv_row(report: &Report, fix_counts: &BTreeSet<i64>) -> Vec<String> {
    let mut row = vec![
        report.student.clone(),
        report.subject.clone(),
        report.total.to_string(),
        report.correct.to_string(),
        report.incorrect.to_string(),
        report.module.to_string(),
        report.scaled_score.to_string(),
        format_topics(report),
    ];

    for n in fix_counts {
        match report.simulations.get(n) {
            Some(sim) => {
                row.push(sim.fixed_correct.to_string());
                row.push(sim.new_module.to_string());
                row.push(sim.new_scaled_score.to_string());
                row.push(sim.score_gain.to_string());
            }
            None => row.extend(std::iter::repeat(String::new()).take(4)),
        }
    }
    row
}

/// Write the CSV summary (one row per report) to `writer`
pub fn write_csv<W: Write>(reports: &[Report], writer: W) -> Result<()> {
    let fix_counts = fix_counts(reports);
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(csv_header(reports))
        .context("Failed to write CSV header")?;
    for report in reports {
        csv_writer
            .write_record(csv_row(report, &fix_counts))
            .with_context(|| {
                format!(
                    "Failed to write CSV row for {} / {}",
                    report.student, report.subject
                )
            })?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write the pretty-printed JSON export to `writer`
pub fn write_json<W: Write>(reports: &[Report], threshold: f64, writer: W) -> Result<()> {
    let document = ExportDocument {
        generated_at: Utc::now(),
        threshold,
        reports,
    };
    serde_json::to_writer_pretty(writer, &document).context("Failed to serialize reports")?;
    Ok(())
}

/// Save the CSV summary to `path` atomically
///
/// Uses atomic-write-file so a failed export never leaves a partial file.
pub fn export_csv(path: &Path, reports: &[Report]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    write_csv(reports, &mut file)?;

    file.commit()
        .with_context(|| format!("Failed to save CSV export to {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = reports.len(), "exported CSV");
    Ok(())
}

/// Save the JSON export to `path` atomically
pub fn export_json(path: &Path, reports: &[Report], threshold: f64) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    write_json(reports, threshold, &mut file)?;

    file.commit()
        .with_context(|| format!("Failed to save JSON export to {}", path.display()))?;

    tracing::info!(path = %path.display(), reports = reports.len(), "exported JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScaledScore, ScoreGain, SimulationResult, Tier};
    use std::collections::BTreeMap;
    use std::env;
    use std::fs;

    fn sample_report(student: &str, fixes: &[u32]) -> Report {
        let simulations = fixes
            .iter()
            .map(|&n| {
                (
                    i64::from(n),
                    SimulationResult {
                        fix_count: i64::from(n),
                        fixed_correct: 8 + n,
                        new_module: Tier::Hard,
                        new_scaled_score: if n == 1 {
                            ScaledScore::NotFound
                        } else {
                            ScaledScore::Found(700 + n * 10)
                        },
                        score_gain: if n == 1 {
                            ScoreGain::Undefined
                        } else {
                            ScoreGain::Gain(i64::from(n) * 10)
                        },
                    },
                )
            })
            .collect();

        Report {
            student: student.to_string(),
            subject: "Reading and Writing".to_string(),
            total: 12,
            correct: 8,
            incorrect: 4,
            incorrect_question_ids: vec![],
            module: Tier::Hard,
            scaled_score: ScaledScore::Found(700),
            topic_breakdown: BTreeMap::from([("Grammar".to_string(), 12)]),
            topic_errors: BTreeMap::from([("Grammar".to_string(), 4)]),
            simulations,
        }
    }

    #[test]
    fn test_csv_header_includes_fix_columns() {
        let header = csv_header(&[sample_report("A", &[1, 2])]);
        assert_eq!(header.len(), 8 + 8);
        assert_eq!(header[8], "fix_1_correct");
        assert_eq!(header[15], "fix_2_gain");
    }

    #[test]
    fn test_write_csv_rows() {
        let mut buf = Vec::new();
        write_csv(&[sample_report("Student 1", &[1, 2])], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name,subject,total,correct,incorrect,module,scaled_score,topics"));
        assert_eq!(
            lines[1],
            "Student 1,Reading and Writing,12,8,4,hard,700,Grammar 4/12,9,hard,N/A,N/A,10,hard,720,+20"
        );
    }

    #[test]
    fn test_write_csv_pads_missing_fix_counts() {
        let mut buf = Vec::new();
        let reports = vec![sample_report("A", &[2]), sample_report("B", &[1, 2])];
        write_csv(&reports, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row_a = text.lines().nth(1).unwrap();
        // fix_1 columns are empty for A
        assert!(row_a.contains("Grammar 4/12,,,,,10,hard,720,+20"));
    }

    #[test]
    fn test_write_json_shape() {
        let mut buf = Vec::new();
        write_json(&[sample_report("Student 1", &[1])], 0.5, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["threshold"], 0.5);
        assert!(value["generated_at"].is_string());
        let report = &value["reports"][0];
        assert_eq!(report["scaled_score"], 700);
        assert!(report["simulations"]["1"]["new_scaled_score"].is_null());
        assert!(report["simulations"]["1"]["score_gain"].is_null());
    }

    #[test]
    fn test_export_csv_writes_file() {
        let path = env::temp_dir().join("score_whatif_test_export.csv");
        let _ = fs::remove_file(&path);

        export_csv(&path, &[sample_report("Student 1", &[1])]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Student 1"));

        let _ = fs::remove_file(&path);
    }
}
