use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::pipeline::SubjectFailure;
use crate::report::Report;
use crate::scoring::{ScaledScore, ScoreGain, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a scaled score, "N/A" when the table has no value
pub fn format_score(score: ScaledScore) -> String {
    score.to_string()
}

/// Format a what-if gain with an explicit sign, "N/A" when undefined
pub fn format_gain(gain: ScoreGain) -> String {
    gain.to_string()
}

fn format_module(module: Tier, use_colors: bool) -> String {
    let label = module.as_str().to_uppercase();
    if !use_colors {
        return label;
    }
    match module {
        Tier::Hard => label.green().to_string(),
        Tier::Easy => label.yellow().to_string(),
    }
}

fn paint_score(score: ScaledScore, use_colors: bool) -> String {
    let text = format_score(score);
    match (use_colors, score) {
        (false, _) => text,
        (true, ScaledScore::Found(_)) => text.bold().to_string(),
        (true, ScaledScore::NotFound) => text.dimmed().to_string(),
    }
}

fn paint_gain(gain: ScoreGain, use_colors: bool) -> String {
    let text = format_gain(gain);
    match (use_colors, gain) {
        (false, _) => text,
        (true, ScoreGain::Gain(n)) if n > 0 => text.green().to_string(),
        (true, ScoreGain::Gain(n)) if n < 0 => text.red().to_string(),
        (true, ScoreGain::Gain(_)) => text,
        (true, ScoreGain::Undefined) => text.dimmed().to_string(),
    }
}

/// Format one report as a multi-line block
///
/// ```text
/// === Student 1 ===
///   Subject: Math
///   Correct: 8 / 10
///   Module 2: HARD
///   Scaled Score: 700
///   Topic Breakdown:
///     - Algebra: 6 total, 1 incorrect
///   What-If Scenarios:
///     Fixing 1 wrong -> 9 correct, HARD, score N/A (N/A)
/// ```
pub fn format_report(report: &Report, use_colors: bool) -> String {
    let header = format!("=== {} ===", report.student);
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    let subject = if use_colors {
        report.subject.cyan().to_string()
    } else {
        report.subject.clone()
    };
    lines.push(format!("  Subject: {}", subject));
    lines.push(format!("  Correct: {} / {}", report.correct, report.total));
    lines.push(format!(
        "  Module 2: {}",
        format_module(report.module, use_colors)
    ));
    lines.push(format!(
        "  Scaled Score: {}",
        paint_score(report.scaled_score, use_colors)
    ));
    lines.push(format!(
        "  Incorrect Questions: {}",
        report.incorrect_question_ids.len()
    ));

    if !report.topic_breakdown.is_empty() {
        lines.push("  Topic Breakdown:".to_string());
        for (topic, total) in &report.topic_breakdown {
            lines.push(format!(
                "    - {}: {} total, {} incorrect",
                topic,
                total,
                report.topic_error_count(topic)
            ));
        }
    }

    if !report.simulations.is_empty() {
        lines.push("  What-If Scenarios:".to_string());
        for (fix_count, sim) in &report.simulations {
            lines.push(format!(
                "    Fixing {} wrong -> {} correct, {}, score {} ({})",
                fix_count,
                sim.fixed_correct,
                format_module(sim.new_module, use_colors),
                paint_score(sim.new_scaled_score, use_colors),
                paint_gain(sim.score_gain, use_colors)
            ));
        }
    }

    lines.join("\n")
}

/// Format all reports separated by blank lines
pub fn format_reports(reports: &[Report], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No results.".to_string();
    }

    reports
        .iter()
        .map(|r| format_report(r, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format subjects that could not be scored, one per line
pub fn format_failures(failures: &[SubjectFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} / {}: {}", f.student, f.subject, f.error))
        .collect::<Vec<_>>()
        .join("\n")
}
