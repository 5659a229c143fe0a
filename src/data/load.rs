use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::types::QuestionRecord;
use crate::scoring::SubjectTable;

/// Load every subject's score table from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not an array of
/// `{ "key": ..., "map": [...] }` objects.
pub fn load_score_tables(path: &Path) -> Result<Vec<SubjectTable>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open score table at {}", path.display()))?;

    let tables: Vec<SubjectTable> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse score table in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        subjects = tables.len(),
        "loaded score tables"
    );
    Ok(tables)
}

/// Load one student's attempt records from a JSON file.
pub fn load_attempts(path: &Path) -> Result<Vec<QuestionRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open attempt file at {}", path.display()))?;

    let records: Vec<QuestionRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse attempt records in {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = records.len(), "loaded attempts");
    Ok(records)
}

/// Expand a glob pattern into attempt files, sorted by path.
///
/// Each match becomes one student named after the file stem.
pub fn discover_attempt_files(pattern: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid attempts pattern '{}'", pattern))?
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Failed to read paths matching '{}'", pattern))?;
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No attempt files match '{}'", pattern);
    }

    Ok(paths
        .into_iter()
        .map(|p| {
            let name = p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string());
            (name, p)
        })
        .collect())
}
