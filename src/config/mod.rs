mod init;
mod schema;

pub use init::write_starter_config;
pub use schema::{Config, ExportConfig, StudentConfig, DEFAULT_FIX_COUNTS, DEFAULT_SUBJECTS};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/score-whatif/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("score-whatif"))
}

/// Get the default config file path (~/.config/score-whatif/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/score-whatif/config.yaml)
///
/// Relative paths inside the file are resolved against its directory.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `score-whatif init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);

    Ok(config)
}

/// Validate the effective configuration before any data is loaded.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.score_table.is_none() {
        errors.push("score_table: required (set it in the config or pass --table)".to_string());
    }

    if let Some(threshold) = config.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(format!(
                "threshold: must be between 0 and 1, got {}",
                threshold
            ));
        }
    }

    if let Some(ref fix_counts) = config.fix_counts {
        if fix_counts.is_empty() {
            errors.push("fix_counts: must list at least one fix count".to_string());
        }
        for (i, n) in fix_counts.iter().enumerate() {
            if *n < 0 {
                errors.push(format!("fix_counts[{}]: must be non-negative, got {}", i, n));
            }
        }
    }

    if let Some(ref subjects) = config.subjects {
        if subjects.is_empty() {
            errors.push("subjects: must list at least one subject".to_string());
        }
        let mut seen = HashSet::new();
        for (i, subject) in subjects.iter().enumerate() {
            if subject.trim().is_empty() {
                errors.push(format!("subjects[{}]: must not be empty", i));
            } else if !seen.insert(subject.as_str()) {
                errors.push(format!("subjects[{}]: duplicate subject '{}'", i, subject));
            }
        }
    }

    if config.students.is_empty() {
        errors.push("students: at least one student is required (or pass --attempts)".to_string());
    }
    let mut names = HashSet::new();
    for (i, student) in config.students.iter().enumerate() {
        if !names.insert(student.name.as_str()) {
            errors.push(format!(
                "students[{}].name: duplicate student '{}'",
                i, student.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
