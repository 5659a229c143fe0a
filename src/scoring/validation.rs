use std::collections::HashSet;

use super::table::SubjectTable;

/// Check score tables for data-quality problems the lookup tolerates.
///
/// Lookups take the first entry for a raw value, so duplicates and
/// out-of-order rows silently shadow data. Returns all problems at once
/// (not just the first).
pub fn validate_tables(tables: &[SubjectTable], subjects: &[String]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for subject in subjects {
        if !tables.iter().any(|t| &t.key == subject) {
            errors.push(format!("score_table: no table for subject '{}'", subject));
        }
    }

    let mut seen_keys = HashSet::new();
    for table in tables {
        if !seen_keys.insert(table.key.as_str()) {
            errors.push(format!(
                "score_table['{}']: duplicate subject key, only the first is used",
                table.key
            ));
        }
        errors.extend(table_errors(table));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn table_errors(table: &SubjectTable) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen_raw = HashSet::new();
    let mut previous: Option<u32> = None;

    for (i, entry) in table.map.iter().enumerate() {
        if !seen_raw.insert(entry.raw) {
            errors.push(format!(
                "score_table['{}'].map[{}]: duplicate raw {} (first match wins)",
                table.key, i, entry.raw
            ));
        } else if let Some(prev) = previous {
            if entry.raw < prev {
                errors.push(format!(
                    "score_table['{}'].map[{}]: raw {} follows raw {} (entries must increase)",
                    table.key, i, entry.raw, prev
                ));
            }
        }
        if entry.easy.is_none() && entry.hard.is_none() {
            errors.push(format!(
                "score_table['{}'].map[{}]: raw {} has neither easy nor hard score",
                table.key, i, entry.raw
            ));
        }
        previous = Some(entry.raw);
    }

    errors
}
