use anyhow::{Context, Result};
use std::path::Path;

use super::Config;

/// Write the starter config to `path`.
///
/// Refuses to replace an existing file unless `force` is set. Parent
/// directories are created as needed.
pub fn write_starter_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(&Config::starter())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote starter config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_write_starter_config_then_refuse_overwrite() {
        let dir = env::temp_dir().join("score_whatif_init_test");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.yaml");

        write_starter_config(&path, false).unwrap();
        let written: Config = serde_saphyr::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, Config::starter());

        let err = write_starter_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(write_starter_config(&path, true).is_ok());

        let _ = fs::remove_dir_all(&dir);
    }
}
