use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use license_satisfies::{Family, RangeTable, RankEntry, DEFAULT_MAX_CLAUSES};

/// Root configuration structure, deserialized from `.license-satisfies/config.toml`.
///
/// ```toml
/// max_clauses = 1024
/// ranges = [
///     ["Foo-1.0", "Foo-2.0"],
///     ["Bar-1.0", ["Bar-2.0", "Bar-2.0-alt"]],
/// ]
/// ```
#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Upper bound on DNF clauses per expression; larger expansions are reported unsatisfied.
    #[serde(default = "default_max_clauses")]
    pub max_clauses: usize,
    /// Extra versioned license families, appended to the built-in table.
    /// Each family lists versions oldest first; a nested array marks same-rank variants.
    #[serde(default)]
    pub ranges: Vec<Vec<RankEntry>>,
}

fn default_max_clauses() -> usize {
    DEFAULT_MAX_CLAUSES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_clauses: DEFAULT_MAX_CLAUSES,
            ranges: Vec::new(),
        }
    }
}

impl Config {
    /// The built-in range table extended with the configured families.
    pub fn range_table(&self) -> RangeTable {
        RangeTable::default().with_families(self.ranges.iter().cloned().map(Family::from))
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-satisfies/config.toml`
/// 3. `~/.config/license-satisfies/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-satisfies").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-satisfies")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        max_clauses = config.max_clauses,
        extra_ranges = config.ranges.len(),
        "loaded config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use license_satisfies::LicenseOrdering;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_ranges_with_shared_rank() {
        let config: Config = toml::from_str(
            r#"
max_clauses = 16
ranges = [
    ["Foo-1.0", "Foo-2.0"],
    ["Bar-1.0", ["Bar-2.0", "Bar-2.0-alt"]],
]
"#,
        )
        .unwrap();
        assert_eq!(config.max_clauses, 16);
        assert_eq!(config.ranges.len(), 2);

        let table = config.range_table();
        assert!(table.greater_than("Foo-2.0", "Foo-1.0"));
        assert!(table.equal("Bar-2.0", "Bar-2.0-alt"));
        assert!(table.greater_than("GPL-3.0", "GPL-2.0"));
    }

    #[test]
    fn test_load_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_clauses = 8").unwrap();
        let config = load_config(Path::new("/nonexistent"), Some(file.path())).unwrap();
        assert_eq!(config.max_clauses, 8);
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".license-satisfies");
        std::fs::create_dir(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "ranges = [[\"Baz-1\", \"Baz-2\"]]\n").unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.ranges.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_clauses = \"many\"").unwrap();
        assert!(load_config(Path::new("."), Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_override_is_an_error() {
        assert!(load_config(Path::new("."), Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
