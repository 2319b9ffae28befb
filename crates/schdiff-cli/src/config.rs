//! Configuration file handling
//!
//! Values are layered: built-in defaults, then `schdiff.toml`, then
//! environment variables and command-line flags (applied by the commands).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schdiff_compare::{CompareConfig, DEFAULT_REPORT_PATH, DiffField};
use schdiff_core::ParseMode;
use schdiff_storage::DEFAULT_STORE_PATH;
use serde::Deserialize;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "schdiff.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreSection,
    pub parse: ParseSection,
    pub compare: CompareSection,
    pub search: SearchSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseSection {
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareSection {
    /// Report written when `--json` is not given
    pub json: Option<PathBuf>,
    pub case_insensitive: bool,
    pub ignore: Vec<DiffField>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub input: PathBuf,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config file found.
    ///
    /// A missing explicit file is an error; no file at all gives defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::discover() {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Candidate locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("schdiff").join("config.toml"));
        }
        paths
    }

    fn discover() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Store path from the flag (or `SCHDIFF_DB`), else the config value
    pub fn store_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .unwrap_or_else(|| self.store.path.clone())
    }

    pub fn parse_mode(&self, strict_flag: bool) -> ParseMode {
        if strict_flag || self.parse.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Comparison settings with flag values merged over the config file
    pub fn compare_config(&self, case_insensitive: bool, ignore: &[DiffField]) -> CompareConfig {
        let mut config = CompareConfig::new();
        if case_insensitive || self.compare.case_insensitive {
            config = config.case_insensitive();
        }
        for field in self.compare.ignore.iter().chain(ignore) {
            config = config.ignore_field(*field);
        }
        config
    }

    pub fn report_output(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.compare.json.clone())
    }

    pub fn report_input(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .unwrap_or_else(|| self.search.input.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("schema.db"));
        assert_eq!(config.search.input, PathBuf::from("schema_differences.json"));
        assert!(!config.parse.strict);
        assert!(config.compare.json.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str("[store]\npath = \"other.db\"\n").unwrap();
        assert_eq!(config.store.path, PathBuf::from("other.db"));
        assert_eq!(config.search, SearchSection::default());
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml_str(
            r#"
            [store]
            path = "db/schema.db"

            [parse]
            strict = true

            [compare]
            json = "out.json"
            case_insensitive = true
            ignore = ["position"]

            [search]
            input = "out.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.parse_mode(false), ParseMode::Strict);
        assert_eq!(config.compare.ignore, vec![DiffField::Position]);
        assert_eq!(config.report_output(None), Some(PathBuf::from("out.json")));
        assert_eq!(config.report_input(None), PathBuf::from("out.json"));
    }

    #[test]
    fn test_demo_config_matches_defaults() {
        let config = Config::from_toml_str(include_str!("../../../demos/schdiff.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("[store]\nfile = \"x.db\"\n").is_err());
        assert!(Config::from_toml_str("[logging]\nlevel = \"debug\"\n").is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let config = Config::from_toml_str("[store]\npath = \"file.db\"\n").unwrap();
        assert_eq!(
            config.store_path(Some(Path::new("flag.db"))),
            PathBuf::from("flag.db")
        );
        assert_eq!(config.store_path(None), PathBuf::from("file.db"));
        assert_eq!(
            config.report_output(Some(Path::new("flag.json"))),
            Some(PathBuf::from("flag.json"))
        );
    }

    #[test]
    fn test_compare_config_merges_ignore_lists() {
        let config = Config::from_toml_str("[compare]\nignore = [\"type\"]\n").unwrap();
        let compare = config.compare_config(true, &[DiffField::Size]);
        assert!(!compare.case_sensitive);
        assert_eq!(
            compare.compared_fields().collect::<Vec<_>>(),
            vec![DiffField::Position]
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[parse]\nstrict = true\n").unwrap();
        let config = Config::load(Some(path.as_path())).unwrap();
        assert!(config.parse.strict);
    }
}
