//! Configuration file loader with multi-source merging

use super::file_config::{ConfigError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "stats-council";
const PROJECT_FILE: &str = "council.toml";
const ENV_PREFIX: &str = "STATS_COUNCIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// The merged provider stack, lowest priority first
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path (`~/.config/stats-council/config.toml`)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_FILE);
        path.exists().then_some(path)
    }

    /// Describe the config file locations being used, one line each
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = Vec::new();

        if let Some(path) = config_path {
            lines.push(format!("  {} Explicit: {}", mark(path.exists()), path.display()));
        }
        lines.push(format!(
            "  {} Project: ./{}",
            mark(Self::project_config_path().is_some()),
            PROJECT_FILE
        ));
        if let Some(path) = Self::global_config_path() {
            lines.push(format!("  {} Global:  {}", mark(path.exists()), path.display()));
        }
        lines.push(format!("  [     ] Env:     {}*", ENV_PREFIX));
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("stats-council"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[models]
synthesis = "opus"

[sandbox]
python = "/opt/venv/bin/python"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();

        assert_eq!(config.models.synthesis.as_deref(), Some("opus"));
        assert_eq!(config.sandbox.python, "/opt/venv/bin/python");
        // Untouched sections keep their defaults
        assert_eq!(config.sandbox.timeout_seconds, 300);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[sandbox]\ntimeout_seconds = \"soon\"\n").unwrap();

        let err = ConfigLoader::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Figment(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = ConfigLoader::load(Some(Path::new("/nonexistent/council.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_describe_sources_lists_explicit_first() {
        let lines = ConfigLoader::describe_sources(Some(Path::new("/nope/council.toml")));
        assert!(lines[0].contains("[     ] Explicit: /nope/council.toml"));
        assert!(lines.last().unwrap().contains("Default"));
    }
}
