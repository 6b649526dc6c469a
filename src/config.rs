//! Configuration management for the C-ADL language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - The optional TOML settings file
//!
//! Precedence is command line, then settings file, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::core::LanguageFilter;

/// Command-line arguments for the C-ADL language server
#[derive(Debug, Parser)]
#[command(name = "cadl-language-server")]
#[command(about = "Language server for C-ADL model files")]
#[command(version)]
pub struct Args {
    /// Language ids to validate, replacing the configured set
    #[arg(long = "language", help = "Language id to validate (repeatable, e.g. 'cadl')")]
    pub languages: Vec<String>,

    /// Settings file to load instead of the user-level one
    #[arg(long, help = "Path to a cadl-ls TOML settings file")]
    pub config: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Contents of a settings file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub languages: Option<Vec<String>>,
    pub log_level: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Language ids whose documents are validated
    pub languages: LanguageFilter,
    /// Settings file that was loaded, if any
    pub settings_path: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: LanguageFilter::default(),
            settings_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let (settings, settings_path) = match args.config {
            // An explicit file must exist
            Some(path) => (Settings::load(&path)?, Some(path)),
            None => match default_settings_path().filter(|p| p.is_file()) {
                Some(path) => (Settings::load(&path)?, Some(path)),
                None => (Settings::default(), None),
            },
        };

        Ok(Self::merge(args.languages, args.log_level, settings, settings_path))
    }

    fn merge(
        cli_languages: Vec<String>,
        cli_log_level: String,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let languages = if !cli_languages.is_empty() {
            LanguageFilter::new(cli_languages)
        } else if let Some(languages) = settings.languages {
            LanguageFilter::new(languages)
        } else {
            LanguageFilter::default()
        };

        // clap always fills the log level, so the file only wins over the default
        let log_level = match settings.log_level {
            Some(level) if cli_log_level == "info" => level,
            _ => cli_log_level,
        };

        Config {
            languages,
            settings_path,
            log_level,
        }
    }
}

/// `<user config dir>/cadl-ls/config.toml`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cadl-ls").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_settings() {
        let config = Config::merge(Vec::new(), "info".into(), Settings::default(), None);

        assert!(config.languages.matches("yaml"));
        assert!(config.languages.matches("cadl"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_cli_languages_win() {
        let settings = Settings {
            languages: Some(vec!["yaml".into()]),
            log_level: None,
        };
        let config = Config::merge(vec!["cadl".into()], "info".into(), settings, None);

        assert!(config.languages.matches("cadl"));
        assert!(!config.languages.matches("yaml"));
    }

    #[test]
    fn test_settings_fill_gaps() {
        let settings = Settings {
            languages: Some(vec!["cadl".into(), "toml".into()]),
            log_level: Some("debug".into()),
        };
        let config = Config::merge(Vec::new(), "info".into(), settings.clone(), None);
        assert!(config.languages.matches("toml"));
        assert_eq!(config.log_level, "debug");

        let config = Config::merge(Vec::new(), "warn".into(), settings, None);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "cadl-ls",
            "--language",
            "cadl",
            "--language",
            "yaml",
            "--log-level",
            "debug",
        ])
        .expect("valid arguments");

        assert_eq!(args.languages, vec!["cadl", "yaml"]);
        assert_eq!(args.log_level, "debug");
        assert!(args.config.is_none());
    }
}
