//! Configuration for the triad CLI.
//!
//! Layered with the `config` crate: built-in defaults, then an optional file
//! (format picked from the extension), then `TRIAD_`-prefixed environment
//! variables such as `TRIAD_LOGGING_LEVEL=debug`.

use serde::{Deserialize, Serialize};
use triad_core::EngineConfig;

use crate::error::CliResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriadConfig {
    /// Scoring, encoding and projection constants
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl TriadConfig {
    /// Load configuration, layering file and environment over the defaults.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&TriadConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TRIAD")
                .separator("_")
                .try_parsing(true),
        );

        let config: TriadConfig = builder.build()?.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::CliError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TriadConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert_eq!(config.engine.history.capacity, 50);
    }

    #[test]
    fn test_load_without_file() {
        let config = TriadConfig::load(None).unwrap();
        assert_eq!(config.engine.questionnaire.expected_answers, 30);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = TriadConfig::load(Some("/nonexistent/triad-config")).unwrap();
        assert_eq!(config.engine.transition.neighbor_radius, 2);
    }

    #[test]
    fn test_load_toml_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[logging]\njson = true\n\n[engine.history]\ncapacity = 7\n\n[engine.transition]\nneighbor_radius = 4"
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = TriadConfig::load(Some(&path)).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.engine.history.capacity, 7);
        assert_eq!(config.engine.transition.neighbor_radius, 4);
        // untouched sections keep their defaults
        assert_eq!(config.engine.questionnaire.expected_answers, 30);
    }

    #[test]
    fn test_invalid_engine_config_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine.history]\ncapacity = 0").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let err = TriadConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Persona(_)));
    }

    #[test]
    fn test_renders_toml() {
        let rendered = TriadConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[logging]"));
        assert!(rendered.contains("capacity = 50"));
    }
}
