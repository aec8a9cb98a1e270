//! Error types for the triad CLI.

use std::path::PathBuf;

use thiserror::Error;
use triad_core::PersonaError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Persona(#[from] PersonaError),

    #[error("failed to render output: {0}")]
    Render(String),

    #[error("hexagram id {0} outside 1..=64")]
    UnknownHexagram(u8),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use triad_core::ValidationError;

    #[test]
    fn display_messages() {
        let err = CliError::UnknownHexagram(70);
        assert_eq!(err.to_string(), "hexagram id 70 outside 1..=64");

        let err = CliError::io(
            "answers.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "failed to access answers.json: missing");
    }

    #[test]
    fn persona_errors_are_transparent() {
        let err: CliError = PersonaError::from(ValidationError::WrongAnswerCount {
            expected: 30,
            actual: 2,
        })
        .into();
        assert_eq!(err.to_string(), "validation failed: expected 30 answers, got 2");
    }
}
