//! Command implementations.
//!
//! Each command returns a serialisable value; `main` prints it. File access
//! lives here so the commands can be tested against temporary files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use triad_core::{
    Analysis, ContextFactors, HexagramId, HexagramState, MappingHistory, PersonaEngine, RawAnswer,
    TransitionProjection,
};

use crate::error::{CliError, CliResult};

/// Output of `triad analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeReport {
    pub analysis: Analysis,
    pub projection: TransitionProjection,
}

/// Inputs of `triad analyze`.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest<'a> {
    pub answers: &'a Path,
    pub history: Option<&'a Path>,
    pub context: ContextFactors,
}

pub fn analyze(engine: &PersonaEngine, request: &AnalyzeRequest<'_>) -> CliResult<AnalyzeReport> {
    let answers = read_answers(request.answers)?;
    let analysis = engine.analyze_raw(&answers, &request.context)?;
    let current = analysis.current_state();

    let projection = match request.history {
        Some(path) => {
            let mut history = load_history(path, engine)?;
            let projection = engine.project_transition(&current, &mut history);
            save_history(path, &history)?;
            info!(path = %path.display(), entries = history.len(), "History updated");
            projection
        }
        None => {
            let mut history = engine.new_history();
            engine.project_transition(&current, &mut history)
        }
    };

    Ok(AnalyzeReport {
        analysis,
        projection,
    })
}

pub fn hexagram(engine: &PersonaEngine, id: u8) -> CliResult<HexagramState> {
    let id = HexagramId::new(id).ok_or(CliError::UnknownHexagram(id))?;
    Ok(engine.resolver().state(id))
}

fn read_answers(path: &Path) -> CliResult<Vec<RawAnswer>> {
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let answers: Vec<RawAnswer> =
        serde_json::from_str(&raw).map_err(|e| CliError::json(path, e))?;
    debug!(path = %path.display(), count = answers.len(), "Loaded answers");
    Ok(answers)
}

/// Load a history file; a missing file yields an empty history.
pub fn load_history(path: &Path, engine: &PersonaEngine) -> CliResult<MappingHistory> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).map_err(|e| CliError::json(path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No history file, starting empty");
            Ok(engine.new_history())
        }
        Err(e) => Err(CliError::io(path, e)),
    }
}

pub fn save_history(path: &Path, history: &MappingHistory) -> CliResult<()> {
    let rendered =
        serde_json::to_string_pretty(history).map_err(|e| CliError::Render(e.to_string()))?;
    std::fs::write(path, rendered).map_err(|e| CliError::io(path, e))
}
