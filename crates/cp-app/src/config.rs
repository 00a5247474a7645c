//! Scenario files: raw plant inputs plus run control.

use std::path::Path;

use cp_params::{RawInputs, SimulationParameters, map_inputs};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Run timing and model selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunControl {
    pub dt_s: f64,
    pub horizon_s: f64,
    /// Extended flow-coupled model when true, 3-node baseline otherwise
    pub extended: bool,
}

impl Default for RunControl {
    fn default() -> Self {
        Self {
            dt_s: 1.0,
            horizon_s: 300.0,
            extended: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub inputs: RawInputs,
    pub run: RunControl,
}

impl ScenarioFile {
    /// Mapped parameters with this scenario's timing and model flag attached.
    pub fn parameters(&self) -> SimulationParameters {
        map_inputs(&self.inputs)
            .with_timing(self.run.dt_s, self.run.horizon_s)
            .with_extended_model(self.run.extended)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| AppError::ScenarioRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::ScenarioParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

pub fn load_yaml(path: &Path) -> AppResult<ScenarioFile> {
    let content = read(path)?;
    ScenarioFile::from_yaml_str(&content).map_err(|e| parse_error(path, e))
}

pub fn load_json(path: &Path) -> AppResult<ScenarioFile> {
    let content = read(path)?;
    ScenarioFile::from_json_str(&content).map_err(|e| parse_error(path, e))
}

/// Load a scenario, choosing the format from the file extension.
pub fn load_scenario(path: &Path) -> AppResult<ScenarioFile> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let scenario = match ext.as_deref() {
        Some("yaml") | Some("yml") => load_yaml(path)?,
        Some("json") => load_json(path)?,
        other => {
            return Err(AppError::UnsupportedFormat(format!(
                "{} (extension {:?})",
                path.display(),
                other.unwrap_or("")
            )));
        }
    };
    tracing::debug!(path = %path.display(), run = ?scenario.run, "scenario loaded");
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_takes_defaults() {
        let s = ScenarioFile::from_yaml_str("{}").unwrap();
        assert_eq!(s.run, RunControl::default());
        assert_eq!(s.inputs, RawInputs::default());

        let p = s.parameters();
        assert!(p.use_extended_model);
        assert_eq!((p.dt_s, p.horizon_s), (1.0, 300.0));
    }

    #[test]
    fn partial_run_section() {
        let s = ScenarioFile::from_json_str(r#"{"run": {"extended": false}}"#).unwrap();
        assert!(!s.run.extended);
        assert_eq!(s.run.dt_s, 1.0);
    }

    #[test]
    fn bad_timing_is_coerced() {
        let yaml = "run:\n  dt_s: -2\n  horizon_s: -5\n";
        let p = ScenarioFile::from_yaml_str(yaml).unwrap().parameters();
        assert_eq!(p.dt_s, 1.0);
        assert_eq!(p.horizon_s, 180.0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_scenario(Path::new("plant.toml")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_scenario(Path::new("does/not/exist.yaml")).unwrap_err();
        match err {
            AppError::ScenarioRead { path, .. } => assert!(path.ends_with("exist.yaml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
