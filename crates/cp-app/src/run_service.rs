//! Run orchestration: scenario → parameters → dispatched model.

use cp_params::SimulationParameters;
use cp_sim::{ModelKind, Sample, SimRecord, run_model};
use serde::{Deserialize, Serialize};

use crate::config::ScenarioFile;
use crate::error::AppResult;

/// Command-line overrides applied on top of a scenario's run section.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunOverrides {
    pub dt_s: Option<f64>,
    pub horizon_s: Option<f64>,
    pub extended: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub model: ModelKind,
    pub params: SimulationParameters,
    pub record: SimRecord,
}

impl RunResponse {
    pub fn is_complete(&self) -> bool {
        self.record.is_complete()
    }

    /// The full series, or an error when the run was cut short.
    pub fn into_samples(self) -> AppResult<Vec<Sample>> {
        Ok(self.record.into_complete()?)
    }
}

/// Map the scenario, apply overrides and run the selected model.
///
/// A diverged run is not an error: the response carries the truncated
/// series and the diagnostic.
pub fn run_scenario(scenario: &ScenarioFile, overrides: RunOverrides) -> RunResponse {
    let mut run = scenario.run;
    if let Some(dt) = overrides.dt_s {
        run.dt_s = dt;
    }
    if let Some(h) = overrides.horizon_s {
        run.horizon_s = h;
    }
    if let Some(e) = overrides.extended {
        run.extended = e;
    }

    let params = ScenarioFile {
        inputs: scenario.inputs.clone(),
        run,
    }
    .parameters();
    let model = ModelKind::from_flag(params.use_extended_model);
    let record = run_model(&params);

    match &record.divergence {
        Some(d) => tracing::warn!(%model, samples = record.samples.len(), "run aborted: {d}"),
        None => tracing::debug!(%model, samples = record.samples.len(), "run finished"),
    }

    RunResponse {
        model,
        params,
        record,
    }
}
