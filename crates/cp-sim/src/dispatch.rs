//! Model selection.

use crate::basic::BasicIntegrator;
use crate::extended::ExtendedIntegrator;
use crate::integrator::Integrator;
use crate::sim::{SimOptions, SimRecord};
use cp_params::SimulationParameters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model fidelity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// 3-node baseline without node coupling
    Basic,
    /// Flow-coupled nodes, optional room air, implicit buffer
    Extended,
}

impl ModelKind {
    pub fn from_flag(use_extended_model: bool) -> Self {
        if use_extended_model {
            ModelKind::Extended
        } else {
            ModelKind::Basic
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Basic => f.write_str("basic"),
            ModelKind::Extended => f.write_str("extended"),
        }
    }
}

/// Build the integrator selected by the parameter bundle's model flag.
pub fn integrator_for(params: &SimulationParameters) -> Box<dyn Integrator> {
    match ModelKind::from_flag(params.use_extended_model) {
        ModelKind::Basic => Box::new(BasicIntegrator::new(params)),
        ModelKind::Extended => Box::new(ExtendedIntegrator::new(params)),
    }
}

/// Run the selected model over the configured horizon.
pub fn run_model(params: &SimulationParameters) -> SimRecord {
    let kind = ModelKind::from_flag(params.use_extended_model);
    tracing::debug!(model = %kind, dt_s = params.dt_s, horizon_s = params.horizon_s, "dispatching run");
    integrator_for(params).run(&SimOptions::from_params(params))
}
