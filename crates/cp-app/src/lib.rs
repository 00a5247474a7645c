//! Service layer shared by the command-line front end.
//!
//! Loads scenario files, runs the selected plant model, and derives the
//! post-processing reports (summary, heat flows, stored energy).

pub mod config;
pub mod error;
pub mod report;
pub mod run_service;

pub use config::{RunControl, ScenarioFile, load_scenario};
pub use error::{AppError, AppResult};
pub use report::{
    EnergySummary, HeatFlowSample, NodeEnergy, ParameterDigest, RunSummary, energy_summary,
    heat_flows, run_summary, sanitize,
};
pub use run_service::{RunOverrides, RunResponse, run_scenario};
