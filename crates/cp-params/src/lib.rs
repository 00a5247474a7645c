//! cp-params: raw engineering inputs and their mapping to simulation parameters.
//!
//! Provides:
//! - `RawInputs`: optional, leniently typed form fields
//! - `map_inputs`: unit aggregation, heat-capacity derivation, flow conversion
//! - `PipeExposure`: pipe-to-environment UA from geometry or area
//! - `SimulationParameters`: the bundle consumed by the integrators

pub mod mapper;
pub mod params;
pub mod pipe_ua;
pub mod raw;

pub use mapper::{Assembly, map_inputs};
pub use params::*;
pub use pipe_ua::PipeExposure;
pub use raw::{RawInputs, RawValue};
