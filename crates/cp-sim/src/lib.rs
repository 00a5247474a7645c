//! Transient integration of the cooling-plant thermal nodes.
//!
//! Provides:
//! - Basic 3-node model (fixed-UA losses, explicit Euler)
//! - Extended flow-coupled model with optional room-air node and an
//!   implicit buffer update
//! - Shared fixed-step runner with a finite-value guard
//! - Model dispatch on the parameter bundle's model flag

pub mod basic;
pub mod dispatch;
pub mod error;
pub mod extended;
pub mod implicit;
pub mod integrator;
pub mod sim;
pub mod state;

// Re-exports for public API
pub use basic::BasicIntegrator;
pub use dispatch::{ModelKind, integrator_for, run_model};
pub use error::{Divergence, GuardPhase, SimError, SimResult};
pub use extended::ExtendedIntegrator;
pub use implicit::ImplicitSystem;
pub use integrator::Integrator;
pub use sim::{SimOptions, SimRecord, run_sim};
pub use state::{Sample, ThermalState};
