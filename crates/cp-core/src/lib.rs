//! cp-core: stable foundation for the cooling-plant simulator.
//!
//! Contains:
//! - units (uom SI types + engineering-unit constructors)
//! - numeric (tolerant comparison, finite and non-negative coercion)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
