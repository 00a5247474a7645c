//! Float helpers shared by the mapper, the integrators and their tests.

use crate::CoreError;

pub type Real = f64;

/// Comparison bounds: values match when they are within `abs` of each other
/// or within `rel` of the larger magnitude.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let bound = tol.abs.max(tol.rel * a.abs().max(b.abs()));
    (a - b).abs() <= bound
}

/// Pass `v` through, or report it as a non-finite `what`.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Resolve an optional raw value: missing or non-finite falls back to `default`.
#[inline]
pub fn finite_or(v: Option<Real>, default: Real) -> Real {
    match v {
        Some(x) if x.is_finite() => x,
        _ => default,
    }
}

/// Like [`finite_or`], but negative magnitudes are clamped to zero.
#[inline]
pub fn magnitude_or(v: Option<Real>, default: Real) -> Real {
    finite_or(v, default).max(0.0)
}

/// Clamp into the closed unit interval.
#[inline]
pub fn clamp_unit(v: Real) -> Real {
    v.clamp(0.0, 1.0)
}
