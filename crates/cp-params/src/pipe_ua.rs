//! Environment coupling of exposed, insulated piping.

use cp_core::units::{Area, Conductance, Conductivity, HeatTransferCoeff, Length, w_per_k};
use std::f64::consts::PI;

/// Exposed pipe run between the buffer water and the ambient.
///
/// Geometry takes precedence; the exposed area is only used when length or
/// outer diameter is missing.
#[derive(Debug, Clone)]
pub struct PipeExposure {
    /// Exposed length
    pub length: Length,
    /// Pipe outer diameter (bare pipe)
    pub outer_diameter: Length,
    /// Insulation layer thickness
    pub insulation_thickness: Length,
    /// Insulation conductivity
    pub insulation_k: Conductivity,
    /// External convection coefficient
    pub h_external: HeatTransferCoeff,
    /// Environment correction factor (dimensionless)
    pub env_factor: f64,
    /// Exposed area fallback
    pub area: Area,
}

impl PipeExposure {
    /// Effective pipe-to-environment UA.
    ///
    /// Series resistance of insulation conduction and external convection on
    /// a cylinder:
    ///
    /// ```text
    ///   r1 = D/2, r2 = r1 + t_ins
    ///   R_cond = ln(r2/r1) / (2π k L)
    ///   R_conv = 1 / (h 2π r2 L)
    ///   UA = f_env / (R_cond + R_conv)
    /// ```
    ///
    /// Without geometry, `UA = h A f_env`; without either, zero.
    pub fn ua(&self) -> Conductance {
        let l = self.length.value;
        let d = self.outer_diameter.value;
        let h = self.h_external.value;

        if l > 0.0 && d > 0.0 {
            let r1 = d / 2.0;
            let r2 = r1 + self.insulation_thickness.value;
            let r_cond = (r2 / r1).ln() / (2.0 * PI * self.insulation_k.value * l);
            let r_conv = 1.0 / (h * 2.0 * PI * r2 * l);
            return w_per_k(self.env_factor / (r_cond + r_conv));
        }

        let a = self.area.value;
        if a > 0.0 {
            return w_per_k(h * a * self.env_factor);
        }

        w_per_k(0.0)
    }
}
