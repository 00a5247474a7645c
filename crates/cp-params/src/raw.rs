//! Raw engineering inputs as collected by a front end.
//!
//! Every field is optional and kept exactly as received, so the mapped
//! parameter bundle can carry the record as submitted. Values are
//! only interpreted as numbers when the mapper reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw field value. Numbers and numeric text are usable; anything else
/// resolves to the field default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Flag(bool),
    List(Vec<Option<RawValue>>),
    Table(BTreeMap<String, Option<RawValue>>),
}

impl RawValue {
    /// Numeric reading of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Flag(_) | RawValue::List(_) | RawValue::Table(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Read an optional raw field as a number.
#[inline]
pub fn number(v: &Option<RawValue>) -> Option<f64> {
    v.as_ref().and_then(RawValue::as_number)
}

/// Flat record of raw inputs, keyed by the engineering names used on the
/// input form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    // General
    /// IT heat load (kW)
    #[serde(rename = "Q_total", skip_serializing_if = "Option::is_none")]
    pub q_total: Option<RawValue>,
    /// Supply / initial water temperature (°C)
    #[serde(rename = "T_sup", skip_serializing_if = "Option::is_none")]
    pub t_sup: Option<RawValue>,
    /// Ambient temperature (°C)
    #[serde(rename = "T_env", skip_serializing_if = "Option::is_none")]
    pub t_env: Option<RawValue>,
    /// Share of IT load on the liquid loop (%)
    #[serde(rename = "ratio_liquid", skip_serializing_if = "Option::is_none")]
    pub ratio_liquid: Option<RawValue>,

    // Unit counts
    #[serde(rename = "FWU_Units", skip_serializing_if = "Option::is_none")]
    pub fwu_units: Option<RawValue>,
    #[serde(rename = "CDU_Units", skip_serializing_if = "Option::is_none")]
    pub cdu_units: Option<RawValue>,

    // Loop flows (L/min)
    #[serde(rename = "flowA_LPM", skip_serializing_if = "Option::is_none")]
    pub flow_air_lpm: Option<RawValue>,
    #[serde(rename = "flowL_LPM", skip_serializing_if = "Option::is_none")]
    pub flow_liquid_lpm: Option<RawValue>,
    #[serde(rename = "flowA_ref_LPM", skip_serializing_if = "Option::is_none")]
    pub flow_air_ref_lpm: Option<RawValue>,
    /// Exponent of the air-side UA flow scaling
    #[serde(rename = "n_w_A", skip_serializing_if = "Option::is_none")]
    pub ua_air_flow_exponent: Option<RawValue>,

    // Legacy lumped masses (kg)
    #[serde(rename = "m_liquid", skip_serializing_if = "Option::is_none")]
    pub m_liquid: Option<RawValue>,
    #[serde(rename = "m_air", skip_serializing_if = "Option::is_none")]
    pub m_air: Option<RawValue>,
    #[serde(rename = "m_pipe", skip_serializing_if = "Option::is_none")]
    pub m_pipe: Option<RawValue>,

    // Per-unit UA (W/K)
    #[serde(rename = "UA_L_input", skip_serializing_if = "Option::is_none")]
    pub ua_liquid_per_unit: Option<RawValue>,
    #[serde(rename = "UA_A_ref", skip_serializing_if = "Option::is_none")]
    pub ua_air_per_unit: Option<RawValue>,
    // Legacy fan scaling inputs, carried for traceability only.
    #[serde(rename = "fan_flow", skip_serializing_if = "Option::is_none")]
    pub fan_flow: Option<RawValue>,
    #[serde(rename = "fan_flow_ref", skip_serializing_if = "Option::is_none")]
    pub fan_flow_ref: Option<RawValue>,
    #[serde(rename = "n_exp", skip_serializing_if = "Option::is_none")]
    pub n_exp: Option<RawValue>,

    // Exposed pipe / insulation
    /// Exposed length (m)
    #[serde(rename = "L_pipe", skip_serializing_if = "Option::is_none")]
    pub pipe_length: Option<RawValue>,
    /// Pipe outer diameter (m)
    #[serde(rename = "D_pipe", skip_serializing_if = "Option::is_none")]
    pub pipe_diameter: Option<RawValue>,
    /// Insulation thickness (m)
    #[serde(rename = "t_ins", skip_serializing_if = "Option::is_none")]
    pub insulation_thickness: Option<RawValue>,
    /// Insulation conductivity (W/(m·K))
    #[serde(rename = "k_ins", skip_serializing_if = "Option::is_none")]
    pub insulation_conductivity: Option<RawValue>,
    /// External convection coefficient (W/(m²·K))
    #[serde(rename = "h_ext", skip_serializing_if = "Option::is_none")]
    pub h_external: Option<RawValue>,
    /// Environment correction factor
    #[serde(rename = "f_env", skip_serializing_if = "Option::is_none")]
    pub env_factor: Option<RawValue>,
    /// Exposed area (m²), used when geometry is missing
    #[serde(rename = "A_pipe", skip_serializing_if = "Option::is_none")]
    pub pipe_area: Option<RawValue>,

    // Specific heats (kJ/(kg·K))
    #[serde(rename = "Cp_H2O", skip_serializing_if = "Option::is_none")]
    pub cp_water: Option<RawValue>,
    #[serde(rename = "Cp_Cu", skip_serializing_if = "Option::is_none")]
    pub cp_copper: Option<RawValue>,
    #[serde(rename = "Cp_Al", skip_serializing_if = "Option::is_none")]
    pub cp_aluminum: Option<RawValue>,

    // Material masses per unit (kg): air-side coil (FWU) and liquid side (TCS)
    #[serde(rename = "M_Cu_coil", skip_serializing_if = "Option::is_none")]
    pub coil_copper: Option<RawValue>,
    #[serde(rename = "M_Al_coil", skip_serializing_if = "Option::is_none")]
    pub coil_aluminum: Option<RawValue>,
    #[serde(rename = "M_H2O_coil", skip_serializing_if = "Option::is_none")]
    pub coil_water: Option<RawValue>,
    #[serde(rename = "M_Cu_TCS", skip_serializing_if = "Option::is_none")]
    pub tcs_copper: Option<RawValue>,
    #[serde(rename = "M_Al_TCS", skip_serializing_if = "Option::is_none")]
    pub tcs_aluminum: Option<RawValue>,
    #[serde(rename = "M_H2O_TCS", skip_serializing_if = "Option::is_none")]
    pub tcs_water: Option<RawValue>,

    // Buffer water volumes (L)
    #[serde(rename = "V_tank", skip_serializing_if = "Option::is_none")]
    pub tank_volume: Option<RawValue>,
    #[serde(rename = "V_evaporation", skip_serializing_if = "Option::is_none")]
    pub evaporation_volume: Option<RawValue>,
    #[serde(rename = "V_pipe_internal", skip_serializing_if = "Option::is_none")]
    pub pipe_internal_volume: Option<RawValue>,
    #[serde(rename = "V_pipe_external", skip_serializing_if = "Option::is_none")]
    pub pipe_external_volume: Option<RawValue>,

    // Room air
    #[serde(rename = "T_room_init", skip_serializing_if = "Option::is_none")]
    pub room_t_init: Option<RawValue>,
    #[serde(rename = "V_room_m3", skip_serializing_if = "Option::is_none")]
    pub room_volume: Option<RawValue>,
    #[serde(rename = "UA_room", skip_serializing_if = "Option::is_none")]
    pub ua_room: Option<RawValue>,
}
