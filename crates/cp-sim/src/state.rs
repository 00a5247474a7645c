//! Node temperatures during a run and the recorded samples.

use cp_core::{CoreResult, ensure_finite};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperatures (°C) of the thermal nodes. `room_c` is only meaningful when
/// the room-air node is active.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermalState {
    pub liquid_c: f64,
    pub air_side_c: f64,
    pub buffer_c: f64,
    pub room_c: f64,
}

impl ThermalState {
    /// Check every active temperature for finiteness.
    pub fn ensure_finite(&self, room_active: bool) -> CoreResult<()> {
        ensure_finite(self.liquid_c, "liquid temperature")?;
        ensure_finite(self.air_side_c, "air-side temperature")?;
        ensure_finite(self.buffer_c, "buffer temperature")?;
        if room_active {
            ensure_finite(self.room_c, "room temperature")?;
        }
        Ok(())
    }
}

impl fmt::Display for ThermalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "liquid={} air_side={} buffer={} room={}",
            self.liquid_c, self.air_side_c, self.buffer_c, self.room_c
        )
    }
}

/// One recorded point of the output series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Elapsed time (s)
    pub time_s: f64,
    pub liquid_c: f64,
    pub air_side_c: f64,
    pub buffer_c: f64,
    /// Present only when the room-air node is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_c: Option<f64>,
}

impl Sample {
    pub fn from_state(time_s: f64, x: &ThermalState, room_active: bool) -> Self {
        Self {
            time_s,
            liquid_c: x.liquid_c,
            air_side_c: x.air_side_c,
            buffer_c: x.buffer_c,
            room_c: room_active.then_some(x.room_c),
        }
    }

    /// Room temperature, or the air-side temperature when there is no room node.
    pub fn room_or_air_side(&self) -> f64 {
        self.room_c.unwrap_or(self.air_side_c)
    }

    /// True when time and every recorded temperature are finite.
    pub fn is_finite(&self) -> bool {
        self.time_s.is_finite()
            && self.liquid_c.is_finite()
            && self.air_side_c.is_finite()
            && self.buffer_c.is_finite()
            && self.room_c.is_none_or(f64::is_finite)
    }
}
