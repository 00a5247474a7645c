// cp-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Energy as UomEnergy, HeatTransfer as UomHeatTransfer, Length as UomLength,
    MassRate as UomMassRate, Power as UomPower, SpecificHeatCapacity as UomSpecificHeatCapacity,
    ThermalConductance as UomThermalConductance, ThermalConductivity as UomThermalConductivity,
};

// SI quantities shared by the parameter and reporting code
pub type Area = UomArea;
pub type Energy = UomEnergy;
pub type HeatTransferCoeff = UomHeatTransfer;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type SpecificHeat = UomSpecificHeatCapacity;
pub type Conductance = UomThermalConductance;
pub type Conductivity = UomThermalConductivity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn w_per_k(v: f64) -> Conductance {
    use uom::si::thermal_conductance::watt_per_kelvin;
    Conductance::new::<watt_per_kelvin>(v)
}

#[inline]
pub fn w_per_m_k(v: f64) -> Conductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    Conductivity::new::<watt_per_meter_kelvin>(v)
}

#[inline]
pub fn w_per_m2_k(v: f64) -> HeatTransferCoeff {
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;
    HeatTransferCoeff::new::<watt_per_square_meter_kelvin>(v)
}

#[inline]
pub fn kj_per_kg_k(v: f64) -> SpecificHeat {
    use uom::si::specific_heat_capacity::kilojoule_per_kilogram_kelvin;
    SpecificHeat::new::<kilojoule_per_kilogram_kelvin>(v)
}

/// Energy in joules expressed as kWh.
#[inline]
pub fn joules_to_kwh(v: f64) -> f64 {
    use uom::si::energy::{joule, kilowatt_hour};
    Energy::new::<joule>(v).get::<kilowatt_hour>()
}

/// Power in watts expressed as kW.
#[inline]
pub fn watts_to_kw(v: f64) -> f64 {
    use uom::si::power::{kilowatt, watt};
    Power::new::<watt>(v).get::<kilowatt>()
}

/// Volumetric water flow in L/min to mass flow, taking 1 kg per litre.
#[inline]
pub fn lpm_water_to_kgps(v: f64) -> MassRate {
    kgps(v / constants::SECONDS_PER_MINUTE)
}

pub mod constants {
    /// Water density used to turn litres into kilograms.
    pub const WATER_KG_PER_L: f64 = 1.0;

    pub const SECONDS_PER_MINUTE: f64 = 60.0;

    /// Fixed room-air properties.
    pub const CP_AIR_J_PER_KG_K: f64 = 1005.0;
    pub const RHO_AIR_KG_PER_M3: f64 = 1.2;
}
