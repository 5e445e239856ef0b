//! Static entity tables.

use serde::Serialize;

use crate::{battery::Direction, entity::projection::FieldPath};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, derive_more::Display)]
pub enum Unit {
    #[display("kW")]
    #[serde(rename = "kW")]
    Kilowatt,

    #[display("kWh")]
    #[serde(rename = "kWh")]
    KilowattHour,

    #[display("m³")]
    #[serde(rename = "m³")]
    CubicMeter,

    #[display("V")]
    #[serde(rename = "V")]
    Volt,

    #[display("A")]
    #[serde(rename = "A")]
    Ampere,

    #[display("%")]
    #[serde(rename = "%")]
    Percent,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Battery,
    BatteryCharging,
    Connectivity,
    Current,
    Energy,
    Gas,
    Power,
    Problem,
    Voltage,
    Water,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    /// Instantaneous reading.
    Measurement,

    /// Monotonically increasing total.
    TotalIncreasing,
}

#[derive(Copy, Clone, Debug)]
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub path: FieldPath,
    pub unit: Option<Unit>,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,

    /// Number of decimal places in the emitted value.
    pub precision: Option<u8>,

    pub enabled_by_default: bool,
}

impl SensorDescription {
    const DEFAULT: Self = Self {
        key: "",
        name: "",
        path: FieldPath::meter(&[]),
        unit: None,
        device_class: None,
        state_class: None,
        precision: None,
        enabled_by_default: true,
    };
}

#[derive(Copy, Clone, Debug)]
pub struct BinarySensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub path: FieldPath,
    pub device_class: Option<DeviceClass>,
}

#[derive(Copy, Clone, Debug)]
pub struct BatteryEnergyDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub direction: Direction,
}

impl BatteryEnergyDescription {
    pub const UNIT: Unit = Unit::KilowattHour;
    pub const DEVICE_CLASS: DeviceClass = DeviceClass::Energy;
    pub const STATE_CLASS: StateClass = StateClass::TotalIncreasing;
}

pub const METER_SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "power",
        name: "Grid power",
        path: FieldPath::meter(&["power", "value"]),
        unit: Some(Unit::Kilowatt),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        precision: Some(3),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "energy-in",
        name: "Energy import",
        path: FieldPath::meter(&["energy-in", "value"]),
        unit: Some(Unit::KilowattHour),
        device_class: Some(DeviceClass::Energy),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "energy-out",
        name: "Energy export",
        path: FieldPath::meter(&["energy-out", "value"]),
        unit: Some(Unit::KilowattHour),
        device_class: Some(DeviceClass::Energy),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "gas",
        name: "Gas consumption",
        path: FieldPath::meter(&["gas", "value"]),
        unit: Some(Unit::CubicMeter),
        device_class: Some(DeviceClass::Gas),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "water",
        name: "Water consumption",
        path: FieldPath::meter(&["water", "value"]),
        unit: Some(Unit::CubicMeter),
        device_class: Some(DeviceClass::Water),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "id",
        name: "Meter ID",
        path: FieldPath::meter(&["id", "value"]),
        enabled_by_default: false,
        ..SensorDescription::DEFAULT
    },
];

pub const METER_BINARY_SENSORS: &[BinarySensorDescription] = &[
    BinarySensorDescription {
        key: "connected",
        name: "Meter connected",
        path: FieldPath::meter(&["connected"]),
        device_class: Some(DeviceClass::Connectivity),
    },
    BinarySensorDescription {
        key: "enabled",
        name: "Meter enabled",
        path: FieldPath::meter(&["enabled"]),
        device_class: None,
    },
    BinarySensorDescription {
        key: "tariff1",
        name: "Tariff 1",
        path: FieldPath::meter(&["tariff1", "value"]),
        device_class: None,
    },
    BinarySensorDescription {
        key: "tariff2",
        name: "Tariff 2",
        path: FieldPath::meter(&["tariff2", "value"]),
        device_class: None,
    },
];

pub const INVERTER_SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "voltage_l1",
        name: "Voltage L1",
        path: FieldPath::inverter(&["data", "voltage_l1"]),
        unit: Some(Unit::Volt),
        device_class: Some(DeviceClass::Voltage),
        state_class: Some(StateClass::Measurement),
        precision: Some(1),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "current_l1",
        name: "Current L1",
        path: FieldPath::inverter(&["data", "current_l1"]),
        unit: Some(Unit::Ampere),
        device_class: Some(DeviceClass::Current),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "battery_power",
        name: "Battery power",
        path: FieldPath::inverter(&["data", "battery_power"]),
        unit: Some(Unit::Kilowatt),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "battery_voltage",
        name: "Battery voltage",
        path: FieldPath::inverter(&["data", "battery_voltage"]),
        unit: Some(Unit::Volt),
        device_class: Some(DeviceClass::Voltage),
        state_class: Some(StateClass::Measurement),
        precision: Some(1),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "battery_current",
        name: "Battery current",
        path: FieldPath::inverter(&["data", "battery_current"]),
        unit: Some(Unit::Ampere),
        device_class: Some(DeviceClass::Current),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "battery_SOC",
        name: "Battery level",
        path: FieldPath::inverter(&["data", "battery_SOC"]),
        unit: Some(Unit::Percent),
        device_class: Some(DeviceClass::Battery),
        state_class: Some(StateClass::Measurement),
        precision: Some(0),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "energy_produced",
        name: "Solar energy produced",
        path: FieldPath::inverter(&["data", "energy_produced"]),
        unit: Some(Unit::KilowattHour),
        device_class: Some(DeviceClass::Energy),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(1),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "energy_consumed",
        name: "House energy consumed",
        path: FieldPath::inverter(&["data", "energy_consumed"]),
        unit: Some(Unit::KilowattHour),
        device_class: Some(DeviceClass::Energy),
        state_class: Some(StateClass::TotalIncreasing),
        precision: Some(1),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "power",
        name: "Inverter power",
        path: FieldPath::inverter(&["data", "power"]),
        unit: Some(Unit::Kilowatt),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "pv_power",
        name: "PV power",
        path: FieldPath::inverter(&["data", "pv_power"]),
        unit: Some(Unit::Kilowatt),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
    SensorDescription {
        key: "gridpower",
        name: "Grid power",
        path: FieldPath::inverter(&["data", "gridpower"]),
        unit: Some(Unit::Kilowatt),
        device_class: Some(DeviceClass::Power),
        state_class: Some(StateClass::Measurement),
        precision: Some(2),
        ..SensorDescription::DEFAULT
    },
];

pub const INVERTER_BINARY_SENSORS: &[BinarySensorDescription] = &[
    BinarySensorDescription {
        key: "ready",
        name: "Inverter ready",
        path: FieldPath::inverter(&["data", "ready"]),
        device_class: None,
    },
    BinarySensorDescription {
        key: "low_battery",
        name: "Battery low",
        path: FieldPath::inverter(&["data", "low_battery"]),
        device_class: Some(DeviceClass::Battery),
    },
    BinarySensorDescription {
        key: "comm_fail",
        name: "Communication failure",
        path: FieldPath::inverter(&["data", "comm_fail"]),
        device_class: Some(DeviceClass::Problem),
    },
    BinarySensorDescription {
        key: "dsmr_fail",
        name: "DSMR failure",
        path: FieldPath::inverter(&["data", "dsmr_fail"]),
        device_class: Some(DeviceClass::Problem),
    },
    BinarySensorDescription {
        key: "charging",
        name: "Battery charging",
        path: FieldPath::inverter(&["data", "charging"]),
        device_class: Some(DeviceClass::BatteryCharging),
    },
    BinarySensorDescription {
        key: "discharging",
        name: "Battery discharging",
        path: FieldPath::inverter(&["data", "discharging"]),
        device_class: None,
    },
];

pub const BATTERY_ENERGY_SENSORS: &[BatteryEnergyDescription] = &[
    BatteryEnergyDescription {
        key: "battery_energy_charged",
        name: "Battery energy charged",
        direction: Direction::Charging,
    },
    BatteryEnergyDescription {
        key: "battery_energy_discharged",
        name: "Battery energy discharged",
        direction: Direction::Discharging,
    },
];
