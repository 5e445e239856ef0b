//! Entities exposed by a single Jullix device.

mod battery_energy;
pub mod description;
pub mod projection;
mod sensor;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

pub use self::{
    battery_energy::BatteryEnergySensor,
    sensor::{BinarySensor, Sensor},
};
use crate::{
    api::jullix::{Reading, Snapshot},
    entity::description::{
        BATTERY_ENERGY_SENSORS,
        DeviceClass,
        INVERTER_BINARY_SENSORS,
        INVERTER_SENSORS,
        METER_BINARY_SENSORS,
        METER_SENSORS,
        StateClass,
        Unit,
    },
    state::StateFile,
};

/// Latest poll outcome that the entities render from.
#[derive(Copy, Clone)]
pub struct PollState<'a> {
    pub snapshot: &'a Snapshot,

    /// Whether the latest refresh succeeded, the snapshot is stale otherwise.
    pub last_update_success: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[display("sensor")]
    Sensor,

    #[display("binary sensor")]
    BinarySensor,
}

/// Rendered entity state.
#[derive(Clone, Debug, Serialize)]
pub struct EntityState {
    pub unique_id: String,
    pub kind: EntityKind,
    pub name: &'static str,

    /// Owning device identifier.
    pub device: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Reading>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,

    pub available: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn meter(snapshot: &Snapshot) -> Self {
        let meter_id = meter_id(snapshot);
        Self {
            identifier: format!("meter_{meter_id}"),
            name: "Smart Meter".to_string(),
            manufacturer: "Jullix".to_string(),
            model: "DSMR P1 Meter".to_string(),
        }
    }

    /// The inverter reports its model only, so the manufacturer is derived from it.
    pub fn inverter(snapshot: &Snapshot, instance_id: &str) -> Self {
        let model = snapshot.inverter_model().unwrap_or_else(|| "Unknown".to_string());
        Self {
            identifier: format!("inverter_{instance_id}"),
            name: snapshot.inverter_description().unwrap_or_else(|| "Solar Inverter".to_string()),
            manufacturer: capitalize(&model),
            model,
        }
    }
}

fn meter_id(snapshot: &Snapshot) -> String {
    snapshot.meter_id().unwrap_or_else(|| "unknown".to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(
        || "Unknown".to_string(),
        |first| first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    )
}

/// All entities of one device, built once from the first successful snapshot.
pub struct Entities {
    devices: [DeviceInfo; 2],
    sensors: Vec<Sensor>,
    binary_sensors: Vec<BinarySensor>,
    battery_energy_sensors: Vec<BatteryEnergySensor>,
}

impl Entities {
    pub fn new(snapshot: &Snapshot, instance_id: &str) -> Self {
        let meter_id = meter_id(snapshot);
        let meter = DeviceInfo::meter(snapshot);
        let inverter = DeviceInfo::inverter(snapshot, instance_id);

        let sensors = METER_SENSORS
            .iter()
            .map(|description| Sensor::new(description, &meter_id, &meter.identifier))
            .chain(
                INVERTER_SENSORS
                    .iter()
                    .map(|description| Sensor::new(description, instance_id, &inverter.identifier)),
            )
            .collect();
        let binary_sensors = METER_BINARY_SENSORS
            .iter()
            .map(|description| BinarySensor::new(description, &meter_id, &meter.identifier))
            .chain(INVERTER_BINARY_SENSORS.iter().map(|description| {
                BinarySensor::new(description, instance_id, &inverter.identifier)
            }))
            .collect();
        let battery_energy_sensors = BATTERY_ENERGY_SENSORS
            .iter()
            .map(|description| {
                BatteryEnergySensor::new(description, instance_id, &inverter.identifier)
            })
            .collect();

        Self { devices: [meter, inverter], sensors, binary_sensors, battery_energy_sensors }
    }

    pub const fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn restore(&mut self, state_file: &StateFile) {
        for sensor in &mut self.battery_energy_sensors {
            sensor.restore(state_file);
        }
    }

    /// Feed a freshly fetched snapshot into the battery energy totals.
    pub fn handle_update(
        &mut self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        state_file: &mut StateFile,
    ) {
        for sensor in &mut self.battery_energy_sensors {
            sensor.handle_update(snapshot, now, state_file);
        }
    }

    pub fn states(&self, poll: PollState<'_>, include_disabled: bool) -> Vec<EntityState> {
        let sensors = self
            .sensors
            .iter()
            .filter(|sensor| include_disabled || sensor.is_enabled_by_default())
            .map(|sensor| sensor.state(poll));
        let binary_sensors = self.binary_sensors.iter().map(|sensor| sensor.state(poll));
        let battery_energy_sensors =
            self.battery_energy_sensors.iter().map(|sensor| sensor.state(poll));
        sensors.chain(binary_sensors).chain(battery_energy_sensors).collect()
    }

    pub fn report(&self, poll: PollState<'_>, include_disabled: bool) -> Report<'_> {
        Report {
            timestamp: Local::now(),
            last_update_success: poll.last_update_success,
            devices: self.devices(),
            entities: self.states(poll, include_disabled),
        }
    }
}

/// One line of the watch output.
#[derive(Serialize)]
pub struct Report<'a> {
    pub timestamp: DateTime<Local>,
    pub last_update_success: bool,
    pub devices: &'a [DeviceInfo],
    pub entities: Vec<EntityState>,
}
