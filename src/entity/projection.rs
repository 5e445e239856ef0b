use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Serialize;

use crate::api::jullix::{Document, Reading, Snapshot};

/// Device that backs an entity and whose document holds its reading.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[display("meter")]
    Meter,

    #[display("inverter")]
    Inverter,
}

impl Device {
    pub const fn document(self, snapshot: &Snapshot) -> &Document {
        match self {
            Self::Meter => &snapshot.meter,
            Self::Inverter => &snapshot.inverter,
        }
    }

    /// The meter must be connected to the device, and the inverter must be running.
    #[must_use]
    pub fn is_online(self, snapshot: &Snapshot) -> bool {
        match self {
            Self::Meter => snapshot.is_meter_connected(),
            Self::Inverter => snapshot.is_inverter_running(),
        }
    }
}

/// Fixed path to a reading, for example `meter.power.value`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldPath {
    pub device: Device,
    pub segments: &'static [&'static str],
}

impl FieldPath {
    pub const fn meter(segments: &'static [&'static str]) -> Self {
        Self { device: Device::Meter, segments }
    }

    pub const fn inverter(segments: &'static [&'static str]) -> Self {
        Self { device: Device::Inverter, segments }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.device, self.segments.iter().join("."))
    }
}

/// Read the value at the path, [`None`] if any of the segments is missing.
#[must_use]
pub fn project(snapshot: &Snapshot, path: FieldPath) -> Option<Reading> {
    path.device.document(snapshot).lookup(path.segments)
}
