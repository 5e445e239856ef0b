use crate::{
    api::jullix::{Reading, Snapshot},
    entity::{
        EntityKind,
        EntityState,
        PollState,
        description::{BinarySensorDescription, SensorDescription},
        projection::project,
    },
};

/// Sensor backed directly by a device reading.
pub struct Sensor {
    description: &'static SensorDescription,
    unique_id: String,
    device_id: String,
}

impl Sensor {
    pub fn new(description: &'static SensorDescription, id_prefix: &str, device_id: &str) -> Self {
        Self {
            description,
            unique_id: format!("{id_prefix}_{}", description.key),
            device_id: device_id.to_string(),
        }
    }

    pub const fn is_enabled_by_default(&self) -> bool {
        self.description.enabled_by_default
    }

    pub fn value(&self, snapshot: &Snapshot) -> Option<Reading> {
        project(snapshot, self.description.path)
    }

    pub fn available(&self, poll: PollState<'_>) -> bool {
        poll.last_update_success && self.description.path.device.is_online(poll.snapshot)
    }

    pub fn state(&self, poll: PollState<'_>) -> EntityState {
        let value = self.value(poll.snapshot);
        EntityState {
            unique_id: self.unique_id.clone(),
            kind: EntityKind::Sensor,
            name: self.description.name,
            device: self.device_id.clone(),
            value: match self.description.precision {
                Some(precision) => value.map(|value| value.round_to(precision)),
                None => value,
            },
            unit: self.description.unit,
            device_class: self.description.device_class,
            state_class: self.description.state_class,
            available: self.available(poll),
        }
    }
}

/// On/off sensor backed directly by a device flag.
pub struct BinarySensor {
    description: &'static BinarySensorDescription,
    unique_id: String,
    device_id: String,
}

impl BinarySensor {
    pub fn new(
        description: &'static BinarySensorDescription,
        id_prefix: &str,
        device_id: &str,
    ) -> Self {
        Self {
            description,
            unique_id: format!("{id_prefix}_{}", description.key),
            device_id: device_id.to_string(),
        }
    }

    /// [`None`] stands for the unknown state.
    pub fn is_on(&self, snapshot: &Snapshot) -> Option<bool> {
        project(snapshot, self.description.path).and_then(|reading| reading.as_bool())
    }

    pub fn available(&self, poll: PollState<'_>) -> bool {
        poll.last_update_success && self.description.path.device.is_online(poll.snapshot)
    }

    pub fn state(&self, poll: PollState<'_>) -> EntityState {
        EntityState {
            unique_id: self.unique_id.clone(),
            kind: EntityKind::BinarySensor,
            name: self.description.name,
            device: self.device_id.clone(),
            value: self.is_on(poll.snapshot).map(Reading::Flag),
            unit: None,
            device_class: self.description.device_class,
            state_class: None,
            available: self.available(poll),
        }
    }
}
