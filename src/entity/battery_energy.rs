use chrono::{DateTime, Utc};

use crate::{
    api::jullix::{Reading, Snapshot},
    battery::Accumulator,
    entity::{
        EntityKind,
        EntityState,
        PollState,
        description::BatteryEnergyDescription,
        projection::Device,
    },
    quantity::energy::KilowattHours,
    state::StateFile,
};

/// Battery charged or discharged energy total, integrated from the battery power.
pub struct BatteryEnergySensor {
    description: &'static BatteryEnergyDescription,
    unique_id: String,
    device_id: String,
    accumulator: Accumulator,
}

impl BatteryEnergySensor {
    pub fn new(
        description: &'static BatteryEnergyDescription,
        instance_id: &str,
        device_id: &str,
    ) -> Self {
        Self {
            description,
            unique_id: format!("{instance_id}_{}", description.key),
            device_id: device_id.to_string(),
            accumulator: Accumulator::new(description.direction),
        }
    }

    pub fn restore(&mut self, state_file: &StateFile) {
        self.accumulator.restore(state_file.get(&self.unique_id));
    }

    /// Feed the battery power from a freshly fetched snapshot.
    pub fn handle_update(
        &mut self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        state_file: &mut StateFile,
    ) {
        if self.accumulator.update(snapshot.battery_power(), now) {
            state_file.set(&self.unique_id, self.accumulator.total());
        }
    }

    pub fn value(&self) -> KilowattHours {
        self.accumulator.value()
    }

    pub fn available(&self, poll: PollState<'_>) -> bool {
        poll.last_update_success && Device::Inverter.is_online(poll.snapshot)
    }

    pub fn state(&self, poll: PollState<'_>) -> EntityState {
        EntityState {
            unique_id: self.unique_id.clone(),
            kind: EntityKind::Sensor,
            name: self.description.name,
            device: self.device_id.clone(),
            value: Some(Reading::Number(self.value().0)),
            unit: Some(BatteryEnergyDescription::UNIT),
            device_class: Some(BatteryEnergyDescription::DEVICE_CLASS),
            state_class: Some(BatteryEnergyDescription::STATE_CLASS),
            available: self.available(poll),
        }
    }
}
