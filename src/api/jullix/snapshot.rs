use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::quantity::{power::Kilowatts, round_to};

/// Raw JSON document returned by one of the device endpoints.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize, Serialize, derive_more::From)]
#[serde(transparent)]
pub struct Document(pub Value);

impl Document {
    /// Walk the object members and return the scalar at the end of the path.
    ///
    /// Missing members, `null`s, arrays and objects all yield [`None`].
    pub fn lookup(&self, segments: &[&str]) -> Option<Reading> {
        segments
            .iter()
            .try_fold(&self.0, |value, segment| value.get(*segment))
            .and_then(Reading::from_json)
    }

    fn flag(&self, segments: &[&str]) -> bool {
        self.lookup(segments).and_then(|reading| reading.as_bool()).unwrap_or(false)
    }

    fn text(&self, segments: &[&str]) -> Option<String> {
        self.lookup(segments).map(|reading| reading.to_string()).filter(|text| !text.is_empty())
    }
}

/// Single scalar value read from the device.
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::Display)]
#[serde(untagged)]
pub enum Reading {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Reading {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Flag(*flag)),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Round numbers to the display precision, leave the other variants as they are.
    #[must_use]
    pub fn round_to(self, decimals: u8) -> Self {
        match self {
            Self::Number(number) => Self::Number(round_to(number, decimals)),
            other => other,
        }
    }
}

/// Meter and inverter readings fetched within a single poll.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// `/api/dsmr/status` response.
    pub meter: Document,

    /// `/api/inverter/status/A` response.
    pub inverter: Document,
}

impl Snapshot {
    pub fn is_meter_connected(&self) -> bool {
        self.meter.flag(&["connected"])
    }

    pub fn is_inverter_running(&self) -> bool {
        self.inverter.flag(&["running"])
    }

    pub fn meter_id(&self) -> Option<String> {
        self.meter.text(&["id", "value"])
    }

    pub fn inverter_model(&self) -> Option<String> {
        self.inverter.text(&["model"])
    }

    pub fn inverter_description(&self) -> Option<String> {
        self.inverter.text(&["desc"])
    }

    /// Current battery power: negative while charging, positive while discharging.
    ///
    /// Only reported while the inverter is running, the readings are garbage otherwise.
    pub fn battery_power(&self) -> Option<Kilowatts> {
        if !self.is_inverter_running() {
            return None;
        }
        self.inverter
            .lookup(&["data", "battery_power"])
            .and_then(|reading| reading.as_f64())
            .map(Kilowatts::from)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            meter: Document(json!({
                "id": { "value": "1SAG3200415379" },
                "power": { "value": 0.412 },
                "energy-in": { "value": 1234.5 },
                "gas": { "value": null },
                "connected": true,
                "enabled": true,
            })),
            inverter: Document(json!({
                "model": "solis",
                "desc": "Solis RHI",
                "running": true,
                "data": { "battery_power": -1.25, "battery_SOC": 64 },
            })),
        }
    }

    #[test]
    fn test_lookup_ok() {
        let snapshot = snapshot();
        assert_eq!(snapshot.meter.lookup(&["energy-in", "value"]), Some(Reading::Number(1234.5)));
        assert_eq!(snapshot.meter.lookup(&["connected"]), Some(Reading::Flag(true)));
        assert_eq!(snapshot.inverter.lookup(&["model"]), Some(Reading::Text("solis".into())));
    }

    #[test]
    fn test_lookup_absent() {
        let snapshot = snapshot();
        assert_eq!(snapshot.meter.lookup(&["water", "value"]), None);
        assert_eq!(snapshot.meter.lookup(&["gas", "value"]), None);
        assert_eq!(snapshot.meter.lookup(&["power"]), None, "objects are not scalars");
        assert_eq!(snapshot.meter.lookup(&["connected", "value"]), None);
    }

    #[test]
    fn test_accessors() {
        let snapshot = snapshot();
        assert!(snapshot.is_meter_connected());
        assert!(snapshot.is_inverter_running());
        assert_eq!(snapshot.meter_id().as_deref(), Some("1SAG3200415379"));
        assert_eq!(snapshot.inverter_model().as_deref(), Some("solis"));
        assert_eq!(snapshot.inverter_description().as_deref(), Some("Solis RHI"));
        assert_abs_diff_eq!(snapshot.battery_power().unwrap().0, -1.25);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(!snapshot.is_meter_connected());
        assert!(!snapshot.is_inverter_running());
        assert_eq!(snapshot.meter_id(), None);
        assert!(snapshot.battery_power().is_none());
    }

    #[test]
    fn test_battery_power_requires_running_inverter() {
        let mut snapshot = snapshot();
        snapshot.inverter.0["running"] = json!(false);
        assert!(snapshot.battery_power().is_none());
    }

    #[test]
    fn test_round_reading() {
        assert_eq!(Reading::Number(0.4126).round_to(3), Reading::Number(0.413));
        assert_eq!(Reading::Flag(true).round_to(3), Reading::Flag(true));
    }
}
