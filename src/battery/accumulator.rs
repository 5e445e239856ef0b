use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::{
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Energy flow direction tracked by an [`Accumulator`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Energy flowing into the battery, reported as negative power.
    Charging,

    /// Energy flowing out of the battery, reported as positive power.
    Discharging,
}

impl Direction {
    /// Check whether the power sample flows in this direction. Zero power flows nowhere.
    #[must_use]
    pub fn matches(self, power: Kilowatts) -> bool {
        match self {
            Self::Charging => power.is_sign_negative(),
            Self::Discharging => power.is_sign_positive(),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    time: DateTime<Utc>,
    power: Kilowatts,
}

/// Battery energy totalizer.
///
/// Integrates the battery power samples with the left Riemann sum: the power of the previous
/// sample is held constant until the next one arrives.
///
/// Only the total survives a restart. The first sample after a restart becomes the new baseline,
/// and the interval spanning the restart is not integrated.
#[must_use]
#[derive(Clone, Debug)]
pub struct Accumulator {
    direction: Direction,
    total: KilowattHours,
    last_sample: Option<Sample>,
}

impl Accumulator {
    pub const DISPLAY_PRECISION: u8 = 2;

    pub const fn new(direction: Direction) -> Self {
        Self { direction, total: KilowattHours::ZERO, last_sample: None }
    }

    /// Seed the total from the persisted state. Must be called before any [`Accumulator::update`].
    pub fn restore(&mut self, previous_total: Option<KilowattHours>) {
        match previous_total {
            Some(total) if total.is_finite() && total >= KilowattHours::ZERO => {
                debug!(direction = ?self.direction, ?total, "restored");
                self.total = total;
            }
            Some(total) => {
                warn!(direction = ?self.direction, ?total, "ignoring the invalid persisted total");
            }
            None => {}
        }
    }

    /// Consume the power sample observed at `now`.
    ///
    /// Returns `true` when the sample has been consumed, and so the total should be persisted.
    /// Absent and non-finite samples are ignored.
    pub fn update(&mut self, power: Option<Kilowatts>, now: DateTime<Utc>) -> bool {
        let Some(power) = power.filter(|power| power.is_finite()) else {
            return false;
        };

        if let Some(last_sample) = self.last_sample
            && self.direction.matches(last_sample.power)
        {
            let elapsed = (now - last_sample.time).max(TimeDelta::zero());
            self.total += last_sample.power.abs() * elapsed;
        }

        self.last_sample = Some(Sample { time: now, power });
        trace!(direction = ?self.direction, ?power, total = ?self.total, "updated");
        true
    }

    /// Full-precision total.
    pub const fn total(&self) -> KilowattHours {
        self.total
    }

    /// Total rounded for display.
    pub fn value(&self) -> KilowattHours {
        self.total.round_to(Self::DISPLAY_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn pair() -> (Accumulator, Accumulator) {
        (Accumulator::new(Direction::Charging), Accumulator::new(Direction::Discharging))
    }

    #[test]
    fn test_direction_matches() {
        assert!(Direction::Charging.matches(Kilowatts::from(-0.1)));
        assert!(!Direction::Charging.matches(Kilowatts::from(0.1)));
        assert!(Direction::Discharging.matches(Kilowatts::from(0.1)));
        assert!(!Direction::Discharging.matches(Kilowatts::from(-0.1)));
        assert!(!Direction::Charging.matches(Kilowatts::ZERO));
        assert!(!Direction::Discharging.matches(Kilowatts::ZERO));
    }

    #[test]
    fn test_first_sample_is_baseline() {
        let mut accumulator = Accumulator::new(Direction::Discharging);
        accumulator.restore(Some(KilowattHours::from(7.0)));
        assert!(accumulator.update(Some(Kilowatts::from(1000.0)), t0()));
        assert_abs_diff_eq!(accumulator.total().0, 7.0);
    }

    #[test]
    fn test_absent_sample_is_noop() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        assert!(accumulator.update(Some(Kilowatts::from(-2.0)), t0()));
        assert!(!accumulator.update(None, t0() + TimeDelta::hours(1)));
        assert!(!accumulator.update(Some(Kilowatts::from(f64::NAN)), t0() + TimeDelta::hours(2)));
        assert_abs_diff_eq!(accumulator.total().0, 0.0);

        // The baseline is still the very first sample, so the whole gap gets integrated.
        assert!(accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::hours(3)));
        assert_abs_diff_eq!(accumulator.total().0, 6.0);
    }

    #[test]
    fn test_absent_first_sample_does_not_set_baseline() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        assert!(!accumulator.update(None, t0()));
        assert!(accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::hours(1)));
        assert_abs_diff_eq!(accumulator.total().0, 0.0);
    }

    #[test]
    fn test_direction_gating() {
        let (mut charging, mut discharging) = pair();
        for accumulator in [&mut charging, &mut discharging] {
            accumulator.update(Some(Kilowatts::from(-2.0)), t0());
            accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::hours(1));
        }
        assert_abs_diff_eq!(charging.total().0, 2.0);
        assert_abs_diff_eq!(discharging.total().0, 0.0);
    }

    #[test]
    fn test_fractional_interval() {
        let mut accumulator = Accumulator::new(Direction::Discharging);
        accumulator.update(Some(Kilowatts::from(1.5)), t0());
        accumulator.update(Some(Kilowatts::from(0.3)), t0() + TimeDelta::minutes(30));
        assert_abs_diff_eq!(accumulator.total().0, 0.75);
    }

    #[test]
    fn test_zero_power_is_dead_zone() {
        let (mut charging, mut discharging) = pair();
        for accumulator in [&mut charging, &mut discharging] {
            accumulator.update(Some(Kilowatts::ZERO), t0());
            accumulator.update(Some(Kilowatts::from(1.0)), t0() + TimeDelta::hours(1));
        }
        assert_abs_diff_eq!(charging.total().0, 0.0);
        assert_abs_diff_eq!(discharging.total().0, 0.0);
    }

    #[test]
    fn test_wrong_direction_interval_is_dropped() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.update(Some(Kilowatts::from(1.0)), t0());
        accumulator.update(Some(Kilowatts::from(-1.0)), t0() + TimeDelta::hours(1));
        assert_abs_diff_eq!(accumulator.total().0, 0.0);
        accumulator.update(Some(Kilowatts::from(-1.0)), t0() + TimeDelta::hours(2));
        assert_abs_diff_eq!(accumulator.total().0, 1.0);
    }

    #[test]
    fn test_clock_going_backwards_does_not_decrease() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.update(Some(Kilowatts::from(-2.0)), t0());
        accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::hours(1));
        accumulator.update(Some(Kilowatts::from(-2.0)), t0());
        assert_abs_diff_eq!(accumulator.total().0, 2.0);
        accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::minutes(30));
        assert_abs_diff_eq!(accumulator.total().0, 3.0);
    }

    #[test]
    fn test_monotonic() {
        let mut accumulator = Accumulator::new(Direction::Discharging);
        let powers = [0.5, 2.0, -1.0, 0.0, 3.3, 3.3, -0.2, 1.1];
        let mut previous = accumulator.total();
        for (i, power) in (0..).zip(powers) {
            accumulator.update(Some(Kilowatts::from(power)), t0() + TimeDelta::seconds(7 * i));
            assert!(accumulator.total() >= previous);
            previous = accumulator.total();
        }
    }

    #[test]
    fn test_restore() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.restore(Some(KilowattHours::from(15.5)));
        assert_abs_diff_eq!(accumulator.value().0, 15.5);
    }

    #[test]
    fn test_restore_nothing() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.restore(None);
        assert_abs_diff_eq!(accumulator.value().0, 0.0);
    }

    #[test]
    fn test_restore_invalid() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.restore(Some(KilowattHours::from(-1.0)));
        assert_abs_diff_eq!(accumulator.total().0, 0.0);
        accumulator.restore(Some(KilowattHours::from(f64::INFINITY)));
        assert_abs_diff_eq!(accumulator.total().0, 0.0);
    }

    #[test]
    fn test_rounding_keeps_full_precision() {
        let mut accumulator = Accumulator::new(Direction::Discharging);

        // Each interval adds exactly 0.004 kWh.
        accumulator.update(Some(Kilowatts::from(1.44)), t0());
        accumulator.update(Some(Kilowatts::from(1.44)), t0() + TimeDelta::seconds(10));
        assert_abs_diff_eq!(accumulator.total().0, 0.004, epsilon = 1e-12);
        assert_abs_diff_eq!(accumulator.value().0, 0.0);

        accumulator.update(Some(Kilowatts::from(1.44)), t0() + TimeDelta::seconds(20));
        assert_abs_diff_eq!(accumulator.total().0, 0.008, epsilon = 1e-12);
        assert_abs_diff_eq!(accumulator.value().0, 0.01);
    }

    #[test]
    fn test_rounding_thirds() {
        let mut accumulator = Accumulator::new(Direction::Discharging);
        accumulator.update(Some(Kilowatts::from(2.0)), t0());
        accumulator.update(Some(Kilowatts::from(2.0)), t0() + TimeDelta::minutes(20));
        assert_abs_diff_eq!(accumulator.total().0, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(accumulator.value().0, 0.67);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut accumulator = Accumulator::new(Direction::Charging);
        accumulator.restore(Some(KilowattHours::ZERO));

        accumulator.update(Some(Kilowatts::from(-2.0)), t0());
        assert_abs_diff_eq!(accumulator.total().0, 0.0);

        accumulator.update(Some(Kilowatts::from(-2.0)), t0() + TimeDelta::hours(1));
        assert_abs_diff_eq!(accumulator.total().0, 2.0);

        accumulator.update(Some(Kilowatts::from(2.0)), t0() + TimeDelta::hours(2));
        assert_abs_diff_eq!(accumulator.total().0, 4.0);

        accumulator.update(Some(Kilowatts::from(2.0)), t0() + TimeDelta::hours(3));
        assert_abs_diff_eq!(accumulator.total().0, 4.0);
        assert_abs_diff_eq!(accumulator.value().0, 4.0);
    }
}
