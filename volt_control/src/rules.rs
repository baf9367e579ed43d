use crate::config::MonitorConfig;

/// Which announcements a measurement calls for
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct Verdict {
    /// Voltage is below the floor, blink the alert
    pub low_voltage: bool,
    /// Voltage fell by more than the delta since the last report, report again
    pub dropped: bool,
}

impl Verdict {
    pub fn is_quiet(&self) -> bool {
        !self.low_voltage && !self.dropped
    }
}

/// Both rules are independent and may fire together. A rising voltage never
/// counts as a drop.
pub fn evaluate(voltage: f32, last_blinked: f32, config: &MonitorConfig) -> Verdict {
    Verdict {
        low_voltage: voltage < config.low_voltage,
        dropped: last_blinked - voltage > config.drop_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: MonitorConfig = MonitorConfig::DEFAULT;

    #[test]
    fn low_voltage_fires_only_below_the_floor() {
        assert!(evaluate(2.999, 2.999, &CONFIG).low_voltage);
        assert!(!evaluate(3.000, 3.000, &CONFIG).low_voltage);
        assert!(!evaluate(3.001, 3.001, &CONFIG).low_voltage);
    }

    #[test]
    fn drop_of_exactly_the_delta_is_not_a_drop() {
        assert!(!evaluate(0.0, 0.1, &CONFIG).dropped);
        assert!(!evaluate(0.1, 0.2, &CONFIG).dropped);
    }

    #[test]
    fn drop_just_over_the_delta_is_a_drop() {
        assert!(evaluate(0.2 - 0.1000001, 0.2, &CONFIG).dropped);
        assert!(evaluate(3.5, 3.65, &CONFIG).dropped);
    }

    #[test]
    fn rise_is_never_a_drop() {
        assert!(!evaluate(3.25, 3.2, &CONFIG).dropped);
        assert!(evaluate(3.25, 3.2, &CONFIG).is_quiet());
    }

    #[test]
    fn both_rules_can_fire_together() {
        let verdict = evaluate(2.8, 3.1, &CONFIG);
        assert_eq!(
            verdict,
            Verdict {
                low_voltage: true,
                dropped: true
            }
        );
    }
}
