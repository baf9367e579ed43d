//! Compile-time parameters of the monitor.

use crate::bsp::adc::{Prescaler, Reference};

/// Clock feeding the tick timer
pub const TIMER_CLOCK_HZ: u32 = 1_000_000;
/// Largest prescaler of the tick timer
pub const TIMER_PRESCALER: u32 = 16384;
/// Largest compare value of the tick timer
pub const TIMER_COMPARE: u32 = 255;

/// Period of a timer in CTC mode, which counts `0..=compare` at `clock_hz / prescaler`
pub const fn timer_period_ms(clock_hz: u32, prescaler: u32, compare: u32) -> u32 {
    ((compare as u64 + 1) * prescaler as u64 * 1000 / clock_hz as u64) as u32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    /// Converter input wired to the battery
    pub channel: u8,
    pub reference: Reference,
    pub prescaler: Prescaler,
    /// Raw reads per averaged sample
    pub samples: u8,
    /// Volts per raw count
    pub scale: f32,
    /// Below this voltage every tick emits the alert blink
    pub low_voltage: f32,
    /// A drop larger than this since the last report triggers a new report
    pub drop_delta: f32,
    pub blink_on_ms: u32,
    pub blink_off_ms: u32,
    /// Gap between the whole volts and the decimal digit
    pub digit_gap_ms: u32,
    pub startup_delay_ms: u32,
    pub alert_pause_ms: u32,
    pub tick_period_ms: u32,
    /// None waits for a conversion forever
    pub poll_limit: Option<u32>,
}

impl MonitorConfig {
    pub const DEFAULT: MonitorConfig = MonitorConfig {
        channel: 3,
        reference: Reference::Internal2V56,
        prescaler: Prescaler::Div128,
        samples: 10,
        scale: 0.005,
        low_voltage: 3.0,
        drop_delta: 0.1,
        blink_on_ms: 100,
        blink_off_ms: 200,
        digit_gap_ms: 1000,
        startup_delay_ms: 1000,
        alert_pause_ms: 500,
        tick_period_ms: timer_period_ms(TIMER_CLOCK_HZ, TIMER_PRESCALER, TIMER_COMPARE),
        poll_limit: None,
    };
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_is_the_slowest_timer_setting() {
        assert_eq!(MonitorConfig::DEFAULT.tick_period_ms, 4194);
    }

    #[test]
    fn timer_period_scales_with_compare() {
        assert_eq!(timer_period_ms(1_000_000, 1024, 0), 1);
        assert_eq!(timer_period_ms(1_000_000, 1024, 127), 131);
    }

    #[test]
    fn default_config_is_sane() {
        let c = MonitorConfig::default();
        assert!(c.samples > 0);
        assert!(c.drop_delta > 0.0);
        assert!(c.blink_on_ms < c.blink_off_ms);
        assert!(c.poll_limit.is_none());
    }
}
