use std::cell::Cell;

use log::info;
use volt_control::bsp::adc::{Converter, Prescaler, Reference};
use volt_control::error::SensorError;

/// Full scale of the simulated 12 bit converter
const RAW_MAX: u32 = 4095;

/// Battery with a voltage which can be changed from the keyboard
pub struct SimBattery {
    millivolts: Cell<u32>,
}

impl SimBattery {
    pub fn create(millivolts: u32) -> Self {
        SimBattery {
            millivolts: Cell::new(millivolts),
        }
    }

    pub fn millivolts(&self) -> u32 {
        self.millivolts.get()
    }

    pub fn charge(&self, millivolts: u32) {
        self.millivolts.set(self.millivolts.get() + millivolts);
    }

    pub fn discharge(&self, millivolts: u32) {
        self.millivolts
            .set(self.millivolts.get().saturating_sub(millivolts));
    }
}

/// Converter reading the [SimBattery]. Every conversion needs one extra poll,
/// like a real converter which is busy for a while after the start.
pub struct SimConverter<'a> {
    battery: &'a SimBattery,
    millivolts_per_count: u32,
    busy: Cell<bool>,
}

impl<'a> SimConverter<'a> {
    pub fn create(battery: &'a SimBattery, millivolts_per_count: u32) -> Self {
        SimConverter {
            battery,
            millivolts_per_count,
            busy: Cell::new(false),
        }
    }
}

impl<'a> Converter for SimConverter<'a> {
    fn configure(&self, reference: Reference, prescaler: Prescaler) {
        info!(
            "sim converter: reference {:?}, clock / {}",
            reference,
            prescaler.divider()
        );
    }

    fn channels(&self) -> u8 {
        4
    }

    fn convert(&self, _channel: u8) -> nb::Result<u16, SensorError> {
        if !self.busy.replace(true) {
            return Err(nb::Error::WouldBlock);
        }
        self.busy.set(false);
        let raw = self.battery.millivolts() / self.millivolts_per_count;
        Ok(raw.min(RAW_MAX) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_is_busy_once_then_scaled() {
        let battery = SimBattery::create(3650);
        let converter = SimConverter::create(&battery, 5);
        assert_eq!(converter.convert(3), Err(nb::Error::WouldBlock));
        assert_eq!(converter.convert(3), Ok(730));
        assert_eq!(converter.convert(3), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn conversion_saturates_at_full_scale() {
        let battery = SimBattery::create(30_000);
        let converter = SimConverter::create(&battery, 5);
        let _ = converter.convert(3);
        assert_eq!(converter.convert(3), Ok(4095));
    }

    #[test]
    fn battery_does_not_go_below_zero() {
        let battery = SimBattery::create(30);
        battery.discharge(50);
        assert_eq!(battery.millivolts(), 0);
    }
}
