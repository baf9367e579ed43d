use core::cell::RefCell;

use log::debug;
use stm_hal::analog::adc::{Adc, Precision, SampleTime};
use stm_hal::hal::adc::{Channel, OneShot};

use volt_control::bsp::adc::{Converter, Prescaler, Reference};
use volt_control::error::SensorError;

/// Converter with a single analog pin bound to it. The pin is sampled
/// whatever channel below [Converter::channels] is requested.
pub struct AdcConverter<V: Channel<Adc, ID = u8>> {
    pub adc: RefCell<Adc>,
    pub vin_pin: RefCell<V>,
}

impl<V> Converter for AdcConverter<V>
where
    V: Channel<Adc, ID = u8>,
{
    fn configure(&self, reference: Reference, prescaler: Prescaler) {
        // the G0 runs its converter from the system clock with a fixed
        // reference, a long sample time stands in for the slow clock
        debug!(
            "adc: {:?} requested, clock / {}",
            reference,
            prescaler.divider()
        );
        let mut adc = self.adc.borrow_mut();
        adc.set_sample_time(SampleTime::T_80);
        adc.set_precision(Precision::B_12);
    }

    fn channels(&self) -> u8 {
        V::channel() + 1
    }

    fn convert(&self, _channel: u8) -> nb::Result<u16, SensorError> {
        self.adc
            .borrow_mut()
            .read(&mut *self.vin_pin.borrow_mut())
            .map_err(|e| e.map(|_| SensorError::AdcReadFailed))
    }
}
