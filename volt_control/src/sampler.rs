use crate::bsp::adc::{Converter, Prescaler, Reference};
use crate::error::{Error, Result};

/// Owns the acquisition path. Nothing else talks to the converter.
pub struct Sampler<C: Converter> {
    converter: C,
    reference: Reference,
    prescaler: Prescaler,
    poll_limit: Option<u32>,
}

impl<C: Converter> Sampler<C> {
    pub fn new(converter: C, reference: Reference, prescaler: Prescaler) -> Self {
        Sampler {
            converter,
            reference,
            prescaler,
            poll_limit: None,
        }
    }

    /// Gives up on a conversion which is still busy after `polls` checks
    /// instead of waiting for it forever.
    pub fn with_poll_limit(self, polls: u32) -> Self {
        Sampler {
            poll_limit: Some(polls),
            ..self
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Configures the converter and throws away the first conversion,
    /// which is taken while the reference is still settling.
    pub fn initialize(&self) -> Result<()> {
        self.converter.configure(self.reference, self.prescaler);
        let _ = self.convert(0)?;
        Ok(())
    }

    pub fn read_raw(&self, channel: u8) -> Result<u16> {
        if channel >= self.converter.channels() {
            return Err(Error::InvalidChannel(channel));
        }
        self.convert(channel)
    }

    /// Arithmetic mean of `samples` raw reads, truncated
    pub fn read_averaged(&self, channel: u8, samples: u8) -> Result<u16> {
        if samples == 0 {
            return Err(Error::NoSamples);
        }
        let mut sum: u32 = 0;
        for _ in 0..samples {
            sum += self.read_raw(channel)? as u32;
        }
        Ok((sum / samples as u32) as u16)
    }

    fn convert(&self, channel: u8) -> Result<u16> {
        match self.poll_limit {
            None => Ok(nb::block!(self.converter.convert(channel))?),
            Some(limit) => {
                for _ in 0..limit {
                    match self.converter.convert(channel) {
                        Ok(raw) => return Ok(raw),
                        Err(nb::Error::WouldBlock) => {}
                        Err(nb::Error::Other(e)) => return Err(e.into()),
                    }
                }
                Err(Error::ConversionTimeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::SensorError;

    /// Returns the values in order, each after `latency` busy polls
    struct ScriptedConverter {
        values: Vec<u16>,
        latency: u32,
        next: Cell<usize>,
        busy: Cell<u32>,
        configured: Cell<Option<(Reference, Prescaler)>>,
        conversions: Cell<usize>,
    }

    impl ScriptedConverter {
        fn create(values: &[u16], latency: u32) -> Self {
            ScriptedConverter {
                values: values.to_vec(),
                latency,
                next: Cell::new(0),
                busy: Cell::new(0),
                configured: Cell::new(None),
                conversions: Cell::new(0),
            }
        }
    }

    impl Converter for ScriptedConverter {
        fn configure(&self, reference: Reference, prescaler: Prescaler) {
            self.configured.set(Some((reference, prescaler)));
        }

        fn channels(&self) -> u8 {
            4
        }

        fn convert(&self, _channel: u8) -> nb::Result<u16, SensorError> {
            if self.busy.get() < self.latency {
                self.busy.set(self.busy.get() + 1);
                return Err(nb::Error::WouldBlock);
            }
            self.busy.set(0);
            let i = self.next.get();
            self.next.set(i + 1);
            self.conversions.set(self.conversions.get() + 1);
            Ok(self.values[i % self.values.len()])
        }
    }

    struct StuckConverter;

    impl Converter for StuckConverter {
        fn configure(&self, _reference: Reference, _prescaler: Prescaler) {}

        fn channels(&self) -> u8 {
            4
        }

        fn convert(&self, _channel: u8) -> nb::Result<u16, SensorError> {
            Err(nb::Error::WouldBlock)
        }
    }

    fn sampler(values: &[u16]) -> Sampler<ScriptedConverter> {
        Sampler::new(
            ScriptedConverter::create(values, 2),
            Reference::Internal2V56,
            Prescaler::Div128,
        )
    }

    #[test]
    fn initialize_configures_and_discards_one_conversion() {
        let sampler = sampler(&[999, 700]);
        sampler.initialize().unwrap();
        assert_eq!(
            sampler.converter().configured.get(),
            Some((Reference::Internal2V56, Prescaler::Div128))
        );
        assert_eq!(sampler.converter().conversions.get(), 1);
        assert_eq!(sampler.read_raw(3), Ok(700));
    }

    #[test]
    fn raw_read_waits_for_the_conversion() {
        let sampler = sampler(&[512]);
        assert_eq!(sampler.read_raw(3), Ok(512));
    }

    #[test]
    fn raw_read_rejects_missing_channel() {
        let sampler = sampler(&[512]);
        assert_eq!(sampler.read_raw(4), Err(Error::InvalidChannel(4)));
        assert_eq!(sampler.converter().conversions.get(), 0);
    }

    #[test]
    fn averaged_read_takes_exactly_n_samples_and_truncates() {
        let sampler = sampler(&[10, 11]);
        // (10 + 11 + 10) / 3 = 10.33
        assert_eq!(sampler.read_averaged(3, 3), Ok(10));
        assert_eq!(sampler.converter().conversions.get(), 3);
    }

    #[test]
    fn averaged_read_does_not_overflow_at_full_scale() {
        let sampler = sampler(&[u16::MAX]);
        assert_eq!(sampler.read_averaged(3, 255), Ok(u16::MAX));
    }

    #[test]
    fn averaged_read_needs_samples() {
        let sampler = sampler(&[10]);
        assert_eq!(sampler.read_averaged(3, 0), Err(Error::NoSamples));
    }

    #[test]
    fn poll_limit_turns_a_stuck_conversion_into_an_error() {
        let sampler =
            Sampler::new(StuckConverter, Reference::Vcc, Prescaler::Div2).with_poll_limit(50);
        assert_eq!(sampler.read_raw(0), Err(Error::ConversionTimeout));
    }

    #[test]
    fn poll_limit_allows_slow_conversions() {
        let sampler = sampler(&[42]).with_poll_limit(3);
        assert_eq!(sampler.read_raw(1), Ok(42));
    }
}
