pub mod indicator {
    /// Single indicator output (LED). Only two states, no brightness control.
    pub trait Indicator {
        fn set_active(&self, active: bool);
        fn is_active(&self) -> bool;
    }
}

pub mod adc {
    use crate::error::SensorError;

    /// Reference voltage selected for conversions
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Reference {
        Vcc,
        Internal1V1,
        Internal2V56,
    }

    /// Divider between the system clock and the conversion clock
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Prescaler {
        Div2,
        Div4,
        Div8,
        Div16,
        Div32,
        Div64,
        Div128,
    }

    impl Prescaler {
        pub fn divider(self) -> u32 {
            match self {
                Prescaler::Div2 => 2,
                Prescaler::Div4 => 4,
                Prescaler::Div8 => 8,
                Prescaler::Div16 => 16,
                Prescaler::Div32 => 32,
                Prescaler::Div64 => 64,
                Prescaler::Div128 => 128,
            }
        }
    }

    /// Analog to digital converter.
    ///
    /// [convert] starts a conversion on the first call and returns
    /// [nb::Error::WouldBlock] until the result is available.
    pub trait Converter {
        /// Selects the reference and the clock divider, then enables the converter
        fn configure(&self, reference: Reference, prescaler: Prescaler);
        /// Number of input lines, valid channels are `0..channels()`
        fn channels(&self) -> u8;
        fn convert(&self, channel: u8) -> nb::Result<u16, SensorError>;
    }
}
