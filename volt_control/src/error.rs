//! Error types of the monitor.
//!
//! All variants are `Copy` so they can be logged and returned from the
//! event loop without allocation.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The channel does not address an input line of the converter.
    InvalidChannel(u8),
    /// An averaged read was requested with zero samples.
    NoSamples,
    /// The conversion did not complete within the configured poll limit.
    ConversionTimeout,
    /// The converter reported a fault.
    Converter(SensorError),
    /// A fixed-capacity queue has no free slot.
    QueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChannel(channel) => write!(f, "invalid channel {}", channel),
            Self::NoSamples => write!(f, "sample count must be positive"),
            Self::ConversionTimeout => write!(f, "conversion timed out"),
            Self::Converter(e) => write!(f, "converter: {}", e),
            Self::QueueFull => write!(f, "queue is full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The converter hardware rejected the conversion.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Converter(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
