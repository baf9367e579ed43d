//! Conversion of averaged samples into the numbers shown on the indicator.
//!
//! Both digits truncate toward zero, like an integer cast: 3.65 V is shown as
//! 3 and 6. Voltages just below a tenth (3.6499) show the lower digit.

pub fn to_volts(raw_average: u16, scale: f32) -> f32 {
    raw_average as f32 * scale
}

pub fn whole_volts(voltage: f32) -> i32 {
    voltage as i32
}

/// First decimal digit of the voltage
pub fn decimal_digit(voltage: f32) -> i32 {
    let whole = whole_volts(voltage);
    (voltage * 10.0 - whole as f32 * 10.0) as i32
}

/// Number of blinks for a digit. Nothing is blinked for negative values.
pub fn blink_count(digit: i32) -> u8 {
    if digit <= 0 {
        0
    } else if digit > u8::MAX as i32 {
        u8::MAX
    } else {
        digit as u8
    }
}
