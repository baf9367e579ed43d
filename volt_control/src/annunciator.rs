//! Encodes voltages as blink patterns on the indicator.
//!
//! Announcements are queued as segments and replayed one indicator edge at a
//! time: [Annunciator::advance] performs the next edge and returns how long
//! to wait before calling it again, so the event loop never busy-waits.

use heapless::Deque;

use crate::bsp::indicator::Indicator;
use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::reading::{blink_count, decimal_digit, whole_volts};

pub const MAX_SEGMENTS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Segment {
    Blinks(u8),
    Pause(u32),
}

pub struct Annunciator {
    segments: Deque<Segment, MAX_SEGMENTS>,
    lit: bool,
    on_ms: u32,
    off_ms: u32,
    digit_gap_ms: u32,
    alert_pause_ms: u32,
}

impl Annunciator {
    pub fn new(config: &MonitorConfig) -> Self {
        Annunciator {
            segments: Deque::new(),
            lit: false,
            on_ms: config.blink_on_ms,
            off_ms: config.blink_off_ms,
            digit_gap_ms: config.digit_gap_ms,
            alert_pause_ms: config.alert_pause_ms,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lit || !self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// `count` blinks, each on for a short and off for a longer time
    pub fn emit_pattern(&mut self, count: u8) -> Result<()> {
        self.push(Segment::Blinks(count))
    }

    pub fn pause(&mut self, ms: u32) -> Result<()> {
        self.push(Segment::Pause(ms))
    }

    /// Whole volts, a gap, then the first decimal digit
    pub fn report_voltage(&mut self, voltage: f32) -> Result<()> {
        self.emit_pattern(blink_count(whole_volts(voltage)))?;
        self.pause(self.digit_gap_ms)?;
        self.emit_pattern(blink_count(decimal_digit(voltage)))
    }

    pub fn low_voltage_alert(&mut self) -> Result<()> {
        self.emit_pattern(1)?;
        self.pause(self.alert_pause_ms)
    }

    /// Drives the next edge. Returns the delay until the following call,
    /// or None once everything queued has been shown.
    pub fn advance(&mut self, indicator: &dyn Indicator) -> Option<u32> {
        loop {
            let segment = self.segments.front_mut()?;
            match segment {
                Segment::Blinks(0) => {
                    self.segments.pop_front();
                }
                Segment::Blinks(remaining) => {
                    if !self.lit {
                        indicator.set_active(true);
                        self.lit = true;
                        return Some(self.on_ms);
                    }
                    indicator.set_active(false);
                    self.lit = false;
                    *remaining -= 1;
                    if *remaining == 0 {
                        self.segments.pop_front();
                    }
                    return Some(self.off_ms);
                }
                Segment::Pause(ms) => {
                    let ms = *ms;
                    self.segments.pop_front();
                    return Some(ms);
                }
            }
        }
    }

    fn push(&mut self, segment: Segment) -> Result<()> {
        self.segments
            .push_back(segment)
            .map_err(|_| Error::QueueFull)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingIndicator {
        edges: RefCell<Vec<bool>>,
    }

    impl Indicator for RecordingIndicator {
        fn set_active(&self, active: bool) {
            self.edges.borrow_mut().push(active);
        }

        fn is_active(&self) -> bool {
            self.edges.borrow().last().copied().unwrap_or(false)
        }
    }

    /// Plays everything queued, returning the delays between edges
    fn play(annunciator: &mut Annunciator, indicator: &RecordingIndicator) -> Vec<u32> {
        let mut delays = vec![];
        while let Some(ms) = annunciator.advance(indicator) {
            delays.push(ms);
        }
        delays
    }

    #[test]
    fn pattern_is_short_on_long_off() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        let indicator = RecordingIndicator::default();
        annunciator.emit_pattern(3).unwrap();

        let delays = play(&mut annunciator, &indicator);

        assert_eq!(delays, vec![100, 200, 100, 200, 100, 200]);
        assert_eq!(
            *indicator.edges.borrow(),
            vec![true, false, true, false, true, false]
        );
        assert!(!indicator.is_active());
        assert!(!annunciator.is_playing());
    }

    #[test]
    fn zero_blinks_take_no_time() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        let indicator = RecordingIndicator::default();
        annunciator.emit_pattern(0).unwrap();

        assert_eq!(annunciator.advance(&indicator), None);
        assert!(indicator.edges.borrow().is_empty());
    }

    #[test]
    fn report_shows_whole_volts_gap_and_decimal() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        annunciator.report_voltage(3.65).unwrap();
        let segments: Vec<Segment> = annunciator.segments().copied().collect();
        assert_eq!(
            segments,
            vec![Segment::Blinks(3), Segment::Pause(1000), Segment::Blinks(6)]
        );
    }

    #[test]
    fn report_below_one_volt_skips_the_whole_volts() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        let indicator = RecordingIndicator::default();
        annunciator.report_voltage(0.45).unwrap();

        let delays = play(&mut annunciator, &indicator);

        // gap first, then four blinks
        assert_eq!(delays[0], 1000);
        assert_eq!(indicator.edges.borrow().len(), 8);
    }

    #[test]
    fn alert_is_one_blink_and_a_pause() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        let indicator = RecordingIndicator::default();
        annunciator.low_voltage_alert().unwrap();

        assert_eq!(play(&mut annunciator, &indicator), vec![100, 200, 500]);
    }

    #[test]
    fn queue_overflow_is_reported() {
        let mut annunciator = Annunciator::new(&MonitorConfig::DEFAULT);
        for _ in 0..MAX_SEGMENTS {
            annunciator.emit_pattern(1).unwrap();
        }
        assert_eq!(annunciator.emit_pattern(1), Err(Error::QueueFull));
    }
}
