use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

/// Writes log records to the J-Link RTT channel, dropping them when no probe reads
struct RttLogger;

static LOGGER: RttLogger = RttLogger;

impl Log for RttLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut output = jlink_rtt::NonBlockingOutput::new();
            let _ = writeln!(output, "{} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) {
    // SAFETY: called once from main before anything logs, there is no other
    // thread of execution on this core
    unsafe {
        let _ = log::set_logger_racy(&LOGGER);
        log::set_max_level_racy(level);
    }
}
