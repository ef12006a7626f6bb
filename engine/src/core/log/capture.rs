//! Thread-local log capture for tests.
//!
//! The test harness runs every test on its own thread, so records logged by a test are only
//! visible to that test.

use std::{cell::RefCell, sync::Once};

use log::{Level, LevelFilter, Metadata, Record};

use super::LogMessage;

thread_local! {
    static CAPTURED: RefCell<Vec<LogMessage>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| captured.borrow_mut().push(LogMessage::from_record(record)));
    }

    fn flush(&self) {}
}

static INSTALL: Once = Once::new();
static LOGGER: CaptureLogger = CaptureLogger;

/// Install the capturing logger (once per process) and clear this thread's records.
pub(crate) fn start() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Messages captured on this thread at exactly `level`.
pub(crate) fn messages(level: Level) -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow()
            .iter()
            .filter(|m| m.level == level)
            .map(|m| m.message.clone())
            .collect()
    })
}
