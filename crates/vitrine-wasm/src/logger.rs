//! `log` backend that writes to the browser console.
//!
//! The core crate logs through the `log` facade; in the browser those
//! records go to `console.debug` / `console.info` / `console.warn` /
//! `console.error` depending on their level.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}", record.target(), record.args())
}

/// Route `log` records at or above `level` to the console.
///
/// Safe to call more than once; only the level changes after the first call.
pub fn install(level: LevelFilter) {
    // Err only means a logger is already set
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Parse a level name as given from JavaScript. Unknown names map to `Info`.
pub(crate) fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
