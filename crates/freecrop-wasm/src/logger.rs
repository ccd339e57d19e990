//! `log` records forwarded to the browser console.
//!
//! The core crate logs through the `log` facade. Installing [`ConsoleLogger`]
//! routes those records to `console.error`, `console.warn`, `console.info`
//! or `console.debug` by level.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Console sink for the `log` facade.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Later calls only change the level.
pub(crate) fn install(level: LevelFilter) {
    // A logger may already be installed; keep it and just adjust the level.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Parse a level name as accepted by `set_log_level`.
pub(crate) fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn format_record(record: &Record<'_>) -> String {
    format!("[{}] {}", record.target(), record.args())
}
