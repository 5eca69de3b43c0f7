//! Log output sinks.

use std::cell::RefCell;
use std::rc::Rc;

use crate::logging::{LogEntry, LogLevel};

/// Destination for rendered log entries.
pub trait LogSink {
    /// Write one entry. `rendered` is the entry in the logger's format.
    fn emit(&self, entry: &LogEntry, rendered: &str);
}

/// Forwards entries to `tracing` events under the `cart_widget` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry, rendered: &str) {
        let component = entry.component.as_str();
        match entry.level {
            LogLevel::Trace => tracing::trace!(target: "cart_widget", component, "{}", rendered),
            LogLevel::Debug => tracing::debug!(target: "cart_widget", component, "{}", rendered),
            LogLevel::Info => tracing::info!(target: "cart_widget", component, "{}", rendered),
            LogLevel::Warn => tracing::warn!(target: "cart_widget", component, "{}", rendered),
            LogLevel::Error => tracing::error!(target: "cart_widget", component, "{}", rendered),
        }
    }
}

/// Writes entries to the browser console, picking the method by level.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

#[cfg(target_arch = "wasm32")]
impl LogSink for ConsoleSink {
    fn emit(&self, entry: &LogEntry, rendered: &str) {
        let line = wasm_bindgen::JsValue::from_str(rendered);
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&line),
            LogLevel::Info => web_sys::console::info_1(&line),
            LogLevel::Warn => web_sys::console::warn_1(&line),
            LogLevel::Error => web_sys::console::error_1(&line),
        }
    }
}

/// Keeps entries in memory (for testing).
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<(LogEntry, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured entries, in order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().iter().map(|(e, _)| e.clone()).collect()
    }

    /// Captured rendered lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Captured entries at a given level.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|(e, _)| e.level == level)
            .map(|(e, _)| e.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &LogEntry, rendered: &str) {
        self.entries
            .borrow_mut()
            .push((entry.clone(), rendered.to_string()));
    }
}

/// The platform's default sink.
#[cfg(target_arch = "wasm32")]
pub fn default_sink() -> Rc<dyn LogSink> {
    Rc::new(ConsoleSink)
}

/// The platform's default sink.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_sink() -> Rc<dyn LogSink> {
    Rc::new(TracingSink)
}
