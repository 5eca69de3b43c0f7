//! Structured logging with component context.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use cart_core::config::LogConfig;
use serde::Serialize;

use crate::sink::{default_sink, LogSink};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Unknown level or format name in the log configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown log setting: {0}")]
pub struct ParseLogSettingError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ParseLogSettingError(other.to_string())),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

impl FromStr for LogFormat {
    type Err = ParseLogSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            other => Err(ParseLogSettingError(other.to_string())),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Emitting component.
    pub component: String,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Milliseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}: {}", self.level, self.component, self.message);

        if let Some(elapsed) = self.elapsed_ms {
            s.push_str(&format!(" ({}ms)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

/// Structured logger with component context.
///
/// Clones share the sink.
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
    start_ms: f64,
    min_level: LogLevel,
    format: LogFormat,
    sink: Rc<dyn LogSink>,
}

impl fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("component", &self.component)
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl StructuredLogger {
    /// Create a new logger writing to the platform's default sink.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            start_ms: now_ms(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            sink: default_sink(),
        }
    }

    /// Create a logger from configuration. Unknown names fall back to the
    /// defaults (info, json).
    pub fn from_config(component: impl Into<String>, config: &LogConfig) -> Self {
        Self::new(component)
            .with_min_level(config.level.parse().unwrap_or(LogLevel::Info))
            .with_format(config.format.parse().unwrap_or_default())
    }

    /// Set the output sink.
    pub fn with_sink(mut self, sink: Rc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Derive a logger for a sub-component sharing sink and settings.
    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.component = format!("{}.{}", self.component, component.into());
        child
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        let elapsed = (now_ms() - self.start_ms).max(0.0);
        let entry = LogEntry {
            level,
            message: message.to_string(),
            component: self.component.clone(),
            fields,
            elapsed_ms: Some(elapsed as u64),
        };

        let output = match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        };

        self.sink.emit(&entry, &output);
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }

    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building an error log entry.
    pub fn error_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error, message)
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: std::time::Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn logger_with_memory() -> (StructuredLogger, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::new());
        let logger = StructuredLogger::new("cart").with_sink(sink.clone());
        (logger, sink)
    }

    #[test]
    fn test_level_filtering() {
        let (logger, sink) = logger_with_memory();
        let logger = logger.with_min_level(LogLevel::Warn);

        logger.info("ignored");
        logger.warn("kept");
        logger.error("kept too");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[1].message, "kept too");
    }

    #[test]
    fn test_builder_fields() {
        let (logger, sink) = logger_with_memory();

        logger
            .error_builder("add failed")
            .field("item_id", "42")
            .field_i64("status", 404)
            .field_bool("busy", false)
            .emit();

        let entry = &sink.entries()[0];
        assert_eq!(entry.field("item_id"), Some(&serde_json::json!("42")));
        assert_eq!(entry.field("status"), Some(&serde_json::json!(404)));
        assert_eq!(entry.field("busy"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn test_json_rendering() {
        let (logger, sink) = logger_with_memory();
        logger.info_builder("badge updated").field_i64("total_items", 3).emit();

        let rendered = &sink.lines()[0];
        let value: serde_json::Value = serde_json::from_str(rendered).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["component"], "cart");
        assert_eq!(value["total_items"], 3);
    }

    #[test]
    fn test_human_rendering() {
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "skipping control".to_string(),
            component: "cart.init".to_string(),
            fields: BTreeMap::from([("reason".to_string(), serde_json::json!("missing id"))]),
            elapsed_ms: Some(12),
        };
        assert_eq!(
            entry.to_human(),
            r#"[WARN] cart.init: skipping control (12ms) | reason="missing id""#
        );
    }

    #[test]
    fn test_child_component() {
        let (logger, sink) = logger_with_memory();
        logger.child("badge").info("hello");
        assert_eq!(sink.entries()[0].component, "cart.badge");
    }

    #[test]
    fn test_from_config() {
        let config = LogConfig {
            level: "DEBUG".to_string(),
            format: "human".to_string(),
        };
        let sink = Rc::new(MemorySink::new());
        let logger = StructuredLogger::from_config("cart", &config).with_sink(sink.clone());

        logger.debug("visible");
        assert_eq!(sink.entries().len(), 1);
        assert!(sink.lines()[0].starts_with("[DEBUG] cart: visible"));
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }
}
