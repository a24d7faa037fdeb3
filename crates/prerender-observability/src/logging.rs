//! Structured logging with request context.

use std::fmt;
use std::time::{Duration, Instant};

use prerender_core::RequestId;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
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

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Logging section of the server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level, unless `RUST_LOG` overrides it.
    #[serde(default)]
    pub level: LogLevel,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Create a logging config.
    pub fn new(level: LogLevel, format: LogFormat) -> Self {
        Self { level, format }
    }
}

/// Error raised when the global subscriber cannot be installed.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

/// Install the process-wide `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Human => builder.with_target(false).try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

/// Request-scoped logger.
///
/// Every entry carries the request id and the time elapsed since the
/// logger was created, and is emitted as a `tracing` event.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    request_id: RequestId,
    route: Option<String>,
    start_time: Instant,
}

impl RequestLogger {
    /// Create a new logger with request context.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            start_time: Instant::now(),
        }
    }

    /// Set the route path.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message, serde_json::Map::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message, serde_json::Map::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message, serde_json::Map::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message, serde_json::Map::new());
    }

    /// Get the request ID.
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) {
        let request_id = self.request_id.as_str();
        let route = self.route.as_deref().unwrap_or("");
        let elapsed_us = self.elapsed_us();
        let fields = serde_json::Value::Object(fields);

        match level {
            LogLevel::Trace => tracing::trace!(request_id, route, elapsed_us, %fields, "{message}"),
            LogLevel::Debug => tracing::debug!(request_id, route, elapsed_us, %fields, "{message}"),
            LogLevel::Info => tracing::info!(request_id, route, elapsed_us, %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(request_id, route, elapsed_us, %fields, "{message}"),
            LogLevel::Error => tracing::error!(request_id, route, elapsed_us, %fields, "{message}"),
        }
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a RequestLogger,
    level: LogLevel,
    message: String,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a RequestLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a duration field (in milliseconds).
    pub fn duration_ms(mut self, key: &str, duration: Duration) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(duration.as_millis() as u64));
        self
    }

    /// Collected fields, for inspection before emitting.
    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.emit(self.level, &self.message, self.fields);
    }
}

impl RequestLogger {
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

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}
