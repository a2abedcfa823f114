//! Logging for the container and its tests.
//!
//! Every registry operation and resolution decision is emitted as a
//! `tracing` event under the `autosub_core` target. Nothing is printed
//! unless a subscriber is installed, which [`LogConfig::init`] does:
//!
//! ```no_run
//! use autosub_core::logging::*;
//!
//! let _guard = LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Compact)
//!     .init()
//!     .unwrap();
//!
//! debug!("container tracing enabled");
//! ```
//!
//! The default configuration writes through the libtest capture writer, so
//! output only shows up for failing tests. `RUST_LOG` overrides the level
//! unless an explicit filter is set with [`LogConfig::with_env_filter`].

use crate::{Error, Result};
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, TestWriter, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use tracing::{debug, error, info, trace, warn};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive for `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Simple, human-readable lines
    Plain,
    /// Multi-line, colored output for local debugging
    Pretty,
    Compact,
    /// Structured, machine-readable
    Json,
}

/// Output destination for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// libtest's captured output (default)
    TestWriter,
    Stdout,
    Stderr,
    /// Append to a single file
    File(String),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include target (module path)
    pub targets: bool,
    /// Custom filter directives, overriding `level` and `RUST_LOG`.
    /// Invalid directives make `init` fail.
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Plain,
            output: LogOutput::TestWriter,
            targets: true,
            env_filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    /// Set custom filter directives such as `"autosub_core=trace"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn build_filter(&self) -> Result<EnvFilter> {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).map_err(|e| {
                Error::Config(format!("Invalid log filter '{}': {}", directives, e))
            }),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))),
        }
    }

    /// Install the global subscriber.
    ///
    /// Safe to call from every test: when a subscriber is already installed
    /// the call is a no-op. Non-blocking outputs return a guard that flushes
    /// pending events when dropped.
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let filter = self.build_filter()?;

        let (writer, guard) = match &self.output {
            LogOutput::TestWriter => (BoxMakeWriter::new(TestWriter::new()), None),
            LogOutput::Stdout => {
                let (non_blocking, guard) = tracing_appender::non_blocking(io::stdout());
                (BoxMakeWriter::new(non_blocking), Some(guard))
            }
            LogOutput::Stderr => {
                let (non_blocking, guard) = tracing_appender::non_blocking(io::stderr());
                (BoxMakeWriter::new(non_blocking), Some(guard))
            }
            LogOutput::File(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        Error::Config(format!("Failed to open log file '{}': {}", path, e))
                    })?;
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard))
            }
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.format {
            LogFormat::Plain => registry
                .with(fmt::layer().with_writer(writer).with_target(self.targets))
                .try_init(),
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(writer).with_target(self.targets))
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_writer(writer).with_target(self.targets))
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(writer).with_target(self.targets))
                .try_init(),
        };

        if installed.is_err() {
            trace!("Global subscriber already installed");
        }

        Ok(guard)
    }
}
