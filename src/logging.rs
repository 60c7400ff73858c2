// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Logging initialization.
//!
//! Plans and backends emit `tracing` events under these targets:
//!
//! | Target | Level | Events |
//! |--------|-------|--------|
//! | [`PLAN_TARGET`] | `debug` | plan created, destroyed, stream bound |
//! | [`PLAN_TARGET`] | `trace` | every execution |
//! | [`PLAN_TARGET`] | `warn` | a native destroy failed during drop |
//! | [`HOST_TARGET`] | `debug` | host backend rejected a short buffer |
//! | [`CUDA_TARGET`] | `debug` | context opened, thread binding failed |
//!
//! The host backend also warns once per process that it is in use.
//!
//! [`init_logging`] installs a `tracing-subscriber` formatter for binaries,
//! demos and benchmarks that have no subscriber of their own. The filter
//! combines a global level with a separate level for this crate's targets;
//! `RUST_LOG`, when set, replaces both.

use std::sync::Once;

/// Target of plan lifecycle and execution events.
pub const PLAN_TARGET: &str = "cufft_plan::plan";

/// Target of host backend diagnostics.
pub const HOST_TARGET: &str = "cufft_plan::host";

/// Target of CUDA backend diagnostics.
pub const CUDA_TARGET: &str = "cufft_plan::cuda";

/// Verbosity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and above.
    #[default]
    Warn,
    /// Informational messages and above.
    Info,
    /// Plan lifecycle events and above.
    Debug,
    /// Everything, including one event per execution.
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Subscriber settings for [`init_logging`].
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Level for every target outside this crate.
    pub level: LogLevel,
    /// Level for this crate's targets, `None` to follow [`LogConfig::level`].
    pub crate_level: Option<LogLevel>,
    /// Prefix events with a timestamp.
    pub timestamps: bool,
    /// Print the event target.
    pub show_target: bool,
    /// Print source file and line.
    pub file_line: bool,
    /// Colorize output.
    pub ansi: bool,
}

impl LogConfig {
    /// Warnings only, plain output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the level for this crate's targets only.
    #[must_use]
    pub fn with_crate_level(mut self, level: LogLevel) -> Self {
        self.crate_level = Some(level);
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.timestamps = enable;
        self
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.ansi = enable;
        self
    }

    /// Plan lifecycle visible, with targets and source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Info,
            crate_level: Some(LogLevel::Debug),
            timestamps: true,
            show_target: true,
            file_line: true,
            ansi: true,
        }
    }

    /// Info and above, uncolored, for log ingestion.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            crate_level: None,
            timestamps: true,
            show_target: false,
            file_line: false,
            ansi: false,
        }
    }

    /// Warnings only, undecorated, for test harness capture.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            level: LogLevel::Warn,
            ..Self::default()
        }
    }

    /// `EnvFilter` directives equivalent to this configuration.
    ///
    /// ```rust
    /// use cufft_plan::{LogConfig, LogLevel};
    ///
    /// let config = LogConfig::new().with_crate_level(LogLevel::Trace);
    /// assert_eq!(config.directives(), "warn,cufft_plan=trace");
    /// ```
    #[must_use]
    pub fn directives(&self) -> String {
        match self.crate_level {
            Some(level) if level != self.level => {
                format!("{},cufft_plan={}", self.level.directive(), level.directive())
            }
            _ => self.level.directive().to_owned(),
        }
    }
}

static INIT_LOGGING: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops, and an existing
/// subscriber installed by the application is left in place.
///
/// ```rust
/// use cufft_plan::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::testing());
/// ```
pub fn init_logging(config: &LogConfig) {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.directives()));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.ansi)
            .with_target(config.show_target)
            .with_file(config.file_line)
            .with_line_number(config.file_line);

        let installed = if config.timestamps {
            builder.try_init().is_ok()
        } else {
            builder.without_time().try_init().is_ok()
        };
        if installed {
            tracing::debug!(target: PLAN_TARGET, filter = %config.directives(), "logging initialized");
        }
    });
}
