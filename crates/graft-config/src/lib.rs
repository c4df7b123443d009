//! Shared configuration for the graft toolchain.
//!
//! [`Config`] is assembled by `ortho_config` from, in increasing order of
//! precedence: built-in defaults, a configuration file (`--config-path` or
//! `GRAFT_CONFIG_PATH`), `GRAFT_*` environment variables, and command-line
//! flags.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CAPTURE_MARKER, DEFAULT_LOG_FILTER, default_capture_marker, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration for graft binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GRAFT")]
pub struct Config {
    /// Tracing filter expression (for example `graft_syntax=debug`).
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Prefix marking capture identifiers in rewrite snippets.
    #[serde(default = "default_capture_marker")]
    #[ortho_config(default = default_capture_marker())]
    pub capture_marker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            capture_marker: default_capture_marker(),
        }
    }
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the capture marker used when preparing rules.
    #[must_use]
    pub fn capture_marker(&self) -> &str {
        &self.capture_marker
    }
}
