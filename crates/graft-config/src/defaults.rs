//! Built-in configuration defaults.

use crate::logging::LogFormat;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default prefix marking capture identifiers in rewrite snippets.
pub const DEFAULT_CAPTURE_MARKER: &str = "X";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Owned capture marker used where allocation is required (e.g. serde).
#[must_use]
pub fn default_capture_marker() -> String {
    DEFAULT_CAPTURE_MARKER.to_owned()
}
