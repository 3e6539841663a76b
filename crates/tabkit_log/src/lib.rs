//! `tabkit_log` v1:
//! Subscriber setup for binaries and tests embedding the export crates.
//!
//! Library crates only emit `tracing` events; they never install a subscriber.
//!
//! Levels used by the export crates:
//! - `warn`  : unsupported field values, sanitized sheet names
//! - `info`  : one line per finished export or file write
//! - `debug` : phase progress and render summaries

use std::io;

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Crates whose events follow the configured level.
pub const TUP_TABKIT_CRATES: [&str; 5] = [
    "tabkit_export",
    "tabkit_io_csv",
    "tabkit_io_docx",
    "tabkit_io_fs",
    "tabkit_io_xlsx",
];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumLogFormat {
    /// Multi-field human-readable lines.
    #[default]
    Full,
    /// Compact single-line format.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLogConfig {
    /// Level for the export crates.
    pub level: Level,
    /// Output format.
    pub format: EnumLogFormat,
    /// Include timestamps.
    pub if_with_timestamps: bool,
    /// Include the event target (module path).
    pub if_with_target: bool,
    /// Use ANSI colors.
    pub if_with_ansi: bool,
}

impl Default for SpecLogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: EnumLogFormat::default(),
            if_with_timestamps: false,
            if_with_target: false,
            if_with_ansi: true,
        }
    }
}

impl SpecLogConfig {
    /// Map a `-v` count to a level: 0 info, 1 debug, 2+ trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Return a copy with `format` set.
    #[must_use]
    pub fn with_format(mut self, format: EnumLogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG`, when set, replaces the configured filter.
pub fn init_logging(config: &SpecLogConfig) -> Result<(), TryInitError> {
    init_logging_with_writer(config, io::stderr)
}

/// Install the global subscriber with a custom writer.
pub fn init_logging_with_writer<W>(config: &SpecLogConfig, writer: W) -> Result<(), TryInitError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(derive_filter_directives(config.level)));

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.if_with_ansi)
        .with_target(config.if_with_target);

    match (config.format, config.if_with_timestamps) {
        (EnumLogFormat::Full, true) => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init(),
        (EnumLogFormat::Full, false) => tracing_subscriber::registry()
            .with(filter)
            .with(layer.without_time())
            .try_init(),
        (EnumLogFormat::Compact, true) => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init(),
        (EnumLogFormat::Compact, false) => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact().without_time())
            .try_init(),
    }
}

/// Filter directives: `warn` for other crates, `level` for the export crates.
pub fn derive_filter_directives(level: Level) -> String {
    let c_level = level.as_str().to_lowercase();
    let mut l_directives = vec!["warn".to_string()];
    l_directives.extend(
        TUP_TABKIT_CRATES
            .iter()
            .map(|c_crate| format!("{c_crate}={c_level}")),
    );
    l_directives.join(",")
}
