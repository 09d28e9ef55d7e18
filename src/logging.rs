//! Structured logging for cachewrap
//!
//! Logs go to stderr so `cachewrap env` output can be `eval`ed directly.
//! Events carry structured fields:
//!
//! - `stage`: pipeline stage ("configure", "build", "install", "post_install", "finalize")
//! - `operation`: what is being done ("run", "probe", "symlink", "sanity_check")
//! - `status`: the result ("start", "success", "miss", "error", "dry_run")
//! - `command` / `path`: the command line or filesystem path involved
//!
//! # Examples
//!
//! ```rust
//! use tracing::info;
//!
//! info!(
//!     operation = "symlink",
//!     status = "success",
//!     path = "/opt/ccache/bin/gcc",
//!     "wrapped compiler"
//! );
//! ```

use std::{fmt as std_fmt, io};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Formatter tagging every line with "(cachewrap)" instead of the module path
struct CachewrapFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for CachewrapFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m", // Red
                tracing::Level::WARN => "\x1b[33m",  // Yellow
                tracing::Level::INFO => "\x1b[32m",  // Green
                tracing::Level::DEBUG => "\x1b[34m", // Blue
                tracing::Level::TRACE => "\x1b[35m", // Magenta
            };
            write!(writer, "{}{:5}(cachewrap)\x1b[0m: ", level_style, meta.level())?;
        } else {
            write!(writer, "{:5}(cachewrap): ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format (default for interactive use)
    Pretty,
    /// No colors (for CI and build logs)
    Compact,
    /// JSON format (for log aggregation systems)
    Json,
}

impl LogFormat {
    /// Parse from environment variable (CACHEWRAP_LOG_FORMAT)
    pub fn from_env() -> Self {
        match std::env::var("CACHEWRAP_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ => {
                if std::env::var("CI").is_ok() {
                    Self::Compact
                } else {
                    Self::Pretty
                }
            }
        }
    }

    /// Only the pretty format colours its output
    pub fn uses_ansi(self) -> bool {
        self == Self::Pretty
    }
}

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "debug", "info", "warn")
/// - `CACHEWRAP_LOG_FORMAT`: Set format ("pretty", "compact", "json")
/// - `CI`: If set, defaults to compact format
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = LogFormat::from_env();
    let registry = tracing_subscriber::registry().with(filter);

    if format == LogFormat::Json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(false)
                    .with_writer(io::stderr)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .event_format(CachewrapFormatter {
                        with_ansi: format.uses_ansi(),
                    })
                    .with_writer(io::stderr),
            )
            .init();
    }
}
