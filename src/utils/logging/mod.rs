//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"

pub mod error;

use lazy_static::lazy_static;
use regex::Regex;
use std::{env, fs::create_dir_all, path::Path};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

/// Base name of the daily rolled log file.
pub const LOG_FILE_PREFIX: &str = "adapter.log";

lazy_static! {
	static ref ANSI_ESCAPE: Regex =
		Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ANSI escape pattern is valid");
}

/// Formatter that strips ANSI escape codes so file logs stay greppable.
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

/// Maps a `LOG_LEVEL` value onto a tracing level, falling back to `INFO`.
pub fn parse_log_level(level: &str) -> tracing::Level {
	match level.to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	}
}

/// Normalizes a log directory so it always ends with exactly one `/`.
pub fn normalize_log_dir(dir: &str) -> String {
	format!("{}/", dir.trim_end_matches('/'))
}

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Sets up logging by reading configuration from environment variables.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
	let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
	let level_filter = parse_log_level(&log_level);

	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level_filter.to_string()));

	if log_mode.eq_ignore_ascii_case("file") {
		let log_dir =
			normalize_log_dir(&env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string()));
		create_dir_all(Path::new(&log_dir))?;

		let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);

		subscriber
			.with(
				fmt::layer()
					.event_format(StripAnsiFormatter {
						inner: create_log_format(false),
					})
					.with_writer(file_appender)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;

		info!("Logging to file in {} (level: {})", log_dir, log_level);
	} else {
		subscriber
			.with(
				fmt::layer()
					.event_format(create_log_format(true))
					.fmt_fields(fmt::format::PrettyFields::new())
					.with_writer(std::io::stderr),
			)
			.try_init()?;
	}

	info!("Logging is successfully configured (mode: {})", log_mode);
	Ok(())
}
