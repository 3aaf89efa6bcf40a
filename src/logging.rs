use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the number of `-v` flags to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	}
}

/// Initialize a tracing subscriber that writes to stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise the level follows the
/// verbosity. Stdout is left alone so `get` output stays machine-readable.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let fmt_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.with_level(true)
		.compact();

	let filter_layer = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(default_directive(verbosity)))?;

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(fmt_layer)
		.try_init()?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing::{debug, info, warn};

	#[test]
	fn test_default_directive() {
		assert_eq!(default_directive(0), "warn");
		assert_eq!(default_directive(1), "info");
		assert_eq!(default_directive(2), "debug");
		assert_eq!(default_directive(7), "debug");
	}

	#[test]
	fn test_logging_init() {
		// Only one subscriber per process; a second init is allowed to fail
		let _ = init(2);

		debug!("debug message");
		info!("info message");
		warn!("warning message");
	}
}
