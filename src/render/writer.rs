use crate::error::{Result, RolloutError};
use std::path::Path;

/// Write rendered text to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
	let wrap = |source| RolloutError::WriteError {
		path: path.to_path_buf(),
		source,
	};

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent).map_err(wrap)?;
	}
	std::fs::write(path, text).map_err(wrap)?;

	tracing::info!(path = %path.display(), bytes = text.len(), "wrote manifest");
	Ok(())
}
