use crate::config::types::SettingsFile;
use crate::error::{Result, RolloutError};
use std::path::Path;

/// Parse a settings file from the given path.
///
/// Relative directories in the file are resolved against its parent directory.
pub fn parse_settings_file(path: &Path) -> Result<SettingsFile> {
	let content =
		std::fs::read_to_string(path).map_err(|source| RolloutError::SettingsReadError {
			path: path.to_path_buf(),
			source,
		})?;

	let mut settings = parse_settings_str(&content, path)?;
	if let Some(base) = path.parent() {
		settings.resolve_relative(base);
	}
	Ok(settings)
}

/// Parse settings from a string (useful for testing).
pub fn parse_settings_str(content: &str, path: &Path) -> Result<SettingsFile> {
	toml::from_str(content).map_err(|source| RolloutError::SettingsParseError {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_settings() {
		let settings = parse_settings_str("", Path::new("test.toml")).unwrap();

		assert!(!settings.root);
		assert!(settings.user_config_disable_env_var.is_none());
		assert!(settings.meta_dir.is_none());
		assert!(settings.application_template.is_none());
	}

	#[test]
	fn test_parse_full_settings() {
		let content = r#"
root = true
user-config-disable-env-var = "CI"
meta-dir = "deploy/meta"
release-dir = "/srv/release"
templates-dir = "templates"
application-template = "app.yaml.j2"
subscription-template = "sub.yaml.j2"
"#;
		let settings = parse_settings_str(content, Path::new("test.toml")).unwrap();

		assert!(settings.root);
		assert_eq!(settings.user_config_disable_env_var.as_deref(), Some("CI"));
		assert_eq!(settings.meta_dir, Some(PathBuf::from("deploy/meta")));
		assert_eq!(settings.release_dir, Some(PathBuf::from("/srv/release")));
		assert_eq!(settings.templates_dir, Some(vec![PathBuf::from("templates")]));
		assert_eq!(settings.application_template.as_deref(), Some("app.yaml.j2"));
		assert_eq!(settings.subscription_template.as_deref(), Some("sub.yaml.j2"));
	}

	#[test]
	fn test_parse_rejects_unknown_keys() {
		let result = parse_settings_str("meta = \"x\"", Path::new("test.toml"));
		assert!(matches!(
			result,
			Err(RolloutError::SettingsParseError { .. })
		));
	}

	#[test]
	fn test_parse_file_resolves_relative_dirs() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join(".rollout.toml");
		std::fs::write(&path, "meta-dir = \"meta\"\nrelease-dir = \"/abs/release\"\n").unwrap();

		let settings = parse_settings_file(&path).unwrap();

		assert_eq!(settings.meta_dir, Some(temp_dir.path().join("meta")));
		assert_eq!(settings.release_dir, Some(PathBuf::from("/abs/release")));
	}

	#[test]
	fn test_parse_templates_dir_list() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join(".rollout.toml");
		std::fs::write(&path, "templates-dir = [\"local\", \"/shared/templates\"]\n").unwrap();

		let settings = parse_settings_file(&path).unwrap();

		assert_eq!(
			settings.templates_dir,
			Some(vec![
				temp_dir.path().join("local"),
				PathBuf::from("/shared/templates")
			])
		);
	}
}
