use crate::config::parser::parse_settings_file;
use crate::config::types::{LoadedSettings, Overrides, Setting, Settings, Source};
use crate::error::{Result, RolloutError};
use crate::meta::Layout;
use crate::render::TemplateNames;
use std::path::{Path, PathBuf};

/// Settings file name looked up in each directory.
pub const SETTINGS_FILE_NAME: &str = ".rollout.toml";

/// Environment variable that, if truthy, always skips ~/.rollout.toml.
pub const SKIP_USER_CONFIG_ENV: &str = "ROLLOUT_SKIP_USER_CONFIG";

pub const DEFAULT_META_DIR: &str = "meta";
pub const DEFAULT_RELEASE_DIR: &str = "release";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_APPLICATION_TEMPLATE: &str = "application.yaml.j2";
pub const DEFAULT_SUBSCRIPTION_TEMPLATE: &str = "subscription.yaml.j2";

/// Discover and load all settings files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.rollout.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.rollout.toml (unless disabled)
///
/// Returns settings in cascade order (most specific first).
pub fn discover_settings(start_dir: &Path) -> Result<Vec<LoadedSettings>> {
	let mut loaded = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let path = dir.join(SETTINGS_FILE_NAME);
		if path.exists() {
			let settings = parse_settings_file(&path)?;
			tracing::debug!(path = %path.display(), "loaded settings file");
			let stop = settings.root;
			loaded.push(LoadedSettings { settings, path });
			if stop {
				break;
			}
		}
		current_dir = dir.parent();
	}

	if let Some(user_settings) = load_user_settings(&loaded)? {
		loaded.push(user_settings);
	}

	Ok(loaded)
}

/// Load the user's ~/.rollout.toml if it exists and isn't disabled.
fn load_user_settings(existing: &[LoadedSettings]) -> Result<Option<LoadedSettings>> {
	if is_env_truthy(SKIP_USER_CONFIG_ENV) {
		return Ok(None);
	}

	// Check if any settings file disables user lookup via env var
	for loaded in existing {
		if let Some(ref env_var) = loaded.settings.user_config_disable_env_var
			&& is_env_truthy(env_var)
		{
			return Ok(None);
		}
	}

	let path = user_settings_path()?;
	if !path.exists() || existing.iter().any(|l| l.path == path) {
		return Ok(None);
	}

	let settings = parse_settings_file(&path)?;
	Ok(Some(LoadedSettings { settings, path }))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Combine the command line, the settings cascade and built-in defaults.
///
/// For each field the command line wins, then the most specific settings
/// file that sets it, then the default.
pub fn resolve_settings(loaded: &[LoadedSettings], overrides: &Overrides) -> Settings {
	fn pick<T: Clone>(
		flag: &Option<T>,
		loaded: &[LoadedSettings],
		field: impl Fn(&LoadedSettings) -> Option<&T>,
		default: T,
	) -> Setting<T> {
		if let Some(value) = flag {
			return Setting {
				value: value.clone(),
				source: Source::CommandLine,
			};
		}
		loaded
			.iter()
			.find_map(|l| {
				field(l).map(|value| Setting {
					value: value.clone(),
					source: Source::File(l.path.clone()),
				})
			})
			.unwrap_or(Setting {
				value: default,
				source: Source::Default,
			})
	}

	Settings {
		meta_dir: pick(
			&overrides.meta_dir,
			loaded,
			|l| l.settings.meta_dir.as_ref(),
			PathBuf::from(DEFAULT_META_DIR),
		),
		release_dir: pick(
			&overrides.release_dir,
			loaded,
			|l| l.settings.release_dir.as_ref(),
			PathBuf::from(DEFAULT_RELEASE_DIR),
		),
		templates_dir: pick(
			&overrides.templates_dir,
			loaded,
			|l| l.settings.templates_dir.as_ref(),
			vec![PathBuf::from(DEFAULT_TEMPLATES_DIR)],
		),
		application_template: pick(
			&overrides.application_template,
			loaded,
			|l| l.settings.application_template.as_ref(),
			DEFAULT_APPLICATION_TEMPLATE.to_string(),
		),
		subscription_template: pick(
			&overrides.subscription_template,
			loaded,
			|l| l.settings.subscription_template.as_ref(),
			DEFAULT_SUBSCRIPTION_TEMPLATE.to_string(),
		),
	}
}

/// Convenience function to discover settings from a directory and apply overrides.
pub fn load_settings(start_dir: &Path, overrides: &Overrides) -> Result<Settings> {
	let loaded = discover_settings(start_dir)?;
	Ok(resolve_settings(&loaded, overrides))
}

/// Get the path to the user's settings file.
pub fn user_settings_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RolloutError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(SETTINGS_FILE_NAME))
}

impl Settings {
	pub fn layout(&self) -> Layout {
		Layout::new(&self.meta_dir.value, &self.release_dir.value)
	}

	pub fn template_names(&self) -> TemplateNames {
		TemplateNames {
			application: self.application_template.value.clone(),
			subscription: self.subscription_template.value.clone(),
		}
	}
}
