use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Contents of one `.rollout.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsFile {
	/// If true, stop the directory cascade here and jump to ~/.rollout.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.rollout.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub user_config_disable_env_var: Option<String>,

	/// Directory holding `<app>/promotion.yaml` and friends.
	pub meta_dir: Option<PathBuf>,

	/// Directory rendered manifests are written under.
	pub release_dir: Option<PathBuf>,

	/// Directories searched for renderer templates, in order. A single path
	/// or a list.
	#[serde(default, deserialize_with = "one_or_many")]
	pub templates_dir: Option<Vec<PathBuf>>,

	/// Default application template name.
	pub application_template: Option<String>,

	/// Default subscription template name.
	pub subscription_template: Option<String>,
}

impl SettingsFile {
	/// Make relative directories relative to `base` (the settings file's directory).
	pub fn resolve_relative(&mut self, base: &Path) {
		let templates = self.templates_dir.iter_mut().flatten();
		for dir in [&mut self.meta_dir, &mut self.release_dir]
			.into_iter()
			.flatten()
			.chain(templates)
		{
			if dir.is_relative() {
				*dir = base.join(&*dir);
			}
		}
	}
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<PathBuf>>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Dirs {
		One(PathBuf),
		Many(Vec<PathBuf>),
	}

	Ok(Some(match Dirs::deserialize(deserializer)? {
		Dirs::One(dir) => vec![dir],
		Dirs::Many(dirs) => dirs,
	}))
}

/// A loaded settings file with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
	/// The parsed settings.
	pub settings: SettingsFile,

	/// The path these settings were loaded from.
	pub path: PathBuf,
}

/// Values supplied on the command line (or through their environment variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub meta_dir: Option<PathBuf>,
	pub release_dir: Option<PathBuf>,
	pub templates_dir: Option<Vec<PathBuf>>,
	pub application_template: Option<String>,
	pub subscription_template: Option<String>,
}

/// Where an effective setting came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
	CommandLine,
	File(PathBuf),
	Default,
}

impl fmt::Display for Source {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Source::CommandLine => write!(f, "command line / environment"),
			Source::File(path) => write!(f, "{}", path.display()),
			Source::Default => write!(f, "default"),
		}
	}
}

/// One effective setting and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
	pub value: T,
	pub source: Source,
}

/// Effective settings after applying the cascade and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub meta_dir: Setting<PathBuf>,
	pub release_dir: Setting<PathBuf>,
	pub templates_dir: Setting<Vec<PathBuf>>,
	pub application_template: Setting<String>,
	pub subscription_template: Setting<String>,
}
