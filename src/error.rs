use std::path::PathBuf;

/// Library-level structured errors for rollout.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RolloutError {
	#[error("File not found: {path}")]
	FileNotFound { path: PathBuf },

	#[error("Failed to read file: {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse YAML file: {path}")]
	YamlParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Unexpected structure in {path}: {reason}")]
	InvalidStructure { path: PathBuf, reason: String },

	#[error("Failed to read settings file: {path}")]
	SettingsReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	SettingsParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Malformed promotion data: {reason}")]
	MalformedPromotionData { reason: String },

	#[error("Invalid promotion step at index {index}: {reason}")]
	InvalidPromotionStep { index: usize, reason: String },

	#[error("Promotion sequence is empty")]
	EmptyPromotion,

	#[error("Environment not found in promotion sequence: {environment}")]
	EnvironmentNotFound { environment: String },

	#[error("Promotion step at index {index} has no environment name")]
	MissingEnvironmentName { index: usize },

	#[error("Failed to render template: {template}")]
	TemplateError {
		template: String,
		#[source]
		source: minijinja::Error,
	},

	#[error("Failed to write file: {path}")]
	WriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Placement rule check failed for {path}: {reason}")]
	PlacementValidation { path: PathBuf, reason: String },

	#[error("Invalid {kind} name: {value:?}")]
	InvalidName { kind: &'static str, value: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RolloutError.
pub type Result<T> = std::result::Result<T, RolloutError>;
