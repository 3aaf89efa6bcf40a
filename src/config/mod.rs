//! Tool settings for rollout.
//!
//! This module handles:
//! - TOML settings file parsing
//! - Directory cascade discovery
//! - Resolving effective settings from flags, files and defaults

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	SETTINGS_FILE_NAME, SKIP_USER_CONFIG_ENV, discover_settings, load_settings, resolve_settings,
	user_settings_path,
};
pub use parser::{parse_settings_file, parse_settings_str};
pub use types::{LoadedSettings, Overrides, Setting, Settings, SettingsFile, Source};
