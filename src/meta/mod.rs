//! Application metadata on disk.
//!
//! This module handles:
//! - Path layout for `meta/` inputs and release outputs
//! - YAML loading with per-invocation memoization
//! - Normalization of parameter and value sets

pub mod layout;
pub mod loader;
pub mod types;

pub use layout::{Layout, check_name};
pub use loader::{AppMeta, load_optional_yaml, load_yaml, parse_yaml_str};
pub use types::{ParameterSet, TemplateOverrides, ValueSet};
