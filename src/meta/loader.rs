use crate::error::{Result, RolloutError};
use crate::meta::layout::Layout;
use crate::meta::types::{ParameterSet, ValueSet};
use crate::promotion::PromotionGraph;
use serde_yaml::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

/// Load a YAML document from disk. An empty file yields `Value::Null`.
pub fn load_yaml(path: &Path) -> Result<Value> {
	if !path.exists() {
		return Err(RolloutError::FileNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|source| RolloutError::ReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_yaml_str(&content, path)
}

/// Like [`load_yaml`], but a missing file is `Ok(None)`.
pub fn load_optional_yaml(path: &Path) -> Result<Option<Value>> {
	if !path.exists() {
		return Ok(None);
	}
	load_yaml(path).map(Some)
}

/// Parse YAML from a string (useful for testing).
pub fn parse_yaml_str(content: &str, path: &Path) -> Result<Value> {
	if content.trim().is_empty() {
		return Ok(Value::Null);
	}
	serde_yaml::from_str(content).map_err(|source| RolloutError::YamlParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// Metadata for a single application, loaded lazily and at most once.
///
/// Every accessor reads its file on first use and returns the cached value
/// afterwards, so repeated queries within one invocation stay consistent.
#[derive(Debug)]
pub struct AppMeta<'a> {
	app: String,
	layout: &'a Layout,
	promotion: Option<PromotionGraph>,
	parameters: Option<ParameterSet>,
	values: HashMap<(String, String), ValueSet>,
}

impl<'a> AppMeta<'a> {
	pub fn new(layout: &'a Layout, app: &str) -> Self {
		Self {
			app: app.to_string(),
			layout,
			promotion: None,
			parameters: None,
			values: HashMap::new(),
		}
	}

	pub fn app(&self) -> &str {
		&self.app
	}

	pub fn layout(&self) -> &'a Layout {
		self.layout
	}

	/// The promotion graph from `promotion.yaml`.
	pub fn promotion(&mut self) -> Result<&PromotionGraph> {
		let graph = match self.promotion.take() {
			Some(graph) => graph,
			None => {
				let path = self.layout.promotion_file(&self.app)?;
				tracing::debug!(path = %path.display(), "loading promotion sequence");
				PromotionGraph::build(&load_yaml(&path)?)?
			}
		};
		Ok(self.promotion.insert(graph))
	}

	/// The parameter set from `parameters.yaml`.
	pub fn parameters(&mut self) -> Result<&ParameterSet> {
		let params = match self.parameters.take() {
			Some(params) => params,
			None => {
				let path = self.layout.parameters_file(&self.app)?;
				tracing::debug!(path = %path.display(), "loading parameters");
				ParameterSet::from_value(&path, load_yaml(&path)?)?
			}
		};
		Ok(self.parameters.insert(params))
	}

	/// The value set for one environment/zone pair.
	///
	/// A missing values file is not an error and yields [`ValueSet::default`].
	pub fn values(&mut self, env: &str, zone: &str) -> Result<&ValueSet> {
		let path = self.layout.values_file(&self.app, env, zone)?;
		match self.values.entry((env.to_string(), zone.to_string())) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let values = match load_optional_yaml(&path)? {
					Some(value) => ValueSet::from_value(&path, value)?,
					None => {
						tracing::debug!(path = %path.display(), "no values file, using defaults");
						ValueSet::default()
					}
				};
				Ok(entry.insert(values))
			}
		}
	}
}
