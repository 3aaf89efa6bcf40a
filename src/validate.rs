//! Cross-checks between the promotion sequence and rendered placement rules.
//!
//! Every placement `<p>` of environment `<e>` must have a manifest at
//! `<release>/<e>/placement-rules/<p>.yaml` containing a resource named
//! `<e>-<p>`.

use crate::error::{Result, RolloutError};
use crate::meta::Layout;
use crate::promotion::PromotionGraph;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Outcome of validating every placement of an application.
#[derive(Debug, Default)]
pub struct PlacementReport {
	/// Placement rule files that passed.
	pub passed: Vec<PathBuf>,

	/// One error per failed placement.
	pub failures: Vec<RolloutError>,
}

impl PlacementReport {
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn checked(&self) -> usize {
		self.passed.len() + self.failures.len()
	}
}

/// Check the placement rule of every named placement in the graph.
///
/// Per-placement problems are collected in the report rather than returned;
/// only an empty promotion sequence fails outright.
pub fn validate_placements(graph: &PromotionGraph, layout: &Layout) -> Result<PlacementReport> {
	let steps = graph.non_empty_steps()?;
	let mut report = PlacementReport::default();

	for (index, step) in steps.iter().enumerate() {
		let Some(env) = step.environment.as_deref() else {
			tracing::warn!(index, "skipping placements of unnamed promotion step");
			continue;
		};

		for placement in step.placements() {
			let outcome = layout
				.placement_rule(env, &placement.name)
				.and_then(|path| {
					check_placement_rule(&path, &format!("{env}-{}", placement.name))?;
					Ok(path)
				});
			match outcome {
				Ok(path) => {
					tracing::debug!(path = %path.display(), "placement rule ok");
					report.passed.push(path);
				}
				Err(e) => {
					tracing::debug!(
						environment = env,
						placement = %placement.name,
						"placement rule failed"
					);
					report.failures.push(e);
				}
			}
		}
	}

	Ok(report)
}

/// Check that the YAML file at `path` has a document whose `metadata.name`
/// equals `expected_name`.
pub fn check_placement_rule(path: &Path, expected_name: &str) -> Result<()> {
	let fail = |reason: String| RolloutError::PlacementValidation {
		path: path.to_path_buf(),
		reason,
	};

	if !path.exists() {
		return Err(fail("placement rule file is missing".to_string()));
	}
	let content = std::fs::read_to_string(path).map_err(|source| RolloutError::ReadError {
		path: path.to_path_buf(),
		source,
	})?;

	let mut names = Vec::new();
	for document in serde_yaml::Deserializer::from_str(&content) {
		let value = Value::deserialize(document).map_err(|source| RolloutError::YamlParseError {
			path: path.to_path_buf(),
			source,
		})?;
		if let Some(name) = resource_name(&value) {
			if name == expected_name {
				return Ok(());
			}
			names.push(name.to_string());
		}
	}

	Err(fail(if names.is_empty() {
		format!("no named resource found, expected {expected_name:?}")
	} else {
		format!("expected resource {expected_name:?}, found {names:?}")
	}))
}

fn resource_name(value: &Value) -> Option<&str> {
	value.get("metadata")?.get("name")?.as_str()
}
