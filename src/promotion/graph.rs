use crate::error::{Result, RolloutError};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashSet;

/// A named zone target within an environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Placement {
	/// Zone name; also the placement rule name under `placement-rules/`.
	pub name: String,

	/// Rollout batch priority. Lower priorities roll out first.
	#[serde(default)]
	pub priority: i64,
}

/// One stage of the promotion sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromotionStep {
	/// Environment name. `None` when the entry omits `env` or leaves it empty;
	/// such steps never match a lookup by name.
	#[serde(rename = "env", default)]
	pub environment: Option<String>,

	/// Zone placements in declaration order. `None` when the entry has no
	/// `placements` key, which is distinct from an explicit empty list.
	#[serde(default)]
	pub placements: Option<Vec<Placement>>,
}

/// The ordered promotion sequence for one application.
///
/// Built once from a loaded structure and immutable afterwards. An empty
/// sequence is accepted here; queries against it fail with
/// [`RolloutError::EmptyPromotion`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionGraph {
	steps: Vec<PromotionStep>,
}

impl PromotionGraph {
	/// Build a graph from a parsed `promotion.yaml` document.
	///
	/// The document must be a mapping with a `promotion` key holding a
	/// sequence (or null, which yields an empty sequence).
	pub fn build(raw: &Value) -> Result<Self> {
		let mapping = raw
			.as_mapping()
			.ok_or_else(|| RolloutError::MalformedPromotionData {
				reason: "top-level document is not a mapping".to_string(),
			})?;

		let entries = match mapping.get("promotion") {
			None => {
				return Err(RolloutError::MalformedPromotionData {
					reason: "missing `promotion` key".to_string(),
				});
			}
			Some(Value::Null) => &[][..],
			Some(Value::Sequence(entries)) => entries.as_slice(),
			Some(_) => {
				return Err(RolloutError::MalformedPromotionData {
					reason: "`promotion` is not a sequence".to_string(),
				});
			}
		};

		let steps = entries
			.iter()
			.enumerate()
			.map(|(index, entry)| parse_step(index, entry))
			.collect::<Result<Vec<_>>>()?;

		warn_on_duplicates(&steps);

		Ok(Self { steps })
	}

	/// Construct a graph directly from steps.
	pub fn from_steps(steps: Vec<PromotionStep>) -> Self {
		Self { steps }
	}

	/// Steps in promotion order.
	pub fn steps(&self) -> &[PromotionStep] {
		&self.steps
	}

	/// Steps in promotion order, or `EmptyPromotion` if there are none.
	pub fn non_empty_steps(&self) -> Result<&[PromotionStep]> {
		if self.steps.is_empty() {
			return Err(RolloutError::EmptyPromotion);
		}
		Ok(&self.steps)
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}
}

impl PromotionStep {
	/// Whether this step's environment name equals `name` exactly.
	pub fn is_named(&self, name: &str) -> bool {
		self.environment.as_deref() == Some(name)
	}

	/// Declared placements, empty if the step declares none.
	pub fn placements(&self) -> &[Placement] {
		self.placements.as_deref().unwrap_or_default()
	}
}

fn parse_step(index: usize, entry: &Value) -> Result<PromotionStep> {
	if !entry.is_mapping() {
		return Err(RolloutError::InvalidPromotionStep {
			index,
			reason: "entry is not a mapping".to_string(),
		});
	}

	let mut step: PromotionStep =
		serde_yaml::from_value(entry.clone()).map_err(|e| RolloutError::InvalidPromotionStep {
			index,
			reason: e.to_string(),
		})?;

	if step.environment.as_deref().is_some_and(str::is_empty) {
		step.environment = None;
	}
	if step.environment.is_none() {
		tracing::warn!(index, "promotion step has no environment name");
	}

	Ok(step)
}

fn warn_on_duplicates(steps: &[PromotionStep]) {
	let mut seen = HashSet::new();
	for (index, name) in steps
		.iter()
		.enumerate()
		.filter_map(|(i, s)| s.environment.as_deref().map(|n| (i, n)))
	{
		if !seen.insert(name) {
			tracing::warn!(
				index,
				environment = name,
				"duplicate environment name; only the first occurrence is used"
			);
		}
	}
}
