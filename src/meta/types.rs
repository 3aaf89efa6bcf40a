use crate::error::{Result, RolloutError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-application renderer template names from `parameters.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateOverrides {
	/// Replaces the configured application template.
	pub application: Option<String>,

	/// Replaces the configured subscription template.
	pub subscription: Option<String>,
}

/// The base configuration of an application, loaded from `parameters.yaml`.
///
/// `labels` and `template` are normalized once at load time; everything else
/// is passed to templates untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
	raw: Mapping,

	/// Label values coerced to strings.
	pub labels: BTreeMap<String, String>,

	pub templates: TemplateOverrides,
}

impl ParameterSet {
	/// Normalize a loaded parameter document. `Null` (an empty file) is valid.
	pub fn from_value(path: &Path, value: Value) -> Result<Self> {
		let mut raw = match value {
			Value::Null => Mapping::new(),
			Value::Mapping(mapping) => mapping,
			_ => return Err(invalid(path, "parameters must be a mapping")),
		};

		let labels = match raw.get("labels") {
			None | Some(Value::Null) => BTreeMap::new(),
			Some(Value::Mapping(labels)) => coerce_labels(path, labels)?,
			Some(_) => return Err(invalid(path, "`labels` must be a mapping")),
		};

		let templates = match raw.get("template") {
			None | Some(Value::Null) => TemplateOverrides::default(),
			Some(value @ Value::Mapping(_)) => serde_yaml::from_value(value.clone())
				.map_err(|e| invalid(path, &format!("`template`: {e}")))?,
			Some(_) => return Err(invalid(path, "`template` must be a mapping")),
		};

		if let Some(Value::Mapping(chart)) = raw.get_mut("chart")
			&& !matches!(chart.get("values"), Some(Value::Mapping(_)))
		{
			if chart.get("values").is_some_and(|v| !v.is_null()) {
				tracing::warn!(
					path = %path.display(),
					"`chart.values` is not a mapping; using an empty mapping"
				);
			}
			chart.insert(Value::from("values"), Value::Mapping(Mapping::new()));
		}

		if !labels.is_empty() {
			let coerced = labels
				.iter()
				.map(|(k, v)| (Value::from(k.as_str()), Value::from(v.as_str())))
				.collect();
			raw.insert(Value::from("labels"), Value::Mapping(coerced));
		}

		Ok(Self {
			raw,
			labels,
			templates,
		})
	}

	/// The full parameter mapping as templates see it.
	pub fn as_mapping(&self) -> &Mapping {
		&self.raw
	}

	/// `chart.values`, if present.
	pub fn chart_values(&self) -> Option<&Value> {
		self.raw.get("chart").and_then(|chart| chart.get("values"))
	}
}

/// Environment/zone specific overrides from `values/<env>-<zone>.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSet {
	/// Whether templates should deep-merge these values onto the chart values.
	#[serde(default)]
	pub deep_merge: bool,

	#[serde(default)]
	pub values: Mapping,
}

impl ValueSet {
	/// Normalize a loaded values document. `Null` (an empty file) is valid.
	///
	/// A `deepMerge` that is not a boolean counts as `false` and `values` that
	/// are not a mapping count as empty, each with a warning.
	pub fn from_value(path: &Path, value: Value) -> Result<Self> {
		let mut mapping = match value {
			Value::Null => return Ok(Self::default()),
			Value::Mapping(mapping) => mapping,
			_ => return Err(invalid(path, "values file must be a mapping")),
		};

		let deep_merge = match mapping.get("deepMerge") {
			None | Some(Value::Null) => false,
			Some(Value::Bool(flag)) => *flag,
			Some(other) => {
				tracing::warn!(
					path = %path.display(),
					value = ?other,
					"`deepMerge` is not a boolean; using false"
				);
				false
			}
		};

		let values = match mapping.remove("values") {
			None | Some(Value::Null) => Mapping::new(),
			Some(Value::Mapping(values)) => values,
			Some(_) => {
				tracing::warn!(
					path = %path.display(),
					"`values` is not a mapping; using an empty mapping"
				);
				Mapping::new()
			}
		};

		Ok(Self { deep_merge, values })
	}
}

fn coerce_labels(path: &Path, labels: &Mapping) -> Result<BTreeMap<String, String>> {
	labels
		.iter()
		.map(|(key, value)| {
			let key = key
				.as_str()
				.ok_or_else(|| invalid(path, "label keys must be strings"))?;
			Ok((key.to_string(), scalar_text(value)))
		})
		.collect()
}

/// Text form of a YAML value for use as a label.
pub fn scalar_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		Value::Tagged(tagged) => scalar_text(&tagged.value),
		Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
			.map(|s| s.trim().to_string())
			.unwrap_or_default(),
	}
}

fn invalid(path: &Path, reason: &str) -> RolloutError {
	RolloutError::InvalidStructure {
		path: path.to_path_buf(),
		reason: reason.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn parse(yaml: &str) -> Value {
		serde_yaml::from_str(yaml).unwrap()
	}

	#[test]
	fn test_parameters_from_empty_document() {
		let params = ParameterSet::from_value(Path::new("p.yaml"), Value::Null).unwrap();
		assert!(params.as_mapping().is_empty());
		assert!(params.labels.is_empty());
		assert_eq!(params.templates, TemplateOverrides::default());
	}

	#[test]
	fn test_parameters_labels_coerced() {
		let params = ParameterSet::from_value(
			Path::new("p.yaml"),
			parse("labels: {team: core, tier: 2, critical: true, owner: ~}"),
		)
		.unwrap();

		assert_eq!(params.labels["team"], "core");
		assert_eq!(params.labels["tier"], "2");
		assert_eq!(params.labels["critical"], "true");
		assert_eq!(params.labels["owner"], "");

		let labels = params.as_mapping().get("labels").unwrap();
		assert_eq!(labels.get("tier"), Some(&Value::from("2")));
	}

	#[test]
	fn test_parameters_template_overrides() {
		let params = ParameterSet::from_value(
			Path::new("p.yaml"),
			parse("template: {subscription: custom-sub.yaml.j2}"),
		)
		.unwrap();

		assert_eq!(params.templates.application, None);
		assert_eq!(
			params.templates.subscription.as_deref(),
			Some("custom-sub.yaml.j2")
		);
	}

	#[test]
	fn test_parameters_chart_values() {
		let params = ParameterSet::from_value(
			Path::new("p.yaml"),
			parse("chart: {name: web, values: {replicas: 2}}"),
		)
		.unwrap();
		assert_eq!(params.chart_values(), Some(&parse("{replicas: 2}")));
	}

	#[test]
	fn test_parameters_chart_without_values() {
		let params =
			ParameterSet::from_value(Path::new("p.yaml"), parse("chart: {name: x}")).unwrap();
		assert_eq!(params.chart_values(), Some(&Value::Mapping(Mapping::new())));
		assert_eq!(
			params.as_mapping().get("chart"),
			Some(&parse("{name: x, values: {}}"))
		);
	}

	#[test]
	fn test_parameters_chart_values_not_a_mapping() {
		let params =
			ParameterSet::from_value(Path::new("p.yaml"), parse("chart: {values: [1, 2]}"))
				.unwrap();
		assert_eq!(params.chart_values(), Some(&Value::Mapping(Mapping::new())));
	}

	#[test]
	fn test_parameters_without_chart_untouched() {
		let params = ParameterSet::from_value(Path::new("p.yaml"), parse("name: x")).unwrap();
		assert_eq!(params.chart_values(), None);
	}

	#[test]
	fn test_parameters_rejects_non_mapping_labels() {
		let result = ParameterSet::from_value(Path::new("p.yaml"), parse("labels: [a, b]"));
		assert!(matches!(result, Err(RolloutError::InvalidStructure { .. })));
	}

	#[test]
	fn test_parameters_rejects_sequence_document() {
		let result = ParameterSet::from_value(Path::new("p.yaml"), parse("[1, 2]"));
		assert!(matches!(result, Err(RolloutError::InvalidStructure { .. })));
	}

	#[test]
	fn test_values_defaults() {
		let values = ValueSet::from_value(Path::new("v.yaml"), Value::Null).unwrap();
		assert_eq!(values, ValueSet::default());
		assert!(!values.deep_merge);
		assert!(values.values.is_empty());
	}

	#[test]
	fn test_values_deep_merge_flag() {
		let values = ValueSet::from_value(
			Path::new("v.yaml"),
			parse("deepMerge: true\nvalues: {image: {tag: v2}}"),
		)
		.unwrap();
		assert!(values.deep_merge);
		assert_eq!(values.values, parse("{image: {tag: v2}}").as_mapping().unwrap().clone());
	}

	#[test]
	fn test_values_non_bool_deep_merge_is_false() {
		let values = ValueSet::from_value(
			Path::new("v.yaml"),
			parse("deepMerge: \"true\"\nvalues: {a: 1}"),
		)
		.unwrap();
		assert!(!values.deep_merge);
		assert_eq!(values.values, parse("{a: 1}").as_mapping().unwrap().clone());
	}

	#[test]
	fn test_values_non_mapping_values_is_empty() {
		let values =
			ValueSet::from_value(Path::new("v.yaml"), parse("deepMerge: true\nvalues: [1, 2]"))
				.unwrap();
		assert!(values.deep_merge);
		assert!(values.values.is_empty());
	}

	#[test]
	fn test_values_serialize_camel_case() {
		let text = serde_yaml::to_string(&ValueSet::default()).unwrap();
		assert!(text.contains("deepMerge: false"));
	}

	#[test]
	fn test_scalar_text_sequence() {
		assert_eq!(scalar_text(&parse("[a, b]")), "- a\n- b");
	}
}
