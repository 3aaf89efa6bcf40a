use crate::error::{Result, RolloutError};
use crate::merge::merge_values;
use crate::meta::ValueSet;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value};
use serde::Serialize;
use serde_yaml::Mapping;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Bindings handed to a template for one render call.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
	pub app: &'a str,
	pub env: &'a str,

	/// Only set for per-zone manifests.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zone: Option<&'a str>,

	pub params: &'a Mapping,
	pub values: &'a ValueSet,
}

/// Template renderer backed by one or more directories of minijinja templates.
///
/// Two extensions are available to templates, each as a function and a filter:
/// - `merge(base, overlay, deep=false)` merges two mappings
/// - `toText(data)` serializes data as YAML without the trailing newline
pub struct Renderer {
	env: Environment<'static>,
}

impl std::fmt::Debug for Renderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Renderer").finish_non_exhaustive()
	}
}

impl Renderer {
	/// Create a renderer that looks up templates in `templates_dirs`, first
	/// match wins.
	pub fn new(templates_dirs: &[PathBuf]) -> Self {
		let dirs = templates_dirs.to_vec();
		let mut env = Environment::new();
		env.set_loader(move |name| load_template(&dirs, name));
		env.set_keep_trailing_newline(true);
		// Manifests are YAML; never HTML/JSON-escape interpolated values
		env.set_auto_escape_callback(|_| AutoEscape::None);
		env.add_function("merge", merge_function);
		env.add_filter("merge", merge_function);
		env.add_function("toText", to_text);
		env.add_filter("toText", to_text);
		Self { env }
	}

	/// Render `template` with the given context.
	pub fn render(&self, template: &str, ctx: &RenderContext) -> Result<String> {
		let wrap = |source| RolloutError::TemplateError {
			template: template.to_string(),
			source,
		};
		let tmpl = self.env.get_template(template).map_err(wrap)?;
		tmpl.render(ctx).map_err(wrap)
	}
}

fn load_template(dirs: &[PathBuf], name: &str) -> std::result::Result<Option<String>, Error> {
	let relative = Path::new(name);
	if !relative
		.components()
		.all(|component| matches!(component, Component::Normal(_)))
	{
		return Ok(None);
	}

	for dir in dirs {
		match std::fs::read_to_string(dir.join(relative)) {
			Ok(source) => return Ok(Some(source)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
			Err(e) => {
				return Err(
					Error::new(ErrorKind::InvalidOperation, "could not read template").with_source(e),
				);
			}
		}
	}
	Ok(None)
}

fn merge_function(
	base: Value,
	overlay: Value,
	deep: Option<bool>,
) -> std::result::Result<Value, Error> {
	let base = to_yaml(&base)?;
	let overlay = to_yaml(&overlay)?;
	let merged = merge_values(&base, &overlay, deep.unwrap_or(false)).ok_or_else(|| {
		Error::new(
			ErrorKind::InvalidOperation,
			"merge() arguments must be mappings",
		)
	})?;
	Ok(Value::from_serialize(&merged))
}

fn to_text(data: Value) -> std::result::Result<String, Error> {
	let text = serde_yaml::to_string(&data).map_err(|e| {
		Error::new(ErrorKind::InvalidOperation, "cannot serialize value as YAML").with_source(e)
	})?;
	Ok(text.trim_end().to_string())
}

fn to_yaml(value: &Value) -> std::result::Result<serde_yaml::Value, Error> {
	serde_yaml::to_value(value).map_err(|e| {
		Error::new(ErrorKind::InvalidOperation, "cannot convert value for merge").with_source(e)
	})
}
