//! Manifest rendering and output.
//!
//! This module handles:
//! - Template lookup and rendering with the `merge` and `toText` extensions
//! - Writing rendered manifests under the release directory
//! - The application + subscription generation sequence

pub mod renderer;
pub mod writer;

pub use renderer::{RenderContext, Renderer};
pub use writer::write_output;

use crate::error::Result;
use crate::meta::AppMeta;
use std::path::PathBuf;

/// Template names used when `parameters.yaml` does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNames {
	pub application: String,
	pub subscription: String,
}

/// Paths written by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
	pub application: PathBuf,
	pub subscription: PathBuf,
}

/// Render and write the application manifest, then the subscription
/// manifest for `zone`.
///
/// Stops at the first failure: if the application manifest cannot be
/// rendered or written, the subscription is not attempted.
pub fn generate(
	meta: &mut AppMeta,
	renderer: &Renderer,
	defaults: &TemplateNames,
	env: &str,
	zone: &str,
) -> Result<Generated> {
	let layout = meta.layout();
	let app = meta.app().to_string();
	let application_path = layout.application_output(env, &app)?;
	let subscription_path = layout.subscription_output(env, &app, zone)?;

	let params = meta.parameters()?.clone();
	let values = meta.values(env, zone)?.clone();

	let application_template = params
		.templates
		.application
		.as_deref()
		.unwrap_or(&defaults.application);
	let subscription_template = params
		.templates
		.subscription
		.as_deref()
		.unwrap_or(&defaults.subscription);

	let ctx = RenderContext {
		app: &app,
		env,
		zone: None,
		params: params.as_mapping(),
		values: &values,
	};
	tracing::debug!(template = application_template, "rendering application");
	let text = renderer.render(application_template, &ctx)?;
	write_output(&application_path, &text)?;

	let ctx = RenderContext {
		zone: Some(zone),
		..ctx
	};
	tracing::debug!(template = subscription_template, zone, "rendering subscription");
	let text = renderer.render(subscription_template, &ctx)?;
	write_output(&subscription_path, &text)?;

	Ok(Generated {
		application: application_path,
		subscription: subscription_path,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RolloutError;
	use crate::meta::Layout;
	use std::fs;
	use std::path::Path;

	struct Fixture {
		_dir: tempfile::TempDir,
		root: PathBuf,
	}

	impl Fixture {
		fn new() -> Self {
			let dir = tempfile::tempdir().unwrap();
			let root = dir.path().to_path_buf();
			Self { _dir: dir, root }
		}

		fn write(&self, rel: &str, content: &str) {
			let path = self.root.join(rel);
			fs::create_dir_all(path.parent().unwrap()).unwrap();
			fs::write(path, content).unwrap();
		}

		fn layout(&self) -> Layout {
			Layout::new(self.root.join("meta"), self.root.join("release"))
		}

		fn renderer(&self) -> Renderer {
			Renderer::new(&[self.root.join("templates")])
		}
	}

	fn defaults() -> TemplateNames {
		TemplateNames {
			application: "application.yaml.j2".to_string(),
			subscription: "subscription.yaml.j2".to_string(),
		}
	}

	#[test]
	fn test_generate_writes_both_manifests() {
		let fx = Fixture::new();
		fx.write("meta/shop/parameters.yaml", "labels: {tier: 1}\n");
		fx.write(
			"templates/application.yaml.j2",
			"name: {{ app }}\ntier: '{{ params.labels.tier }}'\n",
		);
		fx.write(
			"templates/subscription.yaml.j2",
			"name: {{ app }}-{{ zone }}\nenv: {{ env }}\n",
		);
		let layout = fx.layout();
		let mut meta = AppMeta::new(&layout, "shop");

		let generated = generate(&mut meta, &fx.renderer(), &defaults(), "dev", "east").unwrap();

		assert!(generated.application.ends_with(Path::new("dev/applications/shop.yaml")));
		assert!(generated.subscription.ends_with(Path::new("dev/subscriptions/shop-east.yaml")));
		assert_eq!(
			fs::read_to_string(&generated.application).unwrap(),
			"name: shop\ntier: '1'\n"
		);
		assert_eq!(
			fs::read_to_string(&generated.subscription).unwrap(),
			"name: shop-east\nenv: dev\n"
		);
	}

	#[test]
	fn test_generate_uses_template_overrides() {
		let fx = Fixture::new();
		fx.write(
			"meta/shop/parameters.yaml",
			"template: {application: custom-app.j2}\n",
		);
		fx.write("templates/custom-app.j2", "custom\n");
		fx.write("templates/subscription.yaml.j2", "sub\n");
		let layout = fx.layout();
		let mut meta = AppMeta::new(&layout, "shop");

		let generated = generate(&mut meta, &fx.renderer(), &defaults(), "dev", "east").unwrap();
		assert_eq!(
			fs::read_to_string(&generated.application).unwrap(),
			"custom\n"
		);
	}

	#[test]
	fn test_generate_stops_after_application_failure() {
		let fx = Fixture::new();
		fx.write("meta/shop/parameters.yaml", "{}\n");
		fx.write("templates/subscription.yaml.j2", "sub\n");
		let layout = fx.layout();
		let mut meta = AppMeta::new(&layout, "shop");

		let result = generate(&mut meta, &fx.renderer(), &defaults(), "dev", "east");

		assert!(matches!(result, Err(RolloutError::TemplateError { .. })));
		let subscription = layout.subscription_output("dev", "shop", "east").unwrap();
		assert!(!subscription.exists());
	}

	#[test]
	fn test_generate_merges_values_in_template() {
		let fx = Fixture::new();
		fx.write(
			"meta/shop/parameters.yaml",
			"chart:\n  values:\n    image: {repo: r, tag: v1}\n",
		);
		fx.write(
			"meta/shop/values/dev-east.yaml",
			"deepMerge: true\nvalues:\n  image: {tag: v2}\n",
		);
		fx.write("templates/application.yaml.j2", "app\n");
		fx.write(
			"templates/subscription.yaml.j2",
			"{{ merge(params.chart['values'], values['values'], values.deepMerge) | toText }}",
		);
		let layout = fx.layout();
		let mut meta = AppMeta::new(&layout, "shop");

		let generated = generate(&mut meta, &fx.renderer(), &defaults(), "dev", "east").unwrap();
		let text = fs::read_to_string(&generated.subscription).unwrap();
		let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
		assert_eq!(parsed["image"]["tag"], serde_yaml::Value::from("v2"));
		assert_eq!(parsed["image"]["repo"], serde_yaml::Value::from("r"));
	}
}
