use crate::error::{Result, RolloutError};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("name pattern is a valid regex")
});

/// Reject names that cannot safely be used as a single path component.
pub fn check_name(kind: &'static str, value: &str) -> Result<()> {
	if NAME_PATTERN.is_match(value) {
		Ok(())
	} else {
		Err(RolloutError::InvalidName {
			kind,
			value: value.to_string(),
		})
	}
}

/// Where metadata is read from and manifests are written to.
///
/// ```text
/// <meta>/<app>/promotion.yaml
/// <meta>/<app>/parameters.yaml
/// <meta>/<app>/values/<env>-<zone>.yaml
/// <release>/<env>/applications/<app>.yaml
/// <release>/<env>/subscriptions/<app>-<zone>.yaml
/// <release>/<env>/placement-rules/<placement>.yaml
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
	pub meta_dir: PathBuf,
	pub release_dir: PathBuf,
}

impl Layout {
	pub fn new(meta_dir: impl Into<PathBuf>, release_dir: impl Into<PathBuf>) -> Self {
		Self {
			meta_dir: meta_dir.into(),
			release_dir: release_dir.into(),
		}
	}

	fn app_dir(&self, app: &str) -> Result<PathBuf> {
		check_name("application", app)?;
		Ok(self.meta_dir.join(app))
	}

	fn env_dir(&self, env: &str) -> Result<PathBuf> {
		check_name("environment", env)?;
		Ok(self.release_dir.join(env))
	}

	pub fn promotion_file(&self, app: &str) -> Result<PathBuf> {
		Ok(self.app_dir(app)?.join("promotion.yaml"))
	}

	pub fn parameters_file(&self, app: &str) -> Result<PathBuf> {
		Ok(self.app_dir(app)?.join("parameters.yaml"))
	}

	pub fn values_file(&self, app: &str, env: &str, zone: &str) -> Result<PathBuf> {
		check_name("environment", env)?;
		check_name("zone", zone)?;
		Ok(self
			.app_dir(app)?
			.join("values")
			.join(format!("{env}-{zone}.yaml")))
	}

	pub fn application_output(&self, env: &str, app: &str) -> Result<PathBuf> {
		check_name("application", app)?;
		Ok(self
			.env_dir(env)?
			.join("applications")
			.join(format!("{app}.yaml")))
	}

	pub fn subscription_output(&self, env: &str, app: &str, zone: &str) -> Result<PathBuf> {
		check_name("application", app)?;
		check_name("zone", zone)?;
		Ok(self
			.env_dir(env)?
			.join("subscriptions")
			.join(format!("{app}-{zone}.yaml")))
	}

	pub fn placement_rule(&self, env: &str, placement: &str) -> Result<PathBuf> {
		check_name("placement", placement)?;
		Ok(self
			.env_dir(env)?
			.join("placement-rules")
			.join(format!("{placement}.yaml")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::Path;

	fn layout() -> Layout {
		Layout::new("meta", "release")
	}

	#[test]
	fn test_check_name_accepts_typical_names() {
		for name in ["app", "dev", "us-east-1", "zone_a", "v1.2", "0prod"] {
			assert!(check_name("test", name).is_ok(), "{name} should be valid");
		}
	}

	#[test]
	fn test_check_name_rejects_path_components() {
		for name in ["", "..", "../etc", "a/b", ".hidden", "-flag", "has space"] {
			match check_name("zone", name) {
				Err(RolloutError::InvalidName { kind, value }) => {
					assert_eq!(kind, "zone");
					assert_eq!(value, name);
				}
				other => panic!("Expected InvalidName for {name:?}, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_input_paths() {
		let layout = layout();
		assert_eq!(
			layout.promotion_file("shop").unwrap(),
			Path::new("meta/shop/promotion.yaml")
		);
		assert_eq!(
			layout.parameters_file("shop").unwrap(),
			Path::new("meta/shop/parameters.yaml")
		);
		assert_eq!(
			layout.values_file("shop", "dev", "east").unwrap(),
			Path::new("meta/shop/values/dev-east.yaml")
		);
	}

	#[test]
	fn test_output_paths() {
		let layout = layout();
		assert_eq!(
			layout.application_output("dev", "shop").unwrap(),
			Path::new("release/dev/applications/shop.yaml")
		);
		assert_eq!(
			layout.subscription_output("dev", "shop", "east").unwrap(),
			Path::new("release/dev/subscriptions/shop-east.yaml")
		);
		assert_eq!(
			layout.placement_rule("dev", "east").unwrap(),
			Path::new("release/dev/placement-rules/east.yaml")
		);
	}

	#[test]
	fn test_paths_reject_traversal() {
		let layout = layout();
		assert!(layout.promotion_file("../shop").is_err());
		assert!(layout.values_file("shop", "dev", "../../x").is_err());
		assert!(layout.application_output("..", "shop").is_err());
	}
}
