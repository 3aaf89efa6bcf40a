use crate::error::{Result, RolloutError};
use crate::promotion::graph::PromotionGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Zones sharing one rollout priority, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneGroup {
	pub priority: i64,
	pub zones: Vec<String>,
}

/// Extracts priority-grouped zones for an environment.
#[derive(Debug, Clone, Copy)]
pub struct ZoneResolver<'a> {
	graph: &'a PromotionGraph,
}

impl<'a> ZoneResolver<'a> {
	pub fn new(graph: &'a PromotionGraph) -> Self {
		Self { graph }
	}

	/// Group the placements of `environment` by priority.
	///
	/// Uses the first step with that name that has a `placements` key. Groups
	/// come out in ascending priority. An empty `placements` list yields an
	/// empty result; if no step with that name declares placements the lookup
	/// fails with `EnvironmentNotFound`.
	pub fn zones_for(&self, environment: &str) -> Result<Vec<ZoneGroup>> {
		let steps = self.graph.non_empty_steps()?;
		let step = steps
			.iter()
			.find(|step| step.is_named(environment) && step.placements.is_some())
			.ok_or_else(|| RolloutError::EnvironmentNotFound {
				environment: environment.to_string(),
			})?;

		let mut buckets: BTreeMap<i64, Vec<String>> = BTreeMap::new();
		for placement in step.placements() {
			buckets
				.entry(placement.priority)
				.or_default()
				.push(placement.name.clone());
		}

		Ok(buckets
			.into_iter()
			.map(|(priority, zones)| ZoneGroup { priority, zones })
			.collect())
	}

	/// Every zone of `environment`, flattened in priority order.
	pub fn zone_names(&self, environment: &str) -> Result<Vec<String>> {
		Ok(self
			.zones_for(environment)?
			.into_iter()
			.flat_map(|group| group.zones)
			.collect())
	}
}
