use crate::error::{Result, RolloutError};
use crate::promotion::graph::{PromotionGraph, PromotionStep};

/// Answers first/next/previous questions about a promotion sequence.
///
/// Lookups match names exactly. With duplicate names the first occurrence
/// wins, since every scan stops at its first match.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
	graph: &'a PromotionGraph,
}

impl<'a> Navigator<'a> {
	pub fn new(graph: &'a PromotionGraph) -> Self {
		Self { graph }
	}

	/// Name of the first environment in the sequence.
	pub fn first_environment(&self) -> Result<&'a str> {
		let steps = self.graph.non_empty_steps()?;
		step_name(steps, 0)
	}

	/// Name of the environment after `current`.
	///
	/// `Ok(None)` means `current` is the last step; a name that never appears
	/// fails with `EnvironmentNotFound`.
	pub fn next_environment(&self, current: &str) -> Result<Option<&'a str>> {
		let steps = self.graph.non_empty_steps()?;
		let index = position_of(steps, current)?;
		if index + 1 == steps.len() {
			return Ok(None);
		}
		step_name(steps, index + 1).map(Some)
	}

	/// Name of the environment before `current`.
	///
	/// `Ok(None)` means `current` is the first step.
	pub fn previous_environment(&self, current: &str) -> Result<Option<&'a str>> {
		let steps = self.graph.non_empty_steps()?;
		let mut previous: Option<usize> = None;
		for (index, step) in steps.iter().enumerate() {
			if step.is_named(current) {
				return previous.map(|p| step_name(steps, p)).transpose();
			}
			previous = Some(index);
		}
		Err(not_found(current))
	}
}

fn position_of(steps: &[PromotionStep], name: &str) -> Result<usize> {
	steps
		.iter()
		.position(|step| step.is_named(name))
		.ok_or_else(|| not_found(name))
}

fn step_name(steps: &[PromotionStep], index: usize) -> Result<&str> {
	steps[index]
		.environment
		.as_deref()
		.ok_or(RolloutError::MissingEnvironmentName { index })
}

fn not_found(name: &str) -> RolloutError {
	RolloutError::EnvironmentNotFound {
		environment: name.to_string(),
	}
}
