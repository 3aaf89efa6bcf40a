//! Promotion sequence model and queries.
//!
//! This module handles:
//! - Building an immutable promotion graph from `promotion.yaml`
//! - First/next/previous environment navigation
//! - Priority-grouped zone extraction

pub mod graph;
pub mod navigator;
pub mod zones;

pub use graph::{Placement, PromotionGraph, PromotionStep};
pub use navigator::Navigator;
pub use zones::{ZoneGroup, ZoneResolver};
