//! Rollout - promotion-graph navigation and manifest rendering for
//! multi-environment, multi-zone deployments.
//!
//! This library provides the core functionality for rollout, including:
//! - Promotion sequence loading and first/next/previous navigation
//! - Priority-grouped zone extraction per environment
//! - Shallow and deep merging of parameter and value mappings
//! - Template rendering of application and subscription manifests
//! - Placement rule validation
//!
//! # Example
//!
//! ```no_run
//! use rollout_cli::meta::{AppMeta, Layout};
//! use rollout_cli::promotion::{Navigator, ZoneResolver};
//!
//! let layout = Layout::new("meta", "release");
//! let mut meta = AppMeta::new(&layout, "shop");
//! let graph = meta.promotion().unwrap();
//!
//! let nav = Navigator::new(graph);
//! let first = nav.first_environment().unwrap();
//! println!("first environment: {first}");
//!
//! for group in ZoneResolver::new(graph).zones_for(first).unwrap() {
//!     println!("priority {}: {:?}", group.priority, group.zones);
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod meta;
pub mod promotion;
pub mod render;
pub mod validate;

pub use error::{Result, RolloutError};
