//! Explorer configuration: backend location, merge caps and view geometry.

use log::warn;
use serde::Deserialize;

use crate::components::knowledge_graph::MergeLimits;
use crate::error::{ExplorerError, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Tunables for the knowledge-graph explorer.
///
/// Every field has a default, so a JSON override only needs the keys it
/// changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	/// Base URL of the advisory backend, without trailing slash.
	pub api_base_url: String,
	/// Node cap applied after every neighbor merge.
	pub max_nodes: usize,
	/// Link cap applied after every neighbor merge.
	pub max_links: usize,
	/// Neighbor limit for the first hop.
	pub one_hop_limit: u32,
	/// Neighbor limit for each second-hop fetch.
	pub second_hop_limit: u32,
	/// How many first-hop neighbors get expanded again.
	pub second_hop_fanout: usize,
	/// Categories shown per page.
	pub page_size: usize,
	/// Nodes placed in the category-filtered view.
	pub filtered_view_limit: usize,
	/// Canvas width in pixels.
	pub canvas_width: f64,
	/// Canvas height in pixels.
	pub canvas_height: f64,
	/// Radius of the layout ring.
	pub ring_radius: f64,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_base_url: option_env!("AGRI_API_URL")
				.unwrap_or(DEFAULT_API_URL)
				.to_string(),
			max_nodes: 80,
			max_links: 160,
			one_hop_limit: 24,
			second_hop_limit: 16,
			second_hop_fanout: 6,
			page_size: 3,
			filtered_view_limit: 12,
			canvas_width: 800.0,
			canvas_height: 520.0,
			ring_radius: 200.0,
		}
	}
}

impl ExplorerConfig {
	/// Parse a (possibly partial) JSON override on top of the defaults.
	pub fn from_json(raw: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(raw)?;
		config.validate()?;
		Ok(config)
	}

	/// Defaults, overridden by the JSON in `AGRI_EXPLORER_CONFIG` when the
	/// build set it. A bad override is logged and ignored.
	pub fn load() -> Self {
		match option_env!("AGRI_EXPLORER_CONFIG") {
			Some(raw) => Self::from_json(raw).unwrap_or_else(|err| {
				warn!("ignoring AGRI_EXPLORER_CONFIG: {err}");
				Self::default()
			}),
			None => Self::default(),
		}
	}

	/// Reject values the engine cannot work with.
	pub fn validate(&self) -> Result<()> {
		if self.api_base_url.trim().is_empty() {
			return Err(ExplorerError::Config("api_base_url is empty".into()));
		}
		if self.max_nodes == 0 || self.max_links == 0 {
			return Err(ExplorerError::Config("merge caps must be positive".into()));
		}
		if self.page_size == 0 {
			return Err(ExplorerError::Config("page_size must be positive".into()));
		}
		if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 || self.ring_radius <= 0.0 {
			return Err(ExplorerError::Config(
				"canvas dimensions and ring radius must be positive".into(),
			));
		}
		Ok(())
	}

	/// Caps handed to the merger.
	pub fn merge_limits(&self) -> MergeLimits {
		MergeLimits {
			max_nodes: self.max_nodes,
			max_links: self.max_links,
		}
	}

	/// Base URL with any trailing slash removed.
	pub fn base_url(&self) -> &str {
		self.api_base_url.trim_end_matches('/')
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_engine_constants() {
		let config = ExplorerConfig::default();
		assert_eq!(config.max_nodes, 80);
		assert_eq!(config.max_links, 160);
		assert_eq!(config.one_hop_limit, 24);
		assert_eq!(config.second_hop_limit, 16);
		assert_eq!(config.second_hop_fanout, 6);
		assert_eq!(config.page_size, 3);
		assert_eq!(config.filtered_view_limit, 12);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config =
			ExplorerConfig::from_json(r#"{"api_base_url": "https://agri.example/", "page_size": 5}"#)
				.unwrap();
		assert_eq!(config.base_url(), "https://agri.example");
		assert_eq!(config.page_size, 5);
		assert_eq!(config.max_nodes, 80);
	}

	#[test]
	fn zero_page_size_is_rejected() {
		let err = ExplorerConfig::from_json(r#"{"page_size": 0}"#).unwrap_err();
		assert!(matches!(err, ExplorerError::Config(_)));
	}

	#[test]
	fn garbage_json_is_a_decode_error() {
		let err = ExplorerConfig::from_json("{not json").unwrap_err();
		assert!(matches!(err, ExplorerError::Decode(_)));
	}
}
