use log::{debug, warn};

use super::client::GraphSource;
use super::types::GraphData;
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};

/// Where expansions accumulate. Implementors merge the fragment into the
/// current neighbor graph and hand back the merged result.
pub trait NeighborStore {
	fn fold_neighbors(&self, fragment: GraphData) -> GraphData;
}

/// What a two-hop run managed before it finished or failed.
#[derive(Debug, Default)]
pub struct ExpansionReport {
	/// Fetches whose result was merged.
	pub merged: usize,
	/// The failure that stopped the run, already logged.
	pub failure: Option<ExplorerError>,
}

impl ExpansionReport {
	pub fn is_complete(&self) -> bool {
		self.failure.is_none()
	}
}

/// Drives neighborhood fetches and folds each response into a store.
///
/// Fetches are strictly sequential: the next request is issued only after
/// the previous response was merged. Nothing is cancelled; two overlapping
/// runs both merge, in completion order.
pub struct NeighborhoodExpander<'a, S, N> {
	source: &'a S,
	store: &'a N,
	one_hop_limit: u32,
	second_hop_limit: u32,
	fanout: usize,
}

impl<'a, S: GraphSource, N: NeighborStore> NeighborhoodExpander<'a, S, N> {
	pub fn new(source: &'a S, store: &'a N, config: &ExplorerConfig) -> Self {
		Self {
			source,
			store,
			one_hop_limit: config.one_hop_limit,
			second_hop_limit: config.second_hop_limit,
			fanout: config.second_hop_fanout,
		}
	}

	pub fn one_hop_limit(&self) -> u32 {
		self.one_hop_limit
	}

	/// Fetch the neighborhood of `name` and merge it. Returns the merged
	/// neighbor graph.
	pub async fn expand_one_hop(&self, name: &str, limit: u32) -> Result<GraphData> {
		let fragment = self.source.neighbors(name, limit).await?;
		debug!(
			"neighbors of {name:?}: {} nodes, {} links",
			fragment.nodes.len(),
			fragment.links.len()
		);
		Ok(self.store.fold_neighbors(fragment))
	}

	/// One hop around `name`, then one more hop around each of the first
	/// `fanout` other nodes of the merged result. A failure stops the run
	/// and leaves everything merged so far in place.
	pub async fn expand_two_hop(&self, name: &str) -> ExpansionReport {
		let mut report = ExpansionReport::default();

		let first = match self.expand_one_hop(name, self.one_hop_limit).await {
			Ok(graph) => graph,
			Err(err) => {
				warn!("expansion of {name:?} failed: {err}");
				report.failure = Some(err);
				return report;
			}
		};
		report.merged += 1;

		let frontier: Vec<String> = first
			.nodes
			.iter()
			.filter(|node| !node.answers_to(name))
			.take(self.fanout)
			.map(|node| node.name.clone())
			.collect();

		for neighbor in frontier {
			if let Err(err) = self.expand_one_hop(&neighbor, self.second_hop_limit).await {
				warn!("second hop from {name:?} via {neighbor:?} failed: {err}");
				report.failure = Some(err);
				break;
			}
			report.merged += 1;
		}
		report
	}
}
