use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

use super::types::{GraphData, GraphLink, GraphNode};

pub const MAX_MERGED_NODES: usize = 80;
pub const MAX_MERGED_LINKS: usize = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeLimits {
	pub max_nodes: usize,
	pub max_links: usize,
}

impl Default for MergeLimits {
	fn default() -> Self {
		Self {
			max_nodes: MAX_MERGED_NODES,
			max_links: MAX_MERGED_LINKS,
		}
	}
}

/// Fold `addition` into `base`.
///
/// Nodes dedupe on `id ?? name`, links on `(source, target, relationship)`.
/// A later entry replaces an earlier one in place, so the first-seen
/// position is kept. Both lists are then cut to the caps, keeping the
/// oldest entries. With no base the addition is kept as-is apart from
/// the same cut.
pub fn merge(base: Option<GraphData>, addition: GraphData, limits: MergeLimits) -> GraphData {
	let Some(base) = base else {
		let mut first = addition;
		first.nodes.truncate(limits.max_nodes);
		first.links.truncate(limits.max_links);
		return first;
	};

	let nodes = dedup_capped(
		base.nodes.into_iter().chain(addition.nodes),
		|n: &GraphNode| n.key().to_string(),
		limits.max_nodes,
	);
	let links = dedup_capped(
		base.links.into_iter().chain(addition.links),
		GraphLink::key,
		limits.max_links,
	);
	debug!("merged graph: {} nodes, {} links", nodes.len(), links.len());

	GraphData {
		nodes,
		links,
		stats: base.stats.or(addition.stats),
	}
}

fn dedup_capped<T, K, F>(items: impl Iterator<Item = T>, key: F, cap: usize) -> Vec<T>
where
	K: Eq + Hash,
	F: Fn(&T) -> K,
{
	let mut index: HashMap<K, usize> = HashMap::new();
	let mut out: Vec<T> = Vec::new();
	for item in items {
		let k = key(&item);
		match index.get(&k) {
			Some(&slot) => out[slot] = item,
			None => {
				index.insert(k, out.len());
				out.push(item);
			}
		}
	}
	out.truncate(cap);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph(names: &[&str], links: &[(&str, &str, &str)]) -> GraphData {
		GraphData::new(
			names.iter().map(|n| GraphNode::new(*n, "crop")).collect(),
			links
				.iter()
				.map(|(s, t, r)| GraphLink::new(*s, *t, *r))
				.collect(),
		)
	}

	#[test]
	fn first_merge_returns_addition_when_it_fits() {
		let g = graph(&["Rice", "BPH"], &[("Rice", "BPH", "AFFECTS")]);
		assert_eq!(merge(None, g.clone(), MergeLimits::default()), g);
	}

	#[test]
	fn first_merge_is_capped_too() {
		let big = GraphData::new(
			(0..100).map(|i| GraphNode::new(format!("n{i}"), "crop")).collect(),
			(0..200)
				.map(|i| GraphLink::new(format!("n{i}"), "hub", "R"))
				.collect(),
		);
		let merged = merge(None, big, MergeLimits::default());
		assert_eq!(merged.nodes.len(), MAX_MERGED_NODES);
		assert_eq!(merged.links.len(), MAX_MERGED_LINKS);
		assert_eq!(merged.nodes[0].name, "n0");
		assert_eq!(merged.nodes[79].name, "n79");
	}

	#[test]
	fn union_keyed_by_identity_with_addition_winning() {
		let a = GraphData::new(
			vec![
				GraphNode::new("Rice", "crop").with_property("season", "kharif"),
				GraphNode::new("BPH", "pest"),
			],
			vec![GraphLink::new("Rice", "BPH", "AFFECTS")],
		);
		let b = GraphData::new(
			vec![
				GraphNode::new("Rice", "crop").with_property("season", "rabi"),
				GraphNode::new("Blast", "disease"),
			],
			vec![
				GraphLink::new("Rice", "BPH", "AFFECTS"),
				GraphLink::new("Rice", "Blast", "SUSCEPTIBLE_TO"),
			],
		);
		let merged = merge(Some(a), b, MergeLimits::default());

		let names: Vec<_> = merged.nodes.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, ["Rice", "BPH", "Blast"]);
		assert_eq!(merged.nodes[0].properties["season"], "rabi");
		assert_eq!(merged.links.len(), 2);
	}

	#[test]
	fn id_takes_precedence_over_name() {
		let a = GraphData::new(vec![GraphNode::new("Rice", "crop").with_id("crop_0")], vec![]);
		let b = GraphData::new(vec![GraphNode::new("Rice", "crop")], vec![]);
		let merged = merge(Some(a), b, MergeLimits::default());
		assert_eq!(merged.nodes.len(), 2);
	}

	#[test]
	fn link_key_is_direction_sensitive() {
		let merged = merge(
			Some(graph(&["A", "B"], &[("A", "B", "R")])),
			graph(&[], &[("B", "A", "R"), ("A", "B", "S")]),
			MergeLimits::default(),
		);
		assert_eq!(merged.links.len(), 3);
	}

	#[test]
	fn self_merge_is_idempotent_under_caps() {
		let g = graph(&["Rice", "BPH", "Blast"], &[("Rice", "BPH", "AFFECTS")]);
		assert_eq!(merge(Some(g.clone()), g.clone(), MergeLimits::default()), g);
	}

	#[test]
	fn caps_keep_oldest_entries() {
		let limits = MergeLimits {
			max_nodes: 3,
			max_links: 1,
		};
		let merged = merge(
			Some(graph(&["a", "b"], &[("a", "b", "R")])),
			graph(&["c", "d", "e"], &[("c", "d", "R")]),
			limits,
		);
		let names: Vec<_> = merged.nodes.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, ["a", "b", "c"]);
		assert_eq!(merged.links, vec![GraphLink::new("a", "b", "R")]);
	}

	#[test]
	fn repeated_merges_never_exceed_default_caps() {
		let mut acc = None;
		for round in 0..10 {
			let nodes: Vec<_> = (0..30)
				.map(|i| GraphNode::new(format!("n{round}_{i}"), "pest"))
				.collect();
			let links: Vec<_> = (0..30)
				.map(|i| GraphLink::new(format!("n{round}_{i}"), "hub", "R"))
				.collect();
			acc = Some(merge(acc, GraphData::new(nodes, links), MergeLimits::default()));
		}
		let acc = acc.unwrap();
		assert!(acc.nodes.len() <= MAX_MERGED_NODES);
		assert!(acc.links.len() <= MAX_MERGED_LINKS);
		assert_eq!(acc.nodes.len(), MAX_MERGED_NODES);
		assert_eq!(acc.links.len(), MAX_MERGED_LINKS);
	}
}
