use std::collections::HashMap;
use std::f64::consts::PI;

use super::categorize::EntityCategorizer;
use super::types::{Category, GraphData, GraphLink, GraphNode};

pub const FILTERED_VIEW_LIMIT: usize = 12;
pub const NODE_RADIUS: f64 = 14.0;
/// Hit radius on a sparse ring. Crowded rings shrink it to half the gap
/// between neighbors so discs never overlap.
pub const HIT_RADIUS: f64 = 18.0;

/// The node a neighborhood ring is drawn around.
#[derive(Clone, Debug, PartialEq)]
pub enum CenterNode {
	/// Found among the neighbor graph's nodes.
	Resolved(GraphNode),
	/// The selection was not in any fetched fragment; only its name and
	/// type are known.
	Placeholder { name: String, kind: String },
}

impl CenterNode {
	pub fn name(&self) -> &str {
		match self {
			Self::Resolved(node) => &node.name,
			Self::Placeholder { name, .. } => name,
		}
	}

	fn to_node(&self) -> GraphNode {
		match self {
			Self::Resolved(node) => node.clone(),
			Self::Placeholder { name, kind } => GraphNode::new(name.clone(), kind.clone()),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub node: GraphNode,
	pub category: Category,
	pub x: f64,
	pub y: f64,
	pub is_center: bool,
}

/// A link whose endpoints both made it into the layout, by index.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedLink {
	pub source: usize,
	pub target: usize,
	pub relationship: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	pub nodes: Vec<PositionedNode>,
	pub links: Vec<PositionedLink>,
	pub center: Option<CenterNode>,
	pub hit_radius: f64,
}

impl Layout {
	/// Topmost node whose disc contains the point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<&PositionedNode> {
		self.nodes.iter().rev().find(|p| {
			let (dx, dy) = (p.x - x, p.y - y);
			(dx * dx + dy * dy).sqrt() < self.hit_radius
		})
	}
}

/// Places a bounded node set on a fixed-size canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPositioner {
	pub width: f64,
	pub height: f64,
	pub radius: f64,
	pub filtered_limit: usize,
}

impl Default for LayoutPositioner {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 520.0,
			radius: 200.0,
			filtered_limit: FILTERED_VIEW_LIMIT,
		}
	}
}

impl LayoutPositioner {
	fn center_point(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// `HIT_RADIUS`, or half the chord between adjacent nodes of an
	/// `n`-node ring when that is smaller.
	fn hit_radius(&self, n: usize) -> f64 {
		if n < 2 {
			return HIT_RADIUS;
		}
		let chord = 2.0 * self.radius * (PI / n as f64).sin();
		HIT_RADIUS.min(chord / 2.0)
	}

	fn ring_point(&self, i: usize, n: usize) -> (f64, f64) {
		let (cx, cy) = self.center_point();
		let angle = (i as f64) * 2.0 * PI / n.max(1) as f64;
		(cx + self.radius * angle.cos(), cy + self.radius * angle.sin())
	}

	/// Category-filtered view: at most `filtered_limit` nodes of the active
	/// category on a circle. No active category means no filter.
	pub fn filtered(
		&self,
		snapshot: &GraphData,
		active: Option<&str>,
		categorizer: &EntityCategorizer,
	) -> Layout {
		let picked: Vec<(GraphNode, Category)> = snapshot
			.nodes
			.iter()
			.map(|node| (node, categorizer.categorize(node)))
			.filter(|(_, category)| active.is_none_or(|key| category.key == key))
			.take(self.filtered_limit)
			.map(|(node, category)| (node.clone(), category))
			.collect();

		let n = picked.len();
		let nodes = picked
			.into_iter()
			.enumerate()
			.map(|(i, (node, category))| {
				let (x, y) = self.ring_point(i, n);
				PositionedNode {
					node,
					category,
					x,
					y,
					is_center: false,
				}
			})
			.collect();
		with_links(nodes, &snapshot.links, None, self.hit_radius(n))
	}

	/// Neighborhood view: the selected node in the middle, everything else
	/// on the ring around it.
	pub fn neighborhood(
		&self,
		graph: &GraphData,
		selected_name: &str,
		selected_kind: &str,
		categorizer: &EntityCategorizer,
	) -> Layout {
		let center = match graph.find(selected_name) {
			Some(node) => CenterNode::Resolved(node.clone()),
			None => CenterNode::Placeholder {
				name: selected_name.to_string(),
				kind: selected_kind.to_string(),
			},
		};

		let center_node = center.to_node();
		let (cx, cy) = self.center_point();
		let mut nodes = vec![PositionedNode {
			category: categorizer.categorize(&center_node),
			node: center_node,
			x: cx,
			y: cy,
			is_center: true,
		}];

		let ring: Vec<&GraphNode> = graph
			.nodes
			.iter()
			.filter(|node| !node.answers_to(selected_name))
			.collect();
		let n = ring.len();
		nodes.extend(ring.into_iter().enumerate().map(|(i, node)| {
			let (x, y) = self.ring_point(i, n);
			PositionedNode {
				node: node.clone(),
				category: categorizer.categorize(node),
				x,
				y,
				is_center: false,
			}
		}));
		with_links(nodes, &graph.links, Some(center), self.hit_radius(n))
	}
}

/// Keep only links with both endpoints placed. Endpoints may reference a
/// node by key or by name.
fn with_links(
	nodes: Vec<PositionedNode>,
	links: &[GraphLink],
	center: Option<CenterNode>,
	hit_radius: f64,
) -> Layout {
	let mut index: HashMap<&str, usize> = HashMap::new();
	for (i, p) in nodes.iter().enumerate() {
		index.entry(p.node.name.as_str()).or_insert(i);
	}
	for (i, p) in nodes.iter().enumerate() {
		index.insert(p.node.key(), i);
	}

	let links = links
		.iter()
		.filter_map(|link| {
			let source = *index.get(link.source.as_str())?;
			let target = *index.get(link.target.as_str())?;
			Some(PositionedLink {
				source,
				target,
				relationship: link.relationship.clone(),
			})
		})
		.collect();

	Layout {
		nodes,
		links,
		center,
		hit_radius,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn two_unlinked_nodes_on_the_circle() {
		let snapshot = GraphData::new(
			vec![GraphNode::new("Rice", "crop"), GraphNode::new("BPH", "pest")],
			vec![],
		);
		let layout = LayoutPositioner::default().filtered(&snapshot, None, &EntityCategorizer::default());
		assert_eq!(layout.nodes.len(), 2);
		assert!(layout.links.is_empty());
		for p in &layout.nodes {
			let (dx, dy) = (p.x - 400.0, p.y - 260.0);
			assert!(close((dx * dx + dy * dy).sqrt(), 200.0));
		}
	}

	#[test]
	fn filtered_view_is_capped_and_category_scoped() {
		let mut nodes: Vec<_> = (0..20).map(|i| GraphNode::new(format!("crop{i}"), "crop")).collect();
		nodes.push(GraphNode::new("BPH", "pest"));
		let snapshot = GraphData::new(nodes, vec![]);
		let categorizer = EntityCategorizer::default();
		let positioner = LayoutPositioner::default();

		let crops = positioner.filtered(&snapshot, Some("crop"), &categorizer);
		assert_eq!(crops.nodes.len(), FILTERED_VIEW_LIMIT);
		assert!(crops.nodes.iter().all(|p| p.category.key == "crop"));

		let pests = positioner.filtered(&snapshot, Some("pest"), &categorizer);
		assert_eq!(pests.nodes.len(), 1);
	}

	#[test]
	fn links_resolve_by_id_or_name_and_dangling_ones_are_skipped() {
		let snapshot = GraphData::new(
			vec![
				GraphNode::new("Rice", "crop").with_id("crop_0"),
				GraphNode::new("Wheat", "crop").with_id("crop_1"),
			],
			vec![
				GraphLink::new("crop_0", "Wheat", "ROTATES_WITH"),
				GraphLink::new("crop_0", "pest_9", "AFFECTED_BY"),
			],
		);
		let layout = LayoutPositioner::default().filtered(&snapshot, Some("crop"), &EntityCategorizer::default());
		assert_eq!(layout.links.len(), 1);
		assert_eq!((layout.links[0].source, layout.links[0].target), (0, 1));
	}

	#[test]
	fn neighborhood_centers_the_resolved_selection() {
		let graph = GraphData::new(
			vec![
				GraphNode::new("BPH", "pest"),
				GraphNode::new("Rice", "crop"),
				GraphNode::new("Blast", "disease"),
			],
			vec![GraphLink::new("Rice", "BPH", "AFFECTS")],
		);
		let layout = LayoutPositioner::default().neighborhood(&graph, "Rice", "crop", &EntityCategorizer::default());

		assert!(matches!(layout.center, Some(CenterNode::Resolved(ref n)) if n.name == "Rice"));
		assert_eq!(layout.nodes.len(), 3);
		let center = &layout.nodes[0];
		assert!(center.is_center);
		assert!(close(center.x, 400.0) && close(center.y, 260.0));
		assert_eq!(layout.links.len(), 1);
		assert_eq!(layout.links[0].source, 0);
	}

	#[test]
	fn missing_selection_becomes_a_placeholder() {
		let graph = GraphData::new(vec![GraphNode::new("BPH", "pest")], vec![]);
		let layout = LayoutPositioner::default().neighborhood(&graph, "Rice", "crop", &EntityCategorizer::default());
		match &layout.center {
			Some(CenterNode::Placeholder { name, kind }) => {
				assert_eq!(name, "Rice");
				assert_eq!(kind, "crop");
			}
			other => panic!("expected placeholder, got {other:?}"),
		}
		assert_eq!(layout.nodes[0].category.key, "crop");
		assert_eq!(layout.nodes.len(), 2);
	}

	#[test]
	fn hit_test_finds_the_node_under_the_pointer() {
		let graph = GraphData::new(vec![GraphNode::new("BPH", "pest")], vec![]);
		let layout = LayoutPositioner::default().neighborhood(&graph, "Rice", "crop", &EntityCategorizer::default());
		assert_eq!(layout.node_at(402.0, 258.0).map(|p| p.node.name.as_str()), Some("Rice"));
		assert_eq!(layout.node_at(600.0, 260.0).map(|p| p.node.name.as_str()), Some("BPH"));
		assert!(layout.node_at(10.0, 10.0).is_none());
	}

	#[test]
	fn crowded_ring_picks_the_nearest_node() {
		let mut nodes = vec![GraphNode::new("Rice", "crop")];
		nodes.extend((0..79).map(|i| GraphNode::new(format!("n{i}"), "pest")));
		let graph = GraphData::new(nodes, vec![]);
		let layout = LayoutPositioner::default().neighborhood(&graph, "Rice", "crop", &EntityCategorizer::default());
		assert!(layout.hit_radius < 8.0);

		// n0 sits at (600, 260), n1 about 15.9px further along the ring.
		assert_eq!(layout.node_at(600.0, 265.0).map(|p| p.node.name.as_str()), Some("n0"));
		assert_eq!(layout.node_at(600.0, 271.0).map(|p| p.node.name.as_str()), Some("n1"));
	}
}
