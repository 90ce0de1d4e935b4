use log::{debug, error, info};

use super::browser::{CategoryBrowser, PageDirection};
use super::categorize::EntityCategorizer;
use super::layout::{Layout, LayoutPositioner};
use super::merge::{MergeLimits, merge};
use super::types::{Category, GraphData, GraphNode, GraphStats, LiveEvent};
use crate::config::ExplorerConfig;
use crate::error::ExplorerError;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
	#[default]
	Idle,
	Loading,
	Ready,
	/// Blocking: the view shows the message and a retry action.
	Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
	pub name: String,
	pub kind: String,
}

impl From<&GraphNode> for Selection {
	fn from(node: &GraphNode) -> Self {
		Self {
			name: node.name.clone(),
			kind: node.kind.clone(),
		}
	}
}

/// Which projection is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
	Category,
	Neighborhood,
}

/// All explorer state in one place.
///
/// Every mutator bumps `revision`, so a presenter can poll for changes or
/// wrap the whole value in a reactive signal. `generation` counts neighbor
/// merges only.
#[derive(Clone, Debug)]
pub struct ExplorerState {
	limits: MergeLimits,
	categorizer: EntityCategorizer,
	positioner: LayoutPositioner,
	load: LoadState,
	base: Option<GraphData>,
	neighbors: Option<GraphData>,
	origin: Option<Selection>,
	selection: Option<Selection>,
	browser: CategoryBrowser,
	events: Vec<LiveEvent>,
	generation: u64,
	revision: u64,
}

impl ExplorerState {
	pub fn new(config: &ExplorerConfig) -> Self {
		Self::with_categorizer(config, EntityCategorizer::default())
	}

	pub fn with_categorizer(config: &ExplorerConfig, categorizer: EntityCategorizer) -> Self {
		Self {
			limits: config.merge_limits(),
			categorizer,
			positioner: LayoutPositioner {
				width: config.canvas_width,
				height: config.canvas_height,
				radius: config.ring_radius,
				filtered_limit: config.filtered_view_limit,
			},
			load: LoadState::Idle,
			base: None,
			neighbors: None,
			origin: None,
			selection: None,
			browser: CategoryBrowser::new(config.page_size),
			events: Vec::new(),
			generation: 0,
			revision: 0,
		}
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	// -- load --------------------------------------------------------------

	pub fn begin_load(&mut self) {
		self.load = LoadState::Loading;
		self.touch();
	}

	/// Replace the base snapshot wholesale and rederive the categories.
	pub fn set_snapshot(&mut self, snapshot: GraphData) {
		info!(
			"graph snapshot loaded: {} nodes, {} links",
			snapshot.nodes.len(),
			snapshot.links.len()
		);
		self.browser.recompute(&snapshot, &self.categorizer);
		self.base = Some(snapshot);
		self.load = LoadState::Ready;
		self.touch();
	}

	pub fn fail_load(&mut self, err: &ExplorerError) {
		error!("graph snapshot failed: {err}");
		self.load = LoadState::Failed(err.to_string());
		self.touch();
	}

	pub fn set_events(&mut self, events: Vec<LiveEvent>) {
		self.events = events;
		self.touch();
	}

	// -- read models -------------------------------------------------------

	pub fn load_state(&self) -> &LoadState {
		&self.load
	}

	pub fn base_snapshot(&self) -> Option<&GraphData> {
		self.base.as_ref()
	}

	pub fn neighbor_graph(&self) -> Option<&GraphData> {
		self.neighbors.as_ref()
	}

	pub fn categories(&self) -> &[Category] {
		self.browser.categories()
	}

	pub fn browser(&self) -> &CategoryBrowser {
		&self.browser
	}

	pub fn active_category(&self) -> Option<&str> {
		self.browser.active()
	}

	pub fn selection(&self) -> Option<&Selection> {
		self.selection.as_ref()
	}

	pub fn events(&self) -> &[LiveEvent] {
		&self.events
	}

	pub fn categorizer(&self) -> &EntityCategorizer {
		&self.categorizer
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn stats(&self) -> Option<GraphStats> {
		self.base.as_ref().map(GraphData::effective_stats)
	}

	/// The selected node as last fetched, neighbor graph first.
	pub fn selected_details(&self) -> Option<&GraphNode> {
		let name = &self.selection.as_ref()?.name;
		self.neighbors
			.as_ref()
			.and_then(|g| g.find(name))
			.or_else(|| self.base.as_ref().and_then(|g| g.find(name)))
	}

	pub fn view_mode(&self) -> ViewMode {
		if self.neighbors.is_some() {
			ViewMode::Neighborhood
		} else {
			ViewMode::Category
		}
	}

	/// Positions for whatever is on screen. A populated neighbor graph wins
	/// over the category view.
	pub fn layout(&self) -> Layout {
		if let Some(graph) = &self.neighbors {
			if let Some(center) = self.origin.as_ref().or(self.selection.as_ref()) {
				return self
					.positioner
					.neighborhood(graph, &center.name, &center.kind, &self.categorizer);
			}
			return self.positioner.filtered(graph, None, &self.categorizer);
		}
		match &self.base {
			Some(base) => self
				.positioner
				.filtered(base, self.browser.active(), &self.categorizer),
			None => Layout::default(),
		}
	}

	// -- operations --------------------------------------------------------

	pub fn select_node(&mut self, node: &GraphNode) {
		self.select(Selection::from(node));
	}

	pub fn select(&mut self, selection: Selection) {
		debug!("selected {:?}", selection.name);
		self.selection = Some(selection);
		self.touch();
	}

	/// Drops the selection; the neighbor graph stays.
	pub fn clear_selection(&mut self) {
		self.selection = None;
		self.touch();
	}

	/// Fold a fetched fragment into the neighbor graph, starting a new one
	/// when there is none. Last merge wins on conflicting keys.
	pub fn merge_neighbors(&mut self, fragment: GraphData) -> &GraphData {
		if self.neighbors.is_none() {
			self.origin = self.selection.clone();
		}
		let merged = merge(self.neighbors.take(), fragment, self.limits);
		self.generation += 1;
		self.touch();
		self.neighbors.insert(merged)
	}

	pub fn clear_neighbors(&mut self) {
		self.neighbors = None;
		self.origin = None;
		self.touch();
	}

	pub fn set_active_category(&mut self, key: &str) -> bool {
		let changed = self.browser.set_active(key);
		if changed {
			self.touch();
		}
		changed
	}

	pub fn page_categories(&mut self, direction: PageDirection) -> usize {
		let page = self.browser.page_categories(direction);
		self.touch();
		page
	}
}
