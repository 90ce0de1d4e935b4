use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identity key of a link: `(source, target, relationship)`, direction-sensitive.
pub type LinkKey = (String, String, String);

/// A node as the backend sends it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	#[serde(
		default,
		deserialize_with = "opt_scalar_string",
		skip_serializing_if = "Option::is_none"
	)]
	pub id: Option<String>,
	#[serde(default)]
	pub name: String,
	/// Raw backend category, e.g. `crop` or `LiveMarketPrice`.
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub properties: Map<String, Value>,
}

impl GraphNode {
	pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: kind.into(),
			..Self::default()
		}
	}

	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}

	/// `id` when present, otherwise `name`.
	pub fn key(&self) -> &str {
		match self.id.as_deref() {
			Some(id) if !id.is_empty() => id,
			_ => &self.name,
		}
	}

	/// True when either the identity key or the name equals `needle`.
	pub fn answers_to(&self, needle: &str) -> bool {
		self.key() == needle || self.name == needle
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphLink {
	#[serde(deserialize_with = "scalar_string")]
	pub source: String,
	#[serde(deserialize_with = "scalar_string")]
	pub target: String,
	#[serde(default)]
	pub relationship: String,
}

impl GraphLink {
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		relationship: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relationship: relationship.into(),
		}
	}

	pub fn key(&self) -> LinkKey {
		(
			self.source.clone(),
			self.target.clone(),
			self.relationship.clone(),
		)
	}
}

/// Counters the full-snapshot endpoint reports alongside the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
	#[serde(default)]
	pub total_nodes: usize,
	#[serde(default)]
	pub total_relationships: usize,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub live_data_status: Option<String>,
}

/// A graph fragment: the full snapshot or one neighborhood response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stats: Option<GraphStats>,
}

impl GraphData {
	pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
		Self {
			nodes,
			links,
			stats: None,
		}
	}

	pub fn find(&self, needle: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.answers_to(needle))
	}

	/// Repairs what the backend occasionally sends half-filled: a nameless
	/// node borrows its id as name, a node with neither is dropped, and
	/// links with a blank endpoint are dropped.
	pub fn sanitize(mut self) -> Self {
		self.nodes.retain_mut(|node| {
			if node.name.trim().is_empty() {
				match node.id.as_deref() {
					Some(id) if !id.trim().is_empty() => node.name = id.to_string(),
					_ => return false,
				}
			}
			true
		});
		self.links
			.retain(|l| !l.source.trim().is_empty() && !l.target.trim().is_empty());
		self
	}

	/// Reported stats, or counted sizes when the backend omitted them.
	pub fn effective_stats(&self) -> GraphStats {
		self.stats.clone().unwrap_or_else(|| GraphStats {
			total_nodes: self.nodes.len(),
			total_relationships: self.links.len(),
			live_data_status: None,
		})
	}
}

/// One entry of the recent-events feed. Display only, never merged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveEvent {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub event_type: String,
	#[serde(default, deserialize_with = "opt_scalar_string")]
	pub severity: Option<String>,
	#[serde(default)]
	pub regions: Vec<String>,
	#[serde(default)]
	pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventsResponse {
	#[serde(default)]
	pub events: Vec<LiveEvent>,
}

/// Display-level grouping of nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Category {
	pub key: String,
	pub label: String,
	pub color: String,
}

fn scalar_to_string(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn scalar_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	Ok(scalar_to_string(Value::deserialize(de)?).unwrap_or_default())
}

fn opt_scalar_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
	Ok(Option::<Value>::deserialize(de)?.and_then(scalar_to_string))
}
