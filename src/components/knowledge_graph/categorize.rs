use super::types::{Category, GraphNode};

pub const FALLBACK_COLOR: &str = "#9e9e9e";

/// Aggregate bookkeeping kinds the backend keeps for live feeds. They may
/// show up as neighbors but are never offered as a category.
pub const RESERVED_CATEGORY_KEYS: &[&str] = &["liveweatherdata", "livemarketprice"];

const TYPE_PALETTE: &[(&str, &str)] = &[
	("crop", "#4caf50"),
	("pest", "#e53935"),
	("disease", "#8e24aa"),
	("region", "#1e88e5"),
	("controlmethod", "#fb8c00"),
	("fertilizer", "#6d4c41"),
];

/// Canonical (normalized) names of synthetic and live entities and the
/// category they belong to, regardless of their declared type.
const SPECIAL_ENTITIES: &[(&[&str], &str, &str, &str)] = &[
	(
		&["liveweather", "liveweatherdata", "weatherdata"],
		"liveweatherdata",
		"Live Weather",
		"#4fc3f7",
	),
	(
		&["livemarketprice", "livemarketprices", "marketprice", "marketprices"],
		"livemarketprice",
		"Market Prices",
		"#ffb300",
	),
	(
		&["liveevent", "liveevents", "recentevents"],
		"liveevent",
		"Live Events",
		"#ff7043",
	),
	(&["marketdata"], "marketdata", "Market Data", "#fdd835"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialEntity {
	pub names: Vec<String>,
	pub category: Category,
}

/// The lookup tables behind categorization. Swap it to evolve the taxonomy
/// without touching merge or layout code.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTable {
	pub specials: Vec<SpecialEntity>,
	pub palette: Vec<(String, String)>,
	pub fallback_color: String,
	pub reserved: Vec<String>,
}

impl Default for CategoryTable {
	fn default() -> Self {
		Self {
			specials: SPECIAL_ENTITIES
				.iter()
				.map(|(names, key, label, color)| SpecialEntity {
					names: names.iter().map(|n| n.to_string()).collect(),
					category: Category {
						key: key.to_string(),
						label: label.to_string(),
						color: color.to_string(),
					},
				})
				.collect(),
			palette: TYPE_PALETTE
				.iter()
				.map(|(t, c)| (t.to_string(), c.to_string()))
				.collect(),
			fallback_color: FALLBACK_COLOR.to_string(),
			reserved: RESERVED_CATEGORY_KEYS.iter().map(|k| k.to_string()).collect(),
		}
	}
}

/// Lower-case and strip all whitespace.
pub fn normalize(raw: &str) -> String {
	raw.chars()
		.filter(|c| !c.is_whitespace())
		.flat_map(char::to_lowercase)
		.collect()
}

fn capitalize(raw: &str) -> String {
	let mut chars = raw.trim().chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Maps nodes to display categories.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityCategorizer {
	table: CategoryTable,
}

impl EntityCategorizer {
	pub fn new(table: CategoryTable) -> Self {
		Self { table }
	}

	pub fn categorize(&self, node: &GraphNode) -> Category {
		self.categorize_parts(&node.kind, &node.name)
	}

	/// Pure in (normalized type, normalized name).
	pub fn categorize_parts(&self, kind: &str, name: &str) -> Category {
		let (kind_norm, name_norm) = (normalize(kind), normalize(name));
		if let Some(special) = self.special(&name_norm).or_else(|| self.special(&kind_norm)) {
			return special.category.clone();
		}
		if kind_norm.is_empty() {
			return Category {
				key: "unknown".into(),
				label: "Unknown".into(),
				color: self.table.fallback_color.clone(),
			};
		}
		let color = self
			.table
			.palette
			.iter()
			.find(|(t, _)| *t == kind_norm)
			.map(|(_, c)| c.clone())
			.unwrap_or_else(|| self.table.fallback_color.clone());
		Category {
			label: capitalize(&kind_norm),
			key: kind_norm,
			color,
		}
	}

	pub fn is_reserved(&self, category: &Category) -> bool {
		self.table.reserved.iter().any(|k| *k == category.key)
	}

	fn special(&self, normalized: &str) -> Option<&SpecialEntity> {
		if normalized.is_empty() {
			return None;
		}
		self.table
			.specials
			.iter()
			.find(|s| s.names.iter().any(|n| n == normalized))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_types_use_palette_and_capitalized_label() {
		let c = EntityCategorizer::default().categorize(&GraphNode::new("Rice", "crop"));
		assert_eq!(c.key, "crop");
		assert_eq!(c.label, "Crop");
		assert_eq!(c.color, "#4caf50");
	}

	#[test]
	fn unknown_type_falls_back_to_gray() {
		let c = EntityCategorizer::default().categorize(&GraphNode::new("Loam", "Soil Type"));
		assert_eq!(c.key, "soiltype");
		assert_eq!(c.label, "Soiltype");
		assert_eq!(c.color, FALLBACK_COLOR);
	}

	#[test]
	fn special_name_overrides_declared_type() {
		let c = EntityCategorizer::default().categorize(&GraphNode::new("Live Events", "region"));
		assert_eq!(c.key, "liveevent");
		assert_eq!(c.label, "Live Events");
	}

	#[test]
	fn live_types_land_in_reserved_categories() {
		let categorizer = EntityCategorizer::default();
		let weather = categorizer.categorize(&GraphNode::new("Unknown", "LiveWeatherData"));
		let market = categorizer.categorize(&GraphNode::new("Market Prices", "crop"));
		assert!(categorizer.is_reserved(&weather));
		assert!(categorizer.is_reserved(&market));
		assert!(!categorizer.is_reserved(&categorizer.categorize(&GraphNode::new("BPH", "pest"))));
	}

	#[test]
	fn normalization_makes_categorization_pure() {
		let categorizer = EntityCategorizer::default();
		let a = categorizer.categorize_parts("Control Method", "Neem Oil");
		let b = categorizer.categorize_parts("control method", "Neem Oil");
		assert_eq!(a, b);
		assert_eq!(a, categorizer.categorize_parts("Control Method", "Neem Oil"));
		assert_eq!(a.key, "controlmethod");
		assert_eq!(a.color, "#fb8c00");
	}

	#[test]
	fn empty_type_is_unknown() {
		let c = EntityCategorizer::default().categorize(&GraphNode::new("Mystery", ""));
		assert_eq!(c.key, "unknown");
	}

	#[test]
	fn custom_table_is_honoured() {
		let mut table = CategoryTable::default();
		table.palette.push(("soiltype".into(), "#795548".into()));
		let c = EntityCategorizer::new(table).categorize_parts("Soil Type", "Loam");
		assert_eq!(c.color, "#795548");
	}
}
