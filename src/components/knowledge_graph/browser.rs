use std::collections::HashSet;

use log::debug;

use super::categorize::EntityCategorizer;
use super::types::{Category, GraphData};

pub const CATEGORY_PAGE_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageDirection {
	Previous,
	Next,
}

impl PageDirection {
	fn step(self) -> isize {
		match self {
			Self::Previous => -1,
			Self::Next => 1,
		}
	}
}

/// Paged list of the categories present in the base snapshot, plus the
/// active filter.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBrowser {
	categories: Vec<Category>,
	active: Option<String>,
	page: usize,
	page_size: usize,
}

impl Default for CategoryBrowser {
	fn default() -> Self {
		Self::new(CATEGORY_PAGE_SIZE)
	}
}

impl CategoryBrowser {
	pub fn new(page_size: usize) -> Self {
		Self {
			categories: Vec::new(),
			active: None,
			page: 0,
			page_size: page_size.max(1),
		}
	}

	/// Rebuild the list from `snapshot` in first-seen order, skipping the
	/// reserved aggregate kinds. A stale active filter moves to the first
	/// category, or to none when the list is empty.
	pub fn recompute(&mut self, snapshot: &GraphData, categorizer: &EntityCategorizer) {
		let mut seen = HashSet::new();
		self.categories = snapshot
			.nodes
			.iter()
			.map(|node| categorizer.categorize(node))
			.filter(|category| !categorizer.is_reserved(category))
			.filter(|category| seen.insert(category.key.clone()))
			.collect();

		let still_present = self
			.active
			.as_deref()
			.is_some_and(|key| self.categories.iter().any(|c| c.key == key));
		if !still_present {
			let next = self.categories.first().map(|c| c.key.clone());
			debug!("active category {:?} -> {:?}", self.active, next);
			self.active = next;
		}
		self.page = self.effective_page(self.page as isize);
	}

	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	pub fn active(&self) -> Option<&str> {
		self.active.as_deref()
	}

	/// Only categories currently listed can become active.
	pub fn set_active(&mut self, key: &str) -> bool {
		if self.categories.iter().any(|c| c.key == key) {
			self.active = Some(key.to_string());
			true
		} else {
			false
		}
	}

	pub fn page_count(&self) -> usize {
		self.categories.len().div_ceil(self.page_size)
	}

	pub fn page(&self) -> usize {
		self.page
	}

	/// Map any index, negative or past the end, onto a valid page.
	pub fn effective_page(&self, index: isize) -> usize {
		match self.page_count() {
			0 => 0,
			count => index.rem_euclid(count as isize) as usize,
		}
	}

	/// Step one page in `direction`, wrapping at both ends.
	pub fn page_categories(&mut self, direction: PageDirection) -> usize {
		self.page = self.effective_page(self.page as isize + direction.step());
		self.page
	}

	pub fn current_page(&self) -> &[Category] {
		let start = (self.page * self.page_size).min(self.categories.len());
		let end = (start + self.page_size).min(self.categories.len());
		&self.categories[start..end]
	}
}
