mod browser;
mod categorize;
mod client;
mod component;
mod expand;
mod layout;
mod merge;
mod render;
mod state;
mod types;

pub use component::KnowledgeGraphExplorer;
pub use merge::MergeLimits;
