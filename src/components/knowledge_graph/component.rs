use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::browser::PageDirection;
use super::client::{GraphSource, HttpGraphClient};
use super::expand::{NeighborStore, NeighborhoodExpander};
use super::render;
use super::state::{ExplorerState, LoadState, ViewMode};
use super::types::{Category, GraphData, LiveEvent};
use crate::config::ExplorerConfig;

impl NeighborStore for RwSignal<ExplorerState> {
	fn fold_neighbors(&self, fragment: GraphData) -> GraphData {
		self.update(|s| {
			s.merge_neighbors(fragment);
		});
		self.with_untracked(|s| s.neighbor_graph().cloned().unwrap_or_default())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hops {
	One,
	Two,
}

fn load_snapshot(client: HttpGraphClient, state: RwSignal<ExplorerState>) {
	state.update(|s| s.begin_load());
	spawn_local(async move {
		match client.full_graph().await {
			Ok(graph) => state.update(|s| s.set_snapshot(graph)),
			Err(err) => state.update(|s| s.fail_load(&err)),
		}
		match client.recent_events().await {
			Ok(events) => state.update(|s| s.set_events(events)),
			Err(err) => warn!("recent events unavailable: {err}"),
		}
	});
}

fn spawn_expansion(
	client: HttpGraphClient,
	config: ExplorerConfig,
	state: RwSignal<ExplorerState>,
	hops: Hops,
) {
	let Some(selection) = state.with_untracked(|s| s.selection().cloned()) else {
		return;
	};
	spawn_local(async move {
		let expander = NeighborhoodExpander::new(&client, &state, &config);
		match hops {
			Hops::One => {
				if let Err(err) = expander
					.expand_one_hop(&selection.name, expander.one_hop_limit())
					.await
				{
					warn!("expansion of {:?} failed: {err}", selection.name);
				}
			}
			Hops::Two => {
				expander.expand_two_hop(&selection.name).await;
			}
		}
	});
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Knowledge-graph explorer: category browser, canvas and detail panes.
#[component]
pub fn KnowledgeGraphExplorer(
	#[prop(default = ExplorerConfig::default())] config: ExplorerConfig,
) -> impl IntoView {
	let (width, height) = (config.canvas_width, config.canvas_height);
	let state = RwSignal::new(ExplorerState::new(&config));
	let client = StoredValue::new_local(HttpGraphClient::new(&config));
	let config = StoredValue::new_local(config);
	let hovered: RwSignal<Option<String>> = RwSignal::new(None);
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	load_snapshot(client.get_value(), state);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Ok(Some(ctx)) = canvas.get_context("2d") else {
			return;
		};
		let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
			return;
		};
		let layout = state.with(|s| s.layout());
		hovered.with(|h| render::render(&layout, h.as_deref(), width, height, &ctx));
	});

	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let picked = state.with_untracked(|s| s.layout().node_at(x, y).map(|p| p.node.clone()));
		if let Some(node) = picked {
			state.update(|s| s.select_node(&node));
			spawn_expansion(client.get_value(), config.get_value(), state, Hops::One);
		}
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let key = state.with_untracked(|s| {
			s.layout()
				.node_at(x, y)
				.map(|p| p.node.key().to_string())
		});
		if hovered.with_untracked(|h| *h != key) {
			hovered.set(key);
		}
	};

	let failure = move || match state.with(|s| s.load_state().clone()) {
		LoadState::Failed(msg) => Some(msg),
		_ => None,
	};

	let stats = move || {
		state
			.with(|s| s.stats())
			.map(|st| {
				let live = st
					.live_data_status
					.map(|l| format!(" · live data: {l}"))
					.unwrap_or_default();
				format!(
					"{} nodes · {} relationships{live}",
					st.total_nodes, st.total_relationships
				)
			})
			.unwrap_or_else(|| "Loading graph…".to_string())
	};

	let view_label = move || {
		state.with(|s| {
			let shown = s.layout().nodes.len();
			match (s.view_mode(), s.neighbor_graph(), s.base_snapshot()) {
				(ViewMode::Neighborhood, Some(graph), _) => format!(
					"Neighborhood: {shown} nodes, {} links merged",
					graph.links.len()
				),
				(_, _, Some(base)) => format!("Showing {shown} of {} snapshot nodes", base.nodes.len()),
				_ => String::new(),
			}
		})
	};

	let page_label = move || {
		state.with(|s| {
			let browser = s.browser();
			match browser.page_count() {
				0 => "No categories".to_string(),
				n => format!("{}/{}", browser.page() + 1, n),
			}
		})
	};

	let details = move || {
		state.with(|s| s.selected_details().cloned()).map(|node| {
			let category = state.with_untracked(|s| s.categorizer().categorize(&node));
			view! {
				<h3 style=format!("color: {}", category.color)>{node.name.clone()}</h3>
				<p class="kg-kind">{category.label}</p>
				<dl>
					{node
						.properties
						.iter()
						.map(|(k, v)| {
							let value = match v {
								serde_json::Value::String(s) => s.clone(),
								other => other.to_string(),
							};
							view! {
								<dt>{k.clone()}</dt>
								<dd>{value}</dd>
							}
						})
						.collect_view()}
				</dl>
			}
		})
	};

	view! {
		<div class="kg-explorer">
			<header class="kg-toolbar">
				<span class="kg-stats">{stats}</span>
				<span class="kg-view">{view_label}</span>
				<button
					disabled=move || state.with(|s| s.selection().is_none())
					on:click=move |_| {
						spawn_expansion(client.get_value(), config.get_value(), state, Hops::One)
					}
				>
					"Expand 1-hop"
				</button>
				<button
					disabled=move || state.with(|s| s.selection().is_none())
					on:click=move |_| {
						spawn_expansion(client.get_value(), config.get_value(), state, Hops::Two)
					}
				>
					"Expand 2-hop"
				</button>
				<button
					disabled=move || state.with(|s| s.view_mode() == ViewMode::Category)
					on:click=move |_| state.update(|s| s.clear_neighbors())
				>
					"Clear neighbors"
				</button>
				<button
					disabled=move || state.with(|s| s.selection().is_none())
					on:click=move |_| state.update(|s| s.clear_selection())
				>
					"Clear selection"
				</button>
			</header>

			{move || {
				failure()
					.map(|msg| {
						view! {
							<div class="kg-error">
								<p>"Could not load the knowledge graph: " {msg}</p>
								<button on:click=move |_| {
									load_snapshot(client.get_value(), state)
								}>"Retry"</button>
							</div>
						}
					})
			}}

			<nav class="kg-categories">
				<button on:click=move |_| {
					state.update(|s| {
						s.page_categories(PageDirection::Previous);
					})
				}>"‹"</button>
				<For
					each=move || state.with(|s| s.browser().current_page().to_vec())
					key=|category: &Category| category.key.clone()
					children=move |category: Category| {
						let (key, click_key) = (category.key.clone(), category.key.clone());
						view! {
							<button
								class="kg-pill"
								class:active=move || state.with(|s| s.active_category() == Some(key.as_str()))
								style=format!("border-color: {}", category.color)
								on:click=move |_| {
									state.update(|s| {
										s.set_active_category(&click_key);
									})
								}
							>
								{category.label.clone()}
							</button>
						}
					}
				/>
				<span class="kg-page">{page_label}</span>
				<button on:click=move |_| {
					state.update(|s| {
						s.page_categories(PageDirection::Next);
					})
				}>"›"</button>
			</nav>

			<canvas
				node_ref=canvas_ref
				class="kg-canvas"
				on:click=on_click
				on:mousemove=on_mousemove
				style=move || {
					let cursor = if hovered.with(Option::is_some) { "pointer" } else { "default" };
					format!("display: block; cursor: {cursor};")
				}
			/>

			<aside class="kg-details">{details}</aside>

			<ul class="kg-events">
				<For
					each=move || state.with(|s| s.events().to_vec())
					key=|event: &LiveEvent| (event.name.clone(), event.timestamp.clone())
					children=move |event: LiveEvent| {
						let meta = [
							Some(event.event_type.clone()),
							event.severity.clone().map(|s| format!("severity {s}")),
							(!event.regions.is_empty()).then(|| event.regions.join(", ")),
							event.timestamp.clone(),
						]
							.into_iter()
							.flatten()
							.collect::<Vec<_>>()
							.join(" · ");
						view! {
							<li>
								<strong>{event.name.clone()}</strong>
								" "
								<span class="kg-event-meta">{meta}</span>
							</li>
						}
					}
				/>
			</ul>
		</div>
	}
}
