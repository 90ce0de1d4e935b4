use leptos::prelude::*;

use crate::components::knowledge_graph::KnowledgeGraphExplorer;
use crate::config::ExplorerConfig;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="explorer-page">
				<div class="graph-overlay">
					<h1>"Crop Knowledge Graph"</h1>
					<p class="subtitle">
						"Pick a category, click a node to explore its neighborhood, expand two hops to go further."
					</p>
				</div>
				<KnowledgeGraphExplorer config=ExplorerConfig::load() />
			</div>
		</ErrorBoundary>
	}
}
