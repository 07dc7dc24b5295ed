use leptos::prelude::*;

use crate::components::graph_editor::GraphEditorCanvas;

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

			<div class="editor-page">
				<h1>"Weighted Graph Editor"</h1>
				<p class="subtitle">
					"Click nodes to select them, drag to reposition, then pick an algorithm and solve."
				</p>
				<GraphEditorCanvas />
			</div>
		</ErrorBoundary>
	}
}
