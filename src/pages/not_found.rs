use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"404: Page not found"</h1>
		<p>
			"The editor lives at " <a href="/">"the home page"</a> "."
		</p>
	}
}
