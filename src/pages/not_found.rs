use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="not-found">
			<h1>"Page not found"</h1>
			<a href="/">"Back to the home page"</a>
		</section>
	}
}
