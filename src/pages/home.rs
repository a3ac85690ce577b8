use leptos::prelude::*;

use crate::components::particle_field::ParticleField;
use crate::device::ConstrainedDevice;

/// Hero section with the particle background behind its content.
#[component]
pub fn Home() -> impl IntoView {
	let (dark, set_dark) = signal(true);
	let constrained = ConstrainedDevice::from_context();

	view! {
		<section
			class="hero"
			class:dark=move || dark.get()
			style="position: relative; min-height: 100vh; overflow: hidden;"
		>
			<div
				class="hero-background"
				style="position: absolute; inset: 0; opacity: 0.4; pointer-events: none;"
			>
				<ParticleField dark=dark constrained=constrained />
			</div>
			<div class="hero-content" style="position: relative;">
				<h1>"We build websites, apps and bots"</h1>
				<button on:click=move |_| set_dark.update(|d| *d = !*d)>
					{move || if dark.get() { "Light theme" } else { "Dark theme" }}
				</button>
			</div>
		</section>
	}
}
