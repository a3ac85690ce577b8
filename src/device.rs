//! Device classification shared by every page.

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Event;

/// Touch screens and narrow viewports get the reduced particle field.
const CONSTRAINED_QUERY: &str = "(max-width: 768px), (pointer: coarse)";

/// Context entry: whether this device gets the reduced particle field.
#[derive(Clone, Copy)]
pub struct ConstrainedDevice(pub ReadSignal<bool>);

impl ConstrainedDevice {
	/// The app-wide classification, or desktop when none was provided.
	pub fn from_context() -> ReadSignal<bool> {
		use_context::<Self>()
			.map(|Self(constrained)| constrained)
			.unwrap_or_else(|| signal(false).0)
	}
}

/// Starts tracking [`CONSTRAINED_QUERY`] and provides it as context. Called
/// once from `App`.
pub fn provide_constrained_device() {
	provide_context(ConstrainedDevice(watch_media_query(CONSTRAINED_QUERY)));
}

fn watch_media_query(media: &str) -> ReadSignal<bool> {
	let Some(query) = web_sys::window().and_then(|w| w.match_media(media).ok().flatten()) else {
		warn!("Media query {media:?} unavailable, assuming desktop");
		return signal(false).0;
	};
	let (matches, set_matches) = signal(query.matches());

	let query_cb = query.clone();
	let on_change =
		Closure::<dyn FnMut(Event)>::new(move |_| set_matches.set(query_cb.matches()));
	match query.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref()) {
		// Registered once per app, so the callback lives as long as the page.
		Ok(()) => on_change.forget(),
		Err(err) => warn!("Media query {media:?} listener not registered: {:?}", err),
	}

	matches
}
