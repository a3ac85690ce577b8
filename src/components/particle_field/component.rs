use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use super::lifecycle::{LoopGate, run_frame};
use super::render::CanvasSurface;
use super::state::FieldState;
use super::types::FieldConfig;

/// Full-viewport, transparent, click-through particle background.
///
/// Rebuilt from scratch whenever `dark` or `constrained` changes.
#[component]
pub fn ParticleField(
	#[prop(into)] dark: Signal<bool>,
	#[prop(into)] constrained: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle: Rc<RefCell<Option<FieldHandle>>> = Rc::new(RefCell::new(None));
	let disposed = Arc::new(AtomicBool::new(false));
	let disposed_init = disposed.clone();

	Effect::new(move |_| {
		let config = FieldConfig::for_host(dark.get(), constrained.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(mut previous) = handle.borrow_mut().take() {
			info!("Reconfiguring particle field");
			previous.unmount();
		}
		if disposed_init.load(Ordering::Relaxed) {
			return;
		}
		match mount_field(canvas, config, disposed_init.clone()) {
			Ok(mounted) => *handle.borrow_mut() = Some(mounted),
			Err(err) => warn!("Particle field disabled: {:?}", err),
		}
	});

	on_cleanup(move || disposed.store(true, Ordering::Relaxed));

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field"
			aria-hidden="true"
			style="position: fixed; inset: 0; width: 100vw; height: 100vh; display: block; pointer-events: none; background: transparent;"
		/>
	}
}

struct Listener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// Owns everything a running field registered with the browser.
pub struct FieldHandle {
	gate: LoopGate,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	listeners: Vec<Listener>,
}

impl FieldHandle {
	/// Stops the loop and releases the frame request and listeners. Safe to
	/// call any number of times.
	pub fn unmount(&mut self) {
		if self.gate.close() {
			debug!("Particle field unmounted");
		}
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		for listener in self.listeners.drain(..) {
			let _ = listener.target.remove_event_listener_with_callback(
				listener.kind,
				listener.callback.as_ref().unchecked_ref(),
			);
		}
		self.animate.borrow_mut().take();
	}
}

impl Drop for FieldHandle {
	fn drop(&mut self) {
		self.unmount();
	}
}

fn viewport_size(window: &Window) -> Result<(f64, f64), JsValue> {
	Ok((
		window.inner_width()?.as_f64().unwrap_or(0.0),
		window.inner_height()?.as_f64().unwrap_or(0.0),
	))
}

/// Sizes the backing store to `ratio` device pixels per unit and scales the
/// context so drawing stays in viewport units. Resetting the size clears the
/// transform, so both always happen together.
fn fit_canvas(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	(width, height): (f64, f64),
	ratio: f64,
) -> Result<(), JsValue> {
	canvas.set_width((width * ratio) as u32);
	canvas.set_height((height * ratio) as u32);
	ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
}

fn listen(
	target: &EventTarget,
	kind: &'static str,
	callback: impl FnMut(Event) + 'static,
) -> Result<Listener, JsValue> {
	let callback = Closure::<dyn FnMut(Event)>::new(callback);
	target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
	Ok(Listener {
		target: target.clone(),
		kind,
		callback,
	})
}

fn mount_field(
	canvas: HtmlCanvasElement,
	config: FieldConfig,
	disposed: Arc<AtomicBool>,
) -> Result<FieldHandle, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()?;

	let size = viewport_size(&window)?;
	let ratio = config.pixel_ratio(window.device_pixel_ratio());
	fit_canvas(&canvas, &ctx, size, ratio)?;

	debug!(
		"Mounting particle field: {} particles, link distance {}, {}x{} @{}x",
		config.particle_count, config.link_distance, size.0, size.1, ratio
	);
	let mut rng = SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64);
	let interaction = config.interaction_enabled;
	let state = Rc::new(RefCell::new(FieldState::new(config, size.0, size.1, &mut rng)));

	let mut handle = FieldHandle {
		gate: LoopGate::open(),
		frame_id: Rc::new(Cell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		listeners: Vec::new(),
	};

	let (state_resize, canvas_resize, ctx_resize) = (state.clone(), canvas.clone(), ctx.clone());
	handle.listeners.push(listen(&window, "resize", move |_| {
		let Some(win) = web_sys::window() else {
			return;
		};
		let Ok(size) = viewport_size(&win) else {
			return;
		};
		let mut s = state_resize.borrow_mut();
		let ratio = s.config.pixel_ratio(win.device_pixel_ratio());
		if let Err(err) = fit_canvas(&canvas_resize, &ctx_resize, size, ratio) {
			warn!("Particle field resize failed: {:?}", err);
		}
		s.resize(size.0, size.1);
	})?);

	if interaction {
		let (state_mm, canvas_mm) = (state.clone(), canvas.clone());
		handle.listeners.push(listen(&window, "mousemove", move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let rect = canvas_mm.get_bounding_client_rect();
			state_mm.borrow_mut().set_pointer(Some((
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			)));
		})?);

		let state_out = state.clone();
		handle.listeners.push(listen(&window, "mouseout", move |ev| {
			let left_page = ev
				.dyn_ref::<MouseEvent>()
				.is_some_and(|ev| ev.related_target().is_none());
			if left_page {
				state_out.borrow_mut().set_pointer(None);
			}
		})?);
	}

	let (gate, frame_id, animate_inner) = (
		handle.gate.clone(),
		handle.frame_id.clone(),
		handle.animate.clone(),
	);
	*handle.animate.borrow_mut() = Some(Closure::new(move || {
		frame_id.set(None);
		let stats = {
			let mut s = state.borrow_mut();
			run_frame(&gate, &disposed, &mut s, &mut CanvasSurface::new(&ctx))
		};
		let Some(stats) = stats else {
			return;
		};
		trace!(
			"frame: {} dots, {} pointer links, {} links, {} triangles ({} triples)",
			stats.dots,
			stats.pointer_links,
			stats.links,
			stats.triangles,
			stats.triple_checks
		);
		if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
			if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_id.set(Some(id));
			}
		}
	}));
	let first = handle
		.animate
		.borrow()
		.as_ref()
		.map(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));
	handle.frame_id.set(first.transpose()?);

	Ok(handle)
}
