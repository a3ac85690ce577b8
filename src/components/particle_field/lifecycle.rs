use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::render::{self, FrameStats, Surface};
use super::state::FieldState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	Unmounted,
	Running,
}

/// Shared between a field's handle and its frame callback. A callback queued
/// before teardown checks the gate first and does nothing once it is closed.
#[derive(Clone, Debug, Default)]
pub struct LoopGate(Rc<Cell<LoopState>>);

impl LoopGate {
	pub fn open() -> Self {
		Self(Rc::new(Cell::new(LoopState::Running)))
	}

	pub fn state(&self) -> LoopState {
		self.0.get()
	}

	pub fn is_running(&self) -> bool {
		self.state() == LoopState::Running
	}

	/// Returns whether the gate was open.
	pub fn close(&self) -> bool {
		self.0.replace(LoopState::Unmounted) == LoopState::Running
	}
}

/// One animation frame. Returns `None` without touching the field when the
/// gate is closed or the owning component is gone; the latter also closes the
/// gate so no further frame is requested.
pub fn run_frame(
	gate: &LoopGate,
	disposed: &AtomicBool,
	state: &mut FieldState,
	surface: &mut impl Surface,
) -> Option<FrameStats> {
	if !gate.is_running() {
		return None;
	}
	if disposed.load(Ordering::Relaxed) {
		gate.close();
		debug!("Particle field disposed");
		return None;
	}
	state.step();
	Some(render::render(state, surface))
}
