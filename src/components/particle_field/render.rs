use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{FieldState, distance};
use super::types::{DOT_ALPHA, MAX_LINK_ALPHA, Rgba, TRIANGLE_ALPHA_FACTOR};

type Point = (f64, f64);

/// Anything the field can be drawn onto.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);
	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba);
	fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgba);
}

pub struct CanvasSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Surface for CanvasSurface<'_> {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_circle(&mut self, (x, y): Point, radius: f64, color: Rgba) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
	}

	fn stroke_line(&mut self, from: Point, to: Point, color: Rgba) {
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(1.0);
		self.ctx.begin_path();
		self.ctx.move_to(from.0, from.1);
		self.ctx.line_to(to.0, to.1);
		self.ctx.stroke();
	}

	fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgba) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.begin_path();
		self.ctx.move_to(a.0, a.1);
		self.ctx.line_to(b.0, b.1);
		self.ctx.line_to(c.0, c.1);
		self.ctx.close_path();
		self.ctx.fill();
	}
}

/// Draw calls issued by one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	pub dots: usize,
	pub pointer_links: usize,
	pub links: usize,
	pub triangles: usize,
	/// Third-particle candidates examined by the triangle pass.
	pub triple_checks: usize,
}

/// Linear fade from [`MAX_LINK_ALPHA`] at distance zero to nothing at `reach`.
pub fn link_alpha(distance: f64, reach: f64) -> Option<f64> {
	if distance < reach {
		Some(MAX_LINK_ALPHA * (1.0 - distance / reach))
	} else {
		None
	}
}

pub fn render(state: &FieldState, surface: &mut impl Surface) -> FrameStats {
	let mut stats = FrameStats::default();
	if !state.has_area() {
		return stats;
	}
	surface.clear(state.width, state.height);

	draw_dots(state, surface, &mut stats);
	draw_pointer_links(state, surface, &mut stats);
	draw_links(state, surface, &mut stats);
	if state.config.triangles_enabled {
		draw_triangles(state, surface, &mut stats);
	}
	stats
}

fn draw_dots(state: &FieldState, surface: &mut impl Surface, stats: &mut FrameStats) {
	let color = state.config.color_mode.tint(DOT_ALPHA);
	for p in &state.particles {
		surface.fill_circle(p.position(), p.radius, color);
		stats.dots += 1;
	}
}

fn draw_pointer_links(state: &FieldState, surface: &mut impl Surface, stats: &mut FrameStats) {
	let Some(pointer) = state.active_pointer() else {
		return;
	};
	let reach = state.config.pointer_link_distance();
	for p in &state.particles {
		if let Some(alpha) = link_alpha(distance(pointer, p.position()), reach) {
			surface.stroke_line(pointer, p.position(), state.config.color_mode.tint(alpha));
			stats.pointer_links += 1;
		}
	}
}

fn draw_links(state: &FieldState, surface: &mut impl Surface, stats: &mut FrameStats) {
	let reach = state.config.link_distance;
	let particles = &state.particles;
	for (i, a) in particles.iter().enumerate() {
		for b in &particles[i + 1..] {
			if let Some(alpha) = link_alpha(distance(a.position(), b.position()), reach) {
				let color = state.config.color_mode.tint(alpha);
				surface.stroke_line(a.position(), b.position(), color);
				stats.links += 1;
			}
		}
	}
}

/// Density fog: every linked pair (i, j) extends to each later k that sits
/// within the tighter triangle distance of j. O(n³) in the worst case.
fn draw_triangles(state: &FieldState, surface: &mut impl Surface, stats: &mut FrameStats) {
	let (reach, tight) = (state.config.link_distance, state.config.triangle_distance());
	let particles = &state.particles;
	for (i, a) in particles.iter().enumerate() {
		for (j, b) in particles.iter().enumerate().skip(i + 1) {
			let Some(alpha) = link_alpha(distance(a.position(), b.position()), reach) else {
				continue;
			};
			let color = state.config.color_mode.tint(alpha * TRIANGLE_ALPHA_FACTOR);
			for c in &particles[j + 1..] {
				stats.triple_checks += 1;
				if distance(b.position(), c.position()) < tight {
					surface.fill_triangle(a.position(), b.position(), c.position(), color);
					stats.triangles += 1;
				}
			}
		}
	}
}
