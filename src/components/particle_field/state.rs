use rand::Rng;

use super::types::{FieldConfig, REPEL_RADIUS, REPEL_STEP};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Drawn once at creation.
	pub radius: f64,
}

impl Particle {
	fn spawn<R: Rng + ?Sized>(config: &FieldConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let speed = config.speed.abs();
		Self {
			x: rng.gen_range(0.0..=width),
			y: rng.gen_range(0.0..=height),
			vx: rng.gen_range(-speed..=speed),
			vy: rng.gen_range(-speed..=speed),
			radius: rng.gen_range(config.radius_range.clone()),
		}
	}

	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	(a.0 - b.0).hypot(a.1 - b.1)
}

/// Mutable state of one mounted field. Rebuilt from scratch on every mount.
pub struct FieldState {
	pub config: FieldConfig,
	pub particles: Vec<Particle>,
	pub width: f64,
	pub height: f64,
	pointer: Option<(f64, f64)>,
}

impl FieldState {
	pub fn new<R: Rng + ?Sized>(config: FieldConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let (width, height) = (width.max(0.0), height.max(0.0));
		let particles = (0..config.particle_count)
			.map(|_| Particle::spawn(&config, width, height, rng))
			.collect();

		Self {
			config,
			particles,
			width,
			height,
			pointer: None,
		}
	}

	/// Particles keep their positions; bounds apply from the next step.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
	}

	pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
		self.pointer = pointer;
	}

	pub fn has_area(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// The pointer as the simulation sees it: absent when interaction is off
	/// or when the last report lies outside the canvas.
	pub fn active_pointer(&self) -> Option<(f64, f64)> {
		if !self.config.interaction_enabled {
			return None;
		}
		self.pointer.filter(|&(px, py)| {
			(0.0..=self.width).contains(&px) && (0.0..=self.height).contains(&py)
		})
	}

	/// Advances every particle by one frame: drift, pointer repulsion, reflection.
	pub fn step(&mut self) {
		let pointer = self.active_pointer();
		let (width, height) = (self.width, self.height);

		for p in &mut self.particles {
			p.x += p.vx;
			p.y += p.vy;

			if let Some(ptr) = pointer {
				let d = distance(p.position(), ptr);
				if d > 0.0 && d < REPEL_RADIUS {
					p.x += (p.x - ptr.0) / d * REPEL_STEP;
					p.y += (p.y - ptr.1) / d * REPEL_STEP;
				}
			}

			// Reflected velocity always points back inside the bounds.
			if p.x < 0.0 {
				p.vx = p.vx.abs();
			} else if p.x > width {
				p.vx = -p.vx.abs();
			}
			if p.y < 0.0 {
				p.vy = p.vy.abs();
			} else if p.y > height {
				p.vy = -p.vy.abs();
			}
		}
	}

	#[cfg(test)]
	pub(crate) fn with_particles(
		config: FieldConfig,
		width: f64,
		height: f64,
		particles: Vec<Particle>,
	) -> Self {
		Self {
			config,
			particles,
			width,
			height,
			pointer: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::particle_field::types::ColorMode;

	fn still(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius: 1.5,
		}
	}

	fn desktop() -> FieldConfig {
		FieldConfig::desktop(ColorMode::LightOnDark)
	}

	#[test]
	fn mount_yields_exact_population_within_ranges() {
		let mut rng = SmallRng::seed_from_u64(7);
		for count in [0, 1, 35, 80] {
			let config = FieldConfig {
				particle_count: count,
				..desktop()
			};
			let field = FieldState::new(config.clone(), 800.0, 600.0, &mut rng);
			assert_eq!(field.particles.len(), count);
			for p in &field.particles {
				assert!(config.radius_range.contains(&p.radius));
				assert!(p.vx.abs() <= config.speed && p.vy.abs() <= config.speed);
				assert!((0.0..=800.0).contains(&p.x) && (0.0..=600.0).contains(&p.y));
			}
		}
	}

	#[test]
	fn same_seed_same_field() {
		let a = FieldState::new(desktop(), 640.0, 480.0, &mut SmallRng::seed_from_u64(42));
		let b = FieldState::new(desktop(), 640.0, 480.0, &mut SmallRng::seed_from_u64(42));
		assert_eq!(a.particles, b.particles);
	}

	#[test]
	fn step_moves_by_velocity() {
		let mut field = FieldState::with_particles(
			desktop(),
			800.0,
			600.0,
			vec![Particle {
				vx: 0.25,
				vy: -0.5,
				..still(100.0, 100.0)
			}],
		);
		field.step();
		assert_eq!(field.particles[0].position(), (100.25, 99.5));
	}

	#[test]
	fn particles_never_stray_more_than_one_frame_outside() {
		let config = FieldConfig {
			interaction_enabled: false,
			..desktop()
		};
		let mut field = FieldState::new(config, 800.0, 600.0, &mut SmallRng::seed_from_u64(3));
		let slack = field.config.speed + 1e-9;
		for _ in 0..5_000 {
			field.step();
			for p in &field.particles {
				assert!(p.x >= -slack && p.x <= 800.0 + slack, "x = {}", p.x);
				assert!(p.y >= -slack && p.y <= 600.0 + slack, "y = {}", p.y);
			}
		}
	}

	#[test]
	fn repulsion_inside_radius_pushes_one_step() {
		let mut field = FieldState::with_particles(
			desktop(),
			800.0,
			600.0,
			vec![still(300.0 + REPEL_RADIUS - 1.0, 300.0)],
		);
		field.set_pointer(Some((300.0, 300.0)));
		field.step();
		let p = &field.particles[0];
		assert!((p.x - (300.0 + REPEL_RADIUS - 1.0 + REPEL_STEP)).abs() < 1e-9);
		assert_eq!(p.y, 300.0);
	}

	#[test]
	fn repulsion_outside_radius_is_ignored() {
		let mut field = FieldState::with_particles(
			desktop(),
			800.0,
			600.0,
			vec![still(300.0, 300.0 + REPEL_RADIUS + 1.0)],
		);
		field.set_pointer(Some((300.0, 300.0)));
		field.step();
		assert_eq!(field.particles[0].position(), (300.0, 300.0 + REPEL_RADIUS + 1.0));
	}

	#[test]
	fn repulsion_is_along_pointer_direction() {
		let mut field =
			FieldState::with_particles(desktop(), 800.0, 600.0, vec![still(330.0, 340.0)]);
		field.set_pointer(Some((300.0, 300.0)));
		field.step();
		let p = &field.particles[0];
		// 30-40-50 triangle
		assert!((p.x - (330.0 + 0.3)).abs() < 1e-9);
		assert!((p.y - (340.0 + 0.4)).abs() < 1e-9);
	}

	#[test]
	fn pointer_ignored_when_interaction_disabled_or_off_canvas() {
		let constrained = FieldConfig::constrained(ColorMode::LightOnDark);
		let mut field =
			FieldState::with_particles(constrained, 800.0, 600.0, vec![still(310.0, 300.0)]);
		field.set_pointer(Some((300.0, 300.0)));
		assert_eq!(field.active_pointer(), None);
		field.step();
		assert_eq!(field.particles[0].position(), (310.0, 300.0));

		let mut field =
			FieldState::with_particles(desktop(), 800.0, 600.0, vec![still(5.0, 5.0)]);
		field.set_pointer(Some((-1.0, 5.0)));
		assert_eq!(field.active_pointer(), None);
		field.step();
		assert_eq!(field.particles[0].position(), (5.0, 5.0));
	}

	#[test]
	fn pointer_on_top_of_particle_does_not_produce_nan() {
		let mut field =
			FieldState::with_particles(desktop(), 800.0, 600.0, vec![still(300.0, 300.0)]);
		field.set_pointer(Some((300.0, 300.0)));
		field.step();
		assert_eq!(field.particles[0].position(), (300.0, 300.0));
	}

	#[test]
	fn shrink_flips_velocity_without_teleporting() {
		let mut field = FieldState::with_particles(
			desktop(),
			800.0,
			600.0,
			vec![Particle {
				vx: 0.3,
				vy: 0.2,
				..still(750.0, 550.0)
			}],
		);
		field.resize(200.0, 150.0);
		field.step();

		let p = &field.particles[0];
		assert!((p.x - 750.3).abs() < 1e-9 && (p.y - 550.2).abs() < 1e-9);
		assert_eq!((p.vx, p.vy), (-0.3, -0.2));

		field.step();
		let p = &field.particles[0];
		assert!((p.x - 750.0).abs() < 1e-9 && (p.y - 550.0).abs() < 1e-9);
		assert_eq!((p.vx, p.vy), (-0.3, -0.2));
	}

	#[test]
	fn zero_area_field_steps_without_panicking() {
		let mut field = FieldState::new(desktop(), 0.0, 0.0, &mut SmallRng::seed_from_u64(1));
		assert!(!field.has_area());
		field.step();
		field.resize(-10.0, 50.0);
		assert_eq!((field.width, field.height), (0.0, 50.0));
	}
}
