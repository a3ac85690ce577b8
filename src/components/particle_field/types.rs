use std::ops::RangeInclusive;

/// Particles pushed away from the pointer when closer than this.
pub const REPEL_RADIUS: f64 = 100.0;
/// Displacement applied per frame to a particle inside [`REPEL_RADIUS`].
pub const REPEL_STEP: f64 = 0.5;
/// Pointer links reach this much further than particle links.
pub const POINTER_LINK_EXTRA: f64 = 50.0;
/// Alpha of a link at distance zero.
pub const MAX_LINK_ALPHA: f64 = 80.0 / 255.0;
/// Alpha of every particle dot.
pub const DOT_ALPHA: f64 = 100.0 / 255.0;
/// Triangles are filled at this fraction of their first edge's alpha.
pub const TRIANGLE_ALPHA_FACTOR: f64 = 0.1;

/// Which way round particles contrast with the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
	/// White particles, used by the dark theme.
	#[default]
	LightOnDark,
	/// Black particles, used by the light theme.
	DarkOnLight,
}

impl ColorMode {
	/// Maps the host's dark-theme flag.
	pub fn from_dark(dark: bool) -> Self {
		if dark {
			Self::LightOnDark
		} else {
			Self::DarkOnLight
		}
	}

	/// Particle colour at the given alpha.
	pub fn tint(self, alpha: f64) -> Rgba {
		let v = match self {
			Self::LightOnDark => 255,
			Self::DarkOnLight => 0,
		};
		Rgba::new(v, v, v, alpha)
	}
}

/// Coarse device classification supplied by the host page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceClass {
	#[default]
	Desktop,
	/// Touch or small viewport: reduced population, no pointer, no triangles.
	Constrained,
}

impl DeviceClass {
	/// Maps the host's mobile flag.
	pub fn from_constrained(constrained: bool) -> Self {
		if constrained {
			Self::Constrained
		} else {
			Self::Desktop
		}
	}
}

/// Canvas colour; `a` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS `rgba(...)` string for the 2D context's style setters.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Snapshot of everything a mounted field needs. Never mutated while mounted;
/// a change means a full remount.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
	pub particle_count: usize,
	/// Particles closer than this are linked.
	pub link_distance: f64,
	/// Third-particle threshold for triangles is `link_distance - triangle_offset`.
	pub triangle_offset: f64,
	/// Pointer repulsion and pointer links.
	pub interaction_enabled: bool,
	/// The O(n³) triangle fog stage.
	pub triangles_enabled: bool,
	pub color_mode: ColorMode,
	/// Dot radii are drawn once from this range.
	pub radius_range: RangeInclusive<f64>,
	/// Velocity components are drawn from `[-speed, speed]`.
	pub speed: f64,
	/// Upper bound on the backing-store pixel ratio. `None` follows the display.
	pub max_pixel_ratio: Option<f64>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::desktop(ColorMode::default())
	}
}

impl FieldConfig {
	/// Full feature set: pointer interaction, triangle fog, native pixel ratio.
	pub fn desktop(color_mode: ColorMode) -> Self {
		Self {
			particle_count: 80,
			link_distance: 150.0,
			triangle_offset: 30.0,
			interaction_enabled: true,
			triangles_enabled: true,
			color_mode,
			radius_range: 1.0..=2.0,
			speed: 0.5,
			max_pixel_ratio: None,
		}
	}

	/// Fewer, shorter links; no pointer, no triangles, pixel ratio capped at 1.
	pub fn constrained(color_mode: ColorMode) -> Self {
		Self {
			particle_count: 35,
			link_distance: 110.0,
			interaction_enabled: false,
			triangles_enabled: false,
			max_pixel_ratio: Some(1.0),
			..Self::desktop(color_mode)
		}
	}

	/// Picks the preset for the host's current theme and device class.
	pub fn for_host(dark: bool, constrained: bool) -> Self {
		let color_mode = ColorMode::from_dark(dark);
		match DeviceClass::from_constrained(constrained) {
			DeviceClass::Desktop => Self::desktop(color_mode),
			DeviceClass::Constrained => Self::constrained(color_mode),
		}
	}

	/// Reach of the pointer links.
	pub fn pointer_link_distance(&self) -> f64 {
		self.link_distance + POINTER_LINK_EXTRA
	}

	pub fn triangle_distance(&self) -> f64 {
		self.link_distance - self.triangle_offset
	}

	/// Backing-store ratio for a display reporting `device_ratio`.
	pub fn pixel_ratio(&self, device_ratio: f64) -> f64 {
		let ratio = if device_ratio.is_finite() && device_ratio > 0.0 {
			device_ratio
		} else {
			1.0
		};
		match self.max_pixel_ratio {
			Some(cap) => ratio.min(cap),
			None => ratio,
		}
	}
}
