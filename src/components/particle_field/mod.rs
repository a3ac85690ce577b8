//! Ambient particle background for the hero section.
//!
//! Renders drifting points on a transparent canvas with:
//! - Links between particles closer than the link distance, fading with range
//! - Pointer repulsion and pointer links on desktop
//! - Optional triangle "fog" between dense clusters
//! - A reduced configuration for touch and small-viewport devices
//!
//! # Example
//!
//! ```ignore
//! let (dark, _) = signal(true);
//! let (constrained, _) = signal(false);
//!
//! view! { <ParticleField dark=dark constrained=constrained /> }
//! ```

mod component;
mod lifecycle;
mod render;
mod state;
mod types;

pub use component::ParticleField;
