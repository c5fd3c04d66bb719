//! Particle records and the sampled ranges used to build them.

use rand::{Rng, RngCore};
use serde::Deserialize;

/// A closed `[min, max]` range for randomized particle attributes.
///
/// Deserializes from a two-element array, e.g. `[0.3, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "(f64, f64)")]
pub struct Span {
	/// Lower endpoint.
	pub min: f64,
	/// Upper endpoint.
	pub max: f64,
}

impl Span {
	/// Builds a span, ordering the endpoints.
	pub const fn new(a: f64, b: f64) -> Self {
		if a <= b {
			Self { min: a, max: b }
		} else {
			Self { min: b, max: a }
		}
	}

	/// A span that always samples `value`.
	pub const fn point(value: f64) -> Self {
		Self {
			min: value,
			max: value,
		}
	}

	/// Draws a value from the span. Degenerate spans return `min` exactly.
	pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
		if self.max - self.min <= f64::EPSILON {
			self.min
		} else {
			rng.gen_range(self.min..=self.max)
		}
	}

	/// Draws an integer from the span (inclusive on both ends).
	pub fn sample_count(&self, rng: &mut dyn RngCore) -> u8 {
		let lo = self.min.max(0.0).round() as u8;
		let hi = self.max.max(0.0).round() as u8;
		if hi <= lo { lo } else { rng.gen_range(lo..=hi) }
	}

	/// Pulls `value` into the span.
	pub fn clamp(&self, value: f64) -> f64 {
		value.clamp(self.min, self.max)
	}
}

impl From<(f64, f64)> for Span {
	fn from((a, b): (f64, f64)) -> Self {
		Self::new(a, b)
	}
}

/// Bounded lifetime for particles that fade out instead of wrapping forever.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lifetime {
	/// Seconds since (re)spawn.
	pub age: f64,
	/// Seconds until the particle is spent.
	pub max: f64,
}

impl Lifetime {
	/// A lifetime that has just begun.
	pub const fn fresh(max: f64) -> Self {
		Self { age: 0.0, max }
	}

	/// A lifetime that is already over; used for dormant pool slots.
	pub const fn spent() -> Self {
		Self { age: 1.0, max: 1.0 }
	}

	/// Normalized age in `0..=1`.
	pub fn progress(&self) -> f64 {
		if self.max <= 0.0 {
			1.0
		} else {
			(self.age / self.max).clamp(0.0, 1.0)
		}
	}

	/// Whether the particle has lived its full span.
	pub fn is_spent(&self) -> bool {
		self.age >= self.max
	}
}

/// A single animated entity.
///
/// Fields that a given behavior has no use for stay at zero. Every attribute
/// is assigned when the particle spawns or recycles, never while rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position in pixels.
	pub x: f64,
	/// Vertical position in pixels, growing downward.
	pub y: f64,
	/// Horizontal velocity in pixels per second.
	pub vx: f64,
	/// Vertical velocity in pixels per second.
	pub vy: f64,
	/// Radius, stroke width, or body size depending on the renderer.
	pub size: f64,
	/// Base opacity (0..=1).
	pub alpha: f64,
	/// Offset for periodic motion so particles don't move in lockstep.
	pub phase: f64,
	/// Phase advance in radians per second.
	pub phase_rate: f64,
	/// Wobble or sway amplitude in pixels.
	pub amplitude: f64,
	/// Orbital radius around `(x, y)` for spiral motion.
	pub orbit: f64,
	/// Maximum extent: ripple radius, kelp segment length.
	pub reach: f64,
	/// Style selector (tentacle count, segment count, branch count).
	pub variant: u8,
	/// Fraction of the surface width a laid-out particle is pinned to.
	pub anchor: f64,
	/// Set for particles that fade out instead of living forever.
	pub life: Option<Lifetime>,
}

impl Particle {
	/// A motionless particle at `(x, y)` with every other field zeroed.
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size: 0.0,
			alpha: 0.0,
			phase: 0.0,
			phase_rate: 0.0,
			amplitude: 0.0,
			orbit: 0.0,
			reach: 0.0,
			variant: 0,
			anchor: 0.0,
			life: None,
		}
	}

	/// The particle with its base opacity clamped into `[0, 1]`.
	pub fn with_alpha(mut self, alpha: f64) -> Self {
		self.alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
		self
	}

	/// Whether the particle is a spent lifetime slot waiting to be woken.
	pub fn is_dormant(&self) -> bool {
		self.life.is_some_and(|l| l.is_spent())
	}

	/// True when every numeric field is finite.
	pub fn is_finite(&self) -> bool {
		[
			self.x,
			self.y,
			self.vx,
			self.vy,
			self.size,
			self.alpha,
			self.phase,
			self.orbit,
			self.reach,
			self.anchor,
		]
		.iter()
		.all(|v| v.is_finite())
	}
}
