//! Drawing strategies for particle snapshots.
//!
//! A strategy reads particles and paints them; it never mutates them. Each
//! frame it first clears (or washes) the surface, then draws every particle.
//! All colors go through a [`ColorTemplate`], so alphas always land in `[0, 1]`
//! no matter how the strategy's opacity is configured.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use super::behavior::{Grow, TransitionVariant};
use super::color::ColorTemplate;
use super::particle::Particle;
use super::surface::Bounds;

/// Fill for closed shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
	/// One flat color.
	Solid(String),
	/// Radial gradient centered on the shape, from radius 0 to `radius`.
	Radial {
		/// Outer radius of the gradient.
		radius: f64,
		/// `(offset, color)` pairs with offsets in `0..=1`.
		stops: Vec<(f64, String)>,
	},
	/// Linear gradient between two surface points.
	Linear {
		/// Where offset 0 sits.
		start: (f64, f64),
		/// Where offset 1 sits.
		end: (f64, f64),
		/// `(offset, color)` pairs with offsets in `0..=1`.
		stops: Vec<(f64, String)>,
	},
}

impl Fill {
	/// Top-to-bottom gradient over a surface of height `height`.
	pub fn vertical(height: f64, stops: Vec<(f64, String)>) -> Self {
		Self::Linear {
			start: (0.0, 0.0),
			end: (0.0, height),
			stops,
		}
	}
}

/// Minimal immediate-mode drawing API the strategies paint through.
pub trait DrawSurface {
	/// Erases the whole surface to transparent.
	fn clear(&mut self, bounds: Bounds);

	/// Paints `color` over the whole surface, leaving fading trails.
	fn wash(&mut self, bounds: Bounds, color: &str);

	/// Fills an axis-aligned rectangle.
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill);

	/// Fills a disc centered on `(x, y)`.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, fill: &Fill);

	/// Fills an ellipse rotated by `rotation` radians.
	fn fill_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, fill: &Fill);

	/// Fills the closed polygon through `points`.
	fn fill_polygon(&mut self, points: &[(f64, f64)], fill: &Fill);

	/// Outlines a circle.
	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64);

	/// Strokes an open polyline with round caps and joins.
	fn stroke_path(&mut self, points: &[(f64, f64)], color: &str, width: f64);
}

/// Per-frame context for a strategy.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame {
	/// Surface size this frame.
	pub bounds: Bounds,
	/// Seconds since the field mounted; drives pulses and sways.
	pub time: f64,
}

/// Paints a snapshot onto a surface.
pub trait RenderStrategy {
	/// Draws one frame of `particles`.
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame);
}

impl<R: RenderStrategy + ?Sized> RenderStrategy for Box<R> {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		(**self).render(particles, surface, frame)
	}
}

/// Fade in over the first half second, fade out toward the end of life.
fn life_fade(p: &Particle) -> f64 {
	p.life.map_or(1.0, |l| (l.age / 0.5).min(1.0) * (1.0 - l.progress()))
}

// ---------------------------------------------------------------------------
// Point glow: bubbles, plankton
// ---------------------------------------------------------------------------

/// Sinusoidal alpha modulation: `1 - depth + depth * sin(time * rate + phase)`.
#[derive(Clone, Copy, Debug)]
pub struct Pulse {
	/// Angular rate in rad/s.
	pub rate: f64,
	/// Share of the alpha that pulses, `0..=1`.
	pub depth: f64,
}

impl Pulse {
	fn factor(&self, time: f64, phase: f64) -> f64 {
		1.0 - self.depth + self.depth * (time * self.rate + phase).sin()
	}
}

/// Filled circles with optional glow halo, core, highlight and pulse.
///
/// The drawn position wobbles sideways by `sin(phase) * amplitude`.
#[derive(Clone, Debug)]
pub struct PointGlow {
	/// Disc or halo color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Halo radius as a multiple of particle size. `None` paints a flat disc.
	pub halo: Option<f64>,
	/// Solid core painted over the halo, scaled by the particle's alpha.
	pub core: Option<ColorTemplate>,
	/// Small offset highlight, as on a bubble.
	pub highlight: Option<ColorTemplate>,
	/// Alpha modulation over time.
	pub pulse: Option<Pulse>,
}

impl PointGlow {
	/// Translucent bubbles with a white highlight.
	pub fn bubbles(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			halo: None,
			core: None,
			highlight: Some(ColorTemplate::rgba(255, 255, 255, 0.4)),
			pulse: None,
		}
	}

	/// Glowing specks with a slow pulse.
	pub fn plankton(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			halo: Some(3.0),
			core: Some(ColorTemplate::rgba(255, 255, 255, 0.8)),
			highlight: None,
			pulse: Some(Pulse { rate: 2.4, depth: 0.3 }),
		}
	}
}

impl RenderStrategy for PointGlow {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		for p in particles.iter().filter(|p| !p.is_dormant()) {
			let x = p.x + p.phase.sin() * p.amplitude;
			let pulse = self.pulse.map_or(1.0, |pl| pl.factor(frame.time, p.phase));
			let a = p.alpha * self.opacity * pulse;

			match self.halo {
				Some(scale) => {
					let halo = Fill::Radial {
						radius: p.size * scale,
						stops: vec![
							(0.0, self.color.scaled(a)),
							(0.5, self.color.scaled(a * 0.3)),
							(1.0, self.color.with_alpha(0.0)),
						],
					};
					surface.fill_circle(x, p.y, p.size * scale, &halo);
				}
				None => surface.fill_circle(x, p.y, p.size, &Fill::Solid(self.color.scaled(a))),
			}

			if let Some(core) = &self.core {
				surface.fill_circle(x, p.y, p.size, &Fill::Solid(core.scaled(a)));
			}

			if let Some(highlight) = &self.highlight {
				let r = p.size * 0.3;
				surface.fill_circle(
					x - r,
					p.y - r,
					r,
					&Fill::Solid(highlight.scaled(p.alpha * self.opacity)),
				);
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Trailing line: current streaks
// ---------------------------------------------------------------------------

/// Dots joined to their predecessor when close, over a translucent wash.
#[derive(Clone, Debug)]
pub struct TrailingLine {
	/// Dot and link color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Painted over the previous frame instead of clearing. `None` clears.
	pub wash: Option<ColorTemplate>,
	/// Consecutive particles closer than this on both axes are linked.
	pub link_distance: f64,
	/// Dot alpha before fading.
	pub dot_alpha: f64,
	/// Link alpha before fading.
	pub line_alpha: f64,
	/// Link stroke width.
	pub line_width: f64,
}

impl TrailingLine {
	/// Streaks in `color` over a pale wash.
	pub fn new(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			wash: Some(ColorTemplate::rgba(237, 245, 247, 0.1)),
			link_distance: 50.0,
			dot_alpha: 0.6,
			line_alpha: 0.2,
			line_width: 0.5,
		}
	}
}

impl RenderStrategy for TrailingLine {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		match &self.wash {
			Some(wash) => surface.wash(frame.bounds, &wash.css()),
			None => surface.clear(frame.bounds),
		}

		let mut prev: Option<&Particle> = None;
		for p in particles {
			let fade = life_fade(p) * self.opacity;
			surface.fill_circle(p.x, p.y, p.size, &Fill::Solid(self.color.scaled(fade * self.dot_alpha)));

			if let Some(q) = prev {
				if (p.x - q.x).abs() < self.link_distance && (p.y - q.y).abs() < self.link_distance {
					surface.stroke_path(
						&[(q.x, q.y), (p.x, p.y)],
						&self.color.scaled(fade * self.line_alpha),
						self.line_width,
					);
				}
			}
			prev = Some(p);
		}
	}
}

// ---------------------------------------------------------------------------
// Tentacle stroke: jellyfish
// ---------------------------------------------------------------------------

/// Pulsing bell with a soft glow and wavy tentacles (`variant` of them).
#[derive(Clone, Debug)]
pub struct TentacleStroke {
	/// Bell and tentacle color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Bell pulse rate in rad/s.
	pub pulse_rate: f64,
	/// Tentacle wave rate in rad/s.
	pub wave_rate: f64,
	/// Tentacle tip swing in pixels.
	pub wave_amplitude: f64,
	/// Points per tentacle.
	pub resolution: usize,
	/// Tentacle stroke width.
	pub line_width: f64,
}

impl TentacleStroke {
	/// Jellyfish in `color`.
	pub fn new(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			pulse_rate: 2.4,
			wave_rate: 3.6,
			wave_amplitude: 10.0,
			resolution: 10,
			line_width: 1.5,
		}
	}

	/// Polyline for tentacle `index` of a bell of half-width `s` at `(x, y)`.
	fn tentacle(&self, p: &Particle, s: f64, index: u8, time: f64) -> Vec<(f64, f64)> {
		let count = f64::from(p.variant.max(1));
		let angle = TAU / count * f64::from(index);
		let length = s * 2.0;
		let steps = self.resolution.max(1);
		(0..=steps)
			.map(|k| {
				let t = k as f64 / steps as f64;
				let x = p.x
					+ (angle + t * PI).sin() * s * 0.5
					+ (time * self.wave_rate + t * 5.0 + f64::from(index)).sin() * self.wave_amplitude * t;
				let y = p.y + s * 0.5 + length * t;
				(x, y)
			})
			.collect()
	}
}

impl RenderStrategy for TentacleStroke {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		for p in particles {
			let pulse = (frame.time * self.pulse_rate + p.phase).sin() * 0.2 + 0.8;
			let s = p.size * pulse;
			let a = p.alpha * self.opacity;

			let glow = Fill::Radial {
				radius: s * 1.5,
				stops: vec![
					(0.0, self.color.scaled(a * 0.3 * pulse)),
					(1.0, self.color.with_alpha(0.0)),
				],
			};
			surface.fill_circle(p.x, p.y, s * 1.5, &glow);

			let bell = Fill::Radial {
				radius: s,
				stops: vec![
					(0.0, self.color.scaled(a * pulse)),
					(0.6, self.color.scaled(a * 0.5 * pulse)),
					(1.0, self.color.with_alpha(0.0)),
				],
			};
			surface.fill_ellipse(p.x, p.y, s, s * 0.7, 0.0, &bell);

			let stroke = self.color.scaled(a * 0.6);
			for i in 0..p.variant {
				surface.stroke_path(&self.tentacle(p, s, i, frame.time), &stroke, self.line_width);
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Swirl link: orbiting points connected by faint lines
// ---------------------------------------------------------------------------

/// Points drawn at their orbital position; pairs closer than
/// `link_distance` are joined with `(1 - d / link_distance) * link_alpha`.
#[derive(Clone, Debug)]
pub struct SwirlLink {
	/// Point and link color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Pairs closer than this are linked.
	pub link_distance: f64,
	/// Alpha of a zero-length link.
	pub link_alpha: f64,
	/// Link stroke width.
	pub line_width: f64,
}

impl SwirlLink {
	/// Swirling points in `color`.
	pub fn new(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			link_distance: 80.0,
			link_alpha: 0.1,
			line_width: 0.5,
		}
	}

	/// Where an orbiting particle is drawn.
	pub fn position(p: &Particle) -> (f64, f64) {
		(p.x + p.phase.cos() * p.orbit, p.y + p.phase.sin() * p.orbit)
	}
}

impl RenderStrategy for SwirlLink {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		let points: Vec<(f64, f64)> = particles.iter().map(Self::position).collect();

		for (p, &(x, y)) in particles.iter().zip(&points) {
			surface.fill_circle(x, y, p.size, &Fill::Solid(self.color.with_alpha(p.alpha * self.opacity)));
		}

		for (i, &(ax, ay)) in points.iter().enumerate() {
			for &(bx, by) in &points[i + 1..] {
				let d = (ax - bx).hypot(ay - by);
				if d < self.link_distance {
					let alpha = (1.0 - d / self.link_distance) * self.link_alpha * self.opacity;
					surface.stroke_path(&[(ax, ay), (bx, by)], &self.color.with_alpha(alpha), self.line_width);
				}
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Ripple rings
// ---------------------------------------------------------------------------

/// Concentric rings trailing inside each active ripple.
#[derive(Clone, Debug)]
pub struct RippleRings {
	/// Ring color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Rings per ripple.
	pub rings: u8,
	/// Gap between rings in pixels.
	pub spacing: f64,
	/// Width of the outer ring; inner rings are thinner.
	pub line_width: f64,
}

impl RippleRings {
	/// Ripples in `color`.
	pub fn new(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			rings: 3,
			spacing: 15.0,
			line_width: 2.0,
		}
	}
}

impl RenderStrategy for RippleRings {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		for p in particles.iter().filter(|p| !p.is_dormant()) {
			for i in 0..self.rings {
				let i = f64::from(i);
				let r = p.size - i * self.spacing;
				if r <= 0.0 {
					break;
				}
				let alpha = p.alpha * (0.8 - i * 0.2) * self.opacity;
				let width = (self.line_width - i * 0.5).max(0.5);
				surface.stroke_circle(p.x, p.y, r, &self.color.with_alpha(alpha), width);
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Kelp strands
// ---------------------------------------------------------------------------

/// Segmented strands rising from `(x, y)`, swaying more toward the tip, with
/// a leaf on every other segment.
#[derive(Clone, Debug)]
pub struct KelpStrands {
	/// Strand and leaf color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
}

impl KelpStrands {
	/// Kelp in `color`.
	pub fn new(color: ColorTemplate) -> Self {
		Self { color, opacity: 1.0 }
	}

	fn sway(p: &Particle, segment: u8, time: f64) -> f64 {
		let segments = f64::from(p.variant.max(1));
		let i = f64::from(segment);
		(time * p.phase_rate + i * 0.5).sin() * p.amplitude * (i / segments)
	}
}

impl RenderStrategy for KelpStrands {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		for p in particles {
			let color = self.color.with_alpha(p.alpha * self.opacity);
			let mut points = Vec::with_capacity(usize::from(p.variant) + 1);
			points.push((p.x, p.y));
			for i in 0..p.variant {
				let y = p.y - p.reach * f64::from(i + 1);
				points.push((p.x + Self::sway(p, i, frame.time), y));
			}
			surface.stroke_path(&points, &color, p.size);

			for i in (2..p.variant).step_by(2) {
				let leaf_x = p.x + Self::sway(p, i, frame.time);
				let leaf_y = p.y - p.reach * f64::from(i);
				surface.fill_ellipse(
					leaf_x,
					leaf_y,
					p.size * 2.0,
					p.reach / 2.0,
					FRAC_PI_4,
					&Fill::Solid(color.clone()),
				);
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Coral branches
// ---------------------------------------------------------------------------

/// Points along a quadratic curve from `from` to `to` bent toward `control`.
fn quadratic(from: (f64, f64), control: (f64, f64), to: (f64, f64), steps: usize) -> Vec<(f64, f64)> {
	let steps = steps.max(1);
	(0..=steps)
		.map(|k| {
			let t = k as f64 / steps as f64;
			let u = 1.0 - t;
			(
				u * u * from.0 + 2.0 * u * t * control.0 + t * t * to.0,
				u * u * from.1 + 2.0 * u * t * control.1 + t * t * to.1,
			)
		})
		.collect()
}

/// A vertical stem per particle with curved branch pairs spaced up its height.
#[derive(Clone, Debug)]
pub struct CoralBranches {
	/// Stem and branch color.
	pub color: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
	/// Stroke width.
	pub line_width: f64,
	/// Points per branch curve.
	pub resolution: usize,
}

impl CoralBranches {
	/// Coral in `color`.
	pub fn new(color: ColorTemplate) -> Self {
		Self {
			color,
			opacity: 1.0,
			line_width: 2.0,
			resolution: 8,
		}
	}
}

impl RenderStrategy for CoralBranches {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);

		for p in particles {
			let height = Grow::height(p);
			if height <= 0.0 {
				continue;
			}
			let color = self.color.with_alpha(p.alpha * self.opacity);
			surface.stroke_path(&[(p.x, p.y), (p.x, p.y - height)], &color, self.line_width);

			let branches = p.variant.max(1);
			let length = height / 3.0;
			for i in 1..=branches {
				let y = p.y - height / f64::from(branches) * f64::from(i);
				for side in [-1.0, 1.0] {
					let curve = quadratic(
						(p.x, y),
						(p.x + side * length / 2.0, y - length / 3.0),
						(p.x + side * length, y - length / 2.0),
						self.resolution,
					);
					surface.stroke_path(&curve, &color, self.line_width);
				}
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Transition band
// ---------------------------------------------------------------------------

/// The seam between two section colors, drawn according to its variant.
///
/// `wave` splits the surface at a rolling crest traced by the particles,
/// `current` lays dots over a soft four-stop gradient, and `foam` scatters
/// white bubbles over a plain gradient.
#[derive(Clone, Debug)]
pub struct TransitionBand {
	/// Which seam to draw.
	pub variant: TransitionVariant,
	/// Color above the seam.
	pub from: ColorTemplate,
	/// Color below the seam.
	pub to: ColorTemplate,
	/// Color of the flowing dots in the `current` variant.
	pub dot: ColorTemplate,
	/// Crest line and bubble color.
	pub foam: ColorTemplate,
	/// Multiplier on every painted alpha.
	pub opacity: f64,
}

impl TransitionBand {
	/// A band from `from` to `to`, with dots in `dot`.
	pub fn new(variant: TransitionVariant, from: ColorTemplate, to: ColorTemplate, dot: ColorTemplate) -> Self {
		Self {
			variant,
			from,
			to,
			dot,
			foam: ColorTemplate::rgba(255, 255, 255, 0.3),
			opacity: 1.0,
		}
	}

	fn wave(&self, particles: &[Particle], surface: &mut dyn DrawSurface, bounds: Bounds) {
		let (w, h) = (bounds.width, bounds.height);
		let from = Fill::Solid(self.from.scaled(self.opacity));
		let to = Fill::Solid(self.to.scaled(self.opacity));
		surface.fill_rect(0.0, 0.0, w, h / 2.0, &from);
		surface.fill_rect(0.0, h / 2.0, w, h / 2.0, &to);

		let crest: Vec<(f64, f64)> = particles.iter().map(|p| (p.x, p.y)).collect();
		if crest.len() < 2 {
			return;
		}
		let mut body = crest.clone();
		body.extend([(w, h), (0.0, h)]);
		surface.fill_polygon(&body, &to);
		surface.stroke_path(&crest, &self.foam.scaled(self.opacity), 2.0);
	}

	fn current(&self, particles: &[Particle], surface: &mut dyn DrawSurface, bounds: Bounds) {
		let (from, to) = (self.from.scaled(self.opacity), self.to.scaled(self.opacity));
		let gradient = Fill::vertical(
			bounds.height,
			vec![(0.0, from.clone()), (0.4, from), (0.6, to.clone()), (1.0, to)],
		);
		surface.fill_rect(0.0, 0.0, bounds.width, bounds.height, &gradient);
		for p in particles {
			surface.fill_circle(p.x, p.y, p.size, &Fill::Solid(self.dot.with_alpha(p.alpha * self.opacity)));
		}
	}

	fn foam(&self, particles: &[Particle], surface: &mut dyn DrawSurface, bounds: Bounds) {
		let gradient = Fill::vertical(
			bounds.height,
			vec![(0.0, self.from.scaled(self.opacity)), (1.0, self.to.scaled(self.opacity))],
		);
		surface.fill_rect(0.0, 0.0, bounds.width, bounds.height, &gradient);
		for p in particles {
			surface.fill_circle(p.x, p.y, p.size, &Fill::Solid(self.foam.with_alpha(p.alpha * self.opacity)));
		}
	}
}

impl RenderStrategy for TransitionBand {
	fn render(&self, particles: &[Particle], surface: &mut dyn DrawSurface, frame: &RenderFrame) {
		if frame.bounds.is_empty() {
			return;
		}
		surface.clear(frame.bounds);
		match self.variant {
			TransitionVariant::Wave => self.wave(particles, surface, frame.bounds),
			TransitionVariant::Current => self.current(particles, surface, frame.bounds),
			TransitionVariant::Foam => self.foam(particles, surface, frame.bounds),
		}
	}
}


#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::testing::RecordingSurface;
	use super::*;
	use crate::components::particle_field::behavior::{
		Band, Current, Drift, Grow, Ripple, Rise, Swarm, Sway, Swirl,
	};
	use crate::components::particle_field::color::alpha_of;
	use crate::components::particle_field::particle::Lifetime;
	use crate::components::particle_field::system::ParticleSystem;

	const SCREEN: Bounds = Bounds::new(800.0, 600.0);

	fn frame() -> RenderFrame {
		RenderFrame {
			bounds: SCREEN,
			time: 1.7,
		}
	}

	fn teal() -> ColorTemplate {
		ColorTemplate::parse("rgba(26, 163, 163, 0.15)")
	}

	/// Every strategy with the given opacity, paired with particles it draws.
	fn scenes(opacity: f64) -> Vec<(Box<dyn RenderStrategy>, Vec<Particle>)> {
		let mut ripples = ParticleSystem::with_rng(4, Ripple::default(), SCREEN, SmallRng::seed_from_u64(1));
		ripples.emit();
		ripples.emit();
		ripples.advance(0.5, SCREEN);

		let mut coral = ParticleSystem::with_rng(6, Grow::default(), SCREEN, SmallRng::seed_from_u64(9));
		coral.advance(2.0, SCREEN);

		let mut scenes = vec![
			(
				Box::new(PointGlow { opacity, ..PointGlow::bubbles(teal()) }) as Box<dyn RenderStrategy>,
				ParticleSystem::with_rng(10, Rise::default(), SCREEN, SmallRng::seed_from_u64(2)).snapshot().to_vec(),
			),
			(
				Box::new(PointGlow { opacity, ..PointGlow::plankton(teal()) }),
				ParticleSystem::with_rng(10, Drift::default(), SCREEN, SmallRng::seed_from_u64(3)).snapshot().to_vec(),
			),
			(
				Box::new(TrailingLine { opacity, ..TrailingLine::new(teal()) }),
				ParticleSystem::with_rng(30, Current::default(), SCREEN, SmallRng::seed_from_u64(4)).snapshot().to_vec(),
			),
			(
				Box::new(TentacleStroke { opacity, ..TentacleStroke::new(teal()) }),
				ParticleSystem::with_rng(5, Swarm::default(), SCREEN, SmallRng::seed_from_u64(5)).snapshot().to_vec(),
			),
			(
				Box::new(SwirlLink { opacity, ..SwirlLink::new(teal()) }),
				ParticleSystem::with_rng(40, Swirl::default(), SCREEN, SmallRng::seed_from_u64(6)).snapshot().to_vec(),
			),
			(
				Box::new(RippleRings { opacity, ..RippleRings::new(teal()) }),
				ripples.snapshot().to_vec(),
			),
			(
				Box::new(KelpStrands { opacity, ..KelpStrands::new(teal()) }),
				ParticleSystem::with_rng(6, Sway::default(), SCREEN, SmallRng::seed_from_u64(8)).snapshot().to_vec(),
			),
			(
				Box::new(CoralBranches { opacity, ..CoralBranches::new(teal()) }),
				coral.snapshot().to_vec(),
			),
		];
		for variant in [TransitionVariant::Wave, TransitionVariant::Current, TransitionVariant::Foam] {
			let band = TransitionBand {
				opacity,
				..TransitionBand::new(variant, "#0B1B2B".into(), "#EDF5F7".into(), teal())
			};
			let mut sys = ParticleSystem::with_rng(20, Band { variant }, SCREEN, SmallRng::seed_from_u64(10));
			sys.advance(0.4, SCREEN);
			scenes.push((Box::new(band), sys.snapshot().to_vec()));
		}
		scenes
	}

	#[test]
	fn painted_alphas_stay_in_unit_range() {
		for opacity in [1.4, -0.2, 1.0, 0.0] {
			for (strategy, particles) in scenes(opacity) {
				let mut surface = RecordingSurface::default();
				strategy.render(&particles, &mut surface, &frame());
				assert!(surface.shapes > 0);
				for color in surface.colors.iter().chain(&surface.washes) {
					let a = alpha_of(color).unwrap();
					assert!((0.0..=1.0).contains(&a), "{color} at opacity {opacity}");
				}
			}
		}
	}

	#[test]
	fn rendering_leaves_particles_untouched() {
		for (strategy, particles) in scenes(1.0) {
			let before = particles.clone();
			let mut surface = RecordingSurface::default();
			strategy.render(&particles, &mut surface, &frame());
			strategy.render(&particles, &mut surface, &frame());
			assert_eq!(particles, before);
		}
	}

	#[test]
	fn empty_bounds_paint_nothing() {
		for (strategy, particles) in scenes(1.0) {
			let mut surface = RecordingSurface::default();
			let frame = RenderFrame {
				bounds: Bounds::new(0.0, 600.0),
				time: 0.0,
			};
			strategy.render(&particles, &mut surface, &frame);
			assert_eq!(surface.clears, 0);
			assert_eq!(surface.shapes, 0);
		}
	}

	#[test]
	fn trailing_line_washes_instead_of_clearing() {
		let strategy = TrailingLine::new(teal());
		let mut surface = RecordingSurface::default();
		strategy.render(&[], &mut surface, &frame());
		assert_eq!(surface.clears, 0);
		assert_eq!(surface.washes, vec!["rgba(237, 245, 247, 0.1)".to_owned()]);
	}

	#[test]
	fn swirl_links_fade_with_distance() {
		let strategy = SwirlLink::new(ColorTemplate::rgb(255, 255, 255));
		let mut a = Particle::at(100.0, 100.0).with_alpha(1.0);
		a.size = 2.0;
		let mut b = a.clone();
		b.x = 140.0;
		let mut c = a.clone();
		c.x = 400.0;

		let mut surface = RecordingSurface::default();
		strategy.render(&[a, b, c], &mut surface, &frame());
		// Three dots and a single link between the close pair.
		assert_eq!(surface.shapes, 4);
		let link = alpha_of(&surface.colors[3]).unwrap();
		assert!((link - 0.05).abs() < 1e-9, "{link}");
	}

	#[test]
	fn dormant_ripples_are_skipped() {
		let sys = ParticleSystem::with_rng(3, Ripple::default(), SCREEN, SmallRng::seed_from_u64(1));
		let mut surface = RecordingSurface::default();
		RippleRings::new(teal()).render(sys.snapshot(), &mut surface, &frame());
		assert_eq!(surface.clears, 1);
		assert_eq!(surface.shapes, 0);
	}

	#[test]
	fn fresh_streaks_fade_in() {
		let mut p = Particle::at(10.0, 10.0);
		p.life = Some(Lifetime::fresh(2.0));
		assert_eq!(life_fade(&p), 0.0);
		p.life = Some(Lifetime { age: 1.0, max: 2.0 });
		assert!((life_fade(&p) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn coral_draws_a_stem_and_branch_pairs() {
		let mut p = Particle::at(100.0, 600.0).with_alpha(0.5);
		p.size = 60.0;
		p.variant = 3;
		let mut surface = RecordingSurface::default();
		CoralBranches::new(teal()).render(&[p.clone()], &mut surface, &frame());
		assert_eq!(surface.shapes, 1 + 3 * 2);

		// A stem that has not started growing draws nothing.
		p.size = 0.0;
		let mut surface = RecordingSurface::default();
		CoralBranches::new(teal()).render(&[p], &mut surface, &frame());
		assert_eq!(surface.shapes, 0);
	}

	#[test]
	fn quadratic_curve_hits_its_endpoints() {
		let pts = quadratic((0.0, 0.0), (5.0, -5.0), (10.0, 0.0), 4);
		assert_eq!(pts.len(), 5);
		assert_eq!(pts[0], (0.0, 0.0));
		assert_eq!(pts[4], (10.0, 0.0));
		assert!((pts[2].1 + 2.5).abs() < 1e-12);
	}

	#[test]
	fn wave_band_fills_below_the_crest() {
		let sys = ParticleSystem::with_rng(
			12,
			Band {
				variant: TransitionVariant::Wave,
			},
			SCREEN,
			SmallRng::seed_from_u64(1),
		);
		let band = TransitionBand::new(TransitionVariant::Wave, "#0B1B2B".into(), "#EDF5F7".into(), teal());
		let mut surface = RecordingSurface::default();
		band.render(sys.snapshot(), &mut surface, &frame());

		assert_eq!(surface.rects, 2);
		assert_eq!(surface.polygons.len(), 1);
		let body = &surface.polygons[0];
		assert_eq!(body.len(), 12 + 2);
		assert_eq!(body[12], (SCREEN.width, SCREEN.height));
		assert_eq!(surface.colors[0], "rgba(11, 27, 43, 1)");
		assert_eq!(surface.colors[1], "rgba(237, 245, 247, 1)");
		assert_eq!(surface.colors.last().map(String::as_str), Some("rgba(255, 255, 255, 0.3)"));
	}

	#[test]
	fn current_band_paints_a_four_stop_gradient() {
		let sys = ParticleSystem::with_rng(
			20,
			Band {
				variant: TransitionVariant::Current,
			},
			SCREEN,
			SmallRng::seed_from_u64(1),
		);
		let band = TransitionBand::new(TransitionVariant::Current, "#0B1B2B".into(), "#EDF5F7".into(), teal());
		let mut surface = RecordingSurface::default();
		band.render(sys.snapshot(), &mut surface, &frame());
		assert_eq!(surface.rects, 1);
		assert_eq!(surface.shapes, 1 + 20);
		assert_eq!(&surface.colors[..4], &[
			"rgba(11, 27, 43, 1)".to_owned(),
			"rgba(11, 27, 43, 1)".to_owned(),
			"rgba(237, 245, 247, 1)".to_owned(),
			"rgba(237, 245, 247, 1)".to_owned(),
		]);
	}
}
