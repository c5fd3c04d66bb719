//! Update rules: how particles spawn, move, leave the surface, and come back.
//!
//! Each rule is a small config struct implementing [`Behavior`]. Velocities are
//! in pixels per second (a per-frame speed of 1 at 60 fps is 60 here).

use std::f64::consts::TAU;

use rand::RngCore;
use serde::Deserialize;

use super::particle::{Lifetime, Particle, Span};
use super::surface::Bounds;

/// Per-advance context handed to [`Behavior::step`].
#[derive(Clone, Copy, Debug)]
pub struct Tick {
	/// Seconds simulated by this advance.
	pub dt: f64,
	/// System clock after this advance.
	pub time: f64,
	/// Surface size for this advance; never empty.
	pub bounds: Bounds,
}

/// Where a particle sits in its system, for rules that lay particles out evenly.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
	/// Position of the particle in the population.
	pub index: usize,
	/// Size of the population.
	pub count: usize,
}

/// A pluggable particle update rule.
pub trait Behavior {
	/// Creates a particle scattered somewhere inside `bounds`.
	fn spawn(&self, slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle;

	/// Integrates one advance. Must not touch randomness.
	fn step(&self, particle: &mut Particle, tick: &Tick);

	/// Whether the particle has left through its exit side.
	fn exited(&self, particle: &Particle, bounds: Bounds) -> bool;

	/// Re-enters an exited particle with fresh entry attributes.
	fn recycle(&self, particle: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds);

	/// Largest extent a particle can have; used as overscan.
	fn margin(&self) -> f64;
}

impl<B: Behavior + ?Sized> Behavior for Box<B> {
	fn spawn(&self, slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		(**self).spawn(slot, rng, bounds)
	}

	fn step(&self, particle: &mut Particle, tick: &Tick) {
		(**self).step(particle, tick)
	}

	fn exited(&self, particle: &Particle, bounds: Bounds) -> bool {
		(**self).exited(particle, bounds)
	}

	fn recycle(&self, particle: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		(**self).recycle(particle, rng, bounds)
	}

	fn margin(&self) -> f64 {
		(**self).margin()
	}
}

fn random_phase(rng: &mut dyn RngCore) -> f64 {
	Span::new(0.0, TAU).sample(rng)
}

// ---------------------------------------------------------------------------
// Rise: bubbles floating up with a sideways wobble
// ---------------------------------------------------------------------------

/// Upward drift. Particles that clear the top re-enter below the bottom edge.
#[derive(Clone, Debug)]
pub struct Rise {
	/// Bubble radius in pixels.
	pub radius: Span,
	/// Upward speed in px/s.
	pub speed: Span,
	/// Wobble phase rate in rad/s.
	pub wobble_rate: Span,
	/// Sideways wobble in pixels.
	pub wobble_amplitude: f64,
	/// Per-bubble opacity.
	pub opacity: Span,
}

impl Default for Rise {
	fn default() -> Self {
		Self {
			radius: Span::new(2.0, 10.0),
			speed: Span::new(18.0, 60.0),
			wobble_rate: Span::new(1.2, 3.0),
			wobble_amplitude: 15.0,
			opacity: Span::point(1.0),
		}
	}
}

impl Rise {
	fn fill(&self, p: &mut Particle, rng: &mut dyn RngCore) {
		p.size = self.radius.sample(rng);
		p.vx = 0.0;
		p.vy = -self.speed.sample(rng);
		p.phase = random_phase(rng);
		p.phase_rate = self.wobble_rate.sample(rng);
		p.amplitude = self.wobble_amplitude;
		p.alpha = self.opacity.sample(rng).clamp(0.0, 1.0);
	}
}

impl Behavior for Rise {
	fn spawn(&self, _slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(
			Span::new(0.0, bounds.width).sample(rng),
			Span::new(0.0, bounds.height).sample(rng),
		);
		self.fill(&mut p, rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		p.x += p.vx * tick.dt;
		p.y += p.vy * tick.dt;
		p.phase += p.phase_rate * tick.dt;
	}

	fn exited(&self, p: &Particle, _bounds: Bounds) -> bool {
		p.y < -p.size
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		self.fill(p, rng);
		let floor = bounds.height * 1.5;
		p.x = Span::new(0.0, bounds.width).sample(rng);
		p.y = Span::new((bounds.height + p.size).min(floor), floor).sample(rng);
	}

	fn margin(&self) -> f64 {
		self.radius.max + self.wobble_amplitude
	}
}

// ---------------------------------------------------------------------------
// Drift: plankton wandering on a sine current
// ---------------------------------------------------------------------------

/// Slow random drift plus a shared sine current. Exits on any edge.
#[derive(Clone, Debug)]
pub struct Drift {
	/// Core radius in pixels.
	pub size: Span,
	/// Per-axis velocity in px/s.
	pub velocity: Span,
	/// Strength of the sine current in px/s.
	pub current: f64,
	/// Clock multiplier for the sine current.
	pub current_rate: f64,
	/// Per-speck opacity.
	pub opacity: Span,
}

impl Default for Drift {
	fn default() -> Self {
		Self {
			size: Span::new(1.0, 3.0),
			velocity: Span::new(-9.0, 9.0),
			current: 6.0,
			current_rate: 1.2,
			opacity: Span::new(0.3, 0.7),
		}
	}
}

impl Behavior for Drift {
	fn spawn(&self, _slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(
			Span::new(0.0, bounds.width).sample(rng),
			Span::new(0.0, bounds.height).sample(rng),
		)
		.with_alpha(self.opacity.sample(rng));
		p.vx = self.velocity.sample(rng);
		p.vy = self.velocity.sample(rng);
		p.size = self.size.sample(rng);
		p.phase = random_phase(rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		let t = tick.time * self.current_rate;
		p.x += (p.vx + (t + p.phase).sin() * self.current) * tick.dt;
		p.y += (p.vy + (t + p.phase * 0.7).cos() * self.current) * tick.dt;
	}

	fn exited(&self, p: &Particle, bounds: Bounds) -> bool {
		p.x < 0.0 || p.x > bounds.width || p.y < 0.0 || p.y > bounds.height
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		if p.x < 0.0 || p.x > bounds.width {
			p.x = if p.x < 0.0 { bounds.width } else { 0.0 };
			p.y = Span::new(0.0, bounds.height).sample(rng);
		} else {
			p.y = if p.y < 0.0 { bounds.height } else { 0.0 };
			p.x = Span::new(0.0, bounds.width).sample(rng);
		}
	}

	fn margin(&self) -> f64 {
		// Glow halo is three times the core.
		self.size.max * 3.0
	}
}

// ---------------------------------------------------------------------------
// Current: short-lived streaks flowing rightward
// ---------------------------------------------------------------------------

/// Rightward flow that bends along `sin(x)`; particles fade over a lifetime.
#[derive(Clone, Debug)]
pub struct Current {
	/// Rightward speed in px/s.
	pub speed: Span,
	/// Initial vertical speed in px/s.
	pub lift: Span,
	/// Vertical acceleration from the curved flow, px/s².
	pub bend: f64,
	/// Lifetime in seconds.
	pub lifetime: Span,
	/// Dot radius in pixels.
	pub radius: f64,
}

impl Default for Current {
	fn default() -> Self {
		Self {
			speed: Span::new(60.0, 180.0),
			lift: Span::new(-15.0, 15.0),
			bend: 180.0,
			lifetime: Span::new(1.6, 3.3),
			radius: 1.5,
		}
	}
}

impl Current {
	fn fill(&self, p: &mut Particle, rng: &mut dyn RngCore) {
		p.vx = self.speed.sample(rng);
		p.vy = self.lift.sample(rng);
		p.size = self.radius;
		p.alpha = 1.0;
		p.life = Some(Lifetime::fresh(self.lifetime.sample(rng)));
	}
}

impl Behavior for Current {
	fn spawn(&self, _slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(
			Span::new(0.0, bounds.width).sample(rng),
			Span::new(0.0, bounds.height).sample(rng),
		);
		self.fill(&mut p, rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		p.x += p.vx * tick.dt;
		p.y += p.vy * tick.dt;
		p.vy += (p.x * 0.01).sin() * self.bend * tick.dt;
		if let Some(life) = p.life.as_mut() {
			life.age += tick.dt;
		}
	}

	fn exited(&self, p: &Particle, bounds: Bounds) -> bool {
		p.x > bounds.width || p.y < 0.0 || p.y > bounds.height || p.is_dormant()
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		self.fill(p, rng);
		p.x = -self.margin();
		p.y = Span::new(0.0, bounds.height).sample(rng);
	}

	fn margin(&self) -> f64 {
		10.0_f64.max(self.radius)
	}
}

// ---------------------------------------------------------------------------
// Swirl: particles orbiting drifting centers
// ---------------------------------------------------------------------------

/// Orbital motion around a base point; the orbit slowly spirals outward.
#[derive(Clone, Debug)]
pub struct Swirl {
	/// Dot radius in pixels.
	pub size: Span,
	/// Angular speed in rad/s.
	pub spin: Span,
	/// Starting orbit radius in pixels.
	pub orbit: Span,
	/// Orbit growth in px/s.
	pub spread: f64,
	/// Orbit past which the particle is recycled.
	pub max_orbit: f64,
	/// Per-dot opacity.
	pub opacity: Span,
}

impl Default for Swirl {
	fn default() -> Self {
		Self {
			size: Span::new(1.0, 4.0),
			spin: Span::new(0.3, 0.9),
			orbit: Span::new(50.0, 150.0),
			spread: 1.2,
			max_orbit: 150.0,
			opacity: Span::new(0.3, 0.8),
		}
	}
}

impl Behavior for Swirl {
	fn spawn(&self, _slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(
			Span::new(0.0, bounds.width).sample(rng),
			Span::new(0.0, bounds.height).sample(rng),
		)
		.with_alpha(self.opacity.sample(rng));
		p.phase = random_phase(rng);
		p.phase_rate = self.spin.sample(rng);
		p.orbit = self.orbit.sample(rng);
		p.size = self.size.sample(rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		p.phase = (p.phase + p.phase_rate * tick.dt) % TAU;
		p.orbit += self.spread * tick.dt;
	}

	fn exited(&self, p: &Particle, _bounds: Bounds) -> bool {
		p.orbit > self.max_orbit
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		p.orbit = self.orbit.min;
		p.x = Span::new(0.0, bounds.width).sample(rng);
		p.y = Span::new(0.0, bounds.height).sample(rng);
	}

	fn margin(&self) -> f64 {
		self.max_orbit + self.size.max
	}
}

// ---------------------------------------------------------------------------
// Swarm: jellyfish pulsing upward
// ---------------------------------------------------------------------------

/// Slow ascent with a lateral sine sway; wraps horizontally.
#[derive(Clone, Debug)]
pub struct Swarm {
	/// Bell radius in pixels.
	pub size: Span,
	/// Ascent speed in px/s.
	pub speed: Span,
	/// Per-jellyfish opacity.
	pub opacity: Span,
	/// Tentacle count.
	pub tentacles: Span,
	/// Lateral sway speed in px/s.
	pub sway: f64,
	/// Clock multiplier for the sway, rad/s.
	pub sway_rate: f64,
}

impl Default for Swarm {
	fn default() -> Self {
		Self {
			size: Span::new(15.0, 50.0),
			speed: Span::new(12.0, 42.0),
			opacity: Span::new(0.15, 0.4),
			tentacles: Span::new(4.0, 7.0),
			sway: 30.0,
			sway_rate: 1.2,
		}
	}
}

impl Behavior for Swarm {
	fn spawn(&self, _slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(
			Span::new(0.0, bounds.width).sample(rng),
			Span::new(0.0, bounds.height).sample(rng),
		)
		.with_alpha(self.opacity.sample(rng));
		p.size = self.size.sample(rng);
		p.vy = -self.speed.sample(rng);
		p.phase = random_phase(rng);
		p.variant = self.tentacles.sample_count(rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		p.y += p.vy * tick.dt;
		p.x += (tick.time * self.sway_rate + p.phase).sin() * self.sway * tick.dt;

		let w = tick.bounds.width;
		if p.x < -p.size {
			p.x = w + p.size;
		} else if p.x > w + p.size {
			p.x = -p.size;
		}
	}

	fn exited(&self, p: &Particle, _bounds: Bounds) -> bool {
		p.y + p.size < 0.0
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		p.y = bounds.height + p.size;
		p.x = Span::new(0.0, bounds.width).sample(rng);
	}

	fn margin(&self) -> f64 {
		// Tentacles trail two body sizes below the bell.
		self.size.max * 3.0
	}
}

// ---------------------------------------------------------------------------
// Sway: kelp strands anchored along the bottom
// ---------------------------------------------------------------------------

/// Stationary strands spread across the width; motion is purely time-driven.
#[derive(Clone, Debug)]
pub struct Sway {
	/// Stroke width in pixels.
	pub width: Span,
	/// Segments per strand.
	pub segments: Span,
	/// Segment length in pixels.
	pub segment_length: Span,
	/// Sway speed in rad/s of clock.
	pub speed: Span,
	/// Tip sway in pixels.
	pub amount: Span,
	/// Per-strand opacity.
	pub opacity: Span,
	/// Random offset added to the even spacing.
	pub jitter: f64,
}

impl Default for Sway {
	fn default() -> Self {
		Self {
			width: Span::new(3.0, 7.0),
			segments: Span::new(8.0, 13.0),
			segment_length: Span::new(12.0, 20.0),
			speed: Span::new(0.9, 1.8),
			amount: Span::new(15.0, 35.0),
			opacity: Span::new(0.15, 0.3),
			jitter: 30.0,
		}
	}
}

impl Behavior for Sway {
	fn spawn(&self, slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let spacing = bounds.width / slot.count.max(1) as f64;
		let x = spacing * slot.index as f64 + Span::new(0.0, self.jitter).sample(rng);
		let mut p = Particle::at(x, bounds.height).with_alpha(self.opacity.sample(rng));
		p.size = self.width.sample(rng);
		p.variant = self.segments.sample_count(rng);
		p.reach = self.segment_length.sample(rng);
		p.phase_rate = self.speed.sample(rng);
		p.amplitude = self.amount.sample(rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		// Strands stay rooted to the floor, even after a resize.
		p.y = tick.bounds.height;
	}

	fn exited(&self, _p: &Particle, _bounds: Bounds) -> bool {
		false
	}

	fn recycle(&self, _p: &mut Particle, _rng: &mut dyn RngCore, _bounds: Bounds) {}

	fn margin(&self) -> f64 {
		self.amount.max + self.width.max * 2.0
	}
}

// ---------------------------------------------------------------------------
// Ripple: expanding rings woken on a timer
// ---------------------------------------------------------------------------

/// A pool of rings. Slots start dormant and are woken by
/// [`ParticleSystem::emit`](super::system::ParticleSystem::emit).
#[derive(Clone, Debug)]
pub struct Ripple {
	/// Radius at which a ring is spent.
	pub max_radius: Span,
	/// Growth in px/s.
	pub speed: Span,
}

impl Default for Ripple {
	fn default() -> Self {
		Self {
			max_radius: Span::new(100.0, 250.0),
			speed: Span::new(60.0, 150.0),
		}
	}
}

impl Ripple {
	/// Current ring radius for a ripple particle.
	pub fn radius(p: &Particle) -> f64 {
		p.life.map_or(0.0, |l| l.progress() * p.reach)
	}
}

impl Behavior for Ripple {
	fn spawn(&self, _slot: Slot, _rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(bounds.width / 2.0, bounds.height / 2.0);
		p.life = Some(Lifetime::spent());
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		if let Some(life) = p.life.as_mut() {
			life.age = (life.age + tick.dt).min(life.max);
			p.size = life.progress() * p.reach;
			p.alpha = 1.0 - life.progress();
		}
	}

	fn exited(&self, _p: &Particle, _bounds: Bounds) -> bool {
		false
	}

	fn recycle(&self, p: &mut Particle, rng: &mut dyn RngCore, bounds: Bounds) {
		p.x = Span::new(0.0, bounds.width).sample(rng);
		p.y = Span::new(0.0, bounds.height).sample(rng);
		p.reach = self.max_radius.sample(rng);
		let speed = self.speed.sample(rng).max(1.0);
		p.life = Some(Lifetime::fresh(p.reach / speed));
		p.size = 0.0;
		p.alpha = 1.0;
	}

	fn margin(&self) -> f64 {
		self.max_radius.max
	}
}

// ---------------------------------------------------------------------------
// Grow: coral stems rising from the floor
// ---------------------------------------------------------------------------

/// Stems rooted along the bottom that grow to a random height, then hold.
#[derive(Clone, Debug)]
pub struct Grow {
	/// Growth speed in px/s.
	pub rate: Span,
	/// Final stem height in pixels.
	pub max_height: Span,
	/// Branch pairs along a stem.
	pub branches: Span,
	/// Random offset added to the even spacing.
	pub jitter: f64,
	/// Per-stem opacity.
	pub opacity: Span,
}

impl Default for Grow {
	fn default() -> Self {
		Self {
			rate: Span::new(6.0, 18.0),
			max_height: Span::new(40.0, 100.0),
			branches: Span::new(3.0, 6.0),
			jitter: 40.0,
			opacity: Span::new(0.3, 0.6),
		}
	}
}

impl Grow {
	/// Current stem height of a coral particle.
	pub fn height(p: &Particle) -> f64 {
		p.size
	}
}

impl Behavior for Grow {
	fn spawn(&self, slot: Slot, rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let spacing = bounds.width / slot.count.max(1) as f64;
		let x = spacing * slot.index as f64 + Span::new(0.0, self.jitter).sample(rng);
		let mut p = Particle::at(x, bounds.height).with_alpha(self.opacity.sample(rng));
		p.reach = self.max_height.sample(rng);
		p.phase_rate = self.rate.sample(rng);
		p.variant = self.branches.sample_count(rng);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		p.size = (p.size + p.phase_rate * tick.dt).min(p.reach);
		p.y = tick.bounds.height;
	}

	fn exited(&self, _p: &Particle, _bounds: Bounds) -> bool {
		false
	}

	fn recycle(&self, _p: &mut Particle, _rng: &mut dyn RngCore, _bounds: Bounds) {}

	fn margin(&self) -> f64 {
		// Branches reach a third of the stem sideways.
		self.max_height.max / 3.0 + self.jitter
	}
}

// ---------------------------------------------------------------------------
// Band: the seam between two section colors
// ---------------------------------------------------------------------------

/// How a transition band moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionVariant {
	/// A rolling sine crest edged with foam.
	#[default]
	Wave,
	/// Dots flowing rightward over a soft gradient.
	Current,
	/// Bubbles bobbing along the seam.
	Foam,
}

/// Band clock units per second of system time.
const BAND_CLOCK: f64 = 3.0;

/// Particles laid out along the middle of the surface. Positions are a pure
/// function of the clock, so nothing ever exits.
///
/// Wave particles are crest samples spread edge to edge, current particles
/// are flowing dots, and foam particles are bubbles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Band {
	/// Motion the particles follow.
	pub variant: TransitionVariant,
}

impl Band {
	fn place(&self, p: &mut Particle, bounds: Bounds, time: f64) {
		if bounds.is_empty() {
			return;
		}
		let t = time * BAND_CLOCK;
		let i = p.phase;
		let mid = bounds.height / 2.0;
		match self.variant {
			TransitionVariant::Wave => {
				p.x = p.anchor * bounds.width;
				p.y = mid + (p.x * 0.02 + t * 0.02).sin() * 20.0;
				p.alpha = 1.0;
			}
			TransitionVariant::Current => {
				p.x = (t * 50.0 + i * 100.0).rem_euclid(bounds.width);
				p.y = mid + (t + i).sin() * 20.0;
				p.size = 2.0;
				p.alpha = (t * 2.0 + i).sin() * 0.3 + 0.3;
			}
			TransitionVariant::Foam => {
				p.x = (t + i * 0.5).sin() * 50.0 + p.anchor * bounds.width;
				p.y = mid + (t * 2.0 + i).sin() * 30.0;
				p.size = 2.0 + (t + i).sin() * 2.0;
				p.alpha = (t + i * 0.3).sin().abs() * 0.4;
			}
		}
	}
}

impl Behavior for Band {
	fn spawn(&self, slot: Slot, _rng: &mut dyn RngCore, bounds: Bounds) -> Particle {
		let mut p = Particle::at(0.0, 0.0);
		p.phase = slot.index as f64;
		p.anchor = match self.variant {
			TransitionVariant::Wave if slot.count > 1 => slot.index as f64 / (slot.count - 1) as f64,
			TransitionVariant::Wave => 0.0,
			_ => slot.index as f64 / slot.count.max(1) as f64,
		};
		self.place(&mut p, bounds, 0.0);
		p
	}

	fn step(&self, p: &mut Particle, tick: &Tick) {
		self.place(p, tick.bounds, tick.time);
	}

	fn exited(&self, _p: &Particle, _bounds: Bounds) -> bool {
		false
	}

	fn recycle(&self, _p: &mut Particle, _rng: &mut dyn RngCore, _bounds: Bounds) {}

	fn margin(&self) -> f64 {
		// Foam bubbles swing 50 px past their slot.
		54.0
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	const SCREEN: Bounds = Bounds::new(800.0, 600.0);

	fn tick(dt: f64, time: f64) -> Tick {
		Tick {
			dt,
			time,
			bounds: SCREEN,
		}
	}

	fn slot(index: usize) -> Slot {
		Slot { index, count: 10 }
	}

	#[test]
	fn rise_moves_up_and_recycles_below() {
		let mut rng = SmallRng::seed_from_u64(3);
		let rule = Rise::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		assert!(p.vy < 0.0);

		p.y = -p.size - 1.0;
		assert!(rule.exited(&p, SCREEN));
		rule.recycle(&mut p, &mut rng, SCREEN);
		assert!(p.y >= 600.0 && p.y <= 900.0, "{}", p.y);
		assert!(!rule.exited(&p, SCREEN));
	}

	#[test]
	fn drift_wraps_to_opposite_edge() {
		let mut rng = SmallRng::seed_from_u64(5);
		let rule = Drift::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		p.x = 801.0;
		rule.recycle(&mut p, &mut rng, SCREEN);
		assert_eq!(p.x, 0.0);
		assert!((0.0..=600.0).contains(&p.y));

		p.y = -3.0;
		rule.recycle(&mut p, &mut rng, SCREEN);
		assert_eq!(p.y, 600.0);
	}

	#[test]
	fn current_fades_and_restarts_from_left() {
		let mut rng = SmallRng::seed_from_u64(11);
		let rule = Current::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		p.x = 100.0;
		p.y = 300.0;
		let max = p.life.map(|l| l.max).unwrap_or_default();
		rule.step(&mut p, &tick(max + 0.1, 1.0));
		assert!(p.is_dormant());
		assert!(rule.exited(&p, SCREEN));

		rule.recycle(&mut p, &mut rng, SCREEN);
		assert_eq!(p.x, -rule.margin());
		assert!(!p.is_dormant());
	}

	#[test]
	fn swirl_spirals_out_then_recenters() {
		let mut rng = SmallRng::seed_from_u64(13);
		let rule = Swirl::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		let before = p.orbit;
		rule.step(&mut p, &tick(1.0, 1.0));
		assert!((p.orbit - before - rule.spread).abs() < 1e-9);

		p.orbit = rule.max_orbit + 0.1;
		assert!(rule.exited(&p, SCREEN));
		rule.recycle(&mut p, &mut rng, SCREEN);
		assert_eq!(p.orbit, rule.orbit.min);
	}

	#[test]
	fn swarm_wraps_horizontally() {
		let mut rng = SmallRng::seed_from_u64(17);
		let rule = Swarm::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		assert!((4..=7).contains(&p.variant));
		p.x = SCREEN.width + p.size + 5.0;
		rule.step(&mut p, &tick(0.0, 0.0));
		assert_eq!(p.x, -p.size);
	}

	#[test]
	fn kelp_spreads_evenly_and_never_exits() {
		let mut rng = SmallRng::seed_from_u64(19);
		let rule = Sway::default();
		let xs: Vec<f64> = (0..10)
			.map(|i| rule.spawn(slot(i), &mut rng, SCREEN).x)
			.collect();
		for (i, x) in xs.iter().enumerate() {
			let left = 80.0 * i as f64;
			assert!(*x >= left && *x <= left + rule.jitter, "{x}");
		}
		let p = rule.spawn(slot(0), &mut rng, SCREEN);
		assert!(!rule.exited(&p, SCREEN));
	}

	#[test]
	fn ripple_starts_dormant_and_grows_after_wake() {
		let mut rng = SmallRng::seed_from_u64(23);
		let rule = Ripple::default();
		let mut p = rule.spawn(slot(0), &mut rng, SCREEN);
		assert!(p.is_dormant());

		rule.recycle(&mut p, &mut rng, SCREEN);
		assert!(!p.is_dormant());
		let max = p.life.map(|l| l.max).unwrap_or_default();
		rule.step(&mut p, &tick(max / 2.0, 0.0));
		assert!((Ripple::radius(&p) - p.reach / 2.0).abs() < 1e-9);
		assert!((p.alpha - 0.5).abs() < 1e-9);

		rule.step(&mut p, &tick(max, 0.0));
		assert!(p.is_dormant());
		assert_eq!(p.alpha, 0.0);
	}

	#[test]
	fn swarm_sway_follows_its_clock_rate() {
		let rule = Swarm {
			sway_rate: 1.2,
			..Swarm::default()
		};
		let mut p = Particle::at(400.0, 300.0);
		p.phase = 0.0;
		rule.step(&mut p, &tick(0.1, 1.0));
		let expected = 400.0 + 1.2_f64.sin() * rule.sway * 0.1;
		assert!((p.x - expected).abs() < 1e-9);
	}

	#[test]
	fn coral_grows_to_its_height_and_stays_rooted() {
		let mut rng = SmallRng::seed_from_u64(29);
		let rule = Grow::default();
		let mut p = rule.spawn(slot(3), &mut rng, SCREEN);
		assert_eq!(Grow::height(&p), 0.0);
		assert!((3..=6).contains(&p.variant));
		assert!(p.x >= 240.0 && p.x <= 240.0 + rule.jitter);

		rule.step(&mut p, &tick(1.0, 1.0));
		assert!((Grow::height(&p) - p.phase_rate).abs() < 1e-9);

		let tall = Tick {
			dt: 60.0,
			time: 61.0,
			bounds: Bounds::new(800.0, 300.0),
		};
		rule.step(&mut p, &tall);
		assert_eq!(Grow::height(&p), p.reach);
		assert_eq!(p.y, 300.0);
		assert!(!rule.exited(&p, SCREEN));
	}

	#[test]
	fn wave_crest_spans_the_width() {
		let mut rng = SmallRng::seed_from_u64(31);
		let rule = Band {
			variant: TransitionVariant::Wave,
		};
		let first = rule.spawn(slot(0), &mut rng, SCREEN);
		let last = rule.spawn(slot(9), &mut rng, SCREEN);
		assert_eq!(first.x, 0.0);
		assert_eq!(last.x, SCREEN.width);

		let mut p = rule.spawn(slot(4), &mut rng, SCREEN);
		for k in 0..200 {
			rule.step(&mut p, &tick(0.05, k as f64 * 0.05));
			assert!((p.y - 300.0).abs() <= 20.0 + 1e-9);
		}
	}

	#[test]
	fn current_dots_flow_and_wrap() {
		let mut rng = SmallRng::seed_from_u64(37);
		let rule = Band {
			variant: TransitionVariant::Current,
		};
		let mut p = rule.spawn(slot(2), &mut rng, SCREEN);
		assert_eq!(p.x, 200.0);
		for k in 1..400 {
			rule.step(&mut p, &tick(0.05, k as f64 * 0.05));
			assert!((0.0..SCREEN.width).contains(&p.x), "{}", p.x);
			assert!((0.0..=0.6).contains(&p.alpha));
		}
	}

	#[test]
	fn foam_bubbles_bob_around_their_slot() {
		let mut rng = SmallRng::seed_from_u64(41);
		let rule = Band {
			variant: TransitionVariant::Foam,
		};
		let mut p = rule.spawn(slot(5), &mut rng, SCREEN);
		for k in 0..200 {
			rule.step(&mut p, &tick(0.05, k as f64 * 0.05));
			assert!((p.x - 400.0).abs() <= 50.0 + 1e-9);
			assert!((0.0..=4.0).contains(&p.size));
			assert!((0.0..=0.4).contains(&p.alpha));
		}
	}

	#[test]
	fn band_seeded_before_layout_stays_finite() {
		let mut rng = SmallRng::seed_from_u64(43);
		for variant in [TransitionVariant::Wave, TransitionVariant::Current, TransitionVariant::Foam] {
			let p = Band { variant }.spawn(slot(1), &mut rng, Bounds::default());
			assert!(p.is_finite());
		}
	}

	#[test]
	fn transition_variant_names() {
		let v: TransitionVariant = serde_json::from_str("\"foam\"").unwrap();
		assert_eq!(v, TransitionVariant::Foam);
		assert!(serde_json::from_str::<TransitionVariant>("\"tide\"").is_err());
	}
}
