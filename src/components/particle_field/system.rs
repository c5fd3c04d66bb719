//! A fixed-size particle population driven by one [`Behavior`].

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::behavior::{Behavior, Slot, Tick};
use super::particle::Particle;
use super::surface::Bounds;

/// Owns `N` particles, their update rule, a private RNG, and a private clock.
///
/// Created when a field mounts, advanced once per frame, cleared on teardown.
/// Recycling resets particles in place, so the population never changes size.
pub struct ParticleSystem<B: Behavior> {
	particles: Vec<Particle>,
	behavior: B,
	rng: SmallRng,
	bounds: Bounds,
	time: f64,
}

impl<B: Behavior> ParticleSystem<B> {
	/// Seeds `count` particles inside `bounds` using an entropy-seeded RNG.
	pub fn initialize(count: usize, behavior: B, bounds: Bounds) -> Self {
		Self::with_rng(count, behavior, bounds, SmallRng::from_entropy())
	}

	/// Like [`ParticleSystem::initialize`] with a caller-provided RNG.
	pub fn with_rng(count: usize, behavior: B, bounds: Bounds, mut rng: SmallRng) -> Self {
		let particles = (0..count)
			.map(|index| behavior.spawn(Slot { index, count }, &mut rng, bounds))
			.collect();

		Self {
			particles,
			behavior,
			rng,
			bounds,
			time: 0.0,
		}
	}

	/// Steps every particle by `dt` seconds against `bounds`.
	///
	/// Empty bounds (surface not laid out yet) make this a no-op.
	pub fn advance(&mut self, dt: f64, bounds: Bounds) {
		if bounds.is_empty() || self.particles.is_empty() {
			return;
		}
		if bounds != self.bounds {
			self.resize(bounds);
		}

		let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
		self.time += dt;
		let tick = Tick {
			dt,
			time: self.time,
			bounds,
		};

		for p in &mut self.particles {
			self.behavior.step(p, &tick);
			if self.behavior.exited(p, bounds) {
				self.behavior.recycle(p, &mut self.rng, bounds);
			}
		}
	}

	/// Read-only view of the current population; the same slice every frame.
	pub fn snapshot(&self) -> &[Particle] {
		&self.particles
	}

	/// Rescales positions to new bounds.
	///
	/// A system first seeded against empty bounds is reseeded instead, since
	/// there is nothing meaningful to scale from.
	pub fn resize(&mut self, bounds: Bounds) {
		if bounds.is_empty() {
			return;
		}
		if self.bounds.is_empty() {
			let count = self.particles.len();
			for (index, p) in self.particles.iter_mut().enumerate() {
				*p = self.behavior.spawn(Slot { index, count }, &mut self.rng, bounds);
			}
		} else {
			let scale_x = bounds.width / self.bounds.width;
			let scale_y = bounds.height / self.bounds.height;
			for p in &mut self.particles {
				p.x *= scale_x;
				p.y *= scale_y;
			}
		}
		self.bounds = bounds;
	}

	/// Wakes one dormant particle. Returns `false` when none is dormant.
	pub fn emit(&mut self) -> bool {
		if self.bounds.is_empty() {
			return false;
		}
		match self.particles.iter_mut().find(|p| p.is_dormant()) {
			Some(p) => {
				self.behavior.recycle(p, &mut self.rng, self.bounds);
				true
			}
			None => false,
		}
	}

	/// Drops every particle; later advances do nothing.
	pub fn clear(&mut self) {
		self.particles.clear();
	}

	/// The update rule.
	pub fn behavior(&self) -> &B {
		&self.behavior
	}

	/// Surface size the particles were last laid out for.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Simulated seconds since initialization.
	pub fn time(&self) -> f64 {
		self.time
	}

	/// Number of particles; fixed until [`ParticleSystem::clear`].
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether there are no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}
