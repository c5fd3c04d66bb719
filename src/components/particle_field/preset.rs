//! Field presets: which behavior and renderer a field uses, and how many
//! particles it gets at each density.

use serde::Deserialize;

use super::behavior::{
	Band, Behavior, Current, Drift, Grow, Ripple, Rise, Swarm, Sway, Swirl, TransitionVariant,
};
use super::color::ColorTemplate;
use super::render::{
	CoralBranches, KelpStrands, PointGlow, RenderStrategy, RippleRings, SwirlLink, TentacleStroke,
	TrailingLine, TransitionBand,
};

/// Brand teal used by most fields.
pub const TEAL: (u8, u8, u8) = (26, 163, 163);
/// Coral used for the crisis visuals.
pub const CORAL: (u8, u8, u8) = (255, 127, 102);

/// Default ripple spawn period.
pub const RIPPLE_INTERVAL_MS: u32 = 2000;

/// Population level picked from a kind's count table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
	/// Sparse.
	Low,
	/// The default.
	#[default]
	Medium,
	/// Dense.
	High,
}

fn pick(density: Density, (low, medium, high): (usize, usize, usize)) -> usize {
	match density {
		Density::Low => low,
		Density::Medium => medium,
		Density::High => high,
	}
}

/// The visual a field renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	/// Bubbles rising from the bottom.
	Bubbles,
	/// Glowing specks drifting and pulsing.
	Plankton,
	/// Streaks carried by a sideways current.
	Current,
	/// Points circling the surface center.
	Swirl,
	/// Jellyfish bobbing with waving tentacles.
	Jellyfish,
	/// Kelp strands swaying from the floor.
	Kelp,
	/// Expanding rings spawned on a timer.
	Ripples,
	/// Coral stems growing up from the floor.
	Coral,
	/// The seam between two section colors.
	Transition,
}

impl FieldKind {
	/// Every kind, in declaration order.
	pub const ALL: [FieldKind; 9] = [
		Self::Bubbles,
		Self::Plankton,
		Self::Current,
		Self::Swirl,
		Self::Jellyfish,
		Self::Kelp,
		Self::Ripples,
		Self::Coral,
		Self::Transition,
	];

	/// Particle count for a density. For ripples this is the pool size, and
	/// for transitions it is the wave variant's count.
	pub fn count(self, density: Density) -> usize {
		let table = match self {
			Self::Bubbles => (15, 25, 40),
			Self::Plankton => (40, 60, 80),
			Self::Current => (30, 50, 80),
			Self::Swirl => (30, 50, 80),
			Self::Jellyfish => (12, 25, 40),
			Self::Kelp => (12, 15, 20),
			Self::Ripples => (4, 8, 12),
			Self::Coral => (8, 12, 16),
			Self::Transition => return TransitionVariant::Wave.count(density),
		};
		pick(density, table)
	}

	/// Color used when a spec names none.
	pub fn default_color(self) -> ColorTemplate {
		let (r, g, b) = TEAL;
		match self {
			Self::Bubbles | Self::Ripples => ColorTemplate::rgba(r, g, b, 0.15),
			Self::Swirl => {
				let (r, g, b) = CORAL;
				ColorTemplate::rgba(r, g, b, 0.08)
			}
			Self::Jellyfish => {
				let (r, g, b) = CORAL;
				ColorTemplate::rgb(r, g, b)
			}
			Self::Plankton | Self::Current | Self::Kelp | Self::Coral | Self::Transition => {
				ColorTemplate::rgb(r, g, b)
			}
		}
	}
}

impl TransitionVariant {
	/// Crest samples, dots or bubbles for a density.
	pub fn count(self, density: Density) -> usize {
		pick(
			density,
			match self {
				Self::Wave => (48, 64, 96),
				Self::Current => (12, 20, 30),
				Self::Foam => (20, 30, 45),
			},
		)
	}
}

/// Colors and style of a transition field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Transition {
	/// How the seam moves.
	pub variant: TransitionVariant,
	/// Color of the section above.
	pub from: ColorTemplate,
	/// Color of the section below.
	pub to: ColorTemplate,
}

impl Default for Transition {
	fn default() -> Self {
		Self {
			variant: TransitionVariant::default(),
			from: ColorTemplate::parse("#0B1B2B"),
			to: ColorTemplate::parse("#EDF5F7"),
		}
	}
}

/// Immutable description of one particle field.
///
/// Deserializes from the scene config, e.g.
/// `{ "kind": "ripples", "color": "rgba(26, 163, 163, 0.1)", "spawn_interval_ms": 1800 }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldSpec {
	/// Which visual to render.
	pub kind: FieldKind,
	/// Picks the count from the kind's table.
	#[serde(default)]
	pub density: Density,
	/// Overrides the density table.
	#[serde(default)]
	pub count: Option<usize>,
	/// Overrides the kind's default color.
	#[serde(default)]
	pub color: Option<ColorTemplate>,
	/// Multiplier on every painted alpha; the result is clamped.
	#[serde(default)]
	pub opacity: Option<f64>,
	/// Ripple spawn period. Ignored by other kinds.
	#[serde(default)]
	pub spawn_interval_ms: Option<u32>,
	/// Seam style and colors. Ignored by other kinds.
	#[serde(default)]
	pub transition: Transition,
}

/// A field ready to be driven: rule, renderer, population and timer period.
pub struct Field {
	/// Motion rule.
	pub behavior: Box<dyn Behavior>,
	/// Drawing strategy.
	pub renderer: Box<dyn RenderStrategy>,
	/// Fixed particle count.
	pub count: usize,
	/// Period of the spawn timer, for fields that emit on a clock.
	pub spawn_interval_ms: Option<u32>,
}

impl FieldSpec {
	/// A spec with every option at its default.
	pub fn new(kind: FieldKind) -> Self {
		Self {
			kind,
			density: Density::default(),
			count: None,
			color: None,
			opacity: None,
			spawn_interval_ms: None,
			transition: Transition::default(),
		}
	}

	/// The spec at `density`.
	pub fn with_density(self, density: Density) -> Self {
		Self { density, ..self }
	}

	/// The spec with its color parsed from `css`.
	pub fn with_color(self, css: &str) -> Self {
		Self {
			color: Some(ColorTemplate::parse(css)),
			..self
		}
	}

	/// The spec with the given seam style.
	pub fn with_transition(self, transition: Transition) -> Self {
		Self { transition, ..self }
	}

	/// Particle count: the explicit override, else the density table.
	pub fn count(&self) -> usize {
		self.count.unwrap_or_else(|| match self.kind {
			FieldKind::Transition => self.transition.variant.count(self.density),
			kind => kind.count(self.density),
		})
	}

	/// Paint color: the explicit override, else the kind's default.
	pub fn color(&self) -> ColorTemplate {
		self.color.clone().unwrap_or_else(|| self.kind.default_color())
	}

	/// Spawn period for ripple fields; zero or absent falls back to the default.
	pub fn spawn_interval(&self) -> Option<u32> {
		match self.kind {
			FieldKind::Ripples => Some(
				self.spawn_interval_ms
					.filter(|ms| *ms > 0)
					.unwrap_or(RIPPLE_INTERVAL_MS),
			),
			_ => None,
		}
	}

	/// Builds the behavior and renderer this spec describes.
	pub fn build(&self) -> Field {
		let color = self.color();
		let opacity = self.opacity.unwrap_or(1.0);

		let (behavior, renderer): (Box<dyn Behavior>, Box<dyn RenderStrategy>) = match self.kind {
			FieldKind::Bubbles => (
				Box::new(Rise::default()),
				Box::new(PointGlow {
					opacity,
					..PointGlow::bubbles(color)
				}),
			),
			FieldKind::Plankton => (
				Box::new(Drift::default()),
				Box::new(PointGlow {
					opacity,
					..PointGlow::plankton(color)
				}),
			),
			FieldKind::Current => (
				Box::new(Current::default()),
				Box::new(TrailingLine {
					opacity,
					..TrailingLine::new(color)
				}),
			),
			FieldKind::Swirl => (
				Box::new(Swirl::default()),
				Box::new(SwirlLink {
					opacity,
					..SwirlLink::new(color)
				}),
			),
			FieldKind::Jellyfish => (
				Box::new(Swarm::default()),
				Box::new(TentacleStroke {
					opacity,
					..TentacleStroke::new(color)
				}),
			),
			FieldKind::Kelp => (
				Box::new(Sway::default()),
				Box::new(KelpStrands {
					opacity,
					..KelpStrands::new(color)
				}),
			),
			FieldKind::Ripples => (
				Box::new(Ripple::default()),
				Box::new(RippleRings {
					opacity,
					..RippleRings::new(color)
				}),
			),
			FieldKind::Coral => (
				Box::new(Grow::default()),
				Box::new(CoralBranches {
					opacity,
					..CoralBranches::new(color)
				}),
			),
			FieldKind::Transition => {
				let Transition { variant, from, to } = self.transition.clone();
				(
					Box::new(Band { variant }),
					Box::new(TransitionBand {
						opacity,
						..TransitionBand::new(variant, from, to, color)
					}),
				)
			}
		};

		Field {
			behavior,
			renderer,
			count: self.count(),
			spawn_interval_ms: self.spawn_interval(),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::components::particle_field::color::alpha_of;
	use crate::components::particle_field::render::RenderFrame;
	use crate::components::particle_field::render::testing::RecordingSurface;
	use crate::components::particle_field::surface::Bounds;
	use crate::components::particle_field::system::ParticleSystem;

	#[test]
	fn density_table() {
		assert_eq!(FieldSpec::new(FieldKind::Bubbles).with_density(Density::Low).count(), 15);
		assert_eq!(FieldSpec::new(FieldKind::Bubbles).count(), 25);
		assert_eq!(FieldSpec::new(FieldKind::Bubbles).with_density(Density::High).count(), 40);
		assert_eq!(FieldSpec::new(FieldKind::Swirl).with_density(Density::High).count(), 80);
		assert_eq!(FieldSpec::new(FieldKind::Plankton).count(), 60);
		assert_eq!(FieldSpec::new(FieldKind::Kelp).count(), 15);
		assert_eq!(FieldSpec::new(FieldKind::Coral).with_density(Density::High).count(), 16);
		assert_eq!(FieldSpec::new(FieldKind::Transition).count(), 64);
	}

	#[test]
	fn transition_count_follows_its_variant() {
		for (variant, expected) in [
			(TransitionVariant::Wave, 48),
			(TransitionVariant::Current, 12),
			(TransitionVariant::Foam, 20),
		] {
			let spec = FieldSpec::new(FieldKind::Transition)
				.with_density(Density::Low)
				.with_transition(Transition {
					variant,
					..Transition::default()
				});
			assert_eq!(spec.count(), expected);
			assert_eq!(spec.build().count, expected);
		}
	}

	#[test]
	fn transition_deserializes_with_default_colors() {
		let spec: FieldSpec = serde_json::from_str(
			r#"{ "kind": "transition", "transition": { "variant": "foam" } }"#,
		)
		.unwrap();
		assert_eq!(spec.count(), 30);
		assert_eq!(spec.transition.from.css(), "rgba(11, 27, 43, 1)");
		assert_eq!(spec.transition.to.css(), "rgba(237, 245, 247, 1)");

		let spec: FieldSpec = serde_json::from_str(
			r#"{ "kind": "transition", "transition": { "variant": "current", "to": "rgb(1, 2, 3)" } }"#,
		)
		.unwrap();
		assert_eq!(spec.transition.variant, TransitionVariant::Current);
		assert_eq!(spec.transition.from, Transition::default().from);
		assert_eq!(spec.transition.to.css(), "rgba(1, 2, 3, 1)");

		assert!(
			serde_json::from_str::<FieldSpec>(
				r#"{ "kind": "transition", "transition": { "variant": "tide" } }"#
			)
			.is_err()
		);
	}

	#[test]
	fn explicit_count_wins() {
		let spec = FieldSpec {
			count: Some(3),
			..FieldSpec::new(FieldKind::Jellyfish)
		};
		assert_eq!(spec.build().count, 3);
	}

	#[test]
	fn only_ripples_get_a_timer() {
		for kind in FieldKind::ALL {
			let timer = FieldSpec::new(kind).spawn_interval();
			assert_eq!(timer.is_some(), kind == FieldKind::Ripples);
		}
		let spec = FieldSpec {
			spawn_interval_ms: Some(0),
			..FieldSpec::new(FieldKind::Ripples)
		};
		assert_eq!(spec.spawn_interval(), Some(RIPPLE_INTERVAL_MS));
	}

	#[test]
	fn deserializes_with_defaults() {
		let spec: FieldSpec = serde_json::from_str(
			r#"{ "kind": "ripples", "color": "rgba(26, 163, 163, 0.1)", "spawn_interval_ms": 1800 }"#,
		)
		.unwrap();
		assert_eq!(spec.density, Density::Medium);
		assert_eq!(spec.color().base_alpha(), 0.1);
		assert_eq!(spec.spawn_interval(), Some(1800));

		let spec: FieldSpec =
			serde_json::from_str(r#"{ "kind": "swirl", "density": "high" }"#).unwrap();
		assert_eq!(spec.count(), 80);
		assert_eq!(spec.color().css(), "rgba(255, 127, 102, 0.08)");
	}

	#[test]
	fn unknown_kind_is_rejected() {
		assert!(serde_json::from_str::<FieldSpec>(r#"{ "kind": "sharks" }"#).is_err());
	}

	#[test]
	fn every_preset_runs_and_paints_clamped_alphas() {
		let bounds = Bounds::new(640.0, 480.0);
		for kind in FieldKind::ALL {
			for opacity in [1.4, -0.2] {
				let field = FieldSpec {
					opacity: Some(opacity),
					..FieldSpec::new(kind)
				}
				.build();
				let mut sys = ParticleSystem::with_rng(
					field.count,
					field.behavior,
					bounds,
					SmallRng::seed_from_u64(kind as u64),
				);
				sys.emit();
				for _ in 0..30 {
					sys.advance(1.0 / 60.0, bounds);
				}
				assert_eq!(sys.len(), field.count);

				let mut surface = RecordingSurface::default();
				let frame = RenderFrame {
					bounds,
					time: sys.time(),
				};
				field.renderer.render(sys.snapshot(), &mut surface, &frame);
				for color in &surface.colors {
					let a = alpha_of(color).unwrap();
					assert!((0.0..=1.0).contains(&a), "{kind:?}: {color}");
				}
			}
		}
	}
}
