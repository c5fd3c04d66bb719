//! Ambient particle fields drawn on HTML canvases.
//!
//! Each field pairs an update rule ([`Behavior`]) with a drawing strategy
//! ([`RenderStrategy`]) and runs one animation loop per mounted canvas:
//! - rising bubbles, drifting plankton, flowing currents
//! - swirls, jellyfish swarms, kelp strands, timed ripples
//! - growing coral and the seams between page sections
//!
//! Everything except [`web`] and the [`ParticleCanvas`] component is plain
//! Rust and runs natively under `cargo test`.
//!
//! # Example
//!
//! ```ignore
//! use jellyguard_fx::{Density, FieldKind, FieldSpec, ParticleCanvas};
//!
//! let spec = FieldSpec::new(FieldKind::Bubbles).with_density(Density::High);
//! view! { <ParticleCanvas spec=spec /> }
//! ```

pub mod animation;
pub mod behavior;
pub mod color;
mod component;
pub mod mounted;
pub mod particle;
pub mod preset;
pub mod render;
pub mod surface;
pub mod system;
pub mod web;

pub use behavior::Behavior;
pub use component::ParticleCanvas;
pub use preset::{Density, FieldKind, FieldSpec, Transition};
pub use render::RenderStrategy;
pub use system::ParticleSystem;
