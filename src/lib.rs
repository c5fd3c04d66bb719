//! jellyguard-fx: canvas particle effects and page logic for the JellyGuard site.
//!
//! The crate renders ambient underwater particle fields (bubbles, plankton,
//! currents, swirls, jellyfish, kelp, ripples) behind page sections, and
//! carries the pure logic behind the ROI calculator, the solution comparison
//! chart and the contact form gate.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod calculators;
pub mod components;
pub mod config;
pub mod contact;
pub mod error;

// Seeds `SmallRng::from_entropy` from `crypto.getRandomValues` in the browser.
#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub use components::particle_field::{Density, FieldKind, FieldSpec, ParticleCanvas};
pub use config::{SceneConfig, load_scene_config};
pub use error::{FxError, Result};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("jellyguard-fx: logging initialized");
}

/// Main application component.
/// Loads the scene from the DOM and layers one canvas per configured field.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let scene = load_scene_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="JellyGuard" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fx-scene" style="position: fixed; inset: 0; pointer-events: none;">
			{scene
				.fields
				.into_iter()
				.map(|spec| view! { <ParticleCanvas spec=spec /> })
				.collect_view()}
		</div>
	}
}
