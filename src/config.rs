//! Scene configuration read from the host page.
//!
//! The page embeds `<script id="fx-config" type="application/json">` with
//! `{ "fields": [ { "kind": "bubbles", "density": "high" }, ... ] }`.
//! A missing or malformed block falls back to [`SceneConfig::default`].

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::particle_field::{FieldKind, FieldSpec};
use crate::error::{FxError, Result};

/// DOM id of the configuration script element.
pub const CONFIG_ELEMENT_ID: &str = "fx-config";

/// The set of particle fields to layer on the page, back to front.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SceneConfig {
	/// Fields layered back to front.
	#[serde(default)]
	pub fields: Vec<FieldSpec>,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			fields: vec![
				FieldSpec::new(FieldKind::Bubbles),
				FieldSpec::new(FieldKind::Ripples),
			],
		}
	}
}

impl SceneConfig {
	/// Parses the config JSON.
	pub fn parse(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}

fn read_config_text() -> Result<String> {
	let window = web_sys::window().ok_or(FxError::WindowUnavailable)?;
	let document = window.document().ok_or(FxError::DocumentUnavailable)?;
	let element = document
		.get_element_by_id(CONFIG_ELEMENT_ID)
		.ok_or_else(|| FxError::Config(format!("no #{CONFIG_ELEMENT_ID} element")))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| FxError::Config(format!("#{CONFIG_ELEMENT_ID} is not a script element")))?;
	Ok(script.text()?)
}

/// Loads the scene from the DOM, falling back to the default scene.
pub fn load_scene_config() -> SceneConfig {
	match read_config_text().and_then(|text| SceneConfig::parse(&text)) {
		Ok(config) => {
			info!("jellyguard-fx: loaded {} fields", config.fields.len());
			config
		}
		Err(e) => {
			warn!("jellyguard-fx: using default scene: {}", e);
			SceneConfig::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::Density;

	#[test]
	fn parses_a_layered_scene() {
		let config = SceneConfig::parse(
			r#"{
				"fields": [
					{ "kind": "swirl", "density": "high", "color": "rgba(255, 127, 102, 0.08)" },
					{ "kind": "plankton" },
					{ "kind": "ripples", "spawn_interval_ms": 2500, "color": "rgba(26, 163, 163, 0.12)" }
				]
			}"#,
		)
		.unwrap();
		assert_eq!(config.fields.len(), 3);
		assert_eq!(config.fields[0].density, Density::High);
		assert_eq!(config.fields[2].spawn_interval(), Some(2500));
	}

	#[test]
	fn empty_object_means_no_fields() {
		assert!(SceneConfig::parse("{}").unwrap().fields.is_empty());
	}

	#[test]
	fn malformed_json_is_a_config_error() {
		let err = SceneConfig::parse("{ fields: ").unwrap_err();
		assert!(matches!(err, FxError::Config(_)));
	}

	#[test]
	fn default_scene_has_fields() {
		let config = SceneConfig::default();
		assert!(!config.fields.is_empty());
		assert!(config.fields.iter().all(|f| f.count() > 0));
	}
}
