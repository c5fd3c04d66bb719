//! Error types for mounting and driving particle fields.
//!
//! Nothing here is fatal to the page: every caller that can hit one of these
//! logs it and leaves the canvas empty.

/// Errors raised while wiring a particle field to the browser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FxError {
	/// No `window` object (not running in a browser).
	#[error("window is not available")]
	WindowUnavailable,

	/// No `document` on the window.
	#[error("document is not available")]
	DocumentUnavailable,

	/// The canvas node was never mounted or is not a canvas.
	#[error("canvas element is not available")]
	CanvasUnavailable,

	/// `getContext("2d")` returned nothing.
	#[error("2d rendering context is not available")]
	ContextUnavailable,

	/// A browser call returned a JS exception.
	#[error("browser call failed: {0}")]
	Js(String),

	/// Scene configuration could not be read.
	#[error("invalid scene configuration: {0}")]
	Config(String),
}

impl From<wasm_bindgen::JsValue> for FxError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		Self::Js(format!("{value:?}"))
	}
}

impl From<serde_json::Error> for FxError {
	fn from(err: serde_json::Error) -> Self {
		Self::Config(err.to_string())
	}
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FxError>;
