//! Color templates with a swappable alpha channel.
//!
//! Renderers never rebuild RGB per frame: a template is parsed once from the
//! caller's CSS color, and each paint only substitutes the trailing alpha.

use serde::Deserialize;

/// Clamps an opacity into `[0, 1]`; NaN becomes fully transparent.
pub fn clamp_alpha(alpha: f64) -> f64 {
	if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) }
}

/// A CSS color split into everything-but-alpha and its base alpha.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "String")]
pub struct ColorTemplate {
	/// Text up to and including the separator before the alpha, e.g. `rgba(26, 163, 163, `.
	prefix: String,
	/// The alpha the caller supplied (1.0 when the color had none).
	base_alpha: f64,
}

impl ColorTemplate {
	/// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)` or `#rrggbb`.
	///
	/// Anything else falls back to mid gray so a bad config never blanks a field.
	pub fn parse(css: &str) -> Self {
		let css = css.trim();
		if let Some(body) = css.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
			if let Some(idx) = body.rfind(',') {
				let (head, tail) = body.split_at(idx + 1);
				let alpha = tail.trim().parse::<f64>().unwrap_or(1.0);
				let spacer = if tail.starts_with(' ') { " " } else { "" };
				return Self {
					prefix: format!("rgba({head}{spacer}"),
					base_alpha: clamp_alpha(alpha),
				};
			}
		}
		if let Some(body) = css.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
			return Self {
				prefix: format!("rgba({}, ", body.trim()),
				base_alpha: 1.0,
			};
		}
		if let Some(hex) = css.strip_prefix('#').filter(|h| h.len() == 6) {
			let channel = |range: std::ops::Range<usize>| {
				hex.get(range)
					.and_then(|c| u8::from_str_radix(c, 16).ok())
					.unwrap_or(128)
			};
			return Self::rgb(channel(0..2), channel(2..4), channel(4..6));
		}
		Self::rgb(128, 128, 128)
	}

	/// Opaque color from channels.
	pub fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self {
			prefix: format!("rgba({r}, {g}, {b}, "),
			base_alpha: 1.0,
		}
	}

	/// Color from channels and alpha.
	pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self {
			base_alpha: clamp_alpha(a),
			..Self::rgb(r, g, b)
		}
	}

	/// The template's own alpha.
	pub fn base_alpha(&self) -> f64 {
		self.base_alpha
	}

	/// The color with its alpha replaced (clamped into `[0, 1]`).
	pub fn with_alpha(&self, alpha: f64) -> String {
		format!("{}{})", self.prefix, trim_float(clamp_alpha(alpha)))
	}

	/// The color with its base alpha scaled by `factor`.
	pub fn scaled(&self, factor: f64) -> String {
		self.with_alpha(self.base_alpha * factor)
	}

	/// The color at its own alpha.
	pub fn css(&self) -> String {
		self.with_alpha(self.base_alpha)
	}
}

impl From<String> for ColorTemplate {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}

impl From<&str> for ColorTemplate {
	fn from(value: &str) -> Self {
		Self::parse(value)
	}
}

/// Formats an alpha with at most three decimals and no trailing zeros.
fn trim_float(value: f64) -> String {
	let text = format!("{value:.3}");
	let text = text.trim_end_matches('0').trim_end_matches('.');
	if text.is_empty() { "0".into() } else { text.into() }
}

/// Reads the trailing alpha back out of a color string produced by a template.
pub fn alpha_of(css: &str) -> Option<f64> {
	css.strip_suffix(')')?.rsplit(',').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substitutes_only_the_alpha() {
		let t = ColorTemplate::parse("rgba(26, 163, 163, 0.15)");
		assert_eq!(t.base_alpha(), 0.15);
		assert_eq!(t.with_alpha(0.5), "rgba(26, 163, 163, 0.5)");
		assert_eq!(t.css(), "rgba(26, 163, 163, 0.15)");
	}

	#[test]
	fn keeps_compact_spacing() {
		let t = ColorTemplate::parse("rgba(255,127,102,0.08)");
		assert_eq!(t.with_alpha(1.0), "rgba(255,127,102,1)");
	}

	#[test]
	fn rgb_and_hex_gain_an_alpha_slot() {
		assert_eq!(
			ColorTemplate::parse("rgb(26, 163, 163)").with_alpha(0.25),
			"rgba(26, 163, 163, 0.25)"
		);
		assert_eq!(
			ColorTemplate::parse("#1aa3a3").with_alpha(0.25),
			"rgba(26, 163, 163, 0.25)"
		);
	}

	#[test]
	fn out_of_range_alpha_is_clamped() {
		let t = ColorTemplate::rgb(1, 2, 3);
		assert_eq!(alpha_of(&t.with_alpha(1.4)), Some(1.0));
		assert_eq!(alpha_of(&t.with_alpha(-0.2)), Some(0.0));
		assert_eq!(alpha_of(&t.with_alpha(f64::NAN)), Some(0.0));
		assert_eq!(ColorTemplate::rgba(1, 2, 3, 7.0).base_alpha(), 1.0);
	}

	#[test]
	fn garbage_falls_back_to_gray() {
		assert_eq!(
			ColorTemplate::parse("teal").css(),
			"rgba(128, 128, 128, 1)"
		);
	}

	#[test]
	fn deserializes_from_string() {
		let t: ColorTemplate = serde_json::from_str("\"rgba(1, 2, 3, 0.5)\"").unwrap();
		assert_eq!(t.scaled(0.5), "rgba(1, 2, 3, 0.25)");
	}
}
