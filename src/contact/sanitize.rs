//! Scrubbing of free-text form input before it is forwarded anywhere.

use std::sync::LazyLock;

use regex::Regex;

/// Longest free-text value kept after sanitizing.
pub const MAX_TEXT_LEN: usize = 5000;
/// RFC 5321 limit on an address.
pub const MAX_EMAIL_LEN: usize = 254;

static ANGLE_BRACKETS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[<>]").expect("valid bracket regex (verified by tests)"));

static SCRIPT_SCHEME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid scheme regex (verified by tests)"));

static EVENT_HANDLER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid handler regex (verified by tests)"));

static EMAIL_QUOTES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"[<>"']"#).expect("valid quote regex (verified by tests)"));

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
		.expect("valid email regex (verified by tests)")
});

fn truncate_chars(text: &str, max: usize) -> String {
	text.chars().take(max).collect()
}

/// Trims, removes markup and script vectors, and caps the length.
pub fn sanitize_text(input: &str) -> String {
	let text = ANGLE_BRACKETS.replace_all(input.trim(), "");
	let text = SCRIPT_SCHEME.replace_all(&text, "");
	let text = EVENT_HANDLER.replace_all(&text, "");
	truncate_chars(&text, MAX_TEXT_LEN)
}

/// Trims, lower-cases, strips quotes and brackets, and caps at 254 characters.
pub fn sanitize_email(input: &str) -> String {
	let lowered = input.trim().to_lowercase();
	truncate_chars(&EMAIL_QUOTES.replace_all(&lowered, ""), MAX_EMAIL_LEN)
}

/// Shape check for `local@domain.tld`. Dots may not lead, trail or repeat in the local part.
pub fn is_valid_email(input: &str) -> bool {
	let Some((local, _)) = input.split_once('@') else {
		return false;
	};
	!local.starts_with('.') && !local.ends_with('.') && !local.contains("..") && EMAIL_SHAPE.is_match(input)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_markup_and_script_vectors() {
		assert_eq!(sanitize_text("  <b>hello</b>  "), "bhello/b");
		assert_eq!(sanitize_text("JavaScript:alert(1)"), "alert(1)");
		assert_eq!(sanitize_text("img onerror=steal() ONLOAD=x"), "img steal() x");
	}

	#[test]
	fn caps_text_length() {
		let long = "a".repeat(MAX_TEXT_LEN + 10);
		assert_eq!(sanitize_text(&long).len(), MAX_TEXT_LEN);
	}

	#[test]
	fn emails_are_normalized() {
		assert_eq!(sanitize_email("  Ops@Plant.Example  "), "ops@plant.example");
		assert_eq!(sanitize_email("o'neil\"@x.io"), "oneil@x.io");
		let long = format!("{}@x.io", "a".repeat(300));
		assert_eq!(sanitize_email(&long).chars().count(), MAX_EMAIL_LEN);
	}

	#[test]
	fn email_shape() {
		assert!(is_valid_email("ops@plant.example"));
		assert!(is_valid_email("first.last+tag@sub.plant.co"));
		assert!(!is_valid_email("no-at-sign"));
		assert!(!is_valid_email("a@b"));
		assert!(!is_valid_email("a b@c.io"));
		assert!(!is_valid_email(".a@c.io"));
		assert!(!is_valid_email("a..b@c.io"));
		assert!(!is_valid_email("a@-c.io"));
	}
}
