//! Contact form payload, field limits and validation.

use serde::{Deserialize, Serialize};

use super::sanitize::{MAX_EMAIL_LEN, is_valid_email, sanitize_email, sanitize_text};

/// A single rejected field, reported back to the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
	/// Form field name.
	pub field: &'static str,
	/// Text shown next to the field.
	pub message: &'static str,
}

/// The form as posted. Every field defaults to empty so a missing field is
/// reported by validation rather than rejected as malformed JSON.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
	/// Sender's full name.
	pub name: String,
	/// Company or utility.
	pub organization: String,
	/// Job title.
	pub role: String,
	/// Reply address.
	pub email: String,
	/// Optional phone number.
	pub phone: Option<String>,
	/// Optional site location.
	pub region: Option<String>,
	/// Free-text inquiry.
	pub message: String,
	/// Hidden field humans never fill in.
	pub honeypot: Option<String>,
}

/// A validated, sanitized submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactForm {
	/// Sanitized name.
	pub name: String,
	/// Sanitized organization.
	pub organization: String,
	/// Sanitized role.
	pub role: String,
	/// Lowercased, trimmed email.
	pub email: String,
	/// Sanitized phone, empty when not given.
	pub phone: String,
	/// Sanitized region, empty when not given.
	pub region: String,
	/// Sanitized message.
	pub message: String,
}

struct Limit {
	field: &'static str,
	min: usize,
	max: usize,
	too_short: &'static str,
	too_long: &'static str,
}

const NAME: Limit = Limit {
	field: "name",
	min: 1,
	max: 100,
	too_short: "Name is required",
	too_long: "Name too long",
};
const ORGANIZATION: Limit = Limit {
	field: "organization",
	min: 1,
	max: 200,
	too_short: "Organization is required",
	too_long: "Organization name too long",
};
const ROLE: Limit = Limit {
	field: "role",
	min: 1,
	max: 100,
	too_short: "Role is required",
	too_long: "Role too long",
};
const PHONE: Limit = Limit {
	field: "phone",
	min: 0,
	max: 30,
	too_short: "",
	too_long: "Phone too long",
};
const REGION: Limit = Limit {
	field: "region",
	min: 0,
	max: 100,
	too_short: "",
	too_long: "Region too long",
};
const MESSAGE: Limit = Limit {
	field: "message",
	min: 10,
	max: 5000,
	too_short: "Message must be at least 10 characters",
	too_long: "Message too long",
};

impl Limit {
	fn check(&self, value: &str, errors: &mut Vec<FieldError>) {
		let len = value.chars().count();
		let message = if len < self.min {
			self.too_short
		} else if len > self.max {
			self.too_long
		} else {
			return;
		};
		errors.push(FieldError {
			field: self.field,
			message,
		});
	}
}

impl ContactSubmission {
	/// Whether the honeypot was filled in.
	pub fn is_spam(&self) -> bool {
		self.honeypot.as_deref().is_some_and(|h| !h.is_empty())
	}

	/// Checks raw lengths and the email shape, then sanitizes every field.
	pub fn validate(&self) -> Result<ContactForm, Vec<FieldError>> {
		let mut errors = Vec::new();
		NAME.check(&self.name, &mut errors);
		ORGANIZATION.check(&self.organization, &mut errors);
		ROLE.check(&self.role, &mut errors);
		if !is_valid_email(&self.email) {
			errors.push(FieldError {
				field: "email",
				message: "Invalid email address",
			});
		} else if self.email.chars().count() > MAX_EMAIL_LEN {
			errors.push(FieldError {
				field: "email",
				message: "Email too long",
			});
		}
		PHONE.check(self.phone.as_deref().unwrap_or_default(), &mut errors);
		REGION.check(self.region.as_deref().unwrap_or_default(), &mut errors);
		MESSAGE.check(&self.message, &mut errors);

		if !errors.is_empty() {
			return Err(errors);
		}

		let optional = |value: &Option<String>| value.as_deref().map(sanitize_text).unwrap_or_default();
		Ok(ContactForm {
			name: sanitize_text(&self.name),
			organization: sanitize_text(&self.organization),
			role: sanitize_text(&self.role),
			email: sanitize_email(&self.email),
			phone: optional(&self.phone),
			region: optional(&self.region),
			message: sanitize_text(&self.message),
		})
	}
}

#[cfg(test)]
pub(crate) mod fixtures {
	use super::ContactSubmission;

	pub fn valid() -> ContactSubmission {
		ContactSubmission {
			name: "Ada Reyes".into(),
			organization: "Coastal Power".into(),
			role: "Plant Manager".into(),
			email: "Ada@CoastalPower.example".into(),
			phone: Some("+1 555 0100".into()),
			region: None,
			message: "We lose a week every summer to blooms.".into(),
			honeypot: None,
		}
	}
}
