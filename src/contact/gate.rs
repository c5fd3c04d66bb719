//! Admission policy for contact form submissions.
//!
//! The gate is transport-agnostic: callers hand it the relevant headers and
//! the raw body, and get back either a reply to send or a sanitized
//! submission to forward. Checks run cheapest-first, and nothing is parsed
//! until the client has passed origin and rate checks.

use log::{debug, error, info, warn};
use serde::Serialize;

use super::form::{ContactForm, ContactSubmission, FieldError};
use super::rate_limit::{RateDecision, RateLimitConfig, RateLimiter};

/// Largest accepted body, in bytes.
pub const MAX_BODY_LEN: usize = 50_000;

/// Reply to an accepted submission.
pub const THANKS: &str = "Thanks - we will get back to you shortly.";
/// Reply when forwarding fails.
pub const SEND_FAILED: &str = "We could not send your message. Please try again.";

/// The parts of an incoming request the gate looks at.
#[derive(Clone, Debug, Default)]
pub struct ContactRequest {
	/// `content-type` header.
	pub content_type: Option<String>,
	/// `origin` header.
	pub origin: Option<String>,
	/// `host` header.
	pub host: Option<String>,
	/// `x-forwarded-for` header.
	pub forwarded_for: Option<String>,
	/// `x-real-ip` header.
	pub real_ip: Option<String>,
	/// `user-agent` header.
	pub user_agent: Option<String>,
	/// `referer` header.
	pub referer: Option<String>,
	/// Raw request body.
	pub body: String,
}

fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ContactRequest {
	/// First `x-forwarded-for` hop, else `x-real-ip`, else `"unknown"`.
	pub fn client_ip(&self) -> String {
		present(&self.forwarded_for)
			.and_then(|f| f.split(',').next())
			.map(str::trim)
			.filter(|ip| !ip.is_empty())
			.or_else(|| present(&self.real_ip))
			.unwrap_or("unknown")
			.to_owned()
	}

	/// Whether the origin names the host (port ignored). Requests missing
	/// either header pass.
	pub fn same_origin(&self) -> bool {
		match (present(&self.origin), present(&self.host)) {
			(Some(origin), Some(host)) => {
				let hostname = host.split(':').next().unwrap_or(host);
				origin.contains(hostname)
			}
			_ => true,
		}
	}

	fn is_json(&self) -> bool {
		self.content_type
			.as_deref()
			.is_some_and(|ct| ct.contains("application/json"))
	}

	/// Path of the referring page, or `"unknown"`.
	pub fn page(&self) -> String {
		let Some(referer) = present(&self.referer) else {
			return "unknown".into();
		};
		let Some((_, rest)) = referer.split_once("://") else {
			return "unknown".into();
		};
		let path = rest.find('/').map_or("/", |i| &rest[i..]);
		let end = path.find(['?', '#']).unwrap_or(path.len());
		path[..end].to_owned()
	}
}

/// JSON body of every reply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reply {
	/// Whether the submission was accepted.
	pub success: bool,
	/// Human-readable outcome.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<&'static str>,
	/// Per-field validation failures.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<FieldError>,
}

/// A reply with its HTTP status.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
	/// HTTP status code.
	pub status: u16,
	/// Seconds for the `Retry-After` header.
	pub retry_after: Option<u64>,
	/// JSON body.
	pub reply: Reply,
}

impl Response {
	fn message(status: u16, success: bool, message: &'static str) -> Self {
		Self {
			status,
			retry_after: None,
			reply: Reply {
				success,
				message: Some(message),
				errors: Vec::new(),
			},
		}
	}

	fn invalid(errors: Vec<FieldError>) -> Self {
		Self {
			status: 400,
			retry_after: None,
			reply: Reply {
				success: false,
				message: None,
				errors,
			},
		}
	}

	/// The 200 thank-you reply.
	pub fn ok() -> Self {
		Self::message(200, true, THANKS)
	}
}

/// What gets forwarded to the backend: the form plus request metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
	/// The sanitized form, flattened into the payload.
	#[serde(flatten)]
	pub form: ContactForm,
	/// Path the form was posted from.
	pub page: String,
	/// Client user agent, or `"unknown"`.
	pub user_agent: String,
	/// Client address, or `"unknown"`.
	pub ip: String,
}

/// Outcome of [`ContactGate::evaluate`].
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
	/// Answer immediately with this response.
	Respond(Response),
	/// Forward this submission, then answer via [`ContactGate::after_delivery`].
	Forward(Submission),
}

/// Why forwarding a submission failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
	/// No backend URL is set.
	#[error("backend endpoint is not configured")]
	NotConfigured,

	/// The backend returned a non-success status.
	#[error("backend answered with status {0}")]
	Status(u16),

	/// The backend's reply could not be parsed.
	#[error("backend response was not JSON")]
	InvalidResponse,

	/// The request never completed.
	#[error("transport failure: {0}")]
	Transport(String),
}

/// Admission checks plus the per-client rate limiter.
pub struct ContactGate {
	limiter: RateLimiter,
}

impl Default for ContactGate {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}

impl ContactGate {
	/// A gate with an empty limiter.
	pub fn new(config: RateLimitConfig) -> Self {
		Self {
			limiter: RateLimiter::new(config),
		}
	}

	/// Runs every check in order and decides what to do with `req`.
	pub fn evaluate(&mut self, req: &ContactRequest, now_ms: u64) -> Verdict {
		use Verdict::Respond;

		if !req.is_json() {
			return Respond(Response::message(415, false, "Invalid content type"));
		}

		if !req.same_origin() {
			warn!(
				"contact: cross-origin request blocked (origin {:?}, host {:?})",
				req.origin, req.host
			);
			return Respond(Response::message(403, false, "Invalid request origin"));
		}

		let ip = req.client_ip();
		if let RateDecision::Limited { retry_after_secs } = self.limiter.check(&ip, now_ms) {
			info!("contact: rate limited, retry in {}s", retry_after_secs);
			return Respond(Response {
				retry_after: Some(retry_after_secs),
				..Response::message(429, false, "Rate limit exceeded. Please try again later.")
			});
		}

		if req.body.len() > MAX_BODY_LEN {
			return Respond(Response::message(413, false, "Request too large"));
		}

		let Ok(value) = serde_json::from_str::<serde_json::Value>(&req.body) else {
			return Respond(Response::message(400, false, "Invalid JSON"));
		};
		let submission: ContactSubmission = match serde_json::from_value(value) {
			Ok(s) => s,
			Err(e) => {
				debug!("contact: malformed submission: {}", e);
				return Respond(Response::invalid(vec![FieldError {
					field: "form",
					message: "Malformed submission",
				}]));
			}
		};

		let form = match submission.validate() {
			Ok(form) => form,
			Err(errors) => {
				debug!("contact: {} field errors", errors.len());
				return Respond(Response::invalid(errors));
			}
		};

		// Bots get the same thanks a person would.
		if submission.is_spam() {
			return Respond(Response::ok());
		}

		Verdict::Forward(Submission {
			form,
			page: req.page(),
			user_agent: present(&req.user_agent).unwrap_or("Unknown").to_owned(),
			ip,
		})
	}

	/// Maps the backend outcome to the client reply without leaking detail.
	pub fn after_delivery(&self, outcome: Result<(), DeliveryError>) -> Response {
		match outcome {
			Ok(()) => Response::ok(),
			Err(e) => {
				error!("contact: delivery failed: {}", e);
				match e {
					DeliveryError::NotConfigured => {
						Response::message(500, false, "Server configuration error")
					}
					DeliveryError::InvalidResponse => {
						Response::message(500, false, "Invalid response from backend.")
					}
					DeliveryError::Status(_) | DeliveryError::Transport(_) => {
						Response::message(500, false, SEND_FAILED)
					}
				}
			}
		}
	}

	/// Drops rate-limit state for long-idle clients.
	pub fn sweep(&mut self, now_ms: u64) {
		self.limiter.sweep(now_ms);
	}
}
