//! Contact form intake: validation, sanitizing, rate limiting and the
//! request gate that ties them together.

pub mod form;
pub mod gate;
pub mod rate_limit;
pub mod sanitize;

pub use form::{ContactForm, ContactSubmission, FieldError};
pub use gate::{ContactGate, ContactRequest, DeliveryError, Reply, Response, Submission, Verdict};
pub use rate_limit::{RateDecision, RateLimitConfig, RateLimiter};
