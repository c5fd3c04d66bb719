//! Per-client token buckets with a cool-down block for abusers.
//!
//! State is in memory only and resets on restart.

use std::collections::HashMap;

/// Bucket size, refill window and block length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
	/// Requests allowed per refill window.
	pub max_tokens: u32,
	/// Window after which a bucket is full again.
	pub refill_ms: u64,
	/// How long a client is shut out after exhausting its bucket.
	pub block_ms: u64,
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			max_tokens: 5,
			refill_ms: 60_000,
			block_ms: 15 * 60_000,
		}
	}
}

/// Whether a request may proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateDecision {
	/// Within budget.
	Allowed,
	/// Rejected; the client may retry after this many seconds.
	Limited { retry_after_secs: u64 },
}

#[derive(Clone, Copy, Debug)]
struct Bucket {
	tokens: u32,
	last_refill: u64,
	blocked_until: Option<u64>,
}

/// Token buckets keyed by client address.
#[derive(Debug, Default)]
pub struct RateLimiter {
	config: RateLimitConfig,
	buckets: HashMap<String, Bucket>,
}

impl RateLimiter {
	/// An empty limiter.
	pub fn new(config: RateLimitConfig) -> Self {
		Self {
			config,
			buckets: HashMap::new(),
		}
	}

	/// Spends one token for `client` at `now_ms`.
	///
	/// A full window after the last refill restores the bucket and lifts any
	/// block that has already expired.
	pub fn check(&mut self, client: &str, now_ms: u64) -> RateDecision {
		let config = self.config;
		let bucket = self.buckets.entry(client.to_owned()).or_insert(Bucket {
			tokens: config.max_tokens,
			last_refill: now_ms,
			blocked_until: None,
		});

		if let Some(until) = bucket.blocked_until {
			if now_ms < until {
				return RateDecision::Limited {
					retry_after_secs: (until - now_ms).div_ceil(1000),
				};
			}
		}

		if now_ms.saturating_sub(bucket.last_refill) > config.refill_ms {
			bucket.tokens = config.max_tokens;
			bucket.last_refill = now_ms;
			bucket.blocked_until = None;
		}

		if bucket.tokens > 0 {
			bucket.tokens -= 1;
			return RateDecision::Allowed;
		}

		bucket.blocked_until = Some(now_ms + config.block_ms);
		RateDecision::Limited {
			retry_after_secs: config.block_ms / 1000,
		}
	}

	/// Forgets clients idle for more than ten refill windows.
	pub fn sweep(&mut self, now_ms: u64) {
		let horizon = self.config.refill_ms * 10;
		self.buckets
			.retain(|_, b| now_ms.saturating_sub(b.last_refill) <= horizon);
	}

	/// Number of tracked clients.
	pub fn len(&self) -> usize {
		self.buckets.len()
	}

	/// Whether no clients are tracked.
	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}
}
