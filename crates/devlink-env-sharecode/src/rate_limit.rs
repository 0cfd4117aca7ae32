// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-client limiter for share-code validation attempts.
//!
//! ```text
//! Unknown ──first attempt──► Tracking ──attempts ≥ max──► Blocked
//!                               ▲                            │
//!                               └──── block_until passes ────┘
//!                                      (attempts reset)
//! ```
//!
//! A client idle for more than a minute starts a fresh window. Entries idle
//! longer than the retention period are dropped by [`RateLimiter::sweep`]
//! whatever their state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ShareCodeError, ShareCodeResult};

pub const DEFAULT_MAX_ATTEMPTS_PER_MINUTE: u32 = 10;
pub const DEFAULT_BLOCK_DURATION_SECS: i64 = 300;
pub const DEFAULT_RETENTION_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
	pub max_attempts_per_minute: u32,
	pub block_duration: Duration,
	/// Idle time after which an entry is swept.
	pub retention: Duration,
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			max_attempts_per_minute: DEFAULT_MAX_ATTEMPTS_PER_MINUTE,
			block_duration: Duration::seconds(DEFAULT_BLOCK_DURATION_SECS),
			retention: Duration::seconds(DEFAULT_RETENTION_SECS),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitEntry {
	pub attempts: u32,
	pub last_attempt: DateTime<Utc>,
	pub blocked: bool,
	pub block_until: Option<DateTime<Utc>>,
}

impl RateLimitEntry {
	fn new(now: DateTime<Utc>) -> Self {
		Self {
			attempts: 0,
			last_attempt: now,
			blocked: false,
			block_until: None,
		}
	}
}

/// Observable state of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
	Unknown,
	Tracking { attempts: u32 },
	Blocked { until: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStats {
	pub active_clients: usize,
	pub blocked_clients: usize,
	pub max_attempts: u32,
	pub block_duration_secs: i64,
}

#[derive(Debug)]
struct RateLimiterInner {
	config: RateLimitConfig,
	entries: RwLock<HashMap<String, RateLimitEntry>>,
}

/// Thread-safe limiter. Clones share the same client map.
#[derive(Debug, Clone)]
pub struct RateLimiter {
	inner: Arc<RateLimiterInner>,
}

impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}

impl RateLimiter {
	pub fn new(config: RateLimitConfig) -> Self {
		Self {
			inner: Arc::new(RateLimiterInner {
				config,
				entries: RwLock::new(HashMap::new()),
			}),
		}
	}

	pub fn config(&self) -> &RateLimitConfig {
		&self.inner.config
	}

	/// Admit or refuse an attempt by `client`. An admitted attempt is counted
	/// before the lock is released, so concurrent callers can never exceed
	/// the per-minute limit between them.
	pub fn admit(&self, client: &str, now: DateTime<Utc>) -> ShareCodeResult<()> {
		let config = &self.inner.config;
		let mut entries = self.inner.entries.write();
		let entry = entries
			.entry(client.to_string())
			.or_insert_with(|| RateLimitEntry::new(now));

		if entry.blocked {
			match entry.block_until {
				Some(until) if now < until => {
					return Err(ShareCodeError::Blocked { until });
				}
				_ => {
					debug!(client, "rate limit block expired");
					entry.blocked = false;
					entry.block_until = None;
					entry.attempts = 0;
				}
			}
		}

		if now - entry.last_attempt > Duration::minutes(1) {
			entry.attempts = 0;
		}

		if entry.attempts >= config.max_attempts_per_minute {
			let until = now + config.block_duration;
			entry.blocked = true;
			entry.block_until = Some(until);
			warn!(client, attempts = entry.attempts, %until, "client blocked");
			return Err(ShareCodeError::Blocked { until });
		}

		entry.attempts += 1;
		entry.last_attempt = now;
		Ok(())
	}

	pub fn entry(&self, client: &str) -> Option<RateLimitEntry> {
		self.inner.entries.read().get(client).cloned()
	}

	pub fn state(&self, client: &str, now: DateTime<Utc>) -> ClientState {
		match self.inner.entries.read().get(client) {
			None => ClientState::Unknown,
			Some(RateLimitEntry {
				blocked: true,
				block_until: Some(until),
				..
			}) if now < *until => ClientState::Blocked { until: *until },
			Some(entry) => ClientState::Tracking {
				attempts: entry.attempts,
			},
		}
	}

	/// Drop entries whose last attempt is older than the retention period.
	pub fn sweep(&self, now: DateTime<Utc>) -> usize {
		let retention = self.inner.config.retention;
		let mut entries = self.inner.entries.write();
		let before = entries.len();
		entries.retain(|_, entry| now - entry.last_attempt <= retention);
		let removed = before - entries.len();
		if removed > 0 {
			debug!(removed, remaining = entries.len(), "swept rate limit entries");
		}
		removed
	}

	pub fn stats(&self, now: DateTime<Utc>) -> RateLimitStats {
		let config = &self.inner.config;
		let entries = self.inner.entries.read();
		RateLimitStats {
			active_clients: entries
				.values()
				.filter(|e| now - e.last_attempt <= config.retention)
				.count(),
			blocked_clients: entries
				.values()
				.filter(|e| e.blocked && e.block_until.is_some_and(|until| now < until))
				.count(),
			max_attempts: config.max_attempts_per_minute,
			block_duration_secs: config.block_duration.num_seconds(),
		}
	}

	pub fn len(&self) -> usize {
		self.inner.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.entries.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn limiter(max: u32) -> RateLimiter {
		RateLimiter::new(RateLimitConfig {
			max_attempts_per_minute: max,
			block_duration: Duration::seconds(300),
			retention: Duration::seconds(3600),
		})
	}

	fn attempt(limiter: &RateLimiter, client: &str, now: DateTime<Utc>) -> ShareCodeResult<()> {
		limiter.admit(client, now)
	}

	mod transitions {
		use super::*;

		#[test]
		fn unknown_to_tracking() {
			let limiter = limiter(3);
			let now = Utc::now();
			assert_eq!(limiter.state("c", now), ClientState::Unknown);
			attempt(&limiter, "c", now).unwrap();
			assert_eq!(limiter.state("c", now), ClientState::Tracking { attempts: 1 });
		}

		#[test]
		fn tracking_to_blocked_on_attempt_after_max() {
			let limiter = limiter(3);
			let now = Utc::now();
			for _ in 0..3 {
				attempt(&limiter, "c", now).unwrap();
			}
			let err = attempt(&limiter, "c", now).unwrap_err();
			let until = now + Duration::seconds(300);
			assert_eq!(err, ShareCodeError::Blocked { until });
			assert_eq!(limiter.state("c", now), ClientState::Blocked { until });
		}

		#[test]
		fn blocked_attempts_do_not_count() {
			let limiter = limiter(2);
			let now = Utc::now();
			attempt(&limiter, "c", now).unwrap();
			attempt(&limiter, "c", now).unwrap();
			assert!(attempt(&limiter, "c", now).is_err());
			for s in 1..10 {
				assert!(attempt(&limiter, "c", now + Duration::seconds(s)).is_err());
			}
			assert_eq!(limiter.entry("c").unwrap().attempts, 2);
		}

		#[test]
		fn blocked_to_tracking_after_block_expires() {
			let limiter = limiter(2);
			let now = Utc::now();
			attempt(&limiter, "c", now).unwrap();
			attempt(&limiter, "c", now).unwrap();
			assert!(attempt(&limiter, "c", now).is_err());

			let later = now + Duration::seconds(300);
			attempt(&limiter, "c", later).unwrap();
			assert_eq!(limiter.state("c", later), ClientState::Tracking { attempts: 1 });
		}

		#[test]
		fn idle_minute_resets_window() {
			let limiter = limiter(2);
			let now = Utc::now();
			attempt(&limiter, "c", now).unwrap();
			attempt(&limiter, "c", now).unwrap();
			attempt(&limiter, "c", now + Duration::seconds(61)).unwrap();
			assert_eq!(limiter.entry("c").unwrap().attempts, 1);
		}

		#[test]
		fn clients_are_independent() {
			let limiter = limiter(1);
			let now = Utc::now();
			attempt(&limiter, "a", now).unwrap();
			assert!(attempt(&limiter, "a", now).is_err());
			attempt(&limiter, "b", now).unwrap();
		}
	}

	mod concurrency {
		use super::*;
		use std::sync::Barrier;
		use std::thread;

		#[test]
		fn simultaneous_attempts_respect_the_limit() {
			let limiter = limiter(3);
			let now = Utc::now();
			let barrier = Arc::new(Barrier::new(32));

			let handles: Vec<_> = (0..32)
				.map(|_| {
					let limiter = limiter.clone();
					let barrier = Arc::clone(&barrier);
					thread::spawn(move || {
						barrier.wait();
						limiter.admit("attacker", now).is_ok()
					})
				})
				.collect();

			let admitted = handles
				.into_iter()
				.map(|h| h.join().unwrap())
				.filter(|ok| *ok)
				.count();
			assert_eq!(admitted, 3);
			assert_eq!(limiter.entry("attacker").unwrap().attempts, 3);
			assert!(matches!(
				limiter.state("attacker", now),
				ClientState::Blocked { .. }
			));
		}
	}

	mod maintenance {
		use super::*;

		#[test]
		fn sweep_drops_idle_entries_even_if_blocked() {
			let limiter = limiter(1);
			let now = Utc::now();
			attempt(&limiter, "idle", now).unwrap();
			assert!(attempt(&limiter, "idle", now).is_err());
			attempt(&limiter, "fresh", now + Duration::seconds(3000)).unwrap();

			let removed = limiter.sweep(now + Duration::seconds(3601));
			assert_eq!(removed, 1);
			assert!(limiter.entry("idle").is_none());
			assert!(limiter.entry("fresh").is_some());
		}

		#[test]
		fn stats_count_active_and_blocked() {
			let limiter = limiter(1);
			let now = Utc::now();
			attempt(&limiter, "a", now).unwrap();
			assert!(attempt(&limiter, "a", now).is_err());
			attempt(&limiter, "b", now).unwrap();

			let stats = limiter.stats(now);
			assert_eq!(stats.active_clients, 2);
			assert_eq!(stats.blocked_clients, 1);
			assert_eq!(stats.max_attempts, 1);
			assert_eq!(stats.block_duration_secs, 300);

			assert_eq!(limiter.stats(now + Duration::seconds(301)).blocked_clients, 0);
		}
	}
}
