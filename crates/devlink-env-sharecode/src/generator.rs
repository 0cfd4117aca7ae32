// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-code generation.
//!
//! Codes look like `happy-tiger-42`: an adjective, a noun and a number in
//! `1..=999`, drawn from the operating system's secure random source. The
//! generator reserves every code it issues for at least the TTL, or for as
//! long as the caller asks with [`ShareCodeGenerator::generate_until`], so
//! that two live shares never collide.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{ShareCodeError, ShareCodeResult};
use crate::security::{check_security, mask_share_code};
use crate::words::{is_valid_word, ADJECTIVES, NOUNS};

pub const DEFAULT_RATE_LIMIT_MS: i64 = 100;
pub const DEFAULT_CODE_TTL_SECS: i64 = 86_400;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;
pub const MAX_CODE_NUMBER: u16 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
	/// Minimum interval between two successful generations, across all
	/// callers. Zero disables the check.
	pub rate_limit: Duration,
	/// Minimum time an issued code stays reserved.
	pub code_ttl: Duration,
	pub max_attempts: u32,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			rate_limit: Duration::milliseconds(DEFAULT_RATE_LIMIT_MS),
			code_ttl: Duration::seconds(DEFAULT_CODE_TTL_SECS),
			max_attempts: DEFAULT_MAX_ATTEMPTS,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
	pub total_adjectives: usize,
	pub total_nouns: usize,
	pub active_codes: usize,
	pub rate_limit_ms: i64,
}

#[derive(Debug, Default)]
struct GeneratorState {
	/// Code to the end of its reservation.
	issued: HashMap<String, DateTime<Utc>>,
	last_generation: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct GeneratorInner {
	config: GeneratorConfig,
	adjectives: Vec<String>,
	nouns: Vec<String>,
	state: RwLock<GeneratorState>,
}

/// Issues unique share codes. Clones share the issued set.
#[derive(Debug, Clone)]
pub struct ShareCodeGenerator {
	inner: Arc<GeneratorInner>,
}

impl Default for ShareCodeGenerator {
	fn default() -> Self {
		Self::new(GeneratorConfig::default())
	}
}

impl ShareCodeGenerator {
	/// Generator over the built-in word lists.
	pub fn new(config: GeneratorConfig) -> Self {
		let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
		Self::build(config, owned(ADJECTIVES), owned(NOUNS))
	}

	/// Generator over caller-supplied word lists. Every word must be 2 to 12
	/// lowercase ASCII letters and neither list may be empty.
	pub fn with_words(
		config: GeneratorConfig,
		adjectives: Vec<String>,
		nouns: Vec<String>,
	) -> ShareCodeResult<Self> {
		check_word_list("adjectives", &adjectives)?;
		check_word_list("nouns", &nouns)?;
		Ok(Self::build(config, adjectives, nouns))
	}

	fn build(config: GeneratorConfig, adjectives: Vec<String>, nouns: Vec<String>) -> Self {
		Self {
			inner: Arc::new(GeneratorInner {
				config,
				adjectives,
				nouns,
				state: RwLock::new(GeneratorState::default()),
			}),
		}
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.inner.config
	}

	pub fn generate(&self) -> ShareCodeResult<String> {
		self.generate_at(Utc::now())
	}

	pub fn generate_at(&self, now: DateTime<Utc>) -> ShareCodeResult<String> {
		self.generate_until(now, now)
	}

	/// Issue a code reserved until `until` or for the TTL, whichever ends
	/// later. Shares pass their expiry so the code outlives them.
	#[instrument(skip_all)]
	pub fn generate_until(&self, now: DateTime<Utc>, until: DateTime<Utc>) -> ShareCodeResult<String> {
		let config = &self.inner.config;
		let reserved_until = now
			.checked_add_signed(config.code_ttl)
			.map_or(until, |ttl_end| ttl_end.max(until));
		let mut state = self.inner.state.write();

		if config.rate_limit > Duration::zero() {
			if let Some(last) = state.last_generation {
				if now - last < config.rate_limit {
					return Err(ShareCodeError::RateLimited);
				}
			}
		}

		for _ in 0..config.max_attempts {
			let code = self.candidate();
			if check_security(&code).is_err() {
				continue;
			}
			let taken = state.issued.get(&code).is_some_and(|end| now < *end);
			if taken {
				continue;
			}

			state.issued.insert(code.clone(), reserved_until);
			state.last_generation = Some(now);
			debug!(code = %mask_share_code(&code), active = state.issued.len(), "issued share code");
			return Ok(code);
		}

		warn!(attempts = config.max_attempts, "share code space exhausted");
		Err(ShareCodeError::Exhausted {
			attempts: config.max_attempts,
		})
	}

	fn candidate(&self) -> String {
		let adjective = &self.inner.adjectives[OsRng.gen_range(0..self.inner.adjectives.len())];
		let noun = &self.inner.nouns[OsRng.gen_range(0..self.inner.nouns.len())];
		let number = OsRng.gen_range(1..=MAX_CODE_NUMBER);
		format!("{adjective}-{noun}-{number}")
	}

	pub fn is_issued(&self, code: &str) -> bool {
		self.is_issued_at(code, Utc::now())
	}

	/// True if `code` was issued and its reservation has not ended at `now`.
	pub fn is_issued_at(&self, code: &str, now: DateTime<Utc>) -> bool {
		self.inner
			.state
			.read()
			.issued
			.get(code)
			.is_some_and(|end| now < *end)
	}

	/// Return a code to the pool before its reservation ends.
	pub fn release(&self, code: &str) -> bool {
		self.inner.state.write().issued.remove(code).is_some()
	}

	pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
		let mut state = self.inner.state.write();
		let before = state.issued.len();
		state.issued.retain(|_, end| now < *end);
		let removed = before - state.issued.len();
		if removed > 0 {
			debug!(removed, remaining = state.issued.len(), "swept expired share codes");
		}
		removed
	}

	pub fn stats(&self, now: DateTime<Utc>) -> GeneratorStats {
		let active_codes = self
			.inner
			.state
			.read()
			.issued
			.values()
			.filter(|end| now < **end)
			.count();
		GeneratorStats {
			total_adjectives: self.inner.adjectives.len(),
			total_nouns: self.inner.nouns.len(),
			active_codes,
			rate_limit_ms: self.inner.config.rate_limit.num_milliseconds(),
		}
	}

	/// True if `code` is `adjective-noun-number` over this generator's lists.
	pub fn is_from_word_lists(&self, code: &str) -> bool {
		let mut parts = code.split('-');
		let (Some(adjective), Some(noun), Some(number), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return false;
		};
		self.inner.adjectives.iter().any(|w| w == adjective)
			&& self.inner.nouns.iter().any(|w| w == noun)
			&& number
				.parse::<u16>()
				.is_ok_and(|n| (1..=MAX_CODE_NUMBER).contains(&n) && !number.starts_with('0'))
	}
}

fn check_word_list(name: &str, words: &[String]) -> ShareCodeResult<()> {
	if words.is_empty() {
		return Err(ShareCodeError::InvalidWordList(format!("{name} list is empty")));
	}
	if let Some(bad) = words.iter().find(|w| !is_valid_word(w)) {
		return Err(ShareCodeError::InvalidWordList(format!(
			"{name} contains invalid word '{bad}'"
		)));
	}
	let unique: HashSet<&String> = words.iter().collect();
	if unique.len() != words.len() {
		return Err(ShareCodeError::InvalidWordList(format!(
			"{name} contains duplicate words"
		)));
	}
	Ok(())
}
