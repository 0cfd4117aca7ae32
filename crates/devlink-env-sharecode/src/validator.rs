// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation of share codes presented by users.
//!
//! Three stages run in order and the first failure wins:
//!
//! 1. format: length and `word-word-number` shape
//! 2. content: word lengths, blocklist, number range
//! 3. security: the predictability heuristics in [`crate::security`]
//!
//! [`ShareCodeValidator::validate_share_code`] wraps the stages in the
//! per-client [`RateLimiter`] and counts exactly one attempt per call that
//! the limiter admits.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, instrument};

use crate::blocklist::OffensiveWords;
use crate::error::{ShareCodeError, ShareCodeResult};
use crate::rate_limit::RateLimiter;
use crate::security::{check_security, mask_share_code};
use crate::words::{MAX_WORD_LENGTH, MIN_WORD_LENGTH};

pub const MIN_CODE_LENGTH: usize = 8;
pub const MAX_CODE_LENGTH: usize = 25;

static CODE_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z]+-[0-9]{1,3}$").expect("valid regex"));

#[derive(Debug, Clone, Default)]
pub struct ShareCodeValidator {
	limiter: RateLimiter,
	blocklist: OffensiveWords,
}

impl ShareCodeValidator {
	pub fn new(limiter: RateLimiter, blocklist: OffensiveWords) -> Self {
		Self { limiter, blocklist }
	}

	pub fn limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	pub fn blocklist(&self) -> &OffensiveWords {
		&self.blocklist
	}

	pub fn validate_share_code(&self, code: &str, client: &str) -> ShareCodeResult<()> {
		self.validate_share_code_at(code, client, Utc::now())
	}

	#[instrument(skip_all, fields(client = %client))]
	pub fn validate_share_code_at(
		&self,
		code: &str,
		client: &str,
		now: DateTime<Utc>,
	) -> ShareCodeResult<()> {
		self.limiter.admit(client, now)?;
		let outcome = self.validate_code(code);

		if let Err(e) = &outcome {
			debug!(code = %mask_share_code(code), error = %e, "share code rejected");
		}
		outcome
	}

	/// The three stages without rate limiting.
	pub fn validate_code(&self, code: &str) -> ShareCodeResult<()> {
		check_format(code)?;
		self.check_content(code)?;
		check_security(code)
	}

	/// Runs after [`check_format`], so `code` always has three parts.
	fn check_content(&self, code: &str) -> ShareCodeResult<()> {
		let mut parts = code.splitn(3, '-');
		let adjective = parts.next().unwrap_or_default();
		let noun = parts.next().unwrap_or_default();
		let number = parts.next().unwrap_or_default();

		for (label, word) in [("adjective", adjective), ("noun", noun)] {
			if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word.len()) {
				return Err(ShareCodeError::InvalidContent(format!(
					"{label} must be between {MIN_WORD_LENGTH} and {MAX_WORD_LENGTH} characters"
				)));
			}
			if self.blocklist.contains(word) {
				return Err(ShareCodeError::InvalidContent(format!(
					"{label} contains inappropriate content"
				)));
			}
		}

		check_number(number)
	}
}

fn check_format(code: &str) -> ShareCodeResult<()> {
	if code.is_empty() {
		return Err(ShareCodeError::InvalidFormat(
			"share code cannot be empty".to_string(),
		));
	}
	if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len()) {
		return Err(ShareCodeError::InvalidFormat(format!(
			"share code must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH} characters"
		)));
	}
	if !CODE_PATTERN.is_match(code) {
		return Err(ShareCodeError::InvalidFormat(
			"share code must match pattern: word-word-number".to_string(),
		));
	}
	Ok(())
}

fn check_number(number: &str) -> ShareCodeResult<()> {
	let value: u16 = number
		.parse()
		.map_err(|_| ShareCodeError::InvalidContent("number must be numeric".to_string()))?;
	if value == 0 {
		return Err(ShareCodeError::InvalidContent(
			"number cannot be zero".to_string(),
		));
	}
	if number.starts_with('0') {
		return Err(ShareCodeError::InvalidContent(
			"number cannot have a leading zero".to_string(),
		));
	}
	if value > 999 {
		return Err(ShareCodeError::InvalidContent(
			"number must be between 1 and 999".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rate_limit::RateLimitConfig;
	use chrono::Duration;

	fn validator() -> ShareCodeValidator {
		ShareCodeValidator::default()
	}

	fn rejection(code: &str) -> ShareCodeError {
		validator().validate_code(code).unwrap_err()
	}

	mod format {
		use super::*;

		#[test]
		fn empty() {
			assert_eq!(
				rejection(""),
				ShareCodeError::InvalidFormat("share code cannot be empty".into())
			);
		}

		#[test]
		fn length_bounds() {
			let expected = ShareCodeError::InvalidFormat(
				"share code must be between 8 and 25 characters".into(),
			);
			assert_eq!(rejection("ab-cd-1"), expected);
			assert_eq!(rejection("abcdefghijkl-abcdefghijkl-1"), expected);
		}

		#[test]
		fn shape() {
			let expected =
				ShareCodeError::InvalidFormat("share code must match pattern: word-word-number".into());
			for code in ["Happy-tiger-42", "happy_tiger_42", "happy-tiger-4242", "happy-tiger-x", "happy-42-tiger"] {
				assert_eq!(rejection(code), expected, "{code}");
			}
		}

		#[test]
		fn unicode_digits_do_not_match() {
			assert!(matches!(
				rejection("happy-tiger-٤٢"),
				ShareCodeError::InvalidFormat(_)
			));
		}
	}

	mod content {
		use super::*;

		#[test]
		fn word_lengths() {
			assert_eq!(
				rejection("a-tigers-42"),
				ShareCodeError::InvalidContent("adjective must be between 2 and 12 characters".into())
			);
			assert_eq!(
				rejection("happy-abcdefghijklm-4"),
				ShareCodeError::InvalidContent("noun must be between 2 and 12 characters".into())
			);
		}

		#[test]
		fn blocklisted_words() {
			assert_eq!(
				rejection("test-test-1"),
				ShareCodeError::InvalidContent("adjective contains inappropriate content".into())
			);
			assert_eq!(
				rejection("happy-demo-42"),
				ShareCodeError::InvalidContent("noun contains inappropriate content".into())
			);
		}

		#[test]
		fn custom_blocklist_entry() {
			let validator = validator();
			assert!(validator.validate_code("happy-tiger-42").is_ok());
			validator.blocklist().add("tiger");
			assert!(matches!(
				validator.validate_code("happy-tiger-42"),
				Err(ShareCodeError::InvalidContent(_))
			));
		}

		#[test]
		fn numbers() {
			assert_eq!(
				rejection("happy-tiger-0"),
				ShareCodeError::InvalidContent("number cannot be zero".into())
			);
			assert_eq!(
				rejection("happy-tiger-042"),
				ShareCodeError::InvalidContent("number cannot have a leading zero".into())
			);
		}
	}

	mod security {
		use super::*;

		#[test]
		fn common_code_rejected_after_content() {
			assert_eq!(
				rejection("blue-blue-1"),
				ShareCodeError::SecurityCheck("share code matches common pattern".into())
			);
		}

		#[test]
		fn sequential_number_rejected() {
			assert!(matches!(
				rejection("happy-tiger-456"),
				ShareCodeError::SecurityCheck(_)
			));
		}

		#[test]
		fn valid_code_accepted() {
			assert!(validator().validate_code("happy-tiger-42").is_ok());
		}
	}

	mod limiting {
		use super::*;

		fn limited(max: u32) -> ShareCodeValidator {
			ShareCodeValidator::new(
				RateLimiter::new(RateLimitConfig {
					max_attempts_per_minute: max,
					..RateLimitConfig::default()
				}),
				OffensiveWords::new(),
			)
		}

		#[test]
		fn each_call_counts_once_whatever_the_outcome() {
			let validator = limited(10);
			let now = Utc::now();
			validator.validate_share_code_at("happy-tiger-42", "c", now).unwrap();
			let _ = validator.validate_share_code_at("", "c", now);
			let _ = validator.validate_share_code_at("test-test-1", "c", now);
			let _ = validator.validate_share_code_at("blue-blue-1", "c", now);
			assert_eq!(validator.limiter().entry("c").unwrap().attempts, 4);
		}

		#[test]
		fn blocked_client_gets_block_error_before_format() {
			let validator = limited(1);
			let now = Utc::now();
			let _ = validator.validate_share_code_at("", "c", now);
			assert!(matches!(
				validator.validate_share_code_at("happy-tiger-42", "c", now),
				Err(ShareCodeError::Blocked { .. })
			));
		}

		#[test]
		fn parallel_guesses_cannot_exceed_the_limit() {
			let validator = limited(3);
			let barrier = std::sync::Arc::new(std::sync::Barrier::new(32));

			let handles: Vec<_> = (0..32)
				.map(|_| {
					let validator = validator.clone();
					let barrier = std::sync::Arc::clone(&barrier);
					std::thread::spawn(move || {
						barrier.wait();
						validator.validate_share_code("calm-river-42", "attacker")
					})
				})
				.collect();

			let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
			let admitted = results
				.iter()
				.filter(|r| !matches!(r, Err(ShareCodeError::Blocked { .. })))
				.count();
			assert_eq!(admitted, 3);
		}

		#[test]
		fn recovers_after_block() {
			let validator = limited(1);
			let now = Utc::now();
			validator.validate_share_code_at("happy-tiger-42", "c", now).unwrap();
			assert!(validator.validate_share_code_at("happy-tiger-42", "c", now).is_err());
			let later = now + Duration::seconds(300);
			validator.validate_share_code_at("happy-tiger-42", "c", later).unwrap();
		}
	}
}
