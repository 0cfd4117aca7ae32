// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key-name heuristic for variables that probably hold secrets.
//!
//! The classifier only looks at the key. Its verdict drives masking in the
//! formatter and the stricter checks in the validator, and is stored on each
//! [`Variable`](crate::Variable) at parse time.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::EnvResult;

/// Built-in key patterns, matched case-insensitively anywhere in the key.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
	r"password|passwd|pwd",
	r"secret|key|token|auth",
	r"api_key|apikey|access_key",
	r"private_key|privatekey|privkey",
	r"database_url|db_url|connection_string",
	r"redis_url|redis_password",
	r"jwt_secret|jwt_key",
	r"encryption_key|encrypt_key",
	r"aws_secret|aws_key|aws_access",
	r"google_api|github_token|gitlab_token",
];

static DEFAULT_CLASSIFIER: LazyLock<SensitivityClassifier> = LazyLock::new(|| {
	SensitivityClassifier::with_patterns(DEFAULT_SENSITIVE_PATTERNS)
		.expect("built-in sensitivity patterns are valid")
});

/// Classify `key` with the built-in patterns.
pub fn is_sensitive(key: &str) -> bool {
	DEFAULT_CLASSIFIER.is_sensitive(key)
}

/// A compiled set of key patterns.
#[derive(Debug, Clone)]
pub struct SensitivityClassifier {
	patterns: Vec<Regex>,
}

impl SensitivityClassifier {
	/// Classifier using [`DEFAULT_SENSITIVE_PATTERNS`].
	pub fn new() -> Self {
		DEFAULT_CLASSIFIER.clone()
	}

	/// Compile a custom pattern list. Patterns are case-insensitive.
	pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> EnvResult<Self> {
		let patterns = patterns
			.iter()
			.map(|p| {
				RegexBuilder::new(p.as_ref())
					.case_insensitive(true)
					.build()
			})
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { patterns })
	}

	pub fn is_sensitive(&self, key: &str) -> bool {
		self.patterns.iter().any(|p| p.is_match(key))
	}

	pub fn pattern_count(&self) -> usize {
		self.patterns.len()
	}
}

impl Default for SensitivityClassifier {
	fn default() -> Self {
		Self::new()
	}
}
