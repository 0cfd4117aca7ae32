// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-code generation settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokensConfigLayer {
	pub rate_limit_ms: Option<u64>,
	pub code_ttl_secs: Option<u64>,
	pub max_attempts: Option<u32>,
}

impl TokensConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.rate_limit_ms.is_some() {
			self.rate_limit_ms = other.rate_limit_ms;
		}
		if other.code_ttl_secs.is_some() {
			self.code_ttl_secs = other.code_ttl_secs;
		}
		if other.max_attempts.is_some() {
			self.max_attempts = other.max_attempts;
		}
	}

	pub fn finalize(self) -> TokensConfig {
		TokensConfig {
			rate_limit_ms: self.rate_limit_ms.unwrap_or(100),
			code_ttl_secs: self.code_ttl_secs.unwrap_or(86400), // 24 hours
			max_attempts: self.max_attempts.unwrap_or(100),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokensConfig {
	pub rate_limit_ms: u64,
	pub code_ttl_secs: u64,
	pub max_attempts: u32,
}

impl Default for TokensConfig {
	fn default() -> Self {
		TokensConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_finalize_defaults() {
		let config = TokensConfigLayer::default().finalize();
		assert_eq!(config.rate_limit_ms, 100);
		assert_eq!(config.code_ttl_secs, 86400);
		assert_eq!(config.max_attempts, 100);
	}

	#[test]
	fn test_serde_roundtrip() {
		let config = TokensConfig {
			rate_limit_ms: 0,
			..Default::default()
		};
		let parsed: TokensConfig = toml::from_str(&toml::to_string(&config).unwrap()).unwrap();
		assert_eq!(config, parsed);
	}
}
