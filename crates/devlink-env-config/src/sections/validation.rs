// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-code validation settings: per-client throttling and the
//! offensive-word file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfigLayer {
	pub max_attempts_per_minute: Option<u32>,
	pub block_duration_secs: Option<u64>,
	pub cleanup_interval_secs: Option<u64>,
	pub offensive_words_file: Option<PathBuf>,
}

impl ValidationConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_attempts_per_minute.is_some() {
			self.max_attempts_per_minute = other.max_attempts_per_minute;
		}
		if other.block_duration_secs.is_some() {
			self.block_duration_secs = other.block_duration_secs;
		}
		if other.cleanup_interval_secs.is_some() {
			self.cleanup_interval_secs = other.cleanup_interval_secs;
		}
		if other.offensive_words_file.is_some() {
			self.offensive_words_file = other.offensive_words_file;
		}
	}

	pub fn finalize(self) -> ValidationConfig {
		ValidationConfig {
			max_attempts_per_minute: self.max_attempts_per_minute.unwrap_or(10),
			block_duration_secs: self.block_duration_secs.unwrap_or(300),
			cleanup_interval_secs: self.cleanup_interval_secs.unwrap_or(3600),
			offensive_words_file: self.offensive_words_file,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
	pub max_attempts_per_minute: u32,
	pub block_duration_secs: u64,
	/// Rate-limit entries idle longer than this are swept.
	pub cleanup_interval_secs: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub offensive_words_file: Option<PathBuf>,
}

impl Default for ValidationConfig {
	fn default() -> Self {
		ValidationConfigLayer::default().finalize()
	}
}
