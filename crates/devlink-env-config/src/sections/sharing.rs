// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sharing configuration section.

use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPIRY_SECS: u64 = 3600;
pub const DEFAULT_MAX_EXPIRY_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_MAX_FILE_SIZE: usize = 1024 * 1024;
pub const DEFAULT_MAX_ACCESSES: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SharingConfigLayer {
	pub default_expiry_secs: Option<u64>,
	pub max_expiry_secs: Option<u64>,
	pub max_file_size: Option<usize>,
	pub max_accesses: Option<u32>,
	pub reject_invalid: Option<bool>,
}

impl SharingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.default_expiry_secs.is_some() {
			self.default_expiry_secs = other.default_expiry_secs;
		}
		if other.max_expiry_secs.is_some() {
			self.max_expiry_secs = other.max_expiry_secs;
		}
		if other.max_file_size.is_some() {
			self.max_file_size = other.max_file_size;
		}
		if other.max_accesses.is_some() {
			self.max_accesses = other.max_accesses;
		}
		if other.reject_invalid.is_some() {
			self.reject_invalid = other.reject_invalid;
		}
	}

	pub fn finalize(self) -> SharingConfig {
		SharingConfig {
			default_expiry_secs: self.default_expiry_secs.unwrap_or(DEFAULT_EXPIRY_SECS),
			max_expiry_secs: self.max_expiry_secs.unwrap_or(DEFAULT_MAX_EXPIRY_SECS),
			max_file_size: self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
			max_accesses: self.max_accesses.unwrap_or(DEFAULT_MAX_ACCESSES),
			reject_invalid: self.reject_invalid.unwrap_or(true),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharingConfig {
	pub default_expiry_secs: u64,
	pub max_expiry_secs: u64,
	pub max_file_size: usize,
	/// Number of retrievals before a share is removed.
	pub max_accesses: u32,
	/// Refuse to share documents the validator marks invalid.
	pub reject_invalid: bool,
}

impl Default for SharingConfig {
	fn default() -> Self {
		SharingConfigLayer::default().finalize()
	}
}
