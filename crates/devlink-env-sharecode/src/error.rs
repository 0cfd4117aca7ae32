// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for share-code generation and validation.
//!
//! Messages are meant for the person typing the code, so each rejection
//! names the exact rule that failed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for share-code operations.
pub type ShareCodeResult<T> = Result<T, ShareCodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareCodeError {
	// =========================================================================
	// Generation
	// =========================================================================
	#[error("rate limit exceeded, please wait before generating another code")]
	RateLimited,

	#[error("unable to generate unique code after {attempts} attempts")]
	Exhausted { attempts: u32 },

	#[error("invalid word list: {0}")]
	InvalidWordList(String),

	// =========================================================================
	// Validation
	// =========================================================================
	#[error("invalid format: {0}")]
	InvalidFormat(String),

	#[error("invalid content: {0}")]
	InvalidContent(String),

	#[error("security check failed: {0}")]
	SecurityCheck(String),

	#[error("too many attempts, client blocked until {until}")]
	Blocked { until: DateTime<Utc> },

	// =========================================================================
	// Blocklist
	// =========================================================================
	#[error("failed to load offensive words from {}: {message}", path.display())]
	BlocklistFile { path: PathBuf, message: String },
}

impl ShareCodeError {
	/// True for rejections of the code itself, as opposed to limits on the
	/// caller.
	pub fn is_rejection(&self) -> bool {
		matches!(
			self,
			ShareCodeError::InvalidFormat(_)
				| ShareCodeError::InvalidContent(_)
				| ShareCodeError::SecurityCheck(_)
		)
	}
}
