// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Errors surfaced by the share service.

use devlink_env_core::{EnvError, RiskLevel};
use devlink_env_crypto::CryptoError;
use devlink_env_sharecode::ShareCodeError;
use thiserror::Error;

pub type ShareResult<T> = Result<T, ShareError>;

#[derive(Debug, Error)]
pub enum ShareError {
	// =========================================================================
	// Store
	// =========================================================================
	#[error("share not found")]
	NotFound,

	#[error("share expired")]
	Expired,

	#[error("share access limit exceeded")]
	AccessLimitExceeded,

	#[error("share code already held by a live share")]
	CodeInUse,

	// =========================================================================
	// Requests
	// =========================================================================
	#[error("document rejected: {errors} validation error(s), risk level {risk_level}")]
	Rejected { risk_level: RiskLevel, errors: usize },

	#[error("invalid expiry: {0}")]
	InvalidExpiry(String),

	#[error("invalid bulk request: {0}")]
	InvalidBulkRequest(String),

	// =========================================================================
	// Components
	// =========================================================================
	#[error(transparent)]
	Document(#[from] EnvError),

	#[error(transparent)]
	Crypto(#[from] CryptoError),

	#[error(transparent)]
	ShareCode(#[from] ShareCodeError),
}
