// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for envelope encryption.

use thiserror::Error;

/// Result type alias for encryption operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
	/// The envelope is structurally broken. Nothing was decrypted.
	#[error("malformed envelope: {0}")]
	MalformedEnvelope(String),

	#[error("unsupported algorithm: {0}")]
	UnsupportedAlgorithm(String),

	/// Tag verification failed. The message is the same for a wrong share
	/// code and for tampered data; the cause is only logged.
	#[error("authentication failed: wrong share code or corrupted data")]
	Authentication,

	#[error("encryption failed: {0}")]
	Encryption(String),

	#[error("serialization failed: {0}")]
	Serialization(String),
}

impl From<serde_json::Error> for CryptoError {
	fn from(e: serde_json::Error) -> Self {
		CryptoError::Serialization(e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn authentication_message_is_constant() {
		assert_eq!(
			CryptoError::Authentication.to_string(),
			"authentication failed: wrong share code or corrupted data"
		);
	}

	#[test]
	fn malformed_and_authentication_are_distinct() {
		let malformed = CryptoError::MalformedEnvelope("missing nonce".to_string());
		assert!(!matches!(malformed, CryptoError::Authentication));
		assert_eq!(malformed.to_string(), "malformed envelope: missing nonce");
	}
}
