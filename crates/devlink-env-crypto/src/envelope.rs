// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The serialisable container carried between the sharing and receiving side.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

pub const ENVELOPE_VERSION: &str = "1.0";
pub const ALGORITHM: &str = "AES-256-GCM";

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the PBKDF2 salt in bytes.
pub const SALT_SIZE: usize = 32;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Ciphertext plus everything needed to decrypt it, except the share code.
///
/// Binary fields are standard base64. The JSON field for the ciphertext is
/// `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
	#[serde(rename = "data")]
	pub ciphertext: String,
	pub nonce: String,
	pub salt: String,
	pub version: String,
	pub algorithm: String,
}

/// Decoded binary parts of a well-formed envelope.
#[derive(Debug)]
pub(crate) struct EnvelopeParts {
	pub ciphertext: Vec<u8>,
	pub nonce: [u8; NONCE_SIZE],
	pub salt: [u8; SALT_SIZE],
}

impl EncryptedEnvelope {
	pub(crate) fn seal(ciphertext: &[u8], nonce: &[u8; NONCE_SIZE], salt: &[u8; SALT_SIZE]) -> Self {
		Self {
			ciphertext: STANDARD.encode(ciphertext),
			nonce: STANDARD.encode(nonce),
			salt: STANDARD.encode(salt),
			version: ENVELOPE_VERSION.to_string(),
			algorithm: ALGORITHM.to_string(),
		}
	}

	/// Structural check, run before any key derivation. Callers holding an
	/// envelope from an untrusted channel should call this first.
	pub fn validate(&self) -> CryptoResult<()> {
		self.decode().map(|_| ())
	}

	pub(crate) fn decode(&self) -> CryptoResult<EnvelopeParts> {
		for (name, value) in [
			("data", &self.ciphertext),
			("nonce", &self.nonce),
			("salt", &self.salt),
			("version", &self.version),
			("algorithm", &self.algorithm),
		] {
			if value.is_empty() {
				return Err(CryptoError::MalformedEnvelope(format!("missing {name}")));
			}
		}

		if self.algorithm != ALGORITHM {
			return Err(CryptoError::UnsupportedAlgorithm(self.algorithm.clone()));
		}
		if self.version != ENVELOPE_VERSION {
			return Err(CryptoError::MalformedEnvelope(format!(
				"unsupported version {}",
				self.version
			)));
		}

		let ciphertext = decode_field("data", &self.ciphertext)?;
		if ciphertext.len() < TAG_SIZE {
			return Err(CryptoError::MalformedEnvelope(format!(
				"data too short ({} bytes)",
				ciphertext.len()
			)));
		}

		Ok(EnvelopeParts {
			ciphertext,
			nonce: decode_fixed("nonce", &self.nonce)?,
			salt: decode_fixed("salt", &self.salt)?,
		})
	}

	pub fn to_json(&self) -> CryptoResult<String> {
		Ok(serde_json::to_string(self)?)
	}

	/// Parse an envelope. Only the JSON shape is checked here; run
	/// [`validate`](Self::validate) for the structural checks.
	pub fn from_json(json: &str) -> CryptoResult<Self> {
		serde_json::from_str(json)
			.map_err(|e| CryptoError::MalformedEnvelope(format!("invalid envelope JSON: {e}")))
	}
}

fn decode_field(name: &str, value: &str) -> CryptoResult<Vec<u8>> {
	STANDARD
		.decode(value)
		.map_err(|e| CryptoError::MalformedEnvelope(format!("{name} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> CryptoResult<[u8; N]> {
	let bytes = decode_field(name, value)?;
	bytes.as_slice().try_into().map_err(|_| {
		CryptoError::MalformedEnvelope(format!(
			"{name} must be {N} bytes, got {}",
			bytes.len()
		))
	})
}
