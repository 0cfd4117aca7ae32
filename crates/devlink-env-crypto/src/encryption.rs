// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-code keyed encryption.
//!
//! The AES-256 key is derived from the share code with PBKDF2-HMAC-SHA256
//! over a fresh 32-byte salt. Salt and nonce are regenerated on every call,
//! so encrypting the same plaintext twice never yields the same envelope.

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Key, Nonce,
};
use devlink_env_core::Document;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::envelope::{EncryptedEnvelope, NONCE_SIZE, SALT_SIZE};
use crate::error::{CryptoError, CryptoResult};

/// Size of the derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// PBKDF2 rounds used unless configured otherwise.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionManager {
	iterations: u32,
}

impl Default for EncryptionManager {
	fn default() -> Self {
		Self::new()
	}
}

impl EncryptionManager {
	pub fn new() -> Self {
		Self {
			iterations: DEFAULT_PBKDF2_ITERATIONS,
		}
	}

	/// Override the PBKDF2 round count. Both sides of a share must agree.
	pub fn with_iterations(iterations: u32) -> Self {
		Self {
			iterations: iterations.max(1),
		}
	}

	pub fn iterations(&self) -> u32 {
		self.iterations
	}

	#[instrument(skip_all, fields(bytes = plaintext.len()))]
	pub fn encrypt(&self, plaintext: &[u8], share_code: &str) -> CryptoResult<EncryptedEnvelope> {
		if share_code.is_empty() {
			return Err(CryptoError::Encryption("share code must not be empty".to_string()));
		}

		let salt = random_bytes::<SALT_SIZE>();
		let nonce_bytes = random_bytes::<NONCE_SIZE>();
		let key = derive_key(share_code, &salt, self.iterations);

		let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
		let ciphertext = cipher
			.encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
			.map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

		debug!(ciphertext_bytes = ciphertext.len(), "sealed envelope");
		Ok(EncryptedEnvelope::seal(&ciphertext, &nonce_bytes, &salt))
	}

	/// Validate `envelope`, re-derive the key from its salt and open it.
	///
	/// A malformed envelope fails before any key derivation. Any tag failure
	/// is reported as [`CryptoError::Authentication`].
	#[instrument(skip_all)]
	pub fn decrypt(
		&self,
		envelope: &EncryptedEnvelope,
		share_code: &str,
	) -> CryptoResult<Zeroizing<Vec<u8>>> {
		let parts = envelope.decode()?;
		let key = derive_key(share_code, &parts.salt, self.iterations);

		let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
		let plaintext = cipher
			.decrypt(Nonce::from_slice(&parts.nonce), parts.ciphertext.as_slice())
			.map_err(|e| {
				warn!(error = %e, "envelope authentication failed");
				CryptoError::Authentication
			})?;

		debug!(plaintext_bytes = plaintext.len(), "opened envelope");
		Ok(Zeroizing::new(plaintext))
	}

	pub fn encrypt_document(
		&self,
		doc: &Document,
		share_code: &str,
	) -> CryptoResult<EncryptedEnvelope> {
		let bytes = Zeroizing::new(serde_json::to_vec(doc)?);
		self.encrypt(&bytes, share_code)
	}

	pub fn decrypt_document(
		&self,
		envelope: &EncryptedEnvelope,
		share_code: &str,
	) -> CryptoResult<Document> {
		let bytes = self.decrypt(envelope, share_code)?;
		Ok(serde_json::from_slice(&bytes)?)
	}
}

fn derive_key(share_code: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_SIZE]> {
	let mut key = Zeroizing::new([0u8; KEY_SIZE]);
	pbkdf2_hmac::<Sha256>(share_code.as_bytes(), salt, iterations, key.as_mut_slice());
	key
}

fn random_bytes<const N: usize>() -> [u8; N] {
	let mut bytes = [0u8; N];
	OsRng.fill_bytes(&mut bytes);
	bytes
}
