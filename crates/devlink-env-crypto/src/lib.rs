// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated encryption of `.env` documents keyed by a share code.
//!
//! ```text
//! share code ──PBKDF2-HMAC-SHA256(salt, 100k)──► key
//! plaintext  ──AES-256-GCM(key, nonce)─────────► EncryptedEnvelope { data, nonce, salt, version, algorithm }
//! ```
//!
//! The envelope is carried as JSON by whatever transport the caller uses.

pub mod encryption;
pub mod envelope;
pub mod error;

pub use encryption::{EncryptionManager, DEFAULT_PBKDF2_ITERATIONS, KEY_SIZE};
pub use envelope::{EncryptedEnvelope, ALGORITHM, ENVELOPE_VERSION, NONCE_SIZE, SALT_SIZE};
pub use error::{CryptoError, CryptoResult};
