// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The sharing pipeline.
//!
//! ```text
//! share:    text ─► parse ─► validate ─► generate code ─► encrypt ─► store
//! retrieve: code ─► validate code (per client) ─► take ─► decrypt ─► Document
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use devlink_env_config::EnvConfig;
use devlink_env_core::{Document, Parser, ParserOptions, ValidationResult, Validator};
use devlink_env_crypto::EncryptionManager;
use devlink_env_sharecode::{
	mask_share_code, GeneratorConfig, GeneratorStats, OffensiveWords, RateLimitConfig,
	RateLimitStats, RateLimiter, ShareCodeGenerator, ShareCodeValidator,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{ShareError, ShareResult};
use crate::store::{Share, ShareMetadata, ShareStats, ShareStore};
use crate::sweeper::Sweep;

const MAX_SECS: u64 = (i64::MAX / 1_000) as u64;

pub(crate) fn seconds(value: u64) -> Duration {
	Duration::seconds(value.min(MAX_SECS) as i64)
}

fn milliseconds(value: u64) -> Duration {
	Duration::milliseconds(value.min(i64::MAX as u64) as i64)
}

/// Per-request overrides. Unset fields fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct ShareOptions {
	pub expiry: Option<Duration>,
	pub read_only: bool,
	pub max_accesses: Option<u32>,
	/// Share even if the validator marks the document invalid.
	pub allow_invalid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareReceipt {
	pub share_id: Uuid,
	pub share_code: String,
	pub expires_at: DateTime<Utc>,
	pub metadata: ShareMetadata,
	pub validation: ValidationResult,
}

#[derive(Debug, Clone)]
pub struct RetrievedShare {
	pub share_id: Uuid,
	pub document: Document,
	pub metadata: ShareMetadata,
	pub read_only: bool,
	pub remaining_accesses: u32,
	pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
	pub shares: ShareStats,
	pub codes: GeneratorStats,
	pub rate_limit: RateLimitStats,
}

#[derive(Debug)]
struct ServiceInner {
	parser: Parser,
	validator: Validator,
	encryption: EncryptionManager,
	generator: ShareCodeGenerator,
	code_validator: ShareCodeValidator,
	store: ShareStore,
	default_expiry: Duration,
	max_expiry: Duration,
	max_accesses: u32,
	reject_invalid: bool,
}

/// Shares `.env` documents under generated codes. Clones share all state.
#[derive(Debug, Clone)]
pub struct EnvShareService {
	inner: Arc<ServiceInner>,
}

impl Default for EnvShareService {
	fn default() -> Self {
		Self::from_config(&EnvConfig::default())
	}
}

impl EnvShareService {
	pub fn from_config(config: &EnvConfig) -> Self {
		Self::with_encryption(config, EncryptionManager::new())
	}

	/// Like [`from_config`](Self::from_config) with a custom key-derivation
	/// setting. Both ends of a share must use the same one.
	pub fn with_encryption(config: &EnvConfig, encryption: EncryptionManager) -> Self {
		let parser = Parser::with_options(ParserOptions {
			max_file_size: config.sharing.max_file_size,
			..ParserOptions::default()
		});

		let generator = ShareCodeGenerator::new(GeneratorConfig {
			rate_limit: milliseconds(config.tokens.rate_limit_ms),
			code_ttl: seconds(config.tokens.code_ttl_secs),
			max_attempts: config.tokens.max_attempts,
		});

		let limiter = RateLimiter::new(RateLimitConfig {
			max_attempts_per_minute: config.validation.max_attempts_per_minute,
			block_duration: seconds(config.validation.block_duration_secs),
			retention: seconds(config.validation.cleanup_interval_secs),
		});
		let blocklist = OffensiveWords::load_or_default(config.validation.offensive_words_file.as_deref());

		Self {
			inner: Arc::new(ServiceInner {
				parser,
				validator: Validator::new(),
				encryption,
				generator,
				code_validator: ShareCodeValidator::new(limiter, blocklist),
				store: ShareStore::new(),
				default_expiry: seconds(config.sharing.default_expiry_secs),
				max_expiry: seconds(config.sharing.max_expiry_secs),
				max_accesses: config.sharing.max_accesses,
				reject_invalid: config.sharing.reject_invalid,
			}),
		}
	}

	pub fn store(&self) -> &ShareStore {
		&self.inner.store
	}

	pub fn generator(&self) -> &ShareCodeGenerator {
		&self.inner.generator
	}

	pub fn code_validator(&self) -> &ShareCodeValidator {
		&self.inner.code_validator
	}

	pub fn max_expiry(&self) -> Duration {
		self.inner.max_expiry
	}

	/// Everything the background sweeper should clean.
	pub fn sweep_targets(&self) -> Vec<Arc<dyn Sweep>> {
		vec![
			Arc::new(self.inner.generator.clone()),
			Arc::new(self.inner.code_validator.limiter().clone()),
			Arc::new(self.inner.store.clone()),
		]
	}

	pub fn share_content(
		&self,
		text: &str,
		label: &str,
		options: &ShareOptions,
	) -> ShareResult<ShareReceipt> {
		self.share_content_at(text, label, options, Utc::now())
	}

	#[instrument(skip_all, fields(label = %label))]
	pub fn share_content_at(
		&self,
		text: &str,
		label: &str,
		options: &ShareOptions,
		now: DateTime<Utc>,
	) -> ShareResult<ShareReceipt> {
		let doc = self.inner.parser.parse_content(text, label)?;
		self.share_document(doc, options, now)
	}

	pub fn share_file(
		&self,
		path: impl AsRef<Path>,
		options: &ShareOptions,
	) -> ShareResult<ShareReceipt> {
		self.share_file_at(path, options, Utc::now())
	}

	#[instrument(skip_all, fields(path = %path.as_ref().display()))]
	pub fn share_file_at(
		&self,
		path: impl AsRef<Path>,
		options: &ShareOptions,
		now: DateTime<Utc>,
	) -> ShareResult<ShareReceipt> {
		let doc = self.inner.parser.parse_file(path)?;
		self.share_document(doc, options, now)
	}

	fn share_document(
		&self,
		doc: Document,
		options: &ShareOptions,
		now: DateTime<Utc>,
	) -> ShareResult<ShareReceipt> {
		let inner = &self.inner;

		let validation = inner.validator.validate(&doc);
		if !validation.is_valid && inner.reject_invalid && !options.allow_invalid {
			warn!(
				errors = validation.errors.len(),
				risk_level = %validation.risk_level,
				"refusing to share invalid document"
			);
			return Err(ShareError::Rejected {
				risk_level: validation.risk_level,
				errors: validation.errors.len(),
			});
		}

		let expires_at = self.expiry_from(now, options.expiry)?;
		let share_code = inner.generator.generate_until(now, expires_at)?;
		if inner
			.store
			.get(&share_code)
			.is_some_and(|existing| !existing.is_expired(now))
		{
			warn!(code = %mask_share_code(&share_code), "generator issued a code held by a live share");
			return Err(ShareError::CodeInUse);
		}

		let envelope = match inner.encryption.encrypt_document(&doc, &share_code) {
			Ok(envelope) => envelope,
			Err(e) => {
				inner.generator.release(&share_code);
				return Err(e.into());
			}
		};

		let metadata = ShareMetadata::from_document(&doc);
		let share = Share {
			id: Uuid::new_v4(),
			share_code: share_code.clone(),
			envelope,
			created_at: now,
			expires_at,
			read_only: options.read_only,
			access_count: 0,
			max_accesses: options.max_accesses.unwrap_or(inner.max_accesses),
			metadata,
		};
		let share_id = share.id;
		inner.store.insert(share)?;

		debug!(
			%share_id,
			code = %mask_share_code(&share_code),
			variables = metadata.variable_count,
			sensitive = metadata.sensitive_count,
			%expires_at,
			"share created"
		);

		Ok(ShareReceipt {
			share_id,
			share_code,
			expires_at,
			metadata,
			validation,
		})
	}

	fn expiry_from(&self, now: DateTime<Utc>, requested: Option<Duration>) -> ShareResult<DateTime<Utc>> {
		let expiry = requested.unwrap_or(self.inner.default_expiry);
		if expiry <= Duration::zero() {
			return Err(ShareError::InvalidExpiry("expiry must be positive".to_string()));
		}
		if expiry > self.inner.max_expiry {
			return Err(ShareError::InvalidExpiry(format!(
				"expiry exceeds maximum of {} seconds",
				self.inner.max_expiry.num_seconds()
			)));
		}
		now.checked_add_signed(expiry)
			.ok_or_else(|| ShareError::InvalidExpiry("expiry out of range".to_string()))
	}

	pub fn retrieve(&self, share_code: &str, client_id: &str) -> ShareResult<RetrievedShare> {
		self.retrieve_at(share_code, client_id, Utc::now())
	}

	/// Check the presented code against the per-client limiter, consume one
	/// access and decrypt the document.
	#[instrument(skip_all, fields(client = %client_id))]
	pub fn retrieve_at(
		&self,
		share_code: &str,
		client_id: &str,
		now: DateTime<Utc>,
	) -> ShareResult<RetrievedShare> {
		let inner = &self.inner;
		inner
			.code_validator
			.validate_share_code_at(share_code, client_id, now)?;

		let share = inner.store.take(share_code, now)?;
		let remaining_accesses = share.remaining_accesses();
		if remaining_accesses == 0 {
			inner.generator.release(share_code);
		}

		let document = inner.encryption.decrypt_document(&share.envelope, share_code)?;
		debug!(share_id = %share.id, remaining_accesses, "share retrieved");

		Ok(RetrievedShare {
			share_id: share.id,
			document,
			metadata: share.metadata,
			read_only: share.read_only,
			remaining_accesses,
			expires_at: share.expires_at,
		})
	}

	pub fn stats(&self, now: DateTime<Utc>) -> ServiceStats {
		ServiceStats {
			shares: self.inner.store.stats(now),
			codes: self.inner.generator.stats(now),
			rate_limit: self.inner.code_validator.limiter().stats(now),
		}
	}
}
