// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory store of encrypted shares, keyed by share code.
//!
//! The store never sees plaintext: it holds the envelope plus a few counts
//! taken from the document before encryption.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use devlink_env_core::Document;
use devlink_env_crypto::EncryptedEnvelope;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ShareError, ShareResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShareMetadata {
	pub variable_count: usize,
	pub sensitive_count: usize,
	pub file_size: usize,
}

impl ShareMetadata {
	pub fn from_document(doc: &Document) -> Self {
		Self {
			variable_count: doc.variables.len(),
			sensitive_count: doc.sensitive_count(),
			file_size: doc.raw_content.len(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
	pub id: Uuid,
	pub share_code: String,
	pub envelope: EncryptedEnvelope,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
	pub read_only: bool,
	pub access_count: u32,
	pub max_accesses: u32,
	pub metadata: ShareMetadata,
}

impl Share {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		now >= self.expires_at
	}

	pub fn remaining_accesses(&self) -> u32 {
		self.max_accesses.saturating_sub(self.access_count)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShareStats {
	pub total_shares: usize,
	pub active_shares: usize,
	pub expired_shares: usize,
	pub total_accesses: u64,
}

/// Concurrent share map. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct ShareStore {
	shares: Arc<RwLock<HashMap<String, Share>>>,
}

impl ShareStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store `share` under its code. A live share already holding the code
	/// is never replaced; an expired one is.
	pub fn insert(&self, share: Share) -> ShareResult<()> {
		let mut shares = self.shares.write();
		if shares
			.get(&share.share_code)
			.is_some_and(|existing| !existing.is_expired(share.created_at))
		{
			return Err(ShareError::CodeInUse);
		}
		shares.insert(share.share_code.clone(), share);
		Ok(())
	}

	/// Look at a share without consuming an access.
	pub fn get(&self, share_code: &str) -> Option<Share> {
		self.shares.read().get(share_code).cloned()
	}

	pub fn remove(&self, share_code: &str) -> Option<Share> {
		self.shares.write().remove(share_code)
	}

	/// Consume one access. Expired and exhausted shares are removed and
	/// reported; a share whose last access this was is removed after being
	/// returned.
	pub fn take(&self, share_code: &str, now: DateTime<Utc>) -> ShareResult<Share> {
		let mut shares = self.shares.write();
		let share = shares.get_mut(share_code).ok_or(ShareError::NotFound)?;

		if share.is_expired(now) {
			shares.remove(share_code);
			return Err(ShareError::Expired);
		}
		if share.access_count >= share.max_accesses {
			shares.remove(share_code);
			return Err(ShareError::AccessLimitExceeded);
		}

		share.access_count += 1;
		let taken = share.clone();
		if taken.remaining_accesses() == 0 {
			shares.remove(share_code);
			debug!(share_id = %taken.id, "share consumed");
		}
		Ok(taken)
	}

	pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
		let mut shares = self.shares.write();
		let before = shares.len();
		shares.retain(|_, share| !share.is_expired(now));
		let removed = before - shares.len();
		if removed > 0 {
			debug!(removed, remaining = shares.len(), "swept expired shares");
		}
		removed
	}

	pub fn stats(&self, now: DateTime<Utc>) -> ShareStats {
		let shares = self.shares.read();
		let (active, expired): (Vec<&Share>, Vec<&Share>) =
			shares.values().partition(|share| !share.is_expired(now));
		ShareStats {
			total_shares: shares.len(),
			active_shares: active.len(),
			expired_shares: expired.len(),
			total_accesses: active.iter().map(|s| u64::from(s.access_count)).sum(),
		}
	}

	pub fn len(&self) -> usize {
		self.shares.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.shares.read().is_empty()
	}
}
