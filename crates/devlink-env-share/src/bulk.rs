// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sharing several files in one request.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use devlink_env_sharecode::ShareCodeError;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{ShareError, ShareResult};
use crate::service::{EnvShareService, ShareOptions};

pub const MAX_BULK_FILES: usize = 50;
pub const MAX_BULK_EXPIRY_DAYS: i64 = 7;

/// Retries per file when the code generator is throttled.
const RATE_LIMIT_RETRIES: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct BulkShareRequest {
	pub files: Vec<PathBuf>,
	/// One expiry for every file; the service default when unset.
	pub expiry: Option<Duration>,
	pub read_only: bool,
	pub allow_invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkShareResult {
	pub file: PathBuf,
	pub share_code: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	pub expires_at: Option<DateTime<Utc>>,
	pub file_size: usize,
	pub variables: usize,
	pub sensitive: usize,
}

impl BulkShareResult {
	pub fn success(&self) -> bool {
		self.share_code.is_some()
	}

	fn failed(file: PathBuf, error: String) -> Self {
		Self {
			file,
			share_code: None,
			error: Some(error),
			expires_at: None,
			file_size: 0,
			variables: 0,
			sensitive: 0,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulkStatistics {
	pub total_files: usize,
	pub successful_shares: usize,
	pub failed_shares: usize,
	pub total_variables: usize,
	pub total_sensitive: usize,
	pub total_size_bytes: usize,
	/// Fraction in `0.0..=1.0`; zero for an empty batch.
	pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
	Production,
	Development,
	Testing,
	Staging,
	Environment,
	Configuration,
	Other,
}

impl FileCategory {
	pub fn as_str(&self) -> &'static str {
		match self {
			FileCategory::Production => "production",
			FileCategory::Development => "development",
			FileCategory::Testing => "testing",
			FileCategory::Staging => "staging",
			FileCategory::Environment => "environment",
			FileCategory::Configuration => "configuration",
			FileCategory::Other => "other",
		}
	}
}

impl fmt::Display for FileCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Classify by file name. Environment names win over extensions, in the
/// order production, development, testing, staging.
pub fn categorize_file(path: &Path) -> FileCategory {
	let name = path
		.file_name()
		.map(|n| n.to_string_lossy().to_lowercase())
		.unwrap_or_default();
	let extension = name.rfind('.').map(|i| &name[i..]).unwrap_or_default();

	if name.contains("prod") {
		FileCategory::Production
	} else if name.contains("dev") {
		FileCategory::Development
	} else if name.contains("test") {
		FileCategory::Testing
	} else if name.contains("staging") {
		FileCategory::Staging
	} else if extension == ".env" {
		FileCategory::Environment
	} else if extension == ".config" {
		FileCategory::Configuration
	} else {
		FileCategory::Other
	}
}

pub fn validate_bulk_request(request: &BulkShareRequest) -> ShareResult<()> {
	if request.files.is_empty() {
		return Err(ShareError::InvalidBulkRequest("no files specified".to_string()));
	}
	if request.files.len() > MAX_BULK_FILES {
		return Err(ShareError::InvalidBulkRequest(format!(
			"too many files (max {MAX_BULK_FILES})"
		)));
	}
	if let Some(expiry) = request.expiry {
		if expiry <= Duration::zero() {
			return Err(ShareError::InvalidBulkRequest(
				"expiry must be positive".to_string(),
			));
		}
		if expiry > Duration::days(MAX_BULK_EXPIRY_DAYS) {
			return Err(ShareError::InvalidBulkRequest(format!(
				"expiry too long (max {MAX_BULK_EXPIRY_DAYS} days)"
			)));
		}
	}
	Ok(())
}

pub fn bulk_statistics(results: &[BulkShareResult]) -> BulkStatistics {
	let successful: Vec<&BulkShareResult> = results.iter().filter(|r| r.success()).collect();
	let success_rate = if results.is_empty() {
		0.0
	} else {
		successful.len() as f64 / results.len() as f64
	};

	BulkStatistics {
		total_files: results.len(),
		successful_shares: successful.len(),
		failed_shares: results.len() - successful.len(),
		total_variables: successful.iter().map(|r| r.variables).sum(),
		total_sensitive: successful.iter().map(|r| r.sensitive).sum(),
		total_size_bytes: successful.iter().map(|r| r.file_size).sum(),
		success_rate,
	}
}

pub fn group_by_category(results: &[BulkShareResult]) -> BTreeMap<FileCategory, Vec<&BulkShareResult>> {
	let mut groups: BTreeMap<FileCategory, Vec<&BulkShareResult>> = BTreeMap::new();
	for result in results {
		groups.entry(categorize_file(&result.file)).or_default().push(result);
	}
	groups
}

impl EnvShareService {
	/// Share every file in `request`. A file that fails does not stop the
	/// batch; its result carries the error instead of a code.
	#[instrument(skip_all, fields(files = request.files.len()))]
	pub async fn share_files(&self, request: &BulkShareRequest) -> ShareResult<Vec<BulkShareResult>> {
		validate_bulk_request(request)?;

		let options = ShareOptions {
			expiry: request.expiry,
			read_only: request.read_only,
			max_accesses: None,
			allow_invalid: request.allow_invalid,
		};
		let backoff = self
			.generator()
			.config()
			.rate_limit
			.to_std()
			.unwrap_or_default();

		let mut results = Vec::with_capacity(request.files.len());
		for file in &request.files {
			let mut retries = 0;
			let outcome = loop {
				match self.share_file(file, &options) {
					Err(ShareError::ShareCode(ShareCodeError::RateLimited))
						if retries < RATE_LIMIT_RETRIES =>
					{
						retries += 1;
						tokio::time::sleep(backoff).await;
					}
					other => break other,
				}
			};

			let result = match outcome {
				Ok(receipt) => BulkShareResult {
					file: file.clone(),
					share_code: Some(receipt.share_code),
					error: None,
					expires_at: Some(receipt.expires_at),
					file_size: receipt.metadata.file_size,
					variables: receipt.metadata.variable_count,
					sensitive: receipt.metadata.sensitive_count,
				},
				Err(e) => {
					warn!(file = %file.display(), error = %e, "bulk share failed for file");
					BulkShareResult::failed(file.clone(), e.to_string())
				}
			};
			results.push(result);
		}

		let stats = bulk_statistics(&results);
		debug!(
			successful = stats.successful_shares,
			failed = stats.failed_shares,
			"bulk share finished"
		);
		Ok(results)
	}
}
