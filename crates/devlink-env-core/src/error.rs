// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for parsing and rendering `.env` documents.
//!
//! Per-line problems are not errors at this level: they are collected as
//! [`ParseError`](crate::ParseError) entries on the document so parsing can
//! continue. `EnvError` covers the failures that abort an operation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for document operations.
pub type EnvResult<T> = Result<T, EnvError>;

#[derive(Debug, Error)]
pub enum EnvError {
	#[error("file not found: {0}")]
	FileNotFound(PathBuf),

	#[error("failed to read {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("content too large ({size} bytes, max {max})")]
	ContentTooLarge { size: usize, max: usize },

	#[error("failed to serialize document as JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("failed to serialize document as YAML: {0}")]
	Yaml(#[from] serde_yaml::Error),

	#[error("unknown output format: {0} (expected text, json or yaml)")]
	UnknownFormat(String),

	#[error("invalid sensitivity pattern: {0}")]
	Pattern(#[from] regex::Error),
}
