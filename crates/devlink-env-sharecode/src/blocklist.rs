// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Words that must not appear in a presented share code.
//!
//! Matching is case-insensitive. The built-in defaults are always part of the
//! list; an optional file adds to them, one word per line, `#` for comments.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{ShareCodeError, ShareCodeResult};

pub const DEFAULT_OFFENSIVE_WORDS: &[&str] =
	&["test", "demo", "temp", "fake", "invalid", "null", "undefined"];

/// Files longer than this are rejected outright.
pub const MAX_FILE_LINES: usize = 10_000;

/// Longer entries are skipped when loading or adding.
pub const MAX_WORD_LENGTH: usize = 50;

fn normalize(word: &str) -> String {
	word.trim().to_lowercase()
}

/// Shared, concurrently readable blocklist. Clones share the same set.
#[derive(Debug, Clone)]
pub struct OffensiveWords {
	words: Arc<RwLock<HashSet<String>>>,
}

impl Default for OffensiveWords {
	fn default() -> Self {
		Self::new()
	}
}

impl OffensiveWords {
	/// The built-in defaults only.
	pub fn new() -> Self {
		let words = DEFAULT_OFFENSIVE_WORDS.iter().map(|w| w.to_string()).collect();
		Self {
			words: Arc::new(RwLock::new(words)),
		}
	}

	/// Defaults plus the words in `path`.
	pub fn from_file(path: impl AsRef<Path>) -> ShareCodeResult<Self> {
		let list = Self::new();
		let extra = read_word_file(path.as_ref())?;
		list.words.write().extend(extra);
		Ok(list)
	}

	/// Defaults plus `path` if given. A file that cannot be loaded is logged
	/// and ignored.
	pub fn load_or_default(path: Option<&Path>) -> Self {
		match path {
			None => Self::new(),
			Some(path) => Self::from_file(path).unwrap_or_else(|e| {
				warn!(error = %e, "using built-in offensive words only");
				Self::new()
			}),
		}
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.read().contains(&normalize(word))
	}

	/// Returns false if the word is empty, too long, or already present.
	pub fn add(&self, word: &str) -> bool {
		let word = normalize(word);
		if word.is_empty() || word.len() > MAX_WORD_LENGTH {
			return false;
		}
		self.words.write().insert(word)
	}

	pub fn remove(&self, word: &str) -> bool {
		self.words.write().remove(&normalize(word))
	}

	pub fn len(&self) -> usize {
		self.words.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.read().is_empty()
	}
}

fn read_word_file(path: &Path) -> ShareCodeResult<Vec<String>> {
	let fail = |message: String| ShareCodeError::BlocklistFile {
		path: path.to_path_buf(),
		message,
	};

	if path.components().any(|c| matches!(c, Component::ParentDir)) {
		return Err(fail("path traversal not allowed".to_string()));
	}

	let content = fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
	if content.lines().count() > MAX_FILE_LINES {
		return Err(fail(format!("file too large (max {MAX_FILE_LINES} lines)")));
	}

	let words: Vec<String> = content
		.lines()
		.map(normalize)
		.filter(|w| !w.is_empty() && !w.starts_with('#') && w.len() <= MAX_WORD_LENGTH)
		.collect();

	debug!(path = %path.display(), words = words.len(), "loaded offensive words");
	Ok(words)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn word_file(content: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	mod defaults {
		use super::*;

		#[test]
		fn built_in_words() {
			let list = OffensiveWords::new();
			assert_eq!(list.len(), DEFAULT_OFFENSIVE_WORDS.len());
			for word in DEFAULT_OFFENSIVE_WORDS {
				assert!(list.contains(word));
			}
			assert!(!list.contains("tiger"));
		}

		#[test]
		fn lookups_are_case_insensitive() {
			let list = OffensiveWords::new();
			assert!(list.contains("TEST"));
			assert!(list.contains("  Demo "));
		}
	}

	mod management {
		use super::*;

		#[test]
		fn add_and_remove() {
			let list = OffensiveWords::new();
			assert!(list.add("Grumpy"));
			assert!(list.contains("grumpy"));
			assert!(!list.add("grumpy"));
			assert!(list.remove("GRUMPY"));
			assert!(!list.contains("grumpy"));
		}

		#[test]
		fn add_rejects_empty_and_long() {
			let list = OffensiveWords::new();
			assert!(!list.add("   "));
			assert!(!list.add(&"x".repeat(MAX_WORD_LENGTH + 1)));
			assert_eq!(list.len(), DEFAULT_OFFENSIVE_WORDS.len());
		}

		#[test]
		fn clones_share_state() {
			let list = OffensiveWords::new();
			let clone = list.clone();
			list.add("shared");
			assert!(clone.contains("shared"));
		}
	}

	mod files {
		use super::*;

		#[test]
		fn loads_words_and_skips_comments() {
			let long = "y".repeat(MAX_WORD_LENGTH + 1);
			let file = word_file(&format!("# header\nBadword\n\n  other  \n{long}\n"));
			let list = OffensiveWords::from_file(file.path()).unwrap();
			assert!(list.contains("badword"));
			assert!(list.contains("other"));
			assert!(!list.contains("# header"));
			assert!(!list.contains(&long));
			assert!(list.contains("test"));
			assert_eq!(list.len(), DEFAULT_OFFENSIVE_WORDS.len() + 2);
		}

		#[test]
		fn rejects_oversized_file() {
			let file = word_file(&"word\n".repeat(MAX_FILE_LINES + 1));
			let err = OffensiveWords::from_file(file.path()).unwrap_err();
			assert!(matches!(err, ShareCodeError::BlocklistFile { .. }));
		}

		#[test]
		fn rejects_parent_dir_components() {
			let err = OffensiveWords::from_file("../words.txt").unwrap_err();
			match err {
				ShareCodeError::BlocklistFile { message, .. } => {
					assert_eq!(message, "path traversal not allowed")
				}
				other => panic!("unexpected {other:?}"),
			}
		}

		#[test]
		fn missing_file_falls_back_to_defaults() {
			let dir = tempfile::tempdir().unwrap();
			let missing = dir.path().join("absent.txt");
			assert!(OffensiveWords::from_file(&missing).is_err());
			let list = OffensiveWords::load_or_default(Some(&missing));
			assert_eq!(list.len(), DEFAULT_OFFENSIVE_WORDS.len());
		}
	}
}
