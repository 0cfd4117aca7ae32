// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Line-oriented `.env` parser.
//!
//! Lines are split with [`str::lines`], so a trailing newline does not add an
//! extra counted line and `\r\n` endings are accepted. Every line is exactly
//! one of: empty, comment, valid assignment, or parse error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{EnvError, EnvResult};
use crate::scanner::scan_value;
use crate::sensitivity::SensitivityClassifier;
use crate::types::{Document, ParseError, Variable};

/// Largest input accepted by [`Parser::parse_content`] by default (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 1024 * 1024;

/// Longest raw value, in characters, accepted on a single line by default.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
	pub max_file_size: usize,
	pub max_value_length: usize,
}

impl Default for ParserOptions {
	fn default() -> Self {
		Self {
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			max_value_length: DEFAULT_MAX_VALUE_LENGTH,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
	options: ParserOptions,
	classifier: SensitivityClassifier,
}

impl Parser {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_options(options: ParserOptions) -> Self {
		Self {
			options,
			classifier: SensitivityClassifier::new(),
		}
	}

	/// Replace the key classifier used to set [`Variable::is_sensitive`].
	pub fn with_classifier(mut self, classifier: SensitivityClassifier) -> Self {
		self.classifier = classifier;
		self
	}

	pub fn options(&self) -> &ParserOptions {
		&self.options
	}

	/// Read `path` and parse it. The path becomes the document's `file_path`.
	pub fn parse_file(&self, path: impl AsRef<Path>) -> EnvResult<Document> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|source| {
			if source.kind() == io::ErrorKind::NotFound {
				EnvError::FileNotFound(path.to_path_buf())
			} else {
				EnvError::FileRead {
					path: path.to_path_buf(),
					source,
				}
			}
		})?;
		self.parse_content(&text, &path.display().to_string())
	}

	/// Parse `.env` text. `label` is recorded as the document's `file_path`.
	///
	/// Malformed lines never abort parsing; they are collected in
	/// [`Document::parse_errors`]. Only oversized input fails outright.
	#[instrument(skip_all, fields(label = %label, bytes = text.len()))]
	pub fn parse_content(&self, text: &str, label: &str) -> EnvResult<Document> {
		if text.len() > self.options.max_file_size {
			return Err(EnvError::ContentTooLarge {
				size: text.len(),
				max: self.options.max_file_size,
			});
		}

		let mut doc = Document {
			raw_content: text.to_string(),
			file_path: label.to_string(),
			..Default::default()
		};

		for (idx, line) in text.lines().enumerate() {
			let line_number = idx + 1;
			doc.total_lines += 1;

			let trimmed = line.trim();
			if trimmed.is_empty() {
				doc.empty_lines += 1;
				continue;
			}
			if trimmed.starts_with('#') {
				doc.comment_lines += 1;
				continue;
			}

			match self.parse_assignment(trimmed, line_number) {
				Ok(variable) => {
					doc.valid_lines += 1;
					doc.variables.push(variable);
				}
				Err(message) => doc.parse_errors.push(ParseError {
					line_number,
					message,
					raw_line: line.to_string(),
				}),
			}
		}

		doc.warnings = collect_warnings(&doc.variables);

		debug!(
			total = doc.total_lines,
			valid = doc.valid_lines,
			errors = doc.parse_errors.len(),
			sensitive = doc.sensitive_count(),
			"parsed env content"
		);
		Ok(doc)
	}

	fn parse_assignment(&self, line: &str, line_number: usize) -> Result<Variable, String> {
		let (key, raw_value) =
			split_assignment(line).ok_or_else(|| "no equals sign found".to_string())?;

		let key = key.trim();
		validate_key(key).map_err(|e| format!("invalid key: {e}"))?;

		let raw_value = raw_value.trim();
		if raw_value.chars().count() > self.options.max_value_length {
			return Err(format!(
				"invalid value: value too long (max {} characters)",
				self.options.max_value_length
			));
		}
		let scanned = scan_value(raw_value).map_err(|e| format!("invalid value: {e}"))?;

		Ok(Variable {
			key: key.to_string(),
			value: scanned.value,
			is_sensitive: self.classifier.is_sensitive(key),
			line_number,
			comment: scanned.comment,
		})
	}
}

/// Split at the first `=` that is neither quoted nor escaped.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
	let mut quote: Option<char> = None;
	let mut escaped = false;

	for (i, c) in line.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' => escaped = true,
			'"' | '\'' => match quote {
				Some(q) if q == c => quote = None,
				None => quote = Some(c),
				_ => {}
			},
			'=' if quote.is_none() => return Some((&line[..i], &line[i + 1..])),
			_ => {}
		}
	}
	None
}

fn validate_key(key: &str) -> Result<(), String> {
	let mut chars = key.chars();
	let first = chars
		.next()
		.ok_or_else(|| "key cannot be empty".to_string())?;
	if !(first.is_ascii_alphabetic() || first == '_') {
		return Err("key must start with a letter or underscore".to_string());
	}
	if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
		return Err(format!("key contains invalid character: {bad}"));
	}
	Ok(())
}

fn collect_warnings(variables: &[Variable]) -> Vec<String> {
	let mut warnings = Vec::new();

	let mut first_seen: HashMap<&str, usize> = HashMap::new();
	for variable in variables {
		match first_seen.get(variable.key.as_str()) {
			Some(first) => warnings.push(format!(
				"duplicate key '{}' found at lines {} and {}",
				variable.key, first, variable.line_number
			)),
			None => {
				first_seen.insert(&variable.key, variable.line_number);
			}
		}
	}

	for variable in variables.iter().filter(|v| v.is_sensitive && v.value.is_empty()) {
		warnings.push(format!(
			"empty value for sensitive key '{}' at line {}",
			variable.key, variable.line_number
		));
	}

	let sensitive = variables.iter().filter(|v| v.is_sensitive).count();
	if sensitive > 0 {
		warnings.push(format!("found {sensitive} potentially sensitive variables"));
	}

	warnings
}
