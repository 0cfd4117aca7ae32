// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Document and validation types shared by the parser, validator and formatter.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Document
// =============================================================================

/// A single `KEY=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
	pub key: String,
	pub value: String,
	/// Set once by the parser from the key name; never recomputed downstream.
	pub is_sensitive: bool,
	/// 1-based line number in the source text.
	pub line_number: usize,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comment: Option<String>,
}

/// A line that looked like an assignment but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
	pub line_number: usize,
	pub message: String,
	pub raw_line: String,
}

/// The structured result of parsing `.env` text.
///
/// Variables keep source order. Duplicate keys are all retained; use
/// [`Document::get`] for shell-like last-assignment-wins lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	pub variables: Vec<Variable>,
	pub raw_content: String,
	pub file_path: String,
	#[serde(default)]
	pub parse_errors: Vec<ParseError>,
	#[serde(default)]
	pub warnings: Vec<String>,
	pub total_lines: usize,
	pub valid_lines: usize,
	pub comment_lines: usize,
	pub empty_lines: usize,
}

impl Document {
	/// Last assignment of `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Variable> {
		self.variables.iter().rev().find(|v| v.key == key)
	}

	/// Keys in source order, duplicates included.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.variables.iter().map(|v| v.key.as_str())
	}

	pub fn sensitive_count(&self) -> usize {
		self.variables.iter().filter(|v| v.is_sensitive).count()
	}

	pub fn has_parse_errors(&self) -> bool {
		!self.parse_errors.is_empty()
	}
}

// =============================================================================
// Validation
// =============================================================================

/// Severity attached to a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Medium,
	High,
	Critical,
}

impl Severity {
	pub fn as_str(&self) -> &'static str {
		match self {
			Severity::Medium => "medium",
			Severity::High => "high",
			Severity::Critical => "critical",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Aggregate risk of a document, rolled up from error severities.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
	#[default]
	Low,
	Medium,
	High,
	Critical,
}

impl RiskLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			RiskLevel::Low => "low",
			RiskLevel::Medium => "medium",
			RiskLevel::High => "high",
			RiskLevel::Critical => "critical",
		}
	}
}

impl From<Severity> for RiskLevel {
	fn from(severity: Severity) -> Self {
		match severity {
			Severity::Medium => RiskLevel::Medium,
			Severity::High => RiskLevel::High,
			Severity::Critical => RiskLevel::Critical,
		}
	}
}

impl fmt::Display for RiskLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
	pub variable: String,
	pub message: String,
	pub severity: Severity,
	pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
	pub variable: String,
	pub message: String,
	pub line_number: usize,
}

/// Advisory result of a validator run. Recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
	pub is_valid: bool,
	pub errors: Vec<ValidationError>,
	pub warnings: Vec<ValidationWarning>,
	pub sensitive_vars: Vec<String>,
	pub risk_level: RiskLevel,
}

impl ValidationResult {
	pub fn has_error(&self, message: &str) -> bool {
		self.errors.iter().any(|e| e.message == message)
	}

	pub fn has_warning(&self, message: &str) -> bool {
		self.warnings.iter().any(|w| w.message == message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn var(key: &str, value: &str, line: usize) -> Variable {
		Variable {
			key: key.to_string(),
			value: value.to_string(),
			is_sensitive: false,
			line_number: line,
			comment: None,
		}
	}

	#[test]
	fn get_returns_last_assignment() {
		let doc = Document {
			variables: vec![var("PORT", "80", 1), var("HOST", "a", 2), var("PORT", "8080", 3)],
			..Default::default()
		};
		assert_eq!(doc.get("PORT").map(|v| v.value.as_str()), Some("8080"));
		assert!(doc.get("MISSING").is_none());
		assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["PORT", "HOST", "PORT"]);
	}

	#[test]
	fn risk_level_orders_by_severity() {
		assert!(RiskLevel::Low < RiskLevel::Medium);
		assert!(RiskLevel::High < RiskLevel::Critical);
		assert_eq!(RiskLevel::from(Severity::High), RiskLevel::High);
	}

	#[test]
	fn risk_level_serializes_lowercase() {
		let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
		assert_eq!(json, "\"critical\"");
		let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
		assert_eq!(parsed, Severity::Medium);
	}

	#[test]
	fn document_roundtrips_through_json() {
		let doc = Document {
			variables: vec![Variable {
				comment: Some("primary".to_string()),
				..var("API_KEY", "sk-1", 1)
			}],
			raw_content: "API_KEY=sk-1 # primary".to_string(),
			file_path: "inline".to_string(),
			total_lines: 1,
			valid_lines: 1,
			..Default::default()
		};
		let json = serde_json::to_string(&doc).unwrap();
		let parsed: Document = serde_json::from_str(&json).unwrap();
		assert_eq!(doc, parsed);
	}
}
