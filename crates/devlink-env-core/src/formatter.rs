// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendering of documents and validation results as text, JSON or YAML.
//!
//! Masking happens before anything is rendered: JSON and YAML output is built
//! from a safe copy that never holds a raw sensitive value when masking is on.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{EnvError, EnvResult};
use crate::types::{Document, ValidationResult, Variable};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
	Yaml,
}

impl OutputFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			OutputFormat::Text => "text",
			OutputFormat::Json => "json",
			OutputFormat::Yaml => "yaml",
		}
	}
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OutputFormat {
	type Err = EnvError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"text" | "txt" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			"yaml" | "yml" => Ok(OutputFormat::Yaml),
			other => Err(EnvError::UnknownFormat(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
	pub mask_sensitive: bool,
	pub show_comments: bool,
	pub show_line_numbers: bool,
	pub output_format: OutputFormat,
	/// JSON indentation width. YAML output always uses two spaces.
	pub indent_size: usize,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self {
			mask_sensitive: true,
			show_comments: true,
			show_line_numbers: false,
			output_format: OutputFormat::Text,
			indent_size: 2,
		}
	}
}

/// Mask a secret: up to four characters become all `*`; longer values keep
/// their first and last character. A value that already looks masked is
/// filled with `#` instead, so the output never equals the input.
pub fn mask_value(value: &str) -> String {
	let len = value.chars().count();
	let masked = if len <= 4 {
		"*".repeat(len)
	} else {
		let mut chars = value.chars();
		let first = chars.next().unwrap_or_default();
		let last = chars.next_back().unwrap_or_default();
		format!("{first}{}{last}", "*".repeat(len - 2))
	};
	if masked == value && len > 0 {
		return "#".repeat(len);
	}
	masked
}

#[derive(Debug, Serialize)]
struct Statistics {
	total_lines: usize,
	valid_lines: usize,
	comment_lines: usize,
	empty_lines: usize,
	sensitive_variables: usize,
}

#[derive(Debug, Serialize)]
struct SafeParseError<'a> {
	line_number: usize,
	message: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	line: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SafeVariable<'a> {
	key: &'a str,
	value: String,
	sensitive: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	line_number: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	comment: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SafeDocument<'a> {
	file_path: &'a str,
	statistics: Statistics,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	warnings: Vec<&'a str>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	parse_errors: Vec<SafeParseError<'a>>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	variables: Vec<SafeVariable<'a>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

impl Formatter {
	pub fn new() -> Self {
		Self
	}

	pub fn format(&self, doc: &Document, options: &FormatOptions) -> EnvResult<String> {
		match options.output_format {
			OutputFormat::Text => Ok(self.format_text(doc, options)),
			OutputFormat::Json => to_json(&safe_copy(doc, options), options.indent_size),
			OutputFormat::Yaml => Ok(serde_yaml::to_string(&safe_copy(doc, options))?),
		}
	}

	fn format_text(&self, doc: &Document, options: &FormatOptions) -> String {
		let mut out = String::new();
		out.push_str("📄 Environment File Analysis\n");
		out.push_str(RULE);
		out.push_str("\n\n");

		out.push_str(&format!("📁 File: {}\n", doc.file_path));
		out.push_str("📊 Statistics:\n");
		out.push_str(&format!("   • Total lines: {}\n", doc.total_lines));
		out.push_str(&format!("   • Valid variables: {}\n", doc.valid_lines));
		out.push_str(&format!("   • Comment lines: {}\n", doc.comment_lines));
		out.push_str(&format!("   • Empty lines: {}\n", doc.empty_lines));
		out.push_str(&format!("   • Sensitive variables: {}\n", doc.sensitive_count()));

		if !doc.warnings.is_empty() {
			out.push_str("\n⚠️  Warnings:\n");
			for warning in &doc.warnings {
				out.push_str(&format!("   • {warning}\n"));
			}
		}

		if !doc.parse_errors.is_empty() {
			out.push_str("\n❌ Parse Errors:\n");
			for err in &doc.parse_errors {
				out.push_str(&format!("   • Line {}: {}\n", err.line_number, err.message));
				if options.show_line_numbers {
					out.push_str(&format!("     Content: {}\n", err.raw_line));
				}
			}
		}

		if !doc.variables.is_empty() {
			out.push_str("\n🔧 Variables:\n");
			out.push_str(RULE);
			out.push('\n');
			let rows: Vec<Vec<String>> = doc
				.variables
				.iter()
				.map(|v| variable_row(v, options))
				.collect();
			out.push_str(&align_columns(&rows));
		}

		out
	}

	/// Render a validator run. Text is a report; JSON and YAML serialise the
	/// result as-is (it never holds values, only variable names).
	pub fn format_validation_result(
		&self,
		result: &ValidationResult,
		options: &FormatOptions,
	) -> EnvResult<String> {
		match options.output_format {
			OutputFormat::Json => return to_json(result, options.indent_size),
			OutputFormat::Yaml => return Ok(serde_yaml::to_string(result)?),
			OutputFormat::Text => {}
		}

		let mut out = String::new();
		out.push_str("🔍 Security Validation Results\n");
		out.push_str(RULE);
		out.push_str("\n\n");

		let status = if result.is_valid { "✅ Valid" } else { "❌ Invalid" };
		out.push_str(&format!("Status: {status}\n"));
		out.push_str(&format!("Risk Level: {}\n", result.risk_level));
		if !result.sensitive_vars.is_empty() {
			out.push_str(&format!("Sensitive Variables: {}\n", result.sensitive_vars.len()));
		}

		if !result.errors.is_empty() {
			out.push_str("\n❌ Errors:\n");
			for err in &result.errors {
				out.push_str(&format!(
					"   • {} (Line {}): {} [{}]\n",
					err.variable, err.line_number, err.message, err.severity
				));
			}
		}

		if !result.warnings.is_empty() {
			out.push_str("\n⚠️  Warnings:\n");
			for warning in &result.warnings {
				out.push_str(&format!(
					"   • {} (Line {}): {}\n",
					warning.variable, warning.line_number, warning.message
				));
			}
		}

		if !result.sensitive_vars.is_empty() {
			out.push_str("\n🔒 Sensitive Variables Detected:\n");
			for name in &result.sensitive_vars {
				out.push_str(&format!("   • {name}\n"));
			}
		}

		Ok(out)
	}
}

fn display_value(variable: &Variable, options: &FormatOptions) -> String {
	if variable.is_sensitive && options.mask_sensitive {
		mask_value(&variable.value)
	} else {
		variable.value.clone()
	}
}

fn variable_row(variable: &Variable, options: &FormatOptions) -> Vec<String> {
	let mut row = Vec::with_capacity(6);
	if options.show_line_numbers {
		row.push(variable.line_number.to_string());
	}
	row.push(variable.key.clone());
	row.push("=".to_string());
	row.push(display_value(variable, options));
	if options.show_comments {
		if let Some(comment) = &variable.comment {
			row.push(format!("# {comment}"));
		}
	}
	if variable.is_sensitive {
		row.push("🔒".to_string());
	}
	row
}

/// Pad every cell but the last in each row to its column's widest cell.
fn align_columns(rows: &[Vec<String>]) -> String {
	let mut widths: Vec<usize> = Vec::new();
	for row in rows {
		for (i, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
			let width = cell.chars().count();
			match widths.get_mut(i) {
				Some(w) => *w = (*w).max(width),
				None => widths.push(width),
			}
		}
	}

	let mut out = String::new();
	for row in rows {
		let last = row.len().saturating_sub(1);
		for (i, cell) in row.iter().enumerate() {
			out.push_str(cell);
			if i < last {
				let pad = widths[i] - cell.chars().count() + COLUMN_PADDING;
				out.push_str(&" ".repeat(pad));
			}
		}
		out.push('\n');
	}
	out
}

fn safe_copy<'a>(doc: &'a Document, options: &FormatOptions) -> SafeDocument<'a> {
	SafeDocument {
		file_path: &doc.file_path,
		statistics: Statistics {
			total_lines: doc.total_lines,
			valid_lines: doc.valid_lines,
			comment_lines: doc.comment_lines,
			empty_lines: doc.empty_lines,
			sensitive_variables: doc.sensitive_count(),
		},
		warnings: doc.warnings.iter().map(String::as_str).collect(),
		parse_errors: doc
			.parse_errors
			.iter()
			.map(|e| SafeParseError {
				line_number: e.line_number,
				message: &e.message,
				line: options.show_line_numbers.then_some(e.raw_line.as_str()),
			})
			.collect(),
		variables: doc
			.variables
			.iter()
			.map(|v| SafeVariable {
				key: &v.key,
				value: display_value(v, options),
				sensitive: v.is_sensitive,
				line_number: options.show_line_numbers.then_some(v.line_number),
				comment: if options.show_comments {
					v.comment.as_deref()
				} else {
					None
				},
			})
			.collect(),
	}
}

fn to_json<T: Serialize>(value: &T, indent_size: usize) -> EnvResult<String> {
	let indent = " ".repeat(indent_size);
	let mut buf = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
	let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
	value.serialize(&mut ser)?;
	Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::Parser;
	use crate::validator::Validator;

	fn doc(text: &str) -> Document {
		Parser::new().parse_content(text, ".env").unwrap()
	}

	fn with_format(output_format: OutputFormat) -> FormatOptions {
		FormatOptions {
			output_format,
			..Default::default()
		}
	}

	mod masking {
		use super::*;

		#[test]
		fn short_values_are_fully_masked() {
			assert_eq!(mask_value(""), "");
			assert_eq!(mask_value("a"), "*");
			assert_eq!(mask_value("abcd"), "****");
		}

		#[test]
		fn long_values_keep_ends() {
			assert_eq!(mask_value("abcde"), "a***e");
			assert_eq!(mask_value("sk-1234567890"), "s***********0");
		}

		#[test]
		fn already_masked_looking_values_change() {
			assert_eq!(mask_value("****"), "####");
			assert_eq!(mask_value("*****"), "#####");
			assert_eq!(mask_value("a***e"), "#####");
			assert_eq!(mask_value("#####"), "#***#");
		}

		#[test]
		fn multibyte_values() {
			assert_eq!(mask_value("pässwörd"), "p******d");
		}
	}

	mod text {
		use super::*;

		#[test]
		fn report_sections() {
			let out = Formatter::new()
				.format(&doc("API_KEY=sk-1234567890 # prod key\nPORT=8080\nBROKEN"), &FormatOptions::default())
				.unwrap();
			assert!(out.starts_with("📄 Environment File Analysis\n"));
			assert!(out.contains("📁 File: .env\n"));
			assert!(out.contains("   • Total lines: 3\n"));
			assert!(out.contains("   • Sensitive variables: 1\n"));
			assert!(out.contains("⚠️  Warnings:\n"));
			assert!(out.contains("   • Line 3: no equals sign found\n"));
			assert!(!out.contains("Content: BROKEN"));
			assert!(out.contains("s***********0"));
			assert!(!out.contains("sk-1234567890"));
			assert!(out.contains("# prod key"));
			assert!(out.contains("🔒"));
		}

		#[test]
		fn columns_are_aligned() {
			let out = Formatter::new()
				.format(&doc("A=1\nLONGER_KEY=2"), &FormatOptions::default())
				.unwrap();
			assert!(out.contains("A           =  1\n"), "{out}");
			assert!(out.contains("LONGER_KEY  =  2\n"), "{out}");
		}

		#[test]
		fn line_numbers_and_comments_toggle() {
			let options = FormatOptions {
				show_line_numbers: true,
				show_comments: false,
				..Default::default()
			};
			let out = Formatter::new()
				.format(&doc("PORT=80 # web\nBAD LINE"), &options)
				.unwrap();
			assert!(out.contains("1  PORT  =  80\n"), "{out}");
			assert!(!out.contains("# web"));
			assert!(out.contains("     Content: BAD LINE\n"));
		}

		#[test]
		fn unmasked_output_shows_secrets() {
			let options = FormatOptions {
				mask_sensitive: false,
				..Default::default()
			};
			let out = Formatter::new()
				.format(&doc("API_KEY=sk-1234567890"), &options)
				.unwrap();
			assert!(out.contains("sk-1234567890"));
		}
	}

	mod structured {
		use super::*;

		#[test]
		fn json_safe_copy() {
			let out = Formatter::new()
				.format(&doc("API_KEY=sk-1234567890\nPORT=8080 # web"), &with_format(OutputFormat::Json))
				.unwrap();
			let value: serde_json::Value = serde_json::from_str(&out).unwrap();
			assert_eq!(value["file_path"], ".env");
			assert_eq!(value["statistics"]["sensitive_variables"], 1);
			assert_eq!(value["variables"][0]["value"], "s***********0");
			assert_eq!(value["variables"][0]["sensitive"], true);
			assert_eq!(value["variables"][1]["value"], "8080");
			assert_eq!(value["variables"][1]["comment"], "web");
			assert!(value["variables"][1].get("line_number").is_none());
			assert!(!out.contains("sk-1234567890"));
		}

		#[test]
		fn json_indent_size() {
			let options = FormatOptions {
				output_format: OutputFormat::Json,
				indent_size: 4,
				..Default::default()
			};
			let out = Formatter::new().format(&doc("PORT=1"), &options).unwrap();
			assert!(out.contains("\n    \"file_path\""), "{out}");
		}

		#[test]
		fn json_line_numbers() {
			let options = FormatOptions {
				output_format: OutputFormat::Json,
				show_line_numbers: true,
				..Default::default()
			};
			let out = Formatter::new().format(&doc("\nPORT=1"), &options).unwrap();
			let value: serde_json::Value = serde_json::from_str(&out).unwrap();
			assert_eq!(value["variables"][0]["line_number"], 2);
		}

		#[test]
		fn yaml_safe_copy() {
			let out = Formatter::new()
				.format(&doc("JWT_SECRET=supersecretvalue"), &with_format(OutputFormat::Yaml))
				.unwrap();
			let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
			assert_eq!(value["variables"][0]["value"].as_str(), Some("s**************e"));
			assert_eq!(value["statistics"]["total_lines"].as_u64(), Some(1));
			assert!(!out.contains("supersecretvalue"));
		}

		#[test]
		fn output_format_from_str() {
			assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
			assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
			assert!(matches!(
				"xml".parse::<OutputFormat>(),
				Err(EnvError::UnknownFormat(f)) if f == "xml"
			));
		}
	}

	mod validation_report {
		use super::*;

		#[test]
		fn text_report() {
			let result = Validator::new().validate(&doc("SECRET_KEY=admin"));
			let out = Formatter::new()
				.format_validation_result(&result, &FormatOptions::default())
				.unwrap();
			assert!(out.contains("Status: ❌ Invalid\n"));
			assert!(out.contains("Risk Level: critical\n"));
			assert!(out.contains("   • SECRET_KEY (Line 1): hardcoded credential detected [critical]\n"));
			assert!(out.contains("🔒 Sensitive Variables Detected:\n   • SECRET_KEY\n"));
		}

		#[test]
		fn json_report() {
			let result = Validator::new().validate(&doc("PORT=8080"));
			let out = Formatter::new()
				.format_validation_result(&result, &with_format(OutputFormat::Json))
				.unwrap();
			let value: serde_json::Value = serde_json::from_str(&out).unwrap();
			assert_eq!(value["is_valid"], true);
			assert_eq!(value["risk_level"], "low");
		}
	}
}
