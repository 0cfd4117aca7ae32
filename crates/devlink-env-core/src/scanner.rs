// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Character-level scanner for the right-hand side of an assignment.
//!
//! ```text
//!            '"'                      '\''
//!   ┌──────────────────┐     ┌──────────────────┐
//!   ▼                  │     │                  ▼
//! InDoubleQuote ◄── Normal ──► InSingleQuote
//!   │  '\\'            │ '\\'           '\\'  │
//!   ▼                  ▼                      ▼
//! Escape(Double)  Escape(Unquoted)      Escape(Single)
//! ```
//!
//! Every `Escape` state consumes one character and returns to the state it
//! came from. An unquoted `#` ends the value and starts a trailing comment.
//! Quote characters are stripped; whitespace inside quotes is kept, trailing
//! unquoted whitespace is trimmed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
	#[error("unclosed quotes")]
	UnclosedQuote,

	#[error("incomplete escape sequence")]
	IncompleteEscape,
}

/// Parsed value plus the trailing comment, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedValue {
	pub value: String,
	pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
	Unquoted,
	Single,
	Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Normal,
	InSingleQuote,
	InDoubleQuote,
	Escape(Context),
}

impl Context {
	fn resume(self) -> State {
		match self {
			Context::Unquoted => State::Normal,
			Context::Single => State::InSingleQuote,
			Context::Double => State::InDoubleQuote,
		}
	}
}

fn push_escaped(out: &mut String, c: char) {
	match c {
		'n' => out.push('\n'),
		't' => out.push('\t'),
		'r' => out.push('\r'),
		'"' | '\'' | '\\' => out.push(c),
		other => {
			out.push('\\');
			out.push(other);
		}
	}
}

/// Scan a raw value. The caller strips surrounding whitespace first.
pub fn scan_value(raw: &str) -> Result<ScannedValue, ScanError> {
	let mut out = String::with_capacity(raw.len());
	// Bytes of `out` produced inside quotes or by escapes; never trimmed.
	let mut protected = 0;
	let mut comment = None;
	let mut state = State::Normal;

	for (i, c) in raw.char_indices() {
		state = match state {
			State::Normal => match c {
				'\\' => State::Escape(Context::Unquoted),
				'"' => State::InDoubleQuote,
				'\'' => State::InSingleQuote,
				'#' => {
					let text = raw[i + c.len_utf8()..].trim();
					if !text.is_empty() {
						comment = Some(text.to_string());
					}
					break;
				}
				_ => {
					out.push(c);
					State::Normal
				}
			},
			State::InSingleQuote => match c {
				'\\' => State::Escape(Context::Single),
				'\'' => {
					protected = out.len();
					State::Normal
				}
				_ => {
					out.push(c);
					State::InSingleQuote
				}
			},
			State::InDoubleQuote => match c {
				'\\' => State::Escape(Context::Double),
				'"' => {
					protected = out.len();
					State::Normal
				}
				_ => {
					out.push(c);
					State::InDoubleQuote
				}
			},
			State::Escape(context) => {
				push_escaped(&mut out, c);
				if context == Context::Unquoted {
					protected = out.len();
				}
				context.resume()
			}
		};
	}

	match state {
		State::InSingleQuote | State::InDoubleQuote => return Err(ScanError::UnclosedQuote),
		State::Escape(_) => return Err(ScanError::IncompleteEscape),
		State::Normal => {}
	}

	let kept = protected + out[protected..].trim_end().len();
	out.truncate(kept);

	Ok(ScannedValue {
		value: out,
		comment,
	})
}
