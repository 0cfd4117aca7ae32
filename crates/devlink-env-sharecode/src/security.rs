// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Predictability heuristics shared by the generator and the validator.

use crate::error::{ShareCodeError, ShareCodeResult};

/// Codes that are format-valid but too easy to guess.
pub const COMMON_CODES: &[&str] = &[
	"test-test-1",
	"demo-demo-1",
	"temp-temp-1",
	"fake-fake-1",
	"blue-blue-1",
	"red-red-1",
	"green-green-1",
];

/// Reject codes with a run of three identical characters, a three-digit
/// ascending or descending run in the number, or an entry in
/// [`COMMON_CODES`].
pub fn check_security(code: &str) -> ShareCodeResult<()> {
	if has_repeated_run(code) {
		return Err(ShareCodeError::SecurityCheck(
			"share code contains excessive repetition".to_string(),
		));
	}

	let number = code.rsplit('-').next().unwrap_or_default();
	if has_sequential_digits(number) {
		return Err(ShareCodeError::SecurityCheck(
			"share code contains predictable pattern".to_string(),
		));
	}

	let lowered = code.to_lowercase();
	if COMMON_CODES.contains(&lowered.as_str()) {
		return Err(ShareCodeError::SecurityCheck(
			"share code matches common pattern".to_string(),
		));
	}

	Ok(())
}

fn has_repeated_run(code: &str) -> bool {
	code.as_bytes()
		.windows(3)
		.any(|w| w[0] == w[1] && w[1] == w[2])
}

fn has_sequential_digits(number: &str) -> bool {
	number.as_bytes().windows(3).any(|w| {
		w.iter().all(u8::is_ascii_digit)
			&& ((w[1] == w[0] + 1 && w[2] == w[1] + 1)
				|| (w[1].wrapping_add(1) == w[0] && w[2].wrapping_add(1) == w[1]))
	})
}

/// Log-safe rendering of a share code: the first word only.
pub fn mask_share_code(code: &str) -> String {
	match code.split_once('-') {
		Some((first, _)) => format!("{first}-***"),
		None => "***".to_string(),
	}
}
