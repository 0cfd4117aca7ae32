// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

/// Shannon entropy of `s` in bits per byte.
/// Random tokens score high; words and repeated characters score low.
pub fn shannon_entropy(s: &str) -> f32 {
	if s.is_empty() {
		return 0.0;
	}

	let bytes = s.as_bytes();
	let len = bytes.len() as f32;

	let mut freq: HashMap<u8, usize> = HashMap::new();
	for &byte in bytes {
		*freq.entry(byte).or_insert(0) += 1;
	}

	let mut entropy: f32 = 0.0;
	for &count in freq.values() {
		let p = count as f32 / len;
		entropy -= p * p.log2();
	}

	entropy
}
