// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by one source.

use serde::{Deserialize, Serialize};

use crate::sections::{
	LoggingConfigLayer, SharingConfigLayer, SweeperConfigLayer, TokensConfigLayer,
	ValidationConfigLayer,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvConfigLayer {
	pub sharing: Option<SharingConfigLayer>,
	pub tokens: Option<TokensConfigLayer>,
	pub validation: Option<ValidationConfigLayer>,
	pub sweeper: Option<SweeperConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T: Default>(base: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	if let Some(other) = other {
		merge(base.get_or_insert_with(T::default), other);
	}
}

impl EnvConfigLayer {
	/// Overlay `other` onto `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.sharing, other.sharing, SharingConfigLayer::merge);
		merge_section(&mut self.tokens, other.tokens, TokensConfigLayer::merge);
		merge_section(&mut self.validation, other.validation, ValidationConfigLayer::merge);
		merge_section(&mut self.sweeper, other.sweeper, SweeperConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}
