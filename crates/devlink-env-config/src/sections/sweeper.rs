// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background sweep interval.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SweeperConfigLayer {
	pub interval_secs: Option<u64>,
}

impl SweeperConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.interval_secs.is_some() {
			self.interval_secs = other.interval_secs;
		}
	}

	pub fn finalize(self) -> SweeperConfig {
		SweeperConfig {
			interval_secs: self.interval_secs.unwrap_or(300),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweeperConfig {
	pub interval_secs: u64,
}

impl SweeperConfig {
	pub fn interval(&self) -> Duration {
		Duration::from_secs(self.interval_secs)
	}
}

impl Default for SweeperConfig {
	fn default() -> Self {
		SweeperConfigLayer::default().finalize()
	}
}
