// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod logging;
mod sharing;
mod sweeper;
mod tokens;
mod validation;

pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer, LOG_LEVELS};
pub use sharing::{
	SharingConfig, SharingConfigLayer, DEFAULT_EXPIRY_SECS, DEFAULT_MAX_ACCESSES,
	DEFAULT_MAX_EXPIRY_SECS, DEFAULT_MAX_FILE_SIZE,
};
pub use sweeper::{SweeperConfig, SweeperConfigLayer};
pub use tokens::{TokensConfig, TokensConfigLayer};
pub use validation::{ValidationConfig, ValidationConfigLayer};
