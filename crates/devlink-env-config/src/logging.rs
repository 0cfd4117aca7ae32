// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Global `tracing` subscriber setup for host binaries.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ConfigError;
use crate::sections::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));
	let registry = tracing_subscriber::registry().with(filter);

	let result = match config.format {
		LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
		LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
		LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
	};

	result.map_err(|e| ConfigError::Tracing(e.to_string()))
}
