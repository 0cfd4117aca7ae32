// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for devlink env sharing.
//!
//! This crate provides:
//! - Layered configuration from defaults, TOML files and the environment
//! - Cross-field validation of the merged result
//! - [`init_tracing`] for host binaries
//!
//! # Usage
//!
//! ```ignore
//! use devlink_env_config::{init_tracing, load_config};
//!
//! let config = load_config()?;
//! init_tracing(&config.logging)?;
//! ```

pub mod error;
pub mod layer;
pub mod logging;
pub mod sections;
pub mod sources;

pub use error::{ConfigError, ConfigResult};
pub use layer::EnvConfigLayer;
pub use logging::init_tracing;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::debug;

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
	pub sharing: SharingConfig,
	pub tokens: TokensConfig,
	pub validation: ValidationConfig,
	pub sweeper: SweeperConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`DEVLINK_*`)
/// 2. User config file (`$XDG_CONFIG_HOME/devlink/env.toml`)
/// 3. System config file (`/etc/devlink/env.toml`)
/// 4. Built-in defaults
pub fn load_config() -> ConfigResult<EnvConfig> {
	let mut sources: Vec<Box<dyn ConfigSource>> =
		vec![Box::new(DefaultsSource), Box::new(TomlSource::system())];
	if let Some(user) = TomlSource::user() {
		sources.push(Box::new(user));
	}
	sources.push(Box::new(EnvSource));
	load_from_sources(sources)
}

/// Load configuration from the environment only.
pub fn load_config_from_env() -> ConfigResult<EnvConfig> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path in place of the
/// system and user files.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> ConfigResult<EnvConfig> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` in precedence order and finalize. Sources of equal
/// precedence apply in the order given.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> ConfigResult<EnvConfig> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = EnvConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Resolve a merged layer and check cross-field rules.
pub fn finalize(layer: EnvConfigLayer) -> ConfigResult<EnvConfig> {
	let config = EnvConfig {
		sharing: layer.sharing.unwrap_or_default().finalize(),
		tokens: layer.tokens.unwrap_or_default().finalize(),
		validation: layer.validation.unwrap_or_default().finalize(),
		sweeper: layer.sweeper.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	debug!(
		default_expiry_secs = config.sharing.default_expiry_secs,
		max_accesses = config.sharing.max_accesses,
		max_attempts_per_minute = config.validation.max_attempts_per_minute,
		sweep_interval_secs = config.sweeper.interval_secs,
		log_format = %config.logging.format,
		"configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &EnvConfig) -> ConfigResult<()> {
	let positive = [
		("sharing.default_expiry_secs", config.sharing.default_expiry_secs),
		("sharing.max_expiry_secs", config.sharing.max_expiry_secs),
		("sharing.max_accesses", u64::from(config.sharing.max_accesses)),
		("tokens.code_ttl_secs", config.tokens.code_ttl_secs),
		("tokens.max_attempts", u64::from(config.tokens.max_attempts)),
		(
			"validation.max_attempts_per_minute",
			u64::from(config.validation.max_attempts_per_minute),
		),
		("validation.block_duration_secs", config.validation.block_duration_secs),
		("validation.cleanup_interval_secs", config.validation.cleanup_interval_secs),
		("sweeper.interval_secs", config.sweeper.interval_secs),
	];
	if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
		return Err(ConfigError::Validation(format!("{name} must be positive")));
	}

	if config.sharing.max_file_size == 0 {
		return Err(ConfigError::Validation(
			"sharing.max_file_size must be positive".to_string(),
		));
	}

	if config.sharing.default_expiry_secs > config.sharing.max_expiry_secs {
		return Err(ConfigError::Validation(format!(
			"sharing.default_expiry_secs ({}) exceeds sharing.max_expiry_secs ({})",
			config.sharing.default_expiry_secs, config.sharing.max_expiry_secs
		)));
	}

	if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
		return Err(ConfigError::Validation(format!(
			"logging.level must be one of {}, got '{}'",
			LOG_LEVELS.join(", "),
			config.logging.level
		)));
	}

	Ok(())
}
