// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment
//! variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::EnvConfigLayer;
use crate::sections::{
	LogFormat, LoggingConfigLayer, SharingConfigLayer, SweeperConfigLayer, TokensConfigLayer,
	ValidationConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<EnvConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<EnvConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(EnvConfigLayer::default())
	}
}

/// TOML file source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/devlink/env.toml")
	}

	/// `$XDG_CONFIG_HOME/devlink/env.toml`, if a config directory exists.
	pub fn user() -> Option<Self> {
		dirs::config_dir().map(|dir| Self::new(dir.join("devlink").join("env.toml")))
	}

	pub fn path(&self) -> &std::path::Path {
		&self.path
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<EnvConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(EnvConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: EnvConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `DEVLINK_<FIELD>`; empty values count as unset.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<EnvConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_lookup(|name| std::env::var(name).ok())
	}
}

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self
			.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parse<T: std::str::FromStr>(&self, name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {kind} value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

/// Build a layer from `DEVLINK_*` variables as resolved by `lookup`.
pub(crate) fn layer_from_lookup<F>(lookup: F) -> Result<EnvConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let env = Lookup(lookup);

	let format = match env.var("DEVLINK_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| ConfigError::InvalidValue {
			key: "DEVLINK_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(EnvConfigLayer {
		sharing: Some(SharingConfigLayer {
			default_expiry_secs: env.parse("DEVLINK_DEFAULT_EXPIRY_SECS", "u64")?,
			max_expiry_secs: env.parse("DEVLINK_MAX_EXPIRY_SECS", "u64")?,
			max_file_size: env.parse("DEVLINK_MAX_FILE_SIZE", "usize")?,
			max_accesses: env.parse("DEVLINK_MAX_ACCESSES", "u32")?,
			reject_invalid: env.bool("DEVLINK_REJECT_INVALID"),
		}),
		tokens: Some(TokensConfigLayer {
			rate_limit_ms: env.parse("DEVLINK_TOKEN_RATE_LIMIT_MS", "u64")?,
			code_ttl_secs: env.parse("DEVLINK_TOKEN_CLEANUP_INTERVAL_SECS", "u64")?,
			max_attempts: env.parse("DEVLINK_TOKEN_MAX_ATTEMPTS", "u32")?,
		}),
		validation: Some(ValidationConfigLayer {
			max_attempts_per_minute: env.parse("DEVLINK_VALIDATION_MAX_ATTEMPTS", "u32")?,
			block_duration_secs: env.parse("DEVLINK_VALIDATION_BLOCK_DURATION_SECS", "u64")?,
			cleanup_interval_secs: env.parse("DEVLINK_VALIDATION_CLEANUP_INTERVAL_SECS", "u64")?,
			offensive_words_file: env.var("DEVLINK_OFFENSIVE_WORDS_FILE").map(PathBuf::from),
		}),
		sweeper: Some(SweeperConfigLayer {
			interval_secs: env.parse("DEVLINK_SWEEP_INTERVAL_SECS", "u64")?,
		}),
		logging: Some(LoggingConfigLayer {
			level: env.var("DEVLINK_LOG_LEVEL"),
			format,
		}),
	})
}
