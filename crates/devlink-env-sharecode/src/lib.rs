// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Human-speakable share codes.
//!
//! [`ShareCodeGenerator`] issues codes such as `calm-river-42` and remembers
//! them for a TTL. [`ShareCodeValidator`] checks codes typed in by users and
//! throttles each client through a [`RateLimiter`].
//!
//! ```
//! use devlink_env_sharecode::{ShareCodeGenerator, ShareCodeValidator};
//!
//! let generator = ShareCodeGenerator::default();
//! let code = generator.generate().unwrap();
//!
//! let validator = ShareCodeValidator::default();
//! assert!(validator.validate_share_code(&code, "127.0.0.1").is_ok());
//! ```

pub mod blocklist;
pub mod error;
pub mod generator;
pub mod rate_limit;
pub mod security;
pub mod validator;
pub mod words;

pub use blocklist::{OffensiveWords, DEFAULT_OFFENSIVE_WORDS};
pub use error::{ShareCodeError, ShareCodeResult};
pub use generator::{GeneratorConfig, GeneratorStats, ShareCodeGenerator};
pub use rate_limit::{ClientState, RateLimitConfig, RateLimitEntry, RateLimitStats, RateLimiter};
pub use security::{check_security, mask_share_code, COMMON_CODES};
pub use validator::ShareCodeValidator;
pub use words::{is_valid_word, ADJECTIVES, NOUNS};
