// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `.env` document model, parser, security validator and formatter.
//!
//! ```text
//! raw text ──► Parser ──► Document ──┬──► Validator ──► ValidationResult
//!                                    └──► Formatter ──► text / JSON / YAML
//! ```
//!
//! # Example
//!
//! ```
//! use devlink_env_core::{FormatOptions, Formatter, Parser, RiskLevel, Validator};
//!
//! let doc = Parser::new()
//!     .parse_content("API_KEY=sk-1234567890\nPORT=8080\n", "inline")
//!     .unwrap();
//! assert_eq!(doc.sensitive_count(), 1);
//!
//! let result = Validator::new().validate(&doc);
//! assert_eq!(result.risk_level, RiskLevel::Low);
//!
//! let text = Formatter::new().format(&doc, &FormatOptions::default()).unwrap();
//! assert!(!text.contains("sk-1234567890"));
//! ```

mod entropy;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod scanner;
pub mod sensitivity;
pub mod types;
pub mod validator;

pub use entropy::shannon_entropy;
pub use error::{EnvError, EnvResult};
pub use formatter::{mask_value, FormatOptions, Formatter, OutputFormat};
pub use parser::{Parser, ParserOptions, DEFAULT_MAX_FILE_SIZE};
pub use sensitivity::{is_sensitive, SensitivityClassifier, DEFAULT_SENSITIVE_PATTERNS};
pub use types::{
	Document, ParseError, RiskLevel, Severity, ValidationError, ValidationResult,
	ValidationWarning, Variable,
};
pub use validator::{ValidationRules, Validator, ValidatorConfig};
