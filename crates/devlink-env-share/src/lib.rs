// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Encrypted, expiring `.env` shares addressed by human-friendly codes.
//!
//! [`EnvShareService`] ties the other devlink crates together: documents are
//! parsed and validated, a share code is generated, the document is
//! encrypted under that code and kept in a [`ShareStore`]. Retrieval checks
//! the presented code against a per-client limiter before any lookup.
//!
//! ```no_run
//! use devlink_env_share::{EnvShareService, ShareOptions};
//!
//! let service = EnvShareService::default();
//! let receipt = service
//!     .share_content("PORT=8080\n", "app.env", &ShareOptions::default())
//!     .unwrap();
//! let shared = service.retrieve(&receipt.share_code, "203.0.113.7").unwrap();
//! assert_eq!(shared.document.get("PORT").unwrap().value, "8080");
//! ```
//!
//! Long-running hosts call [`EnvShareService::spawn_sweeper`] to start a
//! [`Sweeper`] that drops expired state.

pub mod bulk;
pub mod error;
pub mod service;
pub mod store;
pub mod sweeper;

pub use bulk::{
	bulk_statistics, categorize_file, group_by_category, validate_bulk_request, BulkShareRequest,
	BulkShareResult, BulkStatistics, FileCategory, MAX_BULK_EXPIRY_DAYS, MAX_BULK_FILES,
};
pub use error::{ShareError, ShareResult};
pub use service::{EnvShareService, RetrievedShare, ServiceStats, ShareOptions, ShareReceipt};
pub use store::{Share, ShareMetadata, ShareStats, ShareStore};
pub use sweeper::{sweep_all, Sweep, Sweeper};
