// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use devlink_env_config::{EnvConfig, SweeperConfig, TokensConfig, ValidationConfig};
use devlink_env_crypto::EncryptionManager;
use devlink_env_share::{
	bulk_statistics, group_by_category, BulkShareRequest, EnvShareService, FileCategory,
	ShareError, ShareOptions, Sweeper,
};
use devlink_env_sharecode::ShareCodeError;

const CONTENT: &str = "# service settings\nDATABASE_URL=postgresql://db.internal:5432/app\nAPI_KEY=\"sk-1234567890\"\nPORT=8080\n";

fn config() -> EnvConfig {
	EnvConfig {
		tokens: TokensConfig {
			rate_limit_ms: 0,
			..TokensConfig::default()
		},
		..EnvConfig::default()
	}
}

fn service_with(config: &EnvConfig) -> EnvShareService {
	EnvShareService::with_encryption(config, EncryptionManager::with_iterations(10))
}

#[test]
fn shared_document_round_trips_through_a_code() {
	let service = service_with(&config());
	let receipt = service
		.share_content(CONTENT, "app.env", &ShareOptions::default())
		.unwrap();

	let shared = service.retrieve(&receipt.share_code, "198.51.100.4").unwrap();
	assert_eq!(
		shared.document.keys().collect::<Vec<_>>(),
		vec!["DATABASE_URL", "API_KEY", "PORT"]
	);
	assert_eq!(shared.document.get("API_KEY").unwrap().value, "sk-1234567890");
	assert_eq!(shared.metadata, receipt.metadata);

	assert!(matches!(
		service.retrieve(&receipt.share_code, "198.51.100.4"),
		Err(ShareError::NotFound)
	));
}

#[test]
fn guessing_client_is_blocked_but_others_are_not() {
	let config = EnvConfig {
		validation: ValidationConfig {
			max_attempts_per_minute: 3,
			..ValidationConfig::default()
		},
		..config()
	};
	let service = service_with(&config);
	let receipt = service
		.share_content(CONTENT, "app.env", &ShareOptions::default())
		.unwrap();

	let now = Utc::now();
	for guess in ["quick-ferret-1", "quick-ferret-2", "quick-ferret-3"] {
		assert!(matches!(
			service.retrieve_at(guess, "attacker", now),
			Err(ShareError::NotFound)
		));
	}
	assert!(matches!(
		service.retrieve_at(&receipt.share_code, "attacker", now),
		Err(ShareError::ShareCode(ShareCodeError::Blocked { .. }))
	));

	let shared = service
		.retrieve_at(&receipt.share_code, "colleague", now)
		.unwrap();
	assert_eq!(shared.document.get("PORT").unwrap().value, "8080");
}

#[tokio::test]
async fn bulk_share_of_a_project_directory() {
	let dir = tempfile::tempdir().unwrap();
	let files = [
		(".env", "PORT=3000\n"),
		(".env.production", "DATABASE_URL=postgresql://prod.internal/app\nPORT=80\n"),
		(".env.test", "PORT=3001\n"),
	];
	let mut paths = Vec::new();
	for (name, content) in files {
		let path = dir.path().join(name);
		std::fs::write(&path, content).unwrap();
		paths.push(path);
	}
	paths.push(dir.path().join("missing.config"));

	let service = service_with(&config());
	let results = service
		.share_files(&BulkShareRequest {
			files: paths,
			expiry: Some(Duration::hours(2)),
			read_only: true,
			allow_invalid: false,
		})
		.await
		.unwrap();

	let stats = bulk_statistics(&results);
	assert_eq!(stats.total_files, 4);
	assert_eq!(stats.successful_shares, 3);
	assert_eq!(stats.failed_shares, 1);
	assert_eq!(stats.total_variables, 4);
	assert!((stats.success_rate - 0.75).abs() < f64::EPSILON);

	let groups = group_by_category(&results);
	assert_eq!(groups[&FileCategory::Environment].len(), 1);
	assert_eq!(groups[&FileCategory::Production].len(), 1);
	assert_eq!(groups[&FileCategory::Testing].len(), 1);
	assert_eq!(groups[&FileCategory::Configuration].len(), 1);

	let codes: Vec<&str> = results.iter().filter_map(|r| r.share_code.as_deref()).collect();
	assert_eq!(codes.len(), 3);
	for code in codes {
		let shared = service.retrieve(code, "teammate").unwrap();
		assert!(shared.read_only);
	}
}

#[tokio::test]
async fn bulk_share_waits_out_generator_throttling() {
	let config = EnvConfig {
		tokens: TokensConfig {
			rate_limit_ms: 20,
			..TokensConfig::default()
		},
		..EnvConfig::default()
	};
	let dir = tempfile::tempdir().unwrap();
	let mut paths = Vec::new();
	for i in 0..3 {
		let path = dir.path().join(format!("service{i}.env"));
		std::fs::write(&path, format!("PORT={}\n", 8000 + i)).unwrap();
		paths.push(path);
	}

	let service = service_with(&config);
	let results = service
		.share_files(&BulkShareRequest {
			files: paths,
			..Default::default()
		})
		.await
		.unwrap();
	assert!(results.iter().all(|r| r.success()), "{results:?}");
}

#[tokio::test]
async fn sweeper_clears_expired_shares_in_the_background() {
	let service = service_with(&config());
	let receipt = service
		.share_content_at(
			CONTENT,
			"app.env",
			&ShareOptions::default(),
			Utc::now() - Duration::hours(2),
		)
		.unwrap();
	assert!(service.store().get(&receipt.share_code).is_some());

	let sweeper = Sweeper::spawn(service.sweep_targets(), StdDuration::from_millis(10));
	tokio::time::sleep(StdDuration::from_millis(50)).await;
	sweeper.shutdown().await;

	assert!(service.store().is_empty());
}

#[tokio::test]
async fn service_sweeper_runs_at_the_configured_interval() {
	let config = EnvConfig {
		sweeper: SweeperConfig { interval_secs: 1 },
		..config()
	};
	let service = service_with(&config);
	let now = Utc::now();
	service
		.share_content_at(CONTENT, "stale.env", &ShareOptions::default(), now - Duration::hours(2))
		.unwrap();
	let live = service
		.share_content_at(CONTENT, "live.env", &ShareOptions::default(), now)
		.unwrap();
	assert_eq!(service.store().len(), 2);

	let sweeper = service.spawn_sweeper(&config.sweeper);
	tokio::time::sleep(StdDuration::from_millis(50)).await;
	assert!(sweeper.is_running());
	assert_eq!(service.store().len(), 1);
	assert!(service.store().get(&live.share_code).is_some());
	sweeper.shutdown().await;
}
