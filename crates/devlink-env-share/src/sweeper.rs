// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic removal of expired codes, idle rate-limit entries and expired
//! shares.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use devlink_env_config::SweeperConfig;
use devlink_env_sharecode::{RateLimiter, ShareCodeGenerator};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::service::EnvShareService;
use crate::store::ShareStore;

/// Something holding time-bounded entries.
pub trait Sweep: Send + Sync {
	fn name(&self) -> &'static str;

	/// Remove entries that are stale at `now`; returns how many went.
	fn sweep(&self, now: DateTime<Utc>) -> usize;
}

impl Sweep for ShareCodeGenerator {
	fn name(&self) -> &'static str {
		"share-codes"
	}

	fn sweep(&self, now: DateTime<Utc>) -> usize {
		self.sweep_expired(now)
	}
}

impl Sweep for RateLimiter {
	fn name(&self) -> &'static str {
		"rate-limits"
	}

	fn sweep(&self, now: DateTime<Utc>) -> usize {
		RateLimiter::sweep(self, now)
	}
}

impl Sweep for ShareStore {
	fn name(&self) -> &'static str {
		"shares"
	}

	fn sweep(&self, now: DateTime<Utc>) -> usize {
		self.sweep_expired(now)
	}
}

/// Run every target once.
pub fn sweep_all(targets: &[Arc<dyn Sweep>], now: DateTime<Utc>) -> usize {
	targets
		.iter()
		.map(|target| {
			let removed = target.sweep(now);
			trace!(sweep = target.name(), removed, "sweep pass");
			removed
		})
		.sum()
}

/// Handle to a running background sweep task.
pub struct Sweeper {
	shutdown_tx: broadcast::Sender<()>,
	handle: JoinHandle<()>,
}

impl Sweeper {
	/// Sweep `targets` every `interval` until [`shutdown`](Self::shutdown).
	/// Must be called from within a tokio runtime.
	pub fn spawn(targets: Vec<Arc<dyn Sweep>>, interval: Duration) -> Self {
		let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

		let handle = tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

			loop {
				tokio::select! {
					_ = ticker.tick() => {
						let removed = sweep_all(&targets, Utc::now());
						if removed > 0 {
							debug!(removed, "sweeper removed stale entries");
						}
					}
					_ = shutdown_rx.recv() => {
						info!("shutting down sweeper");
						break;
					}
				}
			}
		});

		Self {
			shutdown_tx,
			handle,
		}
	}

	/// [`spawn`](Self::spawn) at the configured interval.
	pub fn from_config(targets: Vec<Arc<dyn Sweep>>, config: &SweeperConfig) -> Self {
		Self::spawn(targets, config.interval())
	}

	pub fn is_running(&self) -> bool {
		!self.handle.is_finished()
	}

	/// Stop the task and wait for it to exit.
	pub async fn shutdown(self) {
		let _ = self.shutdown_tx.send(());
		let _ = self.handle.await;
	}
}

impl EnvShareService {
	/// Start sweeping this service's codes, rate-limit entries and shares.
	pub fn spawn_sweeper(&self, config: &SweeperConfig) -> Sweeper {
		info!(interval_secs = config.interval_secs, "starting sweeper");
		Sweeper::from_config(self.sweep_targets(), config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::tests::share;
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct Counting(AtomicUsize);

	impl Sweep for Counting {
		fn name(&self) -> &'static str {
			"counting"
		}

		fn sweep(&self, _now: DateTime<Utc>) -> usize {
			self.0.fetch_add(1, Ordering::SeqCst);
			0
		}
	}

	#[test]
	fn sweep_all_sums_removals() {
		let store = ShareStore::new();
		let past = Utc::now() - chrono::Duration::hours(2);
		store.insert(share("calm-river-1", past, 60, 1)).unwrap();
		store.insert(share("calm-river-2", past, 60, 1)).unwrap();

		let targets: Vec<Arc<dyn Sweep>> = vec![Arc::new(store.clone()), Arc::new(RateLimiter::default())];
		assert_eq!(sweep_all(&targets, Utc::now()), 2);
		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn background_sweep_removes_expired_shares() {
		let store = ShareStore::new();
		let past = Utc::now() - chrono::Duration::hours(2);
		store.insert(share("calm-river-1", past, 60, 1)).unwrap();
		store.insert(share("calm-river-2", Utc::now(), 3600, 1)).unwrap();

		let sweeper = Sweeper::spawn(vec![Arc::new(store.clone()) as Arc<dyn Sweep>], Duration::from_millis(10));
		tokio::time::sleep(Duration::from_millis(50)).await;

		assert_eq!(store.len(), 1);
		assert!(store.get("calm-river-2").is_some());
		sweeper.shutdown().await;
	}

	#[tokio::test]
	async fn shutdown_stops_the_loop() {
		let counter = Arc::new(Counting(AtomicUsize::new(0)));
		let sweeper = Sweeper::spawn(vec![counter.clone() as Arc<dyn Sweep>], Duration::from_millis(5));
		tokio::time::sleep(Duration::from_millis(30)).await;
		assert!(sweeper.is_running());
		sweeper.shutdown().await;

		let after = counter.0.load(Ordering::SeqCst);
		assert!(after >= 1);
		tokio::time::sleep(Duration::from_millis(30)).await;
		assert_eq!(counter.0.load(Ordering::SeqCst), after);
	}
}
