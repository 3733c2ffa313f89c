//! # Sync Orchestrator
//!
//! Runs a batch of [`SyncConfig`]s and aggregates their outcomes.
//!
//! Each configuration goes through filter parsing, search, create-or-locate
//! and reconciliation, strictly in that order. Configurations share nothing
//! but the API handle, so up to `max_concurrency` of them are in flight at
//! once. Results always come back in input order.
//!
//! ## Failure modes
//!
//! - [`FailureMode::Isolate`]: a failing configuration becomes a
//!   [`SyncResult::Error`] entry and the rest of the batch is unaffected
//! - [`FailureMode::AbortBatch`]: the batch still runs to completion, then
//!   fails with the first error in input order
//!
//! ## Usage
//!
//! ```rust,ignore
//! let orchestrator = SyncOrchestrator::from_settings(api, &settings);
//! let report = orchestrator
//!     .run_batch(vec![SyncConfig::new("Weekly", "status report", "type:doc")])
//!     .await?;
//! println!("{} failed", report.summary.failed);
//! ```

use bridge_traits::collections::CollectionsApi;
use chrono::Utc;
use core_runtime::config::{FailureMode, SyncSettings, DEFAULT_MAX_CONCURRENCY};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::filter::FilterSet;
use crate::locator::CollectionLocator;
use crate::models::{BatchReport, BatchSummary, SyncConfig, SyncResult};
use crate::query::QueryExecutor;
use crate::reconciler::Reconciler;

pub struct SyncOrchestrator {
    query: QueryExecutor,
    locator: CollectionLocator,
    reconciler: Reconciler,
    failure_mode: FailureMode,
    max_concurrency: usize,
}

impl SyncOrchestrator {
    pub fn new(api: Arc<dyn CollectionsApi>) -> Self {
        Self {
            query: QueryExecutor::new(api.clone()),
            locator: CollectionLocator::new(api.clone()),
            reconciler: Reconciler::new(api),
            failure_mode: FailureMode::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn from_settings(api: Arc<dyn CollectionsApi>, settings: &SyncSettings) -> Self {
        Self::new(api)
            .with_failure_mode(settings.failure_mode)
            .with_max_concurrency(settings.max_concurrency)
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Upper bound on configurations in flight; clamped to at least one.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Sync one configuration end to end.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any step. Nothing is retried and a
    /// partially applied plan is not rolled back.
    #[instrument(skip(self, config), fields(collection = %config.collection_name))]
    pub async fn sync_one(&self, config: &SyncConfig) -> Result<SyncResult> {
        config.validate()?;

        let filters = FilterSet::parse(&config.filter_expression)?;
        let documents = self.query.execute(&config.query, &filters).await?;
        let ensured = self
            .locator
            .ensure_collection(&config.collection_name)
            .await?;

        self.reconciler.reconcile(&ensured, &documents).await
    }

    /// Run every configuration and aggregate the outcomes.
    ///
    /// # Errors
    ///
    /// Only under [`FailureMode::AbortBatch`]: [`SyncError::BatchAborted`]
    /// wrapping the first failure in input order.
    #[instrument(skip(self, configs), fields(configs = configs.len(), mode = %self.failure_mode))]
    pub async fn run_batch(&self, configs: Vec<SyncConfig>) -> Result<BatchReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, "Starting sync batch");

        let outcomes: Vec<Result<SyncResult>> = stream::iter(configs.iter())
            .map(|config| self.sync_one(config))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (config, outcome) in configs.iter().zip(outcomes) {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(
                        collection = %config.collection_name,
                        error = %e,
                        "Sync failed"
                    );
                    if self.failure_mode == FailureMode::AbortBatch {
                        return Err(SyncError::BatchAborted {
                            collection_name: config.collection_name.clone(),
                            source: Box::new(e),
                        });
                    }
                    results.push(SyncResult::Error {
                        collection_name: config.collection_name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let summary = BatchSummary::from_results(&results);
        info!(
            %run_id,
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            "Sync batch finished"
        );

        Ok(BatchReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            failure_mode: self.failure_mode,
            summary,
            results,
        })
    }

    /// Parse a JSON batch and run it. A malformed batch runs nothing.
    pub async fn run_batch_json(&self, json: &str) -> Result<BatchReport> {
        let configs = SyncConfig::parse_batch(json)?;
        self.run_batch(configs).await
    }
}
