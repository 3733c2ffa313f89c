//! Domain models for sync configurations, documents and results

use bridge_traits::collections::{CollectionId, CollectionItemDescriptor};
use chrono::{DateTime, Utc};
use core_runtime::config::FailureMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SyncError};

/// Normalized document derived from a search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    pub document_id: String,
    pub name: String,
    pub title: String,
    pub url: String,
    pub item_type: String,
}

impl DocumentDescriptor {
    /// Descriptor used when adding this document to a collection
    pub fn to_item_descriptor(&self) -> CollectionItemDescriptor {
        CollectionItemDescriptor {
            document_id: self.document_id.clone(),
            name: Some(self.name.clone()).filter(|n| !n.is_empty()),
            url: Some(self.url.clone()).filter(|u| !u.is_empty()),
            item_type: self.item_type.clone(),
        }
    }
}

/// One unit of sync work
///
/// Deserialized from `{ "name": ..., "query": ..., "filters": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(rename = "name")]
    pub collection_name: String,

    #[serde(default)]
    pub query: String,

    #[serde(default, rename = "filters")]
    pub filter_expression: String,
}

impl SyncConfig {
    pub fn new(
        collection_name: impl Into<String>,
        query: impl Into<String>,
        filter_expression: impl Into<String>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            query: query.into(),
            filter_expression: filter_expression.into(),
        }
    }

    /// Parse a batch given as a JSON list of configurations.
    ///
    /// # Errors
    ///
    /// `SyncError::Configuration` when the input is not a JSON list of
    /// configurations or any entry has a blank name.
    pub fn parse_batch(json: &str) -> Result<Vec<SyncConfig>> {
        let configs: Vec<SyncConfig> = serde_json::from_str(json)
            .map_err(|e| SyncError::Configuration(format!("malformed batch: {}", e)))?;

        for (index, config) in configs.iter().enumerate() {
            config.validate().map_err(|e| match e {
                SyncError::Configuration(msg) => {
                    SyncError::Configuration(format!("entry {}: {}", index, msg))
                }
                other => other,
            })?;
        }

        Ok(configs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.collection_name.trim().is_empty() {
            return Err(SyncError::Configuration(
                "collection name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of syncing one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncResult {
    /// The collection did not exist and was created with the search results
    #[serde(rename_all = "camelCase")]
    Created {
        collection_id: CollectionId,
        collection_name: String,
        added_document_ids: Vec<String>,
    },

    /// An existing collection was brought in line with the search results
    #[serde(rename_all = "camelCase")]
    Updated {
        collection_id: CollectionId,
        collection_name: String,
        added_document_ids: Vec<String>,
        removed_document_ids: Vec<String>,
    },

    /// The configuration failed; siblings in the batch are unaffected
    #[serde(rename_all = "camelCase")]
    Error {
        collection_name: String,
        message: String,
    },
}

impl SyncResult {
    pub fn collection_name(&self) -> &str {
        match self {
            SyncResult::Created {
                collection_name, ..
            }
            | SyncResult::Updated {
                collection_name, ..
            }
            | SyncResult::Error {
                collection_name, ..
            } => collection_name,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SyncResult::Error { .. })
    }

    pub fn added_document_ids(&self) -> &[String] {
        match self {
            SyncResult::Created {
                added_document_ids, ..
            }
            | SyncResult::Updated {
                added_document_ids, ..
            } => added_document_ids,
            SyncResult::Error { .. } => &[],
        }
    }

    pub fn removed_document_ids(&self) -> &[String] {
        match self {
            SyncResult::Updated {
                removed_document_ids,
                ..
            } => removed_document_ids,
            _ => &[],
        }
    }
}

/// Counts across a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub documents_added: usize,
    pub documents_removed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[SyncResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            match result {
                SyncResult::Created { .. } => summary.created += 1,
                SyncResult::Updated { .. } => summary.updated += 1,
                SyncResult::Error { .. } => summary.failed += 1,
            }
            summary.documents_added += result.added_document_ids().len();
            summary.documents_removed += result.removed_document_ids().len();
            summary
        })
    }
}

/// Aggregated output of a batch run, results in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub failure_mode: FailureMode,
    pub summary: BatchSummary,
    pub results: Vec<SyncResult>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}
