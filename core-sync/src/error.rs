use bridge_traits::{error::BridgeError, CollectionId};
use std::fmt;
use thiserror::Error;

use crate::filter::FilterParseError;

/// Which half of a plan was being applied when a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Add,
    Remove,
}

impl fmt::Display for ApplyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyPhase::Add => write!(f, "add"),
            ApplyPhase::Remove => write!(f, "remove"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid batch configuration: {0}")]
    Configuration(String),

    #[error("Invalid filter expression: {0}")]
    InvalidFilter(#[from] FilterParseError),

    #[error("Search failed: {0}")]
    Search(#[source] BridgeError),

    #[error("Collection '{name}' already exists but was not found when listing collections")]
    CollectionNotFound { name: String },

    #[error("Failed to create collection '{name}': {source}")]
    Creation { name: String, source: BridgeError },

    #[error("Failed to list collections while locating '{name}': {source}")]
    Lookup { name: String, source: BridgeError },

    #[error("Failed to fetch items of collection {collection_id}: {source}")]
    FetchItems {
        collection_id: CollectionId,
        source: BridgeError,
    },

    #[error(
        "Failed to {phase} document {document_id} on collection {collection_id} \
         after {} additions and {} removals: {source}",
        .added.len(),
        .removed.len()
    )]
    PartialApply {
        collection_id: CollectionId,
        phase: ApplyPhase,
        document_id: String,
        added: Vec<String>,
        removed: Vec<String>,
        source: BridgeError,
    },

    #[error("Batch aborted by failure of '{collection_name}': {source}")]
    BatchAborted {
        collection_name: String,
        source: Box<SyncError>,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_apply_reports_progress() {
        let error = SyncError::PartialApply {
            collection_id: CollectionId(4),
            phase: ApplyPhase::Remove,
            document_id: "d9".to_string(),
            added: vec!["d1".to_string(), "d2".to_string()],
            removed: vec!["d5".to_string()],
            source: BridgeError::Timeout,
        };

        assert_eq!(
            error.to_string(),
            "Failed to remove document d9 on collection 4 after 2 additions and 1 removals: \
             Request timed out"
        );
    }

    #[test]
    fn test_collection_not_found_names_collection() {
        let error = SyncError::CollectionNotFound {
            name: "Weekly".to_string(),
        };
        assert!(error.to_string().contains("'Weekly'"));
    }
}
