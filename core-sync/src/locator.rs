//! # Collection Locator
//!
//! Resolves a collection name to a collection, creating it when absent.
//!
//! Creation is attempted first. When the platform reports that the name is
//! taken, every visible collection is listed and the first exact,
//! case-sensitive name match is used.

use bridge_traits::collections::{Collection, CollectionsApi, CreateCollectionOutcome};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SyncError};

/// A collection together with whether this run created it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredCollection {
    pub collection: Collection,
    pub is_new: bool,
}

pub struct CollectionLocator {
    api: Arc<dyn CollectionsApi>,
}

impl CollectionLocator {
    pub fn new(api: Arc<dyn CollectionsApi>) -> Self {
        Self { api }
    }

    /// Create the named collection, or locate it if the name already exists.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Creation`] when creation fails for any reason other
    ///   than a name collision
    /// - [`SyncError::Lookup`] when listing collections fails
    /// - [`SyncError::CollectionNotFound`] when the name is reported taken
    ///   but no listed collection matches it exactly
    #[instrument(skip(self))]
    pub async fn ensure_collection(&self, name: &str) -> Result<EnsuredCollection> {
        let outcome = self
            .api
            .create_collection(name)
            .await
            .map_err(|source| SyncError::Creation {
                name: name.to_string(),
                source,
            })?;

        match outcome {
            CreateCollectionOutcome::Created(collection) => {
                info!(collection_id = %collection.id, "Created collection");
                Ok(EnsuredCollection {
                    collection,
                    is_new: true,
                })
            }
            CreateCollectionOutcome::NameExists => {
                debug!("Collection name already taken, looking it up");
                let collection =
                    self.find_by_name(name)
                        .await?
                        .ok_or_else(|| SyncError::CollectionNotFound {
                            name: name.to_string(),
                        })?;

                Ok(EnsuredCollection {
                    collection,
                    is_new: false,
                })
            }
        }
    }

    /// First listed collection whose name equals `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Collection>> {
        let collections = self
            .api
            .list_collections()
            .await
            .map_err(|source| SyncError::Lookup {
                name: name.to_string(),
                source,
            })?;

        let mut matches = collections.into_iter().filter(|c| c.name == name);
        let found = matches.next();

        let duplicates = matches.count();
        if let Some(collection) = &found {
            if duplicates > 0 {
                warn!(
                    collection_id = %collection.id,
                    duplicates,
                    "Several collections share this name; using the first listed"
                );
            }
        }

        Ok(found)
    }
}
