//! # Collection Reconciler
//!
//! Brings a collection's membership in line with a target document set.
//!
//! ## Workflow
//!
//! 1. Index the target documents by id; the first occurrence of a repeated
//!    id wins
//! 2. For a new collection, every target id is added and nothing is listed
//! 3. For an existing collection, list its items and diff the id sets
//! 4. Apply every addition, then every removal, one remote call per document
//!
//! A failed call stops the pass. Nothing applied so far is rolled back; the
//! returned [`SyncError::PartialApply`] names the ids already added and
//! removed so the next run (which converges) can be reasoned about.

use bridge_traits::collections::{CollectionId, CollectionsApi};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{ApplyPhase, Result, SyncError};
use crate::locator::EnsuredCollection;
use crate::models::{DocumentDescriptor, SyncResult};

/// Pure id-set diff between a target and the current membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Ids to add, sorted
    pub to_add: Vec<String>,
    /// Ids to remove, sorted
    pub to_remove: Vec<String>,
}

impl SyncPlan {
    pub fn compute(target: &BTreeSet<String>, existing: &BTreeSet<String>) -> Self {
        Self {
            to_add: target.difference(existing).cloned().collect(),
            to_remove: existing.difference(target).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Index target documents by id, keeping the first occurrence.
fn index_targets(documents: &[DocumentDescriptor]) -> BTreeMap<&str, &DocumentDescriptor> {
    let mut index = BTreeMap::new();
    for doc in documents {
        match index.entry(doc.document_id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(doc);
            }
            Entry::Occupied(_) => {
                debug!(document_id = %doc.document_id, "Duplicate document in search results");
            }
        }
    }
    index
}

pub struct Reconciler {
    api: Arc<dyn CollectionsApi>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn CollectionsApi>) -> Self {
        Self { api }
    }

    /// Reconcile `ensured` against `documents` and report the applied deltas.
    #[instrument(
        skip(self, ensured, documents),
        fields(collection_id = %ensured.collection.id, is_new = ensured.is_new)
    )]
    pub async fn reconcile(
        &self,
        ensured: &EnsuredCollection,
        documents: &[DocumentDescriptor],
    ) -> Result<SyncResult> {
        let collection = &ensured.collection;
        let targets = index_targets(documents);
        let target_ids: BTreeSet<String> = targets.keys().map(|id| id.to_string()).collect();

        let existing = if ensured.is_new {
            BTreeSet::new()
        } else {
            self.existing_document_ids(collection.id).await?
        };
        let plan = SyncPlan::compute(&target_ids, &existing);

        // Sorted by id, matching plan.to_add
        let additions: Vec<&DocumentDescriptor> = targets
            .iter()
            .filter(|(id, _)| !existing.contains(**id))
            .map(|(_, doc)| *doc)
            .collect();

        let (added, removed) = self
            .apply(collection.id, &additions, &plan.to_remove)
            .await?;

        info!(
            added = added.len(),
            removed = removed.len(),
            "Reconciled collection '{}'",
            collection.name
        );

        Ok(if ensured.is_new {
            SyncResult::Created {
                collection_id: collection.id,
                collection_name: collection.name.clone(),
                added_document_ids: added,
            }
        } else {
            SyncResult::Updated {
                collection_id: collection.id,
                collection_name: collection.name.clone(),
                added_document_ids: added,
                removed_document_ids: removed,
            }
        })
    }

    /// Document ids currently in the collection.
    ///
    /// Items with no document identity cannot be removed by id and are
    /// left out of the diff.
    pub async fn existing_document_ids(&self, id: CollectionId) -> Result<BTreeSet<String>> {
        let items = self
            .api
            .get_collection_items(id)
            .await
            .map_err(|source| SyncError::FetchItems {
                collection_id: id,
                source,
            })?;

        let total = items.len();
        let ids: BTreeSet<String> = items
            .iter()
            .filter_map(|item| item.resolved_document_id())
            .map(str::to_string)
            .collect();

        let unaddressable = items
            .iter()
            .filter(|item| item.resolved_document_id().is_none())
            .count();
        if unaddressable > 0 {
            debug!(
                total,
                unaddressable, "Ignoring collection items without a document id"
            );
        }

        Ok(ids)
    }

    /// Add then remove, one call per document, returning the applied ids.
    async fn apply(
        &self,
        id: CollectionId,
        additions: &[&DocumentDescriptor],
        removals: &[String],
    ) -> Result<(Vec<String>, Vec<String>)> {
        let mut added = Vec::with_capacity(additions.len());
        let mut removed = Vec::with_capacity(removals.len());

        for doc in additions {
            let descriptor = doc.to_item_descriptor();
            if let Err(source) = self.api.add_collection_item(id, &descriptor).await {
                return Err(SyncError::PartialApply {
                    collection_id: id,
                    phase: ApplyPhase::Add,
                    document_id: doc.document_id.clone(),
                    added,
                    removed,
                    source,
                });
            }
            debug!(document_id = %doc.document_id, "Added document");
            added.push(doc.document_id.clone());
        }

        for document_id in removals {
            if let Err(source) = self.api.delete_collection_item(id, document_id).await {
                return Err(SyncError::PartialApply {
                    collection_id: id,
                    phase: ApplyPhase::Remove,
                    document_id: document_id.clone(),
                    added,
                    removed,
                    source,
                });
            }
            debug!(document_id = %document_id, "Removed document");
            removed.push(document_id.clone());
        }

        Ok((added, removed))
    }
}
