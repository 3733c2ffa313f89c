//! End-to-end reconciliation against an in-memory collections platform
//!
//! These tests drive the orchestrator through complete runs and check:
//! - Creation of missing collections with the full search result set
//! - Add/remove deltas on existing collections, additions first
//! - Convergence: a second run over unchanged data makes no item calls
//! - Isolation and abort failure modes
//! - Name collisions that cannot be resolved by listing

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    Collection, CollectionId, CollectionItem, CollectionItemDescriptor, CollectionsApi,
    CreateCollectionOutcome, ResultDocument, SearchRequest, SearchResponse, SearchResult,
};
use core_runtime::FailureMode;
use core_sync::{SyncConfig, SyncError, SyncOrchestrator, SyncResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ============================================================================
// Fake platform
// ============================================================================

#[derive(Default)]
struct PlatformState {
    next_id: i64,
    collections: Vec<(Collection, Vec<String>)>,
    search_results: HashMap<String, Vec<String>>,
    hidden_names: Vec<String>,
    failing_adds: Vec<String>,
    calls: Vec<String>,
}

#[derive(Default)]
struct FakePlatform {
    state: Mutex<PlatformState>,
}

impl FakePlatform {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with_search(&self, query: &str, ids: &[&str]) {
        self.state.lock().unwrap().search_results.insert(
            query.to_string(),
            ids.iter().map(|id| id.to_string()).collect(),
        );
    }

    fn with_collection(&self, name: &str, ids: &[&str]) -> CollectionId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = CollectionId(state.next_id);
        state.collections.push((
            Collection {
                id,
                name: name.to_string(),
            },
            ids.iter().map(|id| id.to_string()).collect(),
        ));
        id
    }

    /// Report the name as taken on create but leave it out of listings
    fn hide_name(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .hidden_names
            .push(name.to_string());
    }

    fn fail_add(&self, document_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_adds
            .push(document_id.to_string());
    }

    fn members(&self, name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut ids = state
            .collections
            .iter()
            .find(|(c, _)| c.name == name)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl CollectionsApi for FakePlatform {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let mut state = self.state.lock().unwrap();
        let query = request.query.clone().unwrap_or_default();
        state.calls.push(format!("search:{}", query));

        let results = state
            .search_results
            .get(&query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|id| SearchResult {
                document: ResultDocument {
                    title: Some(format!("Title {}", id)),
                    url: Some(format!("https://docs.example.com/{}", id)),
                    id,
                },
                item_type: None,
            })
            .collect();

        Ok(SearchResponse {
            results,
            has_more_results: false,
        })
    }

    async fn create_collection(&self, name: &str) -> Result<CreateCollectionOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create:{}", name));

        let taken = state.collections.iter().any(|(c, _)| c.name == name)
            || state.hidden_names.iter().any(|n| n == name);
        if taken {
            return Ok(CreateCollectionOutcome::NameExists);
        }

        state.next_id += 1;
        let collection = Collection {
            id: CollectionId(state.next_id),
            name: name.to_string(),
        };
        state.collections.push((collection.clone(), Vec::new()));
        Ok(CreateCollectionOutcome::Created(collection))
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list".to_string());
        Ok(state.collections.iter().map(|(c, _)| c.clone()).collect())
    }

    async fn get_collection_items(&self, id: CollectionId) -> Result<Vec<CollectionItem>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("items:{}", id));

        let (_, ids) = state
            .collections
            .iter()
            .find(|(c, _)| c.id == id)
            .ok_or_else(|| BridgeError::Api {
                status: 404,
                message: "no such collection".to_string(),
            })?;

        Ok(ids
            .iter()
            .map(|doc_id| CollectionItem {
                document_id: Some(doc_id.clone()),
                document: None,
                item_type: Some("DOCUMENT".to_string()),
            })
            .collect())
    }

    async fn add_collection_item(
        &self,
        id: CollectionId,
        item: &CollectionItemDescriptor,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("add:{}", item.document_id));

        if state.failing_adds.contains(&item.document_id) {
            return Err(BridgeError::Api {
                status: 500,
                message: "add rejected".to_string(),
            });
        }

        if let Some((_, ids)) = state.collections.iter_mut().find(|(c, _)| c.id == id) {
            if !ids.contains(&item.document_id) {
                ids.push(item.document_id.clone());
            }
        }
        Ok(())
    }

    async fn delete_collection_item(&self, id: CollectionId, document_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("remove:{}", document_id));

        if let Some((_, ids)) = state.collections.iter_mut().find(|(c, _)| c.id == id) {
            ids.retain(|existing| existing != document_id);
        }
        Ok(())
    }
}

fn orchestrator(platform: &Arc<FakePlatform>) -> SyncOrchestrator {
    SyncOrchestrator::new(platform.clone())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_missing_collection_is_created_with_results() {
    let platform = FakePlatform::new();
    platform.with_search("q", &["d2", "d1"]);

    let result = orchestrator(&platform)
        .sync_one(&SyncConfig::new("C", "q", ""))
        .await
        .unwrap();

    match result {
        SyncResult::Created {
            added_document_ids,
            collection_name,
            ..
        } => {
            assert_eq!(collection_name, "C");
            assert_eq!(added_document_ids, strings(&["d1", "d2"]));
        }
        other => panic!("expected Created, got {:?}", other),
    }
    assert_eq!(platform.members("C"), strings(&["d1", "d2"]));
    assert!(!platform.calls().iter().any(|c| c.starts_with("items:")));
}

#[tokio::test]
async fn test_existing_collection_gets_delta_adds_first() {
    let platform = FakePlatform::new();
    let id = platform.with_collection("C", &["d1", "d2"]);
    platform.with_search("q", &["d2", "d3"]);

    let result = orchestrator(&platform)
        .sync_one(&SyncConfig::new("C", "q", ""))
        .await
        .unwrap();

    assert_eq!(
        result,
        SyncResult::Updated {
            collection_id: id,
            collection_name: "C".to_string(),
            added_document_ids: strings(&["d3"]),
            removed_document_ids: strings(&["d1"]),
        }
    );
    assert_eq!(platform.members("C"), strings(&["d2", "d3"]));

    let calls = platform.calls();
    let add = calls.iter().position(|c| c == "add:d3").unwrap();
    let remove = calls.iter().position(|c| c == "remove:d1").unwrap();
    assert!(add < remove);
}

#[tokio::test]
async fn test_second_run_converges_without_item_calls() {
    let platform = FakePlatform::new();
    platform.with_collection("C", &["d9"]);
    platform.with_search("q", &["d1", "d2"]);
    let orchestrator = orchestrator(&platform);
    let config = SyncConfig::new("C", "q", "");

    orchestrator.sync_one(&config).await.unwrap();
    platform.clear_calls();

    let second = orchestrator.sync_one(&config).await.unwrap();

    assert!(second.added_document_ids().is_empty());
    assert!(second.removed_document_ids().is_empty());
    assert!(!platform
        .calls()
        .iter()
        .any(|c| c.starts_with("add:") || c.starts_with("remove:")));
}

#[tokio::test]
async fn test_empty_results_empty_existing_collection() {
    let platform = FakePlatform::new();
    platform.with_collection("C", &["d1"]);

    let result = orchestrator(&platform)
        .sync_one(&SyncConfig::new("C", "nothing", ""))
        .await
        .unwrap();

    assert_eq!(result.removed_document_ids(), strings(&["d1"]).as_slice());
    assert!(platform.members("C").is_empty());
}

#[tokio::test]
async fn test_missing_collection_with_empty_search() {
    let platform = FakePlatform::new();

    let result = orchestrator(&platform)
        .sync_one(&SyncConfig::new("C", "nothing", ""))
        .await
        .unwrap();

    match result {
        SyncResult::Created {
            added_document_ids,
            collection_name,
            ..
        } => {
            assert_eq!(collection_name, "C");
            assert!(added_document_ids.is_empty());
        }
        other => panic!("expected Created, got {:?}", other),
    }
    assert!(platform.members("C").is_empty());
    assert!(!platform
        .calls()
        .iter()
        .any(|c| c.starts_with("add:") || c.starts_with("items:")));
}

#[tokio::test]
async fn test_name_taken_but_not_listed() {
    let platform = FakePlatform::new();
    platform.hide_name("Ghost");

    let err = orchestrator(&platform)
        .sync_one(&SyncConfig::new("Ghost", "", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::CollectionNotFound { .. }));
    assert_eq!(platform.calls().last().map(String::as_str), Some("list"));
}

#[tokio::test]
async fn test_failed_add_stops_before_removals() {
    let platform = FakePlatform::new();
    platform.with_collection("C", &["d1"]);
    platform.with_search("q", &["d2", "d3"]);
    platform.fail_add("d3");

    let err = orchestrator(&platform)
        .sync_one(&SyncConfig::new("C", "q", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::PartialApply { ref added, .. } if added == &strings(&["d2"])));
    assert!(!platform.calls().iter().any(|c| c.starts_with("remove:")));
    assert_eq!(platform.members("C"), strings(&["d1", "d2"]));
}

#[tokio::test]
async fn test_batch_isolates_failures_in_input_order() {
    let platform = FakePlatform::new();
    platform.with_search("a", &["d1"]);
    platform.with_search("c", &["d3"]);
    platform.hide_name("B");

    let report = orchestrator(&platform)
        .run_batch_json(
            r#"[
                { "name": "A", "query": "a" },
                { "name": "B", "query": "b" },
                { "name": "C", "query": "c" }
            ]"#,
        )
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert!(matches!(report.results[0], SyncResult::Created { .. }));
    assert!(matches!(
        report.results[1],
        SyncResult::Error { ref collection_name, .. } if collection_name == "B"
    ));
    assert!(matches!(report.results[2], SyncResult::Created { .. }));
    assert_eq!(report.summary.documents_added, 2);
}

#[tokio::test]
async fn test_abort_batch_fails_whole_run() {
    let platform = FakePlatform::new();
    platform.hide_name("B");

    let err = orchestrator(&platform)
        .with_failure_mode(FailureMode::AbortBatch)
        .run_batch(vec![
            SyncConfig::new("A", "", ""),
            SyncConfig::new("B", "", ""),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::BatchAborted { ref collection_name, .. } if collection_name == "B"));
    // Siblings still ran to completion
    assert_eq!(platform.members("A"), Vec::<String>::new());
    assert!(platform.calls().contains(&"create:A".to_string()));
}

#[tokio::test]
async fn test_filters_reach_search_request() {
    struct RecordingPlatform {
        inner: Arc<FakePlatform>,
        last: Mutex<Option<SearchRequest>>,
    }

    #[async_trait]
    impl CollectionsApi for RecordingPlatform {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
            *self.last.lock().unwrap() = Some(request.clone());
            self.inner.search(request).await
        }
        async fn create_collection(&self, name: &str) -> Result<CreateCollectionOutcome> {
            self.inner.create_collection(name).await
        }
        async fn list_collections(&self) -> Result<Vec<Collection>> {
            self.inner.list_collections().await
        }
        async fn get_collection_items(&self, id: CollectionId) -> Result<Vec<CollectionItem>> {
            self.inner.get_collection_items(id).await
        }
        async fn add_collection_item(
            &self,
            id: CollectionId,
            item: &CollectionItemDescriptor,
        ) -> Result<()> {
            self.inner.add_collection_item(id, item).await
        }
        async fn delete_collection_item(&self, id: CollectionId, document_id: &str) -> Result<()> {
            self.inner.delete_collection_item(id, document_id).await
        }
    }

    let recording = Arc::new(RecordingPlatform {
        inner: FakePlatform::new(),
        last: Mutex::new(None),
    });

    SyncOrchestrator::new(recording.clone())
        .sync_one(&SyncConfig::new("C", "", "status:active category:news status:draft"))
        .await
        .unwrap();

    let request = recording.last.lock().unwrap().clone().unwrap();
    assert_eq!(request.query, None);
    let facets = &request.request_options.facet_filters;
    assert_eq!(facets.len(), 2);
    assert_eq!(facets[0].field_name, "status");
    assert_eq!(facets[0].values.len(), 2);
    assert_eq!(facets[1].field_name, "category");
}
