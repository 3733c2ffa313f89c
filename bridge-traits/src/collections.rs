//! Collections Platform Contract
//!
//! The request/response contract the reconciliation core consumes from the
//! remote search/knowledge platform. Payloads are explicit serde schemas so
//! malformed responses are rejected at the boundary instead of leaking into
//! the core as loosely-typed maps.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Item type assumed when the platform omits one.
pub const DEFAULT_ITEM_TYPE: &str = "DOCUMENT";

/// Opaque collection identity assigned by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub i64);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named collection as listed by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
}

/// Relation between a facet field and a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "EQUALS")]
    Equals,
}

/// One accepted value of a facet filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilterValue {
    pub value: String,
    pub relation_type: RelationType,
}

/// Field-scoped constraint applied to a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetFilter {
    pub field_name: String,
    pub values: Vec<FacetFilterValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub facet_filters: Vec<FacetFilter>,
}

/// Search request payload
///
/// `query` is omitted from the serialized payload when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub request_options: RequestOptions,
}

/// Document as embedded in search results and collection items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub document: ResultDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

/// Search response payload
///
/// A missing `results` array is treated as zero matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub has_more_results: bool,
}

/// Member of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<ResultDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

impl CollectionItem {
    /// Document identity of the item, preferring the embedded document.
    ///
    /// Items that only reference a URL have no document identity.
    pub fn resolved_document_id(&self) -> Option<&str> {
        self.document
            .as_ref()
            .map(|doc| doc.id.as_str())
            .filter(|id| !id.is_empty())
            .or_else(|| self.document_id.as_deref().filter(|id| !id.is_empty()))
    }
}

/// Descriptor sent when adding an item to a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemDescriptor {
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub item_type: String,
}

/// Result of a create-collection call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateCollectionOutcome {
    /// The collection was created
    Created(Collection),
    /// A collection with the requested name already exists
    NameExists,
}

/// Remote collections platform
///
/// Every method is a single remote call. Implementations attach credentials
/// and map transport failures to [`BridgeError`](crate::error::BridgeError);
/// they never retry calls that mutate collections.
#[async_trait]
pub trait CollectionsApi: Send + Sync {
    /// Run a search and return the first page of results
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Create a collection, reporting a name collision as a distinct outcome
    async fn create_collection(&self, name: &str) -> Result<CreateCollectionOutcome>;

    /// List every collection visible to the acting user
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    /// Fetch the current members of a collection
    async fn get_collection_items(&self, id: CollectionId) -> Result<Vec<CollectionItem>>;

    /// Add exactly one item to a collection
    async fn add_collection_item(
        &self,
        id: CollectionId,
        item: &CollectionItemDescriptor,
    ) -> Result<()>;

    /// Remove a document from a collection, addressed by document identity
    async fn delete_collection_item(&self, id: CollectionId, document_id: &str) -> Result<()>;
}
