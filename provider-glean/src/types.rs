//! Glean API request and response envelopes
//!
//! Wire shapes specific to the collections endpoints. Shared payloads
//! (search, collection items) live in `bridge_traits::collections`.

use bridge_traits::collections::{Collection, CollectionId, CollectionItem, CollectionItemDescriptor};
use serde::{Deserialize, Serialize};

/// Error code returned when creating a collection whose name is taken
pub const NAME_EXISTS: &str = "NAME_EXISTS";

/// Error type returned when adding an item that is already a member
pub const EXISTING_ITEM: &str = "EXISTING_ITEM";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest<'a> {
    pub name: &'a str,
}

/// createcollection response
///
/// The id is reported either at the top level or inside `collection`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionResponse {
    #[serde(default)]
    pub id: Option<CollectionId>,

    #[serde(default)]
    pub collection: Option<CollectionRef>,

    #[serde(default)]
    pub error_code: Option<String>,
}

impl CreateCollectionResponse {
    pub fn collection_id(&self) -> Option<CollectionId> {
        self.collection.as_ref().map(|c| c.id).or(self.id)
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionRef {
    pub id: CollectionId,
}

/// Structured error body
///
/// Glean reports the code either at the top level or under `error`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub error_type: Option<String>,

    #[serde(default)]
    pub error: Option<Box<ErrorBody>>,
}

impl ErrorBody {
    pub fn code(&self) -> Option<&str> {
        self.error_code
            .as_deref()
            .or(self.error_type.as_deref())
            .or_else(|| self.error.as_ref().and_then(|e| e.code()))
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ListCollectionsRequest {}

#[derive(Debug, Deserialize)]
pub struct ListCollectionsResponse {
    #[serde(default)]
    pub collections: Vec<Collection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionRequest {
    pub id: CollectionId,
    pub with_items: bool,
}

/// getcollection response
///
/// Items may be returned at the top level or nested in `collection`.
#[derive(Debug, Deserialize)]
pub struct GetCollectionResponse {
    #[serde(default)]
    pub items: Option<Vec<CollectionItem>>,

    #[serde(default)]
    pub collection: Option<CollectionWithItems>,
}

impl GetCollectionResponse {
    pub fn into_items(self) -> Vec<CollectionItem> {
        match (self.items, self.collection) {
            (Some(items), _) => items,
            (None, Some(collection)) => collection.items,
            (None, None) => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CollectionWithItems {
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCollectionItemsRequest<'a> {
    pub collection_id: CollectionId,
    pub added_collection_item_descriptors: [&'a CollectionItemDescriptor; 1],
}

/// deletecollectionitem request
///
/// Removal is addressed by document identity; `itemId` is sent as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCollectionItemRequest<'a> {
    pub collection_id: CollectionId,
    pub item_id: Option<&'a str>,
    pub document_id: &'a str,
}
