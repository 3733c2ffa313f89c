//! # Bridge Traits
//!
//! Abstractions the sync core depends on but does not implement.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP transport with retry policy
//! - [`CollectionsApi`](collections::CollectionsApi) - the remote collections
//!   platform contract (search, create/list collections, item membership)
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert their own errors into it and keep the HTTP status when the
//! remote side answered, so callers can tell rejections from transport faults.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single handle can be shared by
//! concurrently running sync configurations.

pub mod collections;
pub mod error;
pub mod http;

pub use error::BridgeError;

pub use collections::{
    Collection, CollectionId, CollectionItem, CollectionItemDescriptor, CollectionsApi,
    CreateCollectionOutcome, FacetFilter, FacetFilterValue, RelationType, RequestOptions,
    ResultDocument, SearchRequest, SearchResponse, SearchResult, DEFAULT_ITEM_TYPE,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
