//! # Query Executor
//!
//! Builds the search request for a sync configuration and normalizes the
//! response into [`DocumentDescriptor`]s.
//!
//! Only the first page is consumed. When the platform reports more results
//! than fit in one page, the extra matches are not synced and a warning is
//! logged.

use bridge_traits::collections::{
    CollectionsApi, RequestOptions, SearchRequest, SearchResponse, DEFAULT_ITEM_TYPE,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{Result, SyncError};
use crate::filter::FilterSet;
use crate::models::DocumentDescriptor;

/// Results requested per search
pub const PAGE_SIZE: u32 = 1000;

/// Build the search payload for a query and parsed filters.
///
/// A blank query is omitted from the request so the search runs on filters
/// alone.
pub fn build_search_request(query: &str, filters: &FilterSet) -> SearchRequest {
    SearchRequest {
        page_size: PAGE_SIZE,
        query: (!query.trim().is_empty()).then(|| query.to_string()),
        request_options: RequestOptions {
            facet_filters: filters.to_facet_filters(),
        },
    }
}

/// Convert raw search results into document descriptors, keeping result order.
pub fn normalize_results(response: SearchResponse) -> Vec<DocumentDescriptor> {
    response
        .results
        .into_iter()
        .map(|result| {
            let title = result.document.title.unwrap_or_default();
            DocumentDescriptor {
                document_id: result.document.id,
                name: title.clone(),
                title,
                url: result.document.url.unwrap_or_default(),
                item_type: result
                    .item_type
                    .unwrap_or_else(|| DEFAULT_ITEM_TYPE.to_string()),
            }
        })
        .collect()
}

pub struct QueryExecutor {
    api: Arc<dyn CollectionsApi>,
}

impl QueryExecutor {
    pub fn new(api: Arc<dyn CollectionsApi>) -> Self {
        Self { api }
    }

    /// Run the search and return normalized documents.
    ///
    /// # Errors
    ///
    /// Any platform failure is reported as [`SyncError::Search`].
    #[instrument(skip(self, filters), fields(filter_fields = filters.len()))]
    pub async fn execute(
        &self,
        query: &str,
        filters: &FilterSet,
    ) -> Result<Vec<DocumentDescriptor>> {
        let request = build_search_request(query, filters);
        let response = self
            .api
            .search(&request)
            .await
            .map_err(SyncError::Search)?;

        if response.has_more_results {
            warn!(
                page_size = PAGE_SIZE,
                "Search matched more than one page; only the first page is synced"
            );
        }

        let documents = normalize_results(response);
        debug!("Search returned {} documents", documents.len());
        Ok(documents)
    }
}
