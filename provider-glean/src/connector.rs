//! Glean API connector implementation
//!
//! Implements the `CollectionsApi` trait for Glean's client REST API.

use async_trait::async_trait;
use bridge_traits::collections::{
    Collection, CollectionId, CollectionItem, CollectionItemDescriptor, CollectionsApi,
    CreateCollectionOutcome, SearchRequest, SearchResponse,
};
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::{ApiCredentials, DEFAULT_REQUEST_TIMEOUT};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GleanError;
use crate::types::{
    AddCollectionItemsRequest, CreateCollectionRequest, CreateCollectionResponse,
    DeleteCollectionItemRequest, ErrorBody, GetCollectionRequest, GetCollectionResponse,
    ListCollectionsRequest, ListCollectionsResponse, EXISTING_ITEM, NAME_EXISTS,
};

/// Path of the client API below the instance base URL
const API_PATH: &str = "/rest/api/v1";

/// Header naming the user a request is made on behalf of
const ACT_AS_HEADER: &str = "X-Scio-ActAs";

const SEARCH: &str = "search";
const CREATE_COLLECTION: &str = "createcollection";
const LIST_COLLECTIONS: &str = "listcollections";
const GET_COLLECTION: &str = "getcollection";
const ADD_COLLECTION_ITEMS: &str = "addcollectionitems";
const DELETE_COLLECTION_ITEM: &str = "deletecollectionitem";

/// Glean API connector
///
/// # Example
///
/// ```ignore
/// use provider_glean::GleanConnector;
/// use bridge_traits::CollectionsApi;
///
/// let connector = GleanConnector::new(http_client, settings.credentials.clone());
/// let collections = connector.list_collections().await?;
/// ```
pub struct GleanConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Base URL, token and acting user
    credentials: ApiCredentials,

    /// Timeout applied to every request
    request_timeout: Duration,
}

impl GleanConnector {
    /// Create a new Glean connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `credentials` - base URL, API token and the user to act as
    pub fn new(http_client: Arc<dyn HttpClient>, credentials: ApiCredentials) -> Self {
        Self {
            http_client,
            credentials,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.credentials.base_url, API_PATH, endpoint)
    }

    /// Build an authenticated JSON POST for an endpoint
    fn build_request<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<HttpRequest> {
        HttpRequest::new(HttpMethod::Post, self.endpoint_url(endpoint))
            .bearer_token(&self.credentials.api_token)
            .header(ACT_AS_HEADER, &self.credentials.act_as)
            .header("Accept", "application/json")
            .timeout(self.request_timeout)
            .json(body)
    }

    /// POST to an endpoint and return the raw response, whatever its status
    async fn post<T: Serialize + Sync>(&self, endpoint: &str, body: &T) -> Result<HttpResponse> {
        let request = self.build_request(endpoint, body)?;
        let response = self.http_client.execute(request).await?;
        debug!(endpoint, status = response.status, "Glean API responded");
        Ok(response)
    }

    /// Turn a non-2xx response into a provider error
    fn status_error(endpoint: &str, response: &HttpResponse) -> GleanError {
        let message = response.text_lossy();
        warn!(endpoint, status = response.status, "Glean API request failed");

        match response.status {
            401 | 403 => GleanError::AuthenticationFailed {
                status_code: response.status,
                message,
            },
            status_code => GleanError::ApiError {
                endpoint: endpoint.to_string(),
                status_code,
                message,
            },
        }
    }

    /// POST and require a 2xx response
    async fn post_checked<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<HttpResponse> {
        let response = self.post(endpoint, body).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(Self::status_error(endpoint, &response).into())
        }
    }

    fn decode<R: DeserializeOwned>(endpoint: &str, response: &HttpResponse) -> Result<R> {
        response.json().map_err(|e| {
            GleanError::ParseError {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Error code of a structured error body, if the body is one
    fn error_code(response: &HttpResponse) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.code().map(str::to_string))
    }
}

#[async_trait]
impl CollectionsApi for GleanConnector {
    #[instrument(skip(self, request), fields(facets = request.request_options.facet_filters.len()))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let response = self.post_checked(SEARCH, request).await?;
        let search: SearchResponse = Self::decode(SEARCH, &response)?;

        debug!(results = search.results.len(), "Search completed");
        Ok(search)
    }

    #[instrument(skip(self))]
    async fn create_collection(&self, name: &str) -> Result<CreateCollectionOutcome> {
        let response = self
            .post(CREATE_COLLECTION, &CreateCollectionRequest { name })
            .await?;

        if response.status == 422 && Self::error_code(&response).as_deref() == Some(NAME_EXISTS) {
            info!("Collection name already taken");
            return Ok(CreateCollectionOutcome::NameExists);
        }

        if !response.is_success() {
            return Err(Self::status_error(CREATE_COLLECTION, &response).into());
        }

        let created: CreateCollectionResponse = Self::decode(CREATE_COLLECTION, &response)?;
        if created.error_code.as_deref() == Some(NAME_EXISTS) {
            info!("Collection name already taken");
            return Ok(CreateCollectionOutcome::NameExists);
        }

        let id = created.collection_id().ok_or_else(|| GleanError::ParseError {
            endpoint: CREATE_COLLECTION.to_string(),
            message: "response carries no collection id".to_string(),
        })?;

        info!(collection_id = %id, "Created collection");
        Ok(CreateCollectionOutcome::Created(Collection {
            id,
            name: name.to_string(),
        }))
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let response = self
            .post_checked(LIST_COLLECTIONS, &ListCollectionsRequest::default())
            .await?;
        let listed: ListCollectionsResponse = Self::decode(LIST_COLLECTIONS, &response)?;

        debug!(count = listed.collections.len(), "Listed collections");
        Ok(listed.collections)
    }

    #[instrument(skip(self), fields(collection_id = %id))]
    async fn get_collection_items(&self, id: CollectionId) -> Result<Vec<CollectionItem>> {
        let request = GetCollectionRequest {
            id,
            with_items: true,
        };
        let response = self.post_checked(GET_COLLECTION, &request).await?;
        let collection: GetCollectionResponse = Self::decode(GET_COLLECTION, &response)?;

        let items = collection.into_items();
        debug!(count = items.len(), "Fetched collection items");
        Ok(items)
    }

    #[instrument(skip(self, item), fields(collection_id = %id, document_id = %item.document_id))]
    async fn add_collection_item(
        &self,
        id: CollectionId,
        item: &CollectionItemDescriptor,
    ) -> Result<()> {
        let request = AddCollectionItemsRequest {
            collection_id: id,
            added_collection_item_descriptors: [item],
        };
        let response = self.post_checked(ADD_COLLECTION_ITEMS, &request).await?;

        match Self::error_code(&response).as_deref() {
            None => Ok(()),
            Some(EXISTING_ITEM) => {
                debug!("Item already a member");
                Ok(())
            }
            Some(code) => Err(GleanError::ApiError {
                endpoint: ADD_COLLECTION_ITEMS.to_string(),
                status_code: response.status,
                message: code.to_string(),
            }
            .into()),
        }
    }

    #[instrument(skip(self), fields(collection_id = %id))]
    async fn delete_collection_item(&self, id: CollectionId, document_id: &str) -> Result<()> {
        let request = DeleteCollectionItemRequest {
            collection_id: id,
            item_id: None,
            document_id,
        };
        self.post_checked(DELETE_COLLECTION_ITEM, &request).await?;
        Ok(())
    }
}
