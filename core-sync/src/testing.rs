use async_trait::async_trait;
use bridge_traits::collections::{
    Collection, CollectionId, CollectionItem, CollectionItemDescriptor, CollectionsApi,
    CreateCollectionOutcome, SearchRequest, SearchResponse,
};
use bridge_traits::error::Result;
use mockall::mock;

mock! {
    pub CollectionsApi {}

    #[async_trait]
    impl CollectionsApi for CollectionsApi {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
        async fn create_collection(&self, name: &str) -> Result<CreateCollectionOutcome>;
        async fn list_collections(&self) -> Result<Vec<Collection>>;
        async fn get_collection_items(&self, id: CollectionId) -> Result<Vec<CollectionItem>>;
        async fn add_collection_item(
            &self,
            id: CollectionId,
            item: &CollectionItemDescriptor,
        ) -> Result<()>;
        async fn delete_collection_item(&self, id: CollectionId, document_id: &str) -> Result<()>;
    }
}

pub fn collection(id: i64, name: &str) -> Collection {
    Collection {
        id: CollectionId(id),
        name: name.to_string(),
    }
}

pub fn item(document_id: &str) -> CollectionItem {
    CollectionItem {
        document_id: Some(document_id.to_string()),
        document: None,
        item_type: Some("DOCUMENT".to_string()),
    }
}
