use crate::domain::model::{ImageRecord, ItemPatch, ItemRecord, NewItem, Page};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// List parameters for the `items` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub expand: Option<String>,
    pub filter: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            sort: "-created".to_string(),
            expand: Some("image".to_string()),
            filter: None,
        }
    }
}

impl ListQuery {
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn auth_token(&self) -> Option<&str>;
    fn items_collection(&self) -> &str;
    fn images_collection(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn page_size(&self) -> u32;
}

/// CRUD over the external record-store service.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_items(&self, query: &ListQuery) -> Result<Page<ItemRecord>>;
    async fn get_item(&self, id: &str) -> Result<ItemRecord>;
    async fn create_item(&self, item: &NewItem) -> Result<ItemRecord>;
    async fn update_item(&self, id: &str, patch: &ItemPatch) -> Result<ItemRecord>;
    async fn delete_item(&self, id: &str) -> Result<()>;

    /// Public URL of an image file, `None` when the record holds no file.
    fn file_url(&self, image: &ImageRecord) -> Option<String>;
}
