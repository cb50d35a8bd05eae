use crate::domain::model::{ImageRecord, ItemPatch, ItemRecord, NewItem, Page};
use crate::domain::ports::{ConfigProvider, ListQuery, RecordStore};
use crate::utils::error::{PantryError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Settings needed to talk to a PocketBase server.
#[derive(Debug, Clone)]
pub struct PocketBaseSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub items_collection: String,
    pub images_collection: String,
    pub timeout_seconds: u64,
}

impl PocketBaseSettings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            token: config.auth_token().map(str::to_string),
            items_collection: config.items_collection().to_string(),
            images_collection: config.images_collection().to_string(),
            timeout_seconds: config.timeout_seconds(),
        }
    }
}

pub struct PocketBaseStore {
    settings: PocketBaseSettings,
    client: Client,
}

impl PocketBaseStore {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let settings = PocketBaseSettings::from_provider(config);
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &PocketBaseSettings {
        &self.settings
    }

    fn records_url(&self) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.settings.base_url, self.settings.items_collection
        )
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.records_url(), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.settings.token {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, id: Option<&str>) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        tracing::debug!("PocketBase response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(PantryError::NotFoundError {
                    collection: self.settings.items_collection.clone(),
                    id: id.to_string(),
                });
            }
        }

        // PocketBase 錯誤格式: {"code": 400, "message": "...", "data": {...}}
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });

        Err(PantryError::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        id: Option<&str>,
    ) -> Result<T> {
        let response = self.send(request, id).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RecordStore for PocketBaseStore {
    async fn list_items(&self, query: &ListQuery) -> Result<Page<ItemRecord>> {
        let url = self.records_url();
        tracing::debug!("Listing records from: {}", url);

        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("perPage", query.per_page.to_string()),
            ("sort", query.sort.clone()),
        ];
        if let Some(expand) = &query.expand {
            params.push(("expand", expand.clone()));
        }
        if let Some(filter) = &query.filter {
            params.push(("filter", filter.clone()));
        }

        let page: Page<ItemRecord> = self
            .send_json(self.client.get(&url).query(&params), None)
            .await?;
        tracing::debug!(
            "Fetched {} records (page {}/{})",
            page.items.len(),
            page.page,
            page.total_pages
        );
        Ok(page)
    }

    async fn get_item(&self, id: &str) -> Result<ItemRecord> {
        let request = self
            .client
            .get(self.record_url(id))
            .query(&[("expand", "image")]);
        self.send_json(request, Some(id)).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<ItemRecord> {
        tracing::debug!("Creating record in '{}': {}", self.settings.items_collection, item.name);
        let request = self.client.post(self.records_url()).json(item);
        let record: ItemRecord = self.send_json(request, None).await?;
        tracing::info!("Created item {} ({})", record.id, record.name);
        Ok(record)
    }

    async fn update_item(&self, id: &str, patch: &ItemPatch) -> Result<ItemRecord> {
        if patch.is_empty() {
            return Err(PantryError::validation("Nothing to update"));
        }
        let request = self.client.patch(self.record_url(id)).json(patch);
        let record: ItemRecord = self.send_json(request, Some(id)).await?;
        tracing::info!("Updated item {}", record.id);
        Ok(record)
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let request = self.client.delete(self.record_url(id));
        self.send(request, Some(id)).await?;
        tracing::info!("Deleted item {}", id);
        Ok(())
    }

    fn file_url(&self, image: &ImageRecord) -> Option<String> {
        if image.id.is_empty() || image.image.is_empty() {
            return None;
        }

        let collection = if !image.collection_id.is_empty() {
            image.collection_id.as_str()
        } else if !image.collection_name.is_empty() {
            image.collection_name.as_str()
        } else {
            self.settings.images_collection.as_str()
        };

        Some(format!(
            "{}/api/files/{}/{}/{}",
            self.settings.base_url, collection, image.id, image.image
        ))
    }
}
